//! Review models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use clementine_core::{ProductId, ReviewId, UserId};

/// A product review joined with the author's display name.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithAuthor {
    pub id: ReviewId,
    pub user_id: UserId,
    pub product_id: ProductId,
    /// Rating from 1 to 5, validated at the API boundary and by a
    /// database CHECK constraint.
    pub rating: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
}
