//! Product catalog models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use clementine_core::{Price, ProductId};

use super::review::ReviewWithAuthor;

/// A catalog product.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub stock: i64,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Product detail view: the product plus its reviews and the derived
/// average rating.
///
/// `average_rating` is `None` when the product has no reviews; clients
/// render that however they like ("New", a dash, ...). It is never a
/// division-by-zero artifact.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub reviews: Vec<ReviewWithAuthor>,
    pub average_rating: Option<f64>,
}

impl ProductDetail {
    /// Assemble the detail view, deriving the average rating from the
    /// review list.
    #[must_use]
    pub fn new(product: Product, reviews: Vec<ReviewWithAuthor>) -> Self {
        let average_rating = average_rating(&reviews);
        Self {
            product,
            reviews,
            average_rating,
        }
    }
}

/// Average of review ratings, or `None` for an empty list.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_rating(reviews: &[ReviewWithAuthor]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: i64 = reviews.iter().map(|r| r.rating).sum();
    Some(sum as f64 / reviews.len() as f64)
}
