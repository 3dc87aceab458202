//! Review repository: append-only review storage.

use chrono::Utc;
use sqlx::SqlitePool;

use clementine_core::{ProductId, ReviewId, UserId};

use super::RepositoryError;
use crate::models::ReviewWithAuthor;

const SELECT_WITH_AUTHOR: &str = r"
    SELECT r.id, r.user_id, r.product_id, r.rating, r.comment, r.created_at,
           u.name AS user_name
    FROM reviews r
    JOIN users u ON u.id = r.user_id
";

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a review. The rating is validated at the API boundary; the
    /// CHECK constraint is the backstop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist,
    /// including when it was deleted after an existence check upstream.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        user_id: UserId,
        product_id: ProductId,
        rating: i64,
        comment: &str,
    ) -> Result<ReviewWithAuthor, RepositoryError> {
        let id = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO reviews (user_id, product_id, rating, comment, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(rating)
        .bind(comment)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        let review = sqlx::query_as::<_, ReviewWithAuthor>(&format!(
            "{SELECT_WITH_AUTHOR} WHERE r.id = ?1"
        ))
        .bind(ReviewId::new(id))
        .fetch_one(self.pool)
        .await?;

        Ok(review)
    }

    /// List a product's reviews with author names, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ReviewWithAuthor>, RepositoryError> {
        let reviews = sqlx::query_as::<_, ReviewWithAuthor>(&format!(
            "{SELECT_WITH_AUTHOR} WHERE r.product_id = ?1 ORDER BY r.id ASC"
        ))
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(reviews)
    }
}
