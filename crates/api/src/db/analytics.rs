//! Read-only reporting queries over the order store.

use serde::Serialize;
use sqlx::SqlitePool;

use clementine_core::{OrderStatus, Price, ProductId};

use super::RepositoryError;

/// All-time sales summary.
///
/// Revenue counts delivered orders only; the order count covers every
/// status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_revenue: Price,
    pub total_orders: i64,
}

/// One row of the top-sellers report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: ProductId,
    pub name: String,
    /// The product's current price, not a snapshot.
    pub price: Price,
    pub total_sold: i64,
}

/// Repository for analytics queries.
pub struct AnalyticsRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AnalyticsRepository<'a> {
    /// Create a new analytics repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Sum delivered-order totals and count all orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a query fails or the stored totals
    /// are invalid.
    pub async fn sales_summary(&self) -> Result<SalesSummary, RepositoryError> {
        let revenue_cents = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(total_cents), 0) FROM orders WHERE status = ?1",
        )
        .bind(OrderStatus::Delivered)
        .fetch_one(self.pool)
        .await?;

        let total_orders =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
                .fetch_one(self.pool)
                .await?;

        let total_revenue = Price::from_cents(revenue_cents)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid revenue sum: {e}")))?;

        Ok(SalesSummary {
            total_revenue,
            total_orders,
        })
    }

    /// Top `limit` products by total quantity sold, descending, joined
    /// with the product's name and current price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_products(&self, limit: i64) -> Result<Vec<TopProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, TopProduct>(
            r"
            SELECT oi.product_id, p.name, p.price_cents AS price,
                   SUM(oi.quantity) AS total_sold
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            GROUP BY oi.product_id
            ORDER BY total_sold DESC
            LIMIT ?1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
