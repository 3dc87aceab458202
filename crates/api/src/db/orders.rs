//! Order repository: checkout persistence and status transitions.
//!
//! Stock mutation happens here, always inside a transaction. Checkout
//! decrements stock with a guarded `UPDATE ... WHERE stock >= quantity`;
//! if another checkout won a race since validation, zero rows match and
//! the whole order rolls back. Stock can therefore never go negative,
//! whatever the request interleaving.

use chrono::Utc;
use sqlx::SqlitePool;

use clementine_core::{OrderId, OrderStatus, PaymentMethod, PaymentStatus, Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::{AdminOrderView, Order, OrderItemDetail, OrderUser, OrderWithItems};

/// One validated cart line, carrying the unit price snapshot taken at
/// validation time.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: Price,
}

/// Result of a customer cancel attempt that found the order.
#[derive(Debug)]
pub enum CancelOutcome {
    /// The order was cancelled and stock restored.
    Cancelled(Order),
    /// The order is past the point of cancellation; nothing changed.
    NotCancellable(OrderStatus),
}

const ORDER_COLUMNS: &str =
    "id, user_id, total_cents AS total_amount, status, payment_status, payment_method, created_at";

const ITEM_COLUMNS: &str = "oi.id, oi.product_id, p.name AS product_name, oi.quantity, \
                            oi.price_cents AS price";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist an order with its line items and decrement stock, all in
    /// one transaction.
    ///
    /// The caller has already validated the cart and charged payment;
    /// this method re-checks stock at write time via the guarded
    /// decrement so concurrent checkouts serialize correctly.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if any product's stock changed
    /// under us (the order is fully rolled back).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        user_id: UserId,
        total: Price,
        payment_method: PaymentMethod,
        lines: &[OrderLine],
    ) -> Result<OrderWithItems, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r"
            INSERT INTO orders (user_id, total_cents, status, payment_status, payment_method, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(total)
        .bind(OrderStatus::Pending)
        .bind(PaymentStatus::Paid)
        .bind(payment_method)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        for line in lines {
            let updated = sqlx::query(
                r"
                UPDATE products
                SET stock = stock - ?2
                WHERE id = ?1 AND stock >= ?2
                ",
            )
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                // Dropping the transaction rolls back the header and any
                // decrements already applied.
                return Err(RepositoryError::Conflict(format!(
                    "insufficient stock for product {}",
                    line.product_id
                )));
            }

            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, price_cents)
                VALUES (?1, ?2, ?3, ?4)
                ",
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let items = self.items_for(order.id).await?;
        Ok(OrderWithItems { order, items })
    }

    /// Get an order header by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// List the caller's orders with items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ?1 ORDER BY id DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.items_for(order.id).await?;
            result.push(OrderWithItems { order, items });
        }

        Ok(result)
    }

    /// List all orders with items and user detail, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_all(&self) -> Result<Vec<AdminOrderView>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminOrderRow>(
            r"
            SELECT o.id, o.user_id, o.total_cents AS total_amount, o.status,
                   o.payment_status, o.payment_method, o.created_at,
                   u.name AS user_name, u.email AS user_email
            FROM orders o
            JOIN users u ON u.id = o.user_id
            ORDER BY o.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.items_for(row.order.id).await?;
            result.push(AdminOrderView {
                order: row.order,
                items,
                user: OrderUser {
                    name: row.user_name,
                    email: row.user_email,
                },
            });
        }

        Ok(result)
    }

    /// Cancel an order on behalf of the owning customer, restoring each
    /// line's quantity to its product's stock.
    ///
    /// An order that exists but belongs to someone else is reported as
    /// not found, the same as a missing one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such order is owned by
    /// `user_id`. Returns `RepositoryError::Database` for other database
    /// errors.
    pub async fn cancel(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<CancelOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1 AND user_id = ?2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if !order.status.can_cancel() {
            return Ok(CancelOutcome::NotCancellable(order.status));
        }

        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = ?2 WHERE id = ?1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(OrderStatus::Cancelled)
        .fetch_one(&mut *tx)
        .await?;

        let lines = sqlx::query_as::<_, RestockRow>(
            "SELECT product_id, quantity FROM order_items WHERE order_id = ?1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        for line in lines {
            // A product deleted since the sale simply matches no row.
            sqlx::query("UPDATE products SET stock = stock + ?2 WHERE id = ?1")
                .bind(line.product_id)
                .bind(line.quantity)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(CancelOutcome::Cancelled(order))
    }

    /// Set an order's status (admin path).
    ///
    /// Deliberately permissive: any enumerated status is accepted with no
    /// adjacency check, and terminal states don't block further edits.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = ?2 WHERE id = ?1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(order)
    }

    /// Fetch an order's line items joined with product names.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_for(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<OrderItemDetail>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItemDetail>(&format!(
            r"
            SELECT {ITEM_COLUMNS}
            FROM order_items oi
            LEFT JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = ?1
            ORDER BY oi.id ASC
            "
        ))
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}

/// Row shape for the admin listing join.
#[derive(sqlx::FromRow)]
struct AdminOrderRow {
    #[sqlx(flatten)]
    order: Order,
    user_name: String,
    user_email: String,
}

/// Row shape for the cancel restock pass.
#[derive(sqlx::FromRow)]
struct RestockRow {
    product_id: ProductId,
    quantity: i64,
}
