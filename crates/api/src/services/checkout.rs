//! Order lifecycle engine: cart validation, payment, and order creation.
//!
//! The flow is validate -> charge -> persist. Validation reads products
//! and rejects before anything is written; persistence re-checks stock
//! inside the transaction (see [`OrderRepository::create`]), so a cart
//! that validated against stale stock rolls back cleanly with a
//! retryable conflict instead of overselling.

use serde::Deserialize;
use sqlx::SqlitePool;

use clementine_core::{PaymentMethod, Price, ProductId, UserId};

use crate::db::RepositoryError;
use crate::db::orders::{OrderLine, OrderRepository};
use crate::db::products::ProductRepository;
use crate::models::OrderWithItems;
use crate::services::payment::{PaymentError, PaymentStub};

/// One cart line as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Checkout request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// Errors that can occur during checkout.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// The cart is empty.
    #[error("no items in order")]
    EmptyCart,

    /// A cart line has a zero quantity.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// A cart line references a product that doesn't exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// A cart line asks for more units than are in stock.
    #[error("insufficient stock for {name}")]
    InsufficientStock {
        /// Display name of the product that is short on stock.
        name: String,
    },

    /// Stock changed between validation and commit; the order was rolled
    /// back and the client may retry.
    #[error("stock changed during checkout, please retry")]
    StockContention,

    /// The order total overflowed the price representation.
    #[error("order total out of range")]
    TotalOutOfRange,

    /// The payment processor declined the charge.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for CheckoutError {
    fn from(e: RepositoryError) -> Self {
        match e {
            // The guarded decrement lost a race; surface as retryable.
            RepositoryError::Conflict(_) => Self::StockContention,
            other => Self::Repository(other),
        }
    }
}

/// Checkout orchestration service.
pub struct CheckoutService<'a> {
    products: ProductRepository<'a>,
    orders: OrderRepository<'a>,
    payment: &'a PaymentStub,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, payment: &'a PaymentStub) -> Self {
        Self {
            products: ProductRepository::new(pool),
            orders: OrderRepository::new(pool),
            payment,
        }
    }

    /// Place an order for `user_id` from the given cart.
    ///
    /// On any validation failure nothing has been written; on a stock
    /// conflict at commit time the transaction has been rolled back.
    ///
    /// # Errors
    ///
    /// See [`CheckoutError`] for the failure taxonomy.
    pub async fn place_order(
        &self,
        user_id: UserId,
        request: &CheckoutRequest,
    ) -> Result<OrderWithItems, CheckoutError> {
        if request.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        // Merge duplicate lines first so each product validates against
        // its stock once, with the combined quantity. Without this, an
        // unsatisfiable cart would slip past validation and bounce off
        // the guarded decrement as a spurious retryable conflict.
        let mut wanted: Vec<(ProductId, u32)> = Vec::with_capacity(request.items.len());
        for item in &request.items {
            if item.quantity == 0 {
                return Err(CheckoutError::ZeroQuantity);
            }
            match wanted.iter_mut().find(|(id, _)| *id == item.product_id) {
                Some((_, quantity)) => {
                    *quantity = quantity
                        .checked_add(item.quantity)
                        .ok_or(CheckoutError::TotalOutOfRange)?;
                }
                None => wanted.push((item.product_id, item.quantity)),
            }
        }

        // Validate every line and snapshot unit prices before touching
        // any stock.
        let mut total = Price::ZERO;
        let mut lines = Vec::with_capacity(wanted.len());
        for (product_id, quantity) in wanted {
            let product = self
                .products
                .get(product_id)
                .await?
                .ok_or(CheckoutError::ProductNotFound(product_id))?;

            if i64::from(quantity) > product.stock {
                return Err(CheckoutError::InsufficientStock { name: product.name });
            }

            let line_total = product
                .price
                .checked_mul(quantity)
                .ok_or(CheckoutError::TotalOutOfRange)?;
            total = total
                .checked_add(line_total)
                .ok_or(CheckoutError::TotalOutOfRange)?;

            lines.push(OrderLine {
                product_id: product.id,
                quantity: i64::from(quantity),
                unit_price: product.price,
            });
        }

        let receipt = self.payment.process(total).await?;
        tracing::info!(
            user_id = %user_id,
            total = %total,
            transaction_id = %receipt.transaction_id,
            "payment captured, persisting order"
        );

        let order = self
            .orders
            .create(user_id, total, request.payment_method, &lines)
            .await?;

        Ok(order)
    }
}
