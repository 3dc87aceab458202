//! Database operations for the storefront's `SQLite` store.
//!
//! # Tables
//!
//! - `users` - Registered customers and admins
//! - `products` - The catalog
//! - `orders` / `order_items` - Order headers and their price-snapshot lines
//! - `reviews` - Append-only product reviews
//!
//! Queries are runtime-checked (`sqlx::query_as` with `FromRow`), so the
//! crate builds without a live database. Each entity gets a small
//! repository struct borrowing the shared pool.
//!
//! # Migrations
//!
//! Migrations live in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p clementine-cli -- migrate
//! ```

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub mod analytics;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

pub use analytics::{AnalyticsRepository, SalesSummary, TopProduct};
pub use orders::{CancelOutcome, OrderLine, OrderRepository};
pub use products::{NewProduct, ProductPatch, ProductRepository};
pub use reviews::ReviewRepository;
pub use users::UserRepository;

/// Embedded migrations, shared with the CLI and the test suite.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur in repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email, or a stock row that
    /// changed under a checkout).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// Foreign keys are enforced and the database file is created on first
/// run.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot
/// be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}
