//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! clementine-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `SQLite` connection string
//!
//! Migrations are embedded in the API crate, so the binary carries
//! everything it needs.

use super::CommandError;

/// Run database migrations.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset, the connection fails, or
/// a migration fails to apply.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    clementine_api::db::MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
