//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::SqlitePool;

/// Connection error shared by the commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// A seed catalog price failed validation.
    #[error("Invalid seed price for {0}: {1}")]
    InvalidSeedPrice(&'static str, clementine_core::PriceError),

    /// Credential hashing or validation error.
    #[error("Auth error: {0}")]
    Auth(#[from] clementine_api::services::auth::AuthError),

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(#[from] clementine_api::db::RepositoryError),
}

/// Connect to the database named by `DATABASE_URL`.
async fn connect() -> Result<SqlitePool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    Ok(clementine_api::db::create_pool(&database_url).await?)
}
