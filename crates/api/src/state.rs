//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::ApiConfig;
use crate::services::auth::TokenKeys;
use crate::services::payment::PaymentStub;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to the connection pool,
/// configuration, token keys, and the payment processor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: SqlitePool,
    tokens: TokenKeys,
    payment: PaymentStub,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ApiConfig, pool: SqlitePool) -> Self {
        let tokens = TokenKeys::new(&config.jwt_secret, config.token_ttl_secs);
        let payment = PaymentStub::new(config.payment_delay);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tokens,
                payment,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the token keys.
    #[must_use]
    pub fn tokens(&self) -> &TokenKeys {
        &self.inner.tokens
    }

    /// Get a reference to the payment processor.
    #[must_use]
    pub fn payment(&self) -> &PaymentStub {
        &self.inner.payment
    }
}
