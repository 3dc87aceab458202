//! Shared helpers for the integration tests.
//!
//! Each test gets its own in-memory `SQLite` database with the
//! migrations applied. The pool is capped at a single connection since
//! every `:memory:` connection would otherwise be a separate database.

#![allow(dead_code)]

use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use clementine_api::config::ApiConfig;
use clementine_api::db::{self, NewProduct, ProductRepository, UserRepository};
use clementine_api::services::auth::hash_password;
use clementine_api::state::AppState;
use clementine_core::{Email, Price, UserRole};

/// A signing secret that satisfies the length rule without tripping the
/// placeholder blocklist.
const TEST_JWT_KEY: &str = "0f1e2d3c4b5a69788796a5b4c3d2e1f0aabbccdd";

/// Fresh in-memory database with migrations applied.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite url")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory database");

    db::MIGRATOR.run(&pool).await.expect("Failed to migrate");
    pool
}

/// Configuration for tests: zero payment delay, port 0.
pub fn test_config() -> ApiConfig {
    ApiConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: [127, 0, 0, 1].into(),
        port: 0,
        jwt_secret: SecretString::from(TEST_JWT_KEY),
        token_ttl_secs: 3600,
        payment_delay: Duration::ZERO,
    }
}

/// Fresh application state over a fresh in-memory database.
pub async fn test_state() -> AppState {
    AppState::new(test_config(), test_pool().await)
}

/// Insert a customer and return their id and a bearer token.
pub async fn seed_customer(state: &AppState, name: &str, email: &str) -> (clementine_core::UserId, String) {
    let hash = hash_password("customer-pass").expect("hash");
    let email = Email::parse(email).expect("valid email");
    let user = UserRepository::new(state.pool())
        .create(name, &email, &hash, UserRole::Customer)
        .await
        .expect("Failed to seed customer");
    let token = state
        .tokens()
        .issue(user.id, user.role)
        .expect("Failed to issue token");
    (user.id, token)
}

/// Insert an admin and return their id and a bearer token.
pub async fn seed_admin(state: &AppState, name: &str, email: &str) -> (clementine_core::UserId, String) {
    let hash = hash_password("admin-pass").expect("hash");
    let email = Email::parse(email).expect("valid email");
    let user = UserRepository::new(state.pool())
        .upsert_admin(name, &email, &hash)
        .await
        .expect("Failed to seed admin");
    let token = state
        .tokens()
        .issue(user.id, user.role)
        .expect("Failed to issue token");
    (user.id, token)
}

/// Insert a product with the given price (in cents) and stock.
pub async fn seed_product(
    state: &AppState,
    name: &str,
    cents: i64,
    stock: i64,
) -> clementine_api::models::Product {
    ProductRepository::new(state.pool())
        .create(&NewProduct {
            name: name.to_owned(),
            description: format!("{name} description"),
            price: Price::from_cents(cents).expect("valid price"),
            category: "Test".to_owned(),
            stock,
            image_url: None,
        })
        .await
        .expect("Failed to seed product")
}
