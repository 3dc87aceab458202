//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                   - Liveness check
//! GET  /health/ready             - Readiness check (verifies database)
//!
//! # Auth
//! POST /auth/register            - Register a customer, returns token
//! POST /auth/login               - Login, returns token
//!
//! # Catalog
//! GET    /products               - Product listing
//! GET    /products/{id}          - Product detail with reviews
//! POST   /products               - Create product (admin)
//! PUT    /products/{id}          - Update product (admin)
//! DELETE /products/{id}          - Delete product (admin)
//! POST   /products/{id}/reviews  - Add a review (authenticated)
//!
//! # Orders
//! POST /orders                   - Checkout (authenticated)
//! GET  /orders/myorders          - Caller's orders with items
//! PUT  /orders/{id}/cancel       - Cancel own order
//! PUT  /orders/{id}/status       - Set order status (admin)
//! GET  /orders                   - All orders, newest first (admin)
//!
//! # Analytics (admin)
//! GET /analytics/sales           - Revenue + order count
//! GET /analytics/top-products    - Top 5 sellers
//! ```

pub mod analytics;
pub mod auth;
pub mod orders;
pub mod products;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Create the full application router, health endpoints included.
///
/// CORS is wide open; the API is a public surface consumed by browser
/// clients on other origins.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create the API routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/products/{id}/reviews", post(products::create_review))
        .route(
            "/orders",
            post(orders::create_order).get(orders::list_orders),
        )
        .route("/orders/myorders", get(orders::my_orders))
        .route("/orders/{id}/cancel", put(orders::cancel_order))
        .route("/orders/{id}/status", put(orders::update_status))
        .route("/analytics/sales", get(analytics::sales))
        .route("/analytics/top-products", get(analytics::top_products))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
