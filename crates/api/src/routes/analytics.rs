//! Admin analytics handlers.

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    db::AnalyticsRepository, error::Result, middleware::RequireAdmin, state::AppState,
};

/// How many top sellers the dashboard shows.
const TOP_PRODUCTS_LIMIT: i64 = 5;

/// `GET /analytics/sales` (admin)
///
/// Recognized revenue (delivered orders only) and the all-time order
/// count, cancelled orders included.
pub async fn sales(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let summary = AnalyticsRepository::new(state.pool()).sales_summary().await?;
    Ok(Json(summary))
}

/// `GET /analytics/top-products` (admin)
///
/// The five products with the most units sold across all orders.
pub async fn top_products(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let products = AnalyticsRepository::new(state.pool())
        .top_products(TOP_PRODUCTS_LIMIT)
        .await?;
    Ok(Json(products))
}
