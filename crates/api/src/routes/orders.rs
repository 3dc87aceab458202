//! Order placement, cancellation, and fulfilment handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use clementine_core::{OrderId, OrderStatus};

use crate::{
    db::{CancelOutcome, OrderRepository, RepositoryError},
    error::{AppError, Result},
    middleware::{RequireAdmin, RequireAuth},
    services::checkout::{CheckoutRequest, CheckoutService},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// `POST /orders` (authenticated)
///
/// Checkout: validates the cart, charges the payment stub, then writes
/// the order and decrements stock in one transaction.
pub async fn create_order(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> Result<impl IntoResponse> {
    let service = CheckoutService::new(state.pool(), state.payment());
    let order = service.place_order(caller.user_id(), &req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /orders/myorders` (authenticated)
///
/// The caller's orders with items, newest first.
pub async fn my_orders(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(caller.user_id())
        .await?;
    Ok(Json(orders))
}

/// `PUT /orders/{id}/cancel` (authenticated)
///
/// Cancels the caller's own order and restores stock. An order another
/// user owns is indistinguishable from one that doesn't exist.
pub async fn cancel_order(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<impl IntoResponse> {
    let outcome = OrderRepository::new(state.pool())
        .cancel(id, caller.user_id())
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("order not found".to_owned()),
            other => other.into(),
        })?;

    match outcome {
        CancelOutcome::Cancelled(order) => Ok(Json(order)),
        CancelOutcome::NotCancellable(status) => Err(AppError::State(format!(
            "order cannot be cancelled once {status}"
        ))),
    }
}

/// `PUT /orders/{id}/status` (admin)
///
/// Sets any enumerated status; no adjacency rules are applied so support
/// staff can correct mistakes.
pub async fn update_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse> {
    let order = OrderRepository::new(state.pool())
        .set_status(id, req.status)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("order not found".to_owned()),
            other => other.into(),
        })?;
    Ok(Json(order))
}

/// `GET /orders` (admin)
///
/// Every order with items and the placing user, newest first.
pub async fn list_orders(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;
    Ok(Json(orders))
}
