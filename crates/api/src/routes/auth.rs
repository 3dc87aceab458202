//! Registration and login handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;

use crate::{error::Result, services::auth::AuthService, state::AppState};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /auth/register`
///
/// Creates a customer account and returns a signed token alongside the
/// public user record.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let service = AuthService::new(state.pool(), state.tokens());
    let outcome = service.register(&req.name, &req.email, &req.password).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// `POST /auth/login`
///
/// Verifies credentials and returns a fresh token. Unknown email and
/// wrong password produce the same error so accounts cannot be probed.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let service = AuthService::new(state.pool(), state.tokens());
    let outcome = service.login(&req.email, &req.password).await?;
    Ok(Json(outcome))
}
