//! Unified error handling.
//!
//! Provides a unified `AppError` type that all route handlers return.
//! Classes map to HTTP statuses; server-class errors are logged and the
//! client gets a generic message so internals never leak.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;

/// JSON error body: `{"message": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    /// Build a body from any message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout failed.
    #[error("checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Resource not found (or not owned by the caller).
    #[error("not found: {0}")]
    NotFound(String),

    /// Operation not allowed in the entity's current state.
    #[error("invalid state: {0}")]
    State(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(e) => match e {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Auth(e) => match e {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::InvalidEmail(_) | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AuthError::PasswordHash | AuthError::TokenIssuance | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Checkout(e) => match e {
                CheckoutError::EmptyCart
                | CheckoutError::ZeroQuantity
                | CheckoutError::InsufficientStock { .. }
                | CheckoutError::TotalOutOfRange
                | CheckoutError::Payment(_) => StatusCode::BAD_REQUEST,
                CheckoutError::ProductNotFound(_) => StatusCode::NOT_FOUND,
                CheckoutError::StockContention => StatusCode::CONFLICT,
                CheckoutError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) | Self::State(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Database(e) => match e {
                RepositoryError::NotFound => "not found".to_owned(),
                RepositoryError::Conflict(msg) => msg.clone(),
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    "internal server error".to_owned()
                }
            },
            Self::Auth(e) => match e {
                AuthError::InvalidCredentials => "invalid credentials".to_owned(),
                AuthError::UserAlreadyExists => "user already exists".to_owned(),
                AuthError::InvalidEmail(_) => "invalid email address".to_owned(),
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::PasswordHash | AuthError::TokenIssuance | AuthError::Repository(_) => {
                    "internal server error".to_owned()
                }
            },
            Self::Checkout(e) => match e {
                CheckoutError::Repository(_) => "internal server error".to_owned(),
                other => other.to_string(),
            },
            Self::BadRequest(msg) | Self::NotFound(msg) | Self::State(msg) => msg.clone(),
            Self::Internal(_) => "internal server error".to_owned(),
        }
    }

    fn is_server_error(&self) -> bool {
        self.status() == StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (self.status(), Json(ErrorBody::new(self.message()))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    use clementine_core::ProductId;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::NotFound("order not found".to_owned()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::State("cannot cancel order at this stage".to_owned()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Checkout(CheckoutError::EmptyCart).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Checkout(CheckoutError::ProductNotFound(ProductId::new(9))).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Checkout(CheckoutError::StockContention).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Auth(AuthError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Auth(AuthError::UserAlreadyExists).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_server_errors_get_generic_message() {
        let err = AppError::Database(RepositoryError::DataCorruption("secret detail".to_owned()));
        assert_eq!(err.message(), "internal server error");
    }

    #[test]
    fn test_client_errors_keep_their_message() {
        let err = AppError::Checkout(CheckoutError::InsufficientStock {
            name: "Laptop Pro".to_owned(),
        });
        assert_eq!(err.message(), "insufficient stock for Laptop Pro");
    }
}
