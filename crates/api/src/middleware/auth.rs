//! Authentication extractors.
//!
//! Caller identity is a tagged variant rather than a bare user id, so a
//! handler declares which roles it accepts in its signature and the check
//! happens once at the boundary:
//!
//! ```rust,ignore
//! async fn my_orders(RequireAuth(caller): RequireAuth, ...) { ... }
//! async fn all_orders(RequireAdmin(admin_id): RequireAdmin, ...) { ... }
//! ```

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};

use clementine_core::{UserId, UserRole};

use crate::error::ErrorBody;
use crate::state::AppState;

/// An authenticated caller, tagged with their role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Customer(UserId),
    Admin(UserId),
}

impl Caller {
    /// The caller's user id, whatever their role.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        match self {
            Self::Customer(id) | Self::Admin(id) => *id,
        }
    }

    /// Whether the caller holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin(_))
    }
}

/// Rejection for the auth extractors.
#[derive(Debug)]
pub enum AuthRejection {
    /// No usable bearer token on the request.
    Unauthorized,
    /// Valid token, but the route needs the admin role.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorBody::new("authentication required")),
            )
                .into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(ErrorBody::new("admin access required")),
            )
                .into_response(),
        }
    }
}

/// Pull a verified [`Caller`] out of the `Authorization: Bearer` header.
fn caller_from_parts(parts: &Parts, state: &AppState) -> Option<Caller> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?;
    let claims = state.tokens().verify(token)?;

    let user_id = UserId::new(claims.sub);
    Some(match claims.role {
        UserRole::Admin => Caller::Admin(user_id),
        UserRole::Customer => Caller::Customer(user_id),
    })
}

/// Extractor that requires any authenticated caller.
pub struct RequireAuth(pub Caller);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        caller_from_parts(parts, state)
            .map(Self)
            .ok_or(AuthRejection::Unauthorized)
    }
}

/// Extractor that requires an authenticated admin.
pub struct RequireAdmin(pub UserId);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match caller_from_parts(parts, state) {
            Some(Caller::Admin(id)) => Ok(Self(id)),
            Some(Caller::Customer(_)) => Err(AuthRejection::Forbidden),
            None => Err(AuthRejection::Unauthorized),
        }
    }
}
