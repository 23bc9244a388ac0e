//! Token extraction for handlers.
//!
//! [`AuthUser`] rejects requests without a valid token; [`MaybeAuthUser`]
//! lets anonymous requests through but still rejects a token that is present
//! and invalid, so a client with a broken token hears about it.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use store::StoreError;
use tracing::trace;

use crate::error::ApiError;
use crate::schemas::AppState;

/// The authenticated user's id, required.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub i32);

/// The authenticated user's id, if a token was presented.
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuthUser(pub Option<i32>);

/// Pull the token out of the Authorization header.
///
/// Both "Token <jwt>" and "Bearer <jwt>" schemes are accepted.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Token ")
        .or_else(|| value.strip_prefix("Bearer "))
        .map(str::trim)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            StoreError::Authentication("missing authentication token".to_string())
        })?;
        let claims = state.keys.verify(token)?;
        trace!("Authenticated request for user_id: {}", claims.sub);
        Ok(AuthUser(claims.sub))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts) {
            Some(token) => {
                let claims = state.keys.verify(token)?;
                Ok(MaybeAuthUser(Some(claims.sub)))
            }
            None if parts.headers.contains_key(AUTHORIZATION) => {
                // A header in neither scheme is malformed, not anonymous
                Err(StoreError::Authentication("malformed authorization header".to_string()).into())
            }
            None => Ok(MaybeAuthUser(None)),
        }
    }
}
