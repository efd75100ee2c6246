//! Authentication middleware: Bearer token extraction and JWT verification.
//!
//! Per request: no token → reject (or continue anonymously on optional
//! routes); token present → verify → attach identity and continue, or
//! reject with 401 when it is expired or invalid. Verification is stateless;
//! the store is not consulted here.

use std::convert::Infallible;

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use pastel_core::models::auth::TokenClaims;
use tracing::debug;

use crate::AppState;
use crate::error::AppError;

/// Verified identity stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount(pub TokenClaims);

/// Identity on routes where authentication is optional.
#[derive(Debug, Clone)]
pub struct MaybeAuthenticated(pub Option<TokenClaims>);

impl<S> FromRequestParts<S> for AuthenticatedAccount
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedAccount>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".into()))
    }
}

impl<S> FromRequestParts<S> for MaybeAuthenticated
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthenticated(
            parts
                .extensions
                .get::<AuthenticatedAccount>()
                .map(|account| account.0.clone()),
        ))
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The scheme name is matched case-insensitively. `Ok(None)` when the header
/// is absent; an error when it is present but unusable.
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let header = value
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header".into()))?;
    let token = header
        .trim()
        .split_once(' ')
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("Bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization scheme".into()))?;
    Ok(Some(token))
}

fn authenticate(state: &AppState, token: &str) -> Result<AuthenticatedAccount, AppError> {
    let claims = state.auth.verify_token(token)?;
    Ok(AuthenticatedAccount(claims))
}

/// Axum middleware: requires `Authorization: Bearer <token>`, verifies the JWT,
/// and injects [`AuthenticatedAccount`] into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?.ok_or_else(|| {
        debug!(path = %request.uri().path(), "rejected request without bearer token");
        AppError::Unauthorized("Missing authorization header".into())
    })?;

    let account = authenticate(&state, token)?;
    request.extensions_mut().insert(account);

    Ok(next.run(request).await)
}

/// Axum middleware: like [`require_auth`], but lets requests without an
/// `Authorization` header through anonymously. A presented token must still
/// be valid.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let account = match bearer_token(request.headers())? {
        Some(token) => Some(authenticate(&state, token)?),
        None => None,
    };
    if let Some(account) = account {
        request.extensions_mut().insert(account);
    }

    Ok(next.run(request).await)
}
