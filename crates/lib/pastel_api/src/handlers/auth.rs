//! Authentication request handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use pastel_core::models::account::AccountView;
use pastel_core::models::auth::AuthSession;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedAccount;
use crate::models::{ApiResponse, LoginRequest, RegisterRequest};

/// `POST /api/auth/register`: Create a new account.
pub async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthSession>>)> {
    let Json(body) = payload?;
    let session = state
        .auth
        .register(
            body.display_name.as_deref().unwrap_or_default(),
            body.email.as_deref().unwrap_or_default(),
            body.password.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Registration successful", session)),
    ))
}

/// `POST /api/auth/login`: Authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<AuthSession>>> {
    let Json(body) = payload?;
    let session = state
        .auth
        .login(
            body.email.as_deref().unwrap_or_default(),
            body.password.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(ApiResponse::with_message("Login successful", session)))
}

/// `GET /api/auth/me`: The account behind the bearer token.
pub async fn me_handler(
    State(state): State<AppState>,
    AuthenticatedAccount(claims): AuthenticatedAccount,
) -> AppResult<Json<ApiResponse<AccountView>>> {
    let id = claims
        .account_id()
        .ok_or_else(|| AppError::Unauthorized("Invalid token".into()))?;
    let account = state.auth.get_account(id).await?;
    Ok(Json(ApiResponse::data(account)))
}
