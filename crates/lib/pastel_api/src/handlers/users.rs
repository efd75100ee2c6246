//! Account administration handlers.
//!
//! Listing is admin-only; single-account routes are open to the account
//! itself and to admins. The caller's role is re-read from the store.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use pastel_core::auth::AccountUpdate;
use pastel_core::models::account::AccountView;
use uuid::Uuid;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedAccount;
use crate::models::{ApiResponse, UpdateAccountRequest};

fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation("Invalid account id".into()))
}

/// `GET /api/users`: List all accounts, newest first.
pub async fn list_users_handler(
    State(state): State<AppState>,
    AuthenticatedAccount(claims): AuthenticatedAccount,
) -> AppResult<Json<ApiResponse<Vec<AccountView>>>> {
    state.auth.require_admin(&claims).await?;
    let accounts = state.auth.list_accounts().await?;
    Ok(Json(ApiResponse::data(accounts)))
}

/// `GET /api/users/{id}`: Fetch one account.
pub async fn get_user_handler(
    State(state): State<AppState>,
    AuthenticatedAccount(claims): AuthenticatedAccount,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<AccountView>>> {
    let id = parse_id(&id)?;
    state.auth.require_self_or_admin(&claims, id).await?;
    let account = state.auth.get_account(id).await?;
    Ok(Json(ApiResponse::data(account)))
}

/// `PUT /api/users/{id}`: Update name, email, password or (admins only) role.
pub async fn update_user_handler(
    State(state): State<AppState>,
    AuthenticatedAccount(claims): AuthenticatedAccount,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<AccountView>>> {
    let id = parse_id(&id)?;
    let Json(body) = payload?;
    let caller = state.auth.require_self_or_admin(&claims, id).await?;
    let update = AccountUpdate {
        display_name: body.display_name,
        email: body.email,
        password: body.password,
        role: body.role,
    };
    let account = state.auth.update_account(&caller, id, update).await?;
    Ok(Json(ApiResponse::with_message("Account updated", account)))
}

/// `DELETE /api/users/{id}`: Delete an account.
pub async fn delete_user_handler(
    State(state): State<AppState>,
    AuthenticatedAccount(claims): AuthenticatedAccount,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let id = parse_id(&id)?;
    state.auth.require_self_or_admin(&claims, id).await?;
    state.auth.delete_account(id).await?;
    Ok(Json(ApiResponse::message("Account deleted")))
}
