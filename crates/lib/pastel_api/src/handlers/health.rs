//! Health check endpoint.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::middleware::auth::MaybeAuthenticated;
use crate::models::HealthResponse;

/// `GET /`: Liveness plus credential store connectivity.
pub async fn root_handler(
    State(state): State<AppState>,
    MaybeAuthenticated(claims): MaybeAuthenticated,
) -> Json<HealthResponse> {
    let store_connected = state.auth.store().ping().await;

    Json(HealthResponse {
        status: "ok".into(),
        message: "Pastel backend running".into(),
        environment: state.config.environment.clone(),
        version: pastel_core::version().to_string(),
        store_connected,
        authenticated: claims.is_some(),
    })
}
