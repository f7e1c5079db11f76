//! Liveness status-check endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use campus_core::CreateStatusCheck;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/status -- record a status check.
pub async fn create_status_check(
    State(state): State<AppState>,
    Json(input): Json<CreateStatusCheck>,
) -> AppResult<impl IntoResponse> {
    let check = state.repo.record_status_check(input).await?;
    Ok((StatusCode::CREATED, Json(check)))
}

/// GET /api/status -- list recorded status checks.
pub async fn list_status_checks(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let checks = state.repo.status_checks().await?;
    Ok(Json(checks))
}
