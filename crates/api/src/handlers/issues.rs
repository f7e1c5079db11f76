//! Handlers for the issue CRUD endpoints.
//!
//! Creation classifies synchronously (best-effort) before persisting.
//! Mutations and listing surface a 503 when the store is unreachable;
//! unknown ids surface a 404.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use campus_core::{CreateIssue, UpdateIssueStatus};

use crate::error::AppResult;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /api/issues
// ---------------------------------------------------------------------------

/// Submit a new issue. The classifier assigns category/priority/spam;
/// classification failures default and never block creation.
pub async fn create_issue(
    State(state): State<AppState>,
    Json(input): Json<CreateIssue>,
) -> AppResult<impl IntoResponse> {
    let issue = state.repo.create(input).await?;
    Ok((StatusCode::CREATED, Json(issue)))
}

// ---------------------------------------------------------------------------
// GET /api/issues
// ---------------------------------------------------------------------------

/// List all issues, without internal storage identifiers.
pub async fn list_issues(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let issues = state.repo.list().await?;
    Ok(Json(issues))
}

// ---------------------------------------------------------------------------
// PATCH /api/issues/{id}
// ---------------------------------------------------------------------------

/// Atomically update the workflow status of one issue.
pub async fn update_issue_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateIssueStatus>,
) -> AppResult<impl IntoResponse> {
    let issue = state.repo.update_status(&id, input.status).await?;
    Ok(Json(issue))
}

// ---------------------------------------------------------------------------
// DELETE /api/issues/{id}
// ---------------------------------------------------------------------------

/// Delete one issue by id.
pub async fn delete_issue(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.repo.delete(&id).await?;
    Ok(Json(json!({ "message": "Issue deleted" })))
}
