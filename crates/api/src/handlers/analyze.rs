//! Standalone classification endpoint, used by clients to preview the
//! category/priority a description would get before submitting.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use campus_core::{Category, Priority};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub description: String,
    pub image_base64: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub category: Category,
    pub priority: Priority,
}

/// POST /api/analyze -- classify a description without persisting anything.
///
/// Inherits the classifier's defensive contract: failures (or a missing
/// API key) yield the safe defaults, never an error response.
pub async fn analyze(
    State(state): State<AppState>,
    Json(input): Json<AnalyzeRequest>,
) -> Json<AnalyzeResponse> {
    let classification = state
        .classifier
        .classify(&input.description, input.image_base64.as_deref())
        .await;

    Json(AnalyzeResponse {
        category: classification.category,
        priority: classification.priority,
    })
}
