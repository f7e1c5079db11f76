//! Admin stats endpoint.

use axum::extract::State;
use axum::Json;

use campus_db::{stats, StatsSnapshot};

use crate::state::AppState;

/// GET /api/stats -- aggregate counts plus the five most recent issues.
///
/// Never errors: when the store is unreachable this returns the zeroed
/// snapshot with `system_status = "Degraded"` so admin dashboards stay
/// responsive.
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(stats::collect(state.store.as_ref()).await)
}
