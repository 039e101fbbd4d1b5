//! Action endpoint: navigation, mutations and filter changes

use axum::{extract::State, Json};
use orgchart_common::{Action, ActionOutcome};

use super::ApiError;
use crate::AppState;

/// POST /api/actions
///
/// Body is a tagged action, e.g. `{"type": "descend", "name": "Di"}`.
/// Store failures do not fail the request; they are listed in
/// `backendFailures` next to the updated view.
pub async fn apply_action(
    State(state): State<AppState>,
    Json(action): Json<Action>,
) -> Result<Json<ActionOutcome>, ApiError> {
    let mut session = state.session.lock().await;
    let outcome = session.apply(state.store.as_ref(), action).await?;
    Ok(Json(outcome))
}
