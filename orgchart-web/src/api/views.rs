//! Read endpoints for the current navigation state

use axum::{
    extract::{Query, State},
    Json,
};
use orgchart_common::navigation::{DrillView, RootView, View};
use serde::Deserialize;

use super::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DrillQuery {
    pub name: String,
}

/// GET /api/view
///
/// Re-renders whatever the session currently shows.
pub async fn current_view(State(state): State<AppState>) -> Json<View> {
    let mut session = state.session.lock().await;
    Json(session.current_view())
}

/// GET /api/view/root
///
/// Clears history and returns the root view.
pub async fn root_view(State(state): State<AppState>) -> Json<RootView> {
    let mut session = state.session.lock().await;
    Json(session.root_view())
}

/// GET /api/drill?name=
///
/// Subordinates of one person without moving the session.
pub async fn drill_view(
    State(state): State<AppState>,
    Query(query): Query<DrillQuery>,
) -> Result<Json<DrillView>, ApiError> {
    let session = state.session.lock().await;
    Ok(Json(session.drill_view(&query.name)?))
}
