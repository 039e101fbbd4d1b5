//! Form picker values

use axum::{
    extract::{Query, State},
    Json,
};
use orgchart_common::session::PickerOptions;
use serde::Deserialize;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct OptionsQuery {
    /// Name left out of the manager list (the person being removed)
    pub exclude: Option<String>,
}

/// GET /api/options?exclude=
pub async fn picker_options(
    State(state): State<AppState>,
    Query(query): Query<OptionsQuery>,
) -> Json<PickerOptions> {
    let session = state.session.lock().await;
    Json(session.options(query.exclude.as_deref()))
}
