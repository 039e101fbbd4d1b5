//! Liveness probe for the org chart service
//!
//! Public route. Reports the roster size held by the session so a monitor can
//! tell a service that started on an empty roster apart from a loaded one.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    /// People currently in the session roster, before any regime filter
    pub roster_size: usize,
    pub auth_enabled: bool,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let roster_size = state.session.lock().await.roster().len();
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "orgchart-web".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        roster_size,
        auth_enabled: state.auth_enabled,
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
