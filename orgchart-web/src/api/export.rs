//! Roster export

use axum::{extract::State, Json};
use orgchart_common::export::ExportReport;

use crate::AppState;

/// GET /api/export
///
/// Rows and file name for the spreadsheet download; the client encodes the
/// workbook.
pub async fn export_roster(State(state): State<AppState>) -> Json<ExportReport> {
    let session = state.session.lock().await;
    Json(session.export())
}
