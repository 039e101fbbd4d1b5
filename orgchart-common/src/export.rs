//! Spreadsheet export projection
//!
//! Produces the rows and suggested file name for an `.xlsx` download. Byte
//! encoding is left to the client.

use std::collections::HashSet;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::info;

use crate::model::Person;

/// One spreadsheet row. Field names are the sheet's column headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Nome")]
    pub name: String,
    #[serde(rename = "Cargo")]
    pub title: String,
    #[serde(rename = "Área")]
    pub area: String,
    /// Same value as `area`; kept as its own column for existing sheets
    #[serde(rename = "Departamento")]
    pub department: String,
    #[serde(rename = "Gestor")]
    pub manager: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub rows: usize,
    pub with_title: usize,
    pub with_area: usize,
    pub with_manager: usize,
    pub duplicates_removed: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport {
    pub file_name: String,
    pub columns: [&'static str; 5],
    pub rows: Vec<ExportRow>,
    pub summary: ExportSummary,
}

pub const COLUMNS: [&str; 5] = ["Nome", "Cargo", "Área", "Departamento", "Gestor"];

/// `organograma_colaboradores_<YYYY-MM-DD>.xlsx`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("organograma_colaboradores_{}.xlsx", date.format("%Y-%m-%d"))
}

/// Project the roster into export rows dated today
pub fn export_rows(people: &[Person]) -> ExportReport {
    export_rows_on(people, Local::now().date_naive())
}

/// Project the roster into export rows, deduplicating by exact name
pub fn export_rows_on(people: &[Person], date: NaiveDate) -> ExportReport {
    let mut seen = HashSet::new();
    let mut summary = ExportSummary::default();
    let mut rows = Vec::new();

    for person in people.iter().filter(|p| !p.name.trim().is_empty()) {
        if !seen.insert(person.name.as_str()) {
            summary.duplicates_removed += 1;
            continue;
        }
        rows.push(ExportRow {
            name: person.name.clone(),
            title: person.title.clone(),
            area: person.area.clone(),
            department: person.area.clone(),
            manager: person.manager_name.clone(),
        });
    }

    summary.rows = rows.len();
    summary.with_title = rows.iter().filter(|r| !r.title.is_empty()).count();
    summary.with_area = rows.iter().filter(|r| !r.area.is_empty()).count();
    summary.with_manager = rows.iter().filter(|r| !r.manager.is_empty()).count();

    let file_name = export_file_name(date);
    info!(
        "Export {}: {} rows, {} duplicates removed",
        file_name, summary.rows, summary.duplicates_removed
    );

    ExportReport {
        file_name,
        columns: COLUMNS,
        rows,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
    }

    #[test]
    fn test_file_name_format() {
        assert_eq!(
            export_file_name(date()),
            "organograma_colaboradores_2025-03-07.xlsx"
        );
    }

    #[test]
    fn test_dedupe_first_wins() {
        let mut first = Person::new("Ana", "Analista", "Gi");
        first.area = "TI".into();
        let people = vec![
            first,
            Person::new("Ana", "Gerente", "Di"),
            Person::new("ana", "Analista", ""),
            Person::new("  ", "Analista", ""),
        ];
        let report = export_rows_on(&people, date());
        assert_eq!(report.rows.len(), 2, "dedupe is exact-case");
        assert_eq!(report.rows[0].title, "Analista");
        assert_eq!(report.rows[0].department, "TI");
        assert_eq!(report.summary.duplicates_removed, 1);
        assert_eq!(report.summary.with_area, 1);
        assert_eq!(report.summary.with_manager, 1);
    }

    #[test]
    fn test_row_serializes_with_sheet_headers() {
        let report = export_rows_on(&[Person::new("Ana", "Analista", "Gi")], date());
        let json = serde_json::to_value(&report.rows[0]).unwrap();
        assert_eq!(json["Nome"], "Ana");
        assert_eq!(json["Gestor"], "Gi");
        assert!(json.get("Área").is_some());
    }
}
