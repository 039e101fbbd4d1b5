//! Record normalization between store rows and [`Person`]
//!
//! The hosted table has accumulated several spellings for the same column
//! (Portuguese and English, accented and plain, capitalised and not). Each
//! canonical field declares its aliases in priority order; the first alias
//! holding a non-empty value wins.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::model::{EmploymentType, Person};

const NAME_KEYS: &[&str] = &["Colaborador", "Nome", "nome", "Nome do Colaborador", "name"];
const TITLE_KEYS: &[&str] = &["Cargo", "cargo", "title"];
const AREA_KEYS: &[&str] = &["Área", "Area", "area", "Departamento", "departamento"];
const MANAGER_KEYS: &[&str] = &[
    "Gestor",
    "gestor",
    "Superior imediato",
    "Superior Imediato",
    "Superior_imediato",
    "managerName",
];
const REGIME_KEYS: &[&str] = &["Regime", "regime", "regimeContratacao", "Regime Contratação"];
const PHONE_KEYS: &[&str] = &["Telefone", "telefone"];
const NOTES_KEYS: &[&str] = &["Observacao", "observacao"];
const VACANCY_KEYS: &[&str] = &["isVaga", "isVacancy"];

/// First non-empty string value among `keys`, trimmed
fn pick(row: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|k| row.get(*k))
        .filter_map(scalar_to_string)
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Normalize one raw row. Returns `None` for rows that cannot be used.
pub fn normalize_row(row: &Value) -> Option<Person> {
    let obj = row.as_object()?;

    let name = pick(obj, NAME_KEYS);
    if name.is_empty() {
        return None;
    }

    let id = obj
        .get("id")
        .and_then(scalar_to_string)
        .filter(|s| !s.is_empty());
    let created_at = obj
        .get("created_at")
        .and_then(scalar_to_string)
        .filter(|s| !s.is_empty());
    let is_vacancy = VACANCY_KEYS
        .iter()
        .filter_map(|k| obj.get(*k))
        .any(|v| v.as_bool().unwrap_or(false));

    Some(Person {
        id,
        name,
        title: pick(obj, TITLE_KEYS),
        area: pick(obj, AREA_KEYS),
        manager_name: pick(obj, MANAGER_KEYS),
        employment_type: EmploymentType::parse(&pick(obj, REGIME_KEYS)),
        is_vacancy,
        phone: pick(obj, PHONE_KEYS),
        notes: pick(obj, NOTES_KEYS),
        created_at,
    })
}

/// Normalize a batch of rows, skipping unusable ones
pub fn normalize_rows(rows: Vec<Value>) -> Vec<Person> {
    let total = rows.len();
    let people: Vec<Person> = rows
        .iter()
        .filter_map(|row| {
            let person = normalize_row(row);
            if person.is_none() {
                debug!(row = %row, "Skipping unusable roster row");
            }
            person
        })
        .collect();

    if people.len() < total {
        info!(
            "Normalized {} of {} roster rows ({} skipped)",
            people.len(),
            total,
            total - people.len()
        );
    }
    people
}

/// Map a person onto the backend's exact column names
pub fn to_store_row(person: &Person) -> Map<String, Value> {
    let mut row = Map::new();
    row.insert("nome".into(), Value::String(person.name.clone()));
    row.insert("cargo".into(), Value::String(person.title.clone()));
    row.insert("area".into(), Value::String(person.area.clone()));
    row.insert("gestor".into(), Value::String(person.manager_name.clone()));
    // An unrecognised regime stays as stored
    if let Some(t) = person.employment_type {
        row.insert("regimeContratacao".into(), Value::String(t.as_str().to_string()));
    }
    row.insert("telefone".into(), Value::String(person.phone.clone()));
    row.insert("observacao".into(), Value::String(person.notes.clone()));
    row
}

/// Partial row that only rewrites the manager column
pub fn manager_patch(manager_name: &str) -> Map<String, Value> {
    let mut row = Map::new();
    row.insert("gestor".into(), Value::String(manager_name.to_string()));
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_backend_lowercase_columns() {
        let row = json!({
            "id": 42,
            "nome": " Gi ",
            "cargo": "Gerente",
            "area": "TI",
            "gestor": "Di",
            "regimeContratacao": "pj",
            "created_at": "2025-01-01T00:00:00Z"
        });
        let p = normalize_row(&row).unwrap();
        assert_eq!(p.id.as_deref(), Some("42"));
        assert_eq!(p.name, "Gi");
        assert_eq!(p.title, "Gerente");
        assert_eq!(p.area, "TI");
        assert_eq!(p.manager_name, "Di");
        assert_eq!(p.employment_type, Some(EmploymentType::Pj));
        assert_eq!(p.created_at.as_deref(), Some("2025-01-01T00:00:00Z"));
    }

    #[test]
    fn test_legacy_capitalised_columns() {
        let row = json!({
            "Colaborador": "Ana",
            "Cargo": "Analista",
            "Área": "Financeiro",
            "Superior imediato": "Bia",
            "Regime": "CLT"
        });
        let p = normalize_row(&row).unwrap();
        assert_eq!(p.area, "Financeiro");
        assert_eq!(p.manager_name, "Bia");
        assert_eq!(p.employment_type, Some(EmploymentType::Clt));
        assert!(p.id.is_none());
    }

    #[test]
    fn test_priority_skips_empty_alias() {
        let row = json!({ "Colaborador": "", "Nome": "Fallback", "Área": "", "Departamento": "Ops" });
        let p = normalize_row(&row).unwrap();
        assert_eq!(p.name, "Fallback");
        assert_eq!(p.area, "Ops");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let p = normalize_row(&json!({ "nome": "Solo" })).unwrap();
        assert_eq!(p.title, "");
        assert_eq!(p.manager_name, "");
        assert_eq!(p.employment_type, None);
        assert!(!p.is_vacancy);
    }

    #[test]
    fn test_unusable_rows_skipped() {
        let rows = vec![
            json!("not an object"),
            json!({ "cargo": "Sem nome" }),
            json!({ "nome": null }),
            json!({ "nome": "Ok" }),
        ];
        let people = normalize_rows(rows);
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].name, "Ok");
    }

    #[test]
    fn test_vacancy_flag() {
        let p = normalize_row(&json!({ "Colaborador": "VAGA EM ABERTO", "isVaga": true })).unwrap();
        assert!(p.is_vacancy);
    }

    #[test]
    fn test_store_row_columns() {
        let mut p = Person::new("Gi", "Gerente", "Di");
        p.area = "TI".into();
        p.employment_type = Some(EmploymentType::Clt);
        let row = to_store_row(&p);
        assert_eq!(row["nome"], "Gi");
        assert_eq!(row["gestor"], "Di");
        assert_eq!(row["regimeContratacao"], "CLT");

        // Round-trips through the normalizer
        let back = normalize_row(&Value::Object(row)).unwrap();
        assert_eq!(back.name, p.name);
        assert_eq!(back.area, p.area);
        assert_eq!(back.employment_type, p.employment_type);
    }

    #[test]
    fn test_store_row_omits_unknown_regime() {
        let p = Person::new("Gi", "Gerente", "Di");
        let row = to_store_row(&p);
        assert!(!row.contains_key("regimeContratacao"));
        assert_eq!(row["nome"], "Gi");
    }
}
