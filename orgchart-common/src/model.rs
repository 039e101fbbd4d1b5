//! Canonical in-memory person shape and mutation payloads

use serde::{Deserialize, Serialize};

use crate::tier::{classify, Tier};

/// Employment regime tag, used only for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentType {
    #[serde(rename = "CLT")]
    Clt,
    #[serde(rename = "PJ")]
    Pj,
}

impl EmploymentType {
    /// Parse a free-text tag case-insensitively; unknown values yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "CLT" => Some(EmploymentType::Clt),
            "PJ" => Some(EmploymentType::Pj),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EmploymentType::Clt => "CLT",
            EmploymentType::Pj => "PJ",
        }
    }
}

/// One employee or open position
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Backend-assigned identifier; `None` for local-only records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub title: String,
    pub area: String,
    pub manager_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<EmploymentType>,
    #[serde(default)]
    pub is_vacancy: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Person {
    /// Minimal constructor used by tests and fixtures
    pub fn new(name: &str, title: &str, manager_name: &str) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            manager_name: manager_name.to_string(),
            ..Default::default()
        }
    }

    /// Rank tier, re-derived from the title on every call
    pub fn tier(&self) -> Tier {
        classify(&self.title)
    }

    /// Case-insensitive name comparison, the roster's only join key
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Form payload for adding a person
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
    pub name: String,
    pub title: String,
    pub area: String,
    pub manager_name: String,
    #[serde(default)]
    pub employment_type: Option<EmploymentType>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: String,
}

/// Form payload for editing a person
///
/// `manager_name` is optional: when omitted the caller resolves a manager
/// from the area (see [`crate::hierarchy::manager_for_area`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonUpdate {
    pub name: String,
    pub title: String,
    pub area: String,
    #[serde(default)]
    pub manager_name: Option<String>,
    #[serde(default)]
    pub employment_type: Option<EmploymentType>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employment_type_parse() {
        assert_eq!(EmploymentType::parse("clt"), Some(EmploymentType::Clt));
        assert_eq!(EmploymentType::parse(" PJ "), Some(EmploymentType::Pj));
        assert_eq!(EmploymentType::parse("Estágio"), None);
        assert_eq!(EmploymentType::parse(""), None);
    }

    #[test]
    fn test_has_name_ignores_case() {
        let p = Person::new("Ana Paula", "Analista", "");
        assert!(p.has_name("ana paula"));
        assert!(!p.has_name("ana"));
    }

    #[test]
    fn test_person_json_shape() {
        let mut p = Person::new("Gi", "Gerente", "Di");
        p.employment_type = Some(EmploymentType::Pj);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["managerName"], "Di");
        assert_eq!(json["employmentType"], "PJ");
        assert_eq!(json["isVacancy"], false);
        assert!(json.get("id").is_none());
    }
}
