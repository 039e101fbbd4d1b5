//! Rank classification from free-text job titles
//!
//! Titles are matched case-insensitively against a fixed keyword table. Tiers
//! are evaluated from highest to lowest authority and the first match wins, so
//! a title such as "Assistant to the Director" resolves to [`Tier::Director`].

use serde::{Deserialize, Serialize};

/// Rank tier derived from a person's title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    President,
    Director,
    Manager,
    Coordinator,
    Supervisor,
    Staff,
}

/// Keyword table in precedence order. Staff is the fallback and has no keywords.
const KEYWORDS: &[(Tier, &[&str])] = &[
    (Tier::President, &["presidente", "president"]),
    (Tier::Director, &["diretor", "diretora", "director"]),
    (Tier::Manager, &["gerente", "head", "manager"]),
    (Tier::Coordinator, &["coordenador", "coordenadora", "coordinator"]),
    (Tier::Supervisor, &["supervisor", "supervisora"]),
];

impl Tier {
    /// Tiers shown in a drill view, in display order
    pub const DISPLAY_ORDER: [Tier; 5] = [
        Tier::Director,
        Tier::Manager,
        Tier::Coordinator,
        Tier::Supervisor,
        Tier::Staff,
    ];

    /// True for tiers that can receive reassigned subordinates
    pub fn is_manager_rank(self) -> bool {
        matches!(
            self,
            Tier::Director | Tier::Manager | Tier::Coordinator | Tier::Supervisor
        )
    }

    /// Section label used by the presentation layer
    pub fn label(self) -> &'static str {
        match self {
            Tier::President => "Presidência",
            Tier::Director => "Diretores",
            Tier::Manager => "Gerentes",
            Tier::Coordinator => "Coordenadores",
            Tier::Supervisor => "Supervisores",
            Tier::Staff => "Colaboradores",
        }
    }
}

/// Classify a title into a tier
pub fn classify(title: &str) -> Tier {
    let lower = title.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(tier, _)| *tier)
        .unwrap_or(Tier::Staff)
}

/// Navigation level: the synthetic root marker or a concrete tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tier", rename_all = "snake_case")]
pub enum Level {
    /// Top of the chart (president and directors)
    Root,
    Tier(Tier),
}

impl Level {
    pub fn is_root(self) -> bool {
        matches!(self, Level::Root)
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::Root
    }
}
