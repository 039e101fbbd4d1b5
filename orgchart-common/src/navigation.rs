//! Drill-down navigation with a history stack
//!
//! The navigator tracks the person being viewed, the level that view was
//! entered at, and a LIFO history of earlier `(person, level)` pairs. Every
//! method takes the already-filtered roster so that views always reflect the
//! current regime filter.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::RootConfig;
use crate::error::{Error, Result};
use crate::hierarchy::{directors_of, find_president, group_by_tier, next_tier, HierarchyIndex, TierGroup};
use crate::model::Person;
use crate::tier::{Level, Tier};

/// Top-level view: president plus directors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootView {
    pub president: Option<Person>,
    pub directors: Vec<Person>,
    /// Placeholder for expected directors that are not in the roster
    pub vacancy: Option<Person>,
}

/// View anchored on one person, subordinates grouped by tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrillView {
    pub person: Person,
    pub level: Level,
    pub groups: Vec<TierGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Root(RootView),
    Drill(DrillView),
}

/// Saved navigation position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub person: Person,
    pub level: Level,
}

/// Build the root view without touching navigation state
pub fn build_root_view(people: &[Person], config: &RootConfig) -> RootView {
    let president = find_president(people).cloned();
    let mut directors = directors_of(president.as_ref(), people);
    let mut vacancy = None;

    if !config.expected_directors.is_empty() {
        let expected: HashSet<String> = config
            .expected_directors
            .iter()
            .map(|n| n.to_lowercase())
            .collect();

        let listed: Vec<Person> = directors
            .iter()
            .filter(|d| expected.contains(&d.name.to_lowercase()))
            .cloned()
            .collect();
        if listed.is_empty() {
            debug!("No expected director found in roster; keeping derived list");
        } else {
            directors = listed;
        }

        let filled: HashSet<String> = directors.iter().map(|d| d.name.to_lowercase()).collect();
        if expected.iter().any(|n| !filled.contains(n)) {
            vacancy = Some(vacancy_person(president.as_ref(), config));
        }
    }

    RootView {
        president,
        directors,
        vacancy,
    }
}

/// Synthetic open-position record reporting to the president
pub fn vacancy_person(president: Option<&Person>, config: &RootConfig) -> Person {
    Person {
        name: config.vacancy_name.clone(),
        title: config.vacancy_title.clone(),
        area: config.vacancy_area.clone(),
        manager_name: president
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "Presidente".to_string()),
        is_vacancy: true,
        ..Default::default()
    }
}

/// Build a drill view without touching navigation state
pub fn build_drill_view(people: &[Person], person: &Person, level: Level) -> DrillView {
    let index = HierarchyIndex::new(people);
    let subordinates: Vec<Person> = index.subordinates_of(person).into_iter().cloned().collect();
    DrillView {
        person: person.clone(),
        level,
        groups: group_by_tier(&subordinates),
    }
}

/// Navigation state machine
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    current_person: Option<Person>,
    current_level: Level,
    history: Vec<HistoryEntry>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_person(&self) -> Option<&Person> {
        self.current_person.as_ref()
    }

    pub fn current_level(&self) -> Level {
        self.current_level
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Back to the initial state: root level, no person, empty history
    pub fn reset(&mut self) {
        self.current_person = None;
        self.current_level = Level::Root;
        self.history.clear();
    }

    /// Show the root view. The president becomes the current person so that
    /// the first descent records the root in history.
    pub fn root_view(&mut self, people: &[Person], config: &RootConfig) -> RootView {
        let view = build_root_view(people, config);
        self.current_level = Level::Root;
        self.current_person = view.president.clone();
        view
    }

    /// Read-only drill view of `person`; navigation state is untouched
    pub fn drill_view(&self, people: &[Person], person: &Person, level: Level) -> DrillView {
        build_drill_view(people, person, level)
    }

    /// Drill into `person`, selected at `level`
    ///
    /// A person without subordinates is still entered, at the Staff level
    /// with no groups.
    pub fn descend(&mut self, people: &[Person], person: &Person, level: Level) -> DrillView {
        let index = HierarchyIndex::new(people);
        let subordinates: Vec<Person> = index.subordinates_of(person).into_iter().cloned().collect();
        if subordinates.is_empty() {
            debug!(person = %person.name, "No subordinates found");
        }

        if let Some(previous) = self.current_person.take() {
            self.history.push(HistoryEntry {
                person: previous,
                level: self.current_level,
            });
        }

        let next = Level::Tier(next_tier(level, &subordinates));
        debug!(person = %person.name, ?level, ?next, "Descending");
        self.current_level = next;
        self.current_person = Some(person.clone());

        DrillView {
            person: person.clone(),
            level: next,
            groups: group_by_tier(&subordinates),
        }
    }

    /// Go back one step. An empty history, or an entry at the root level,
    /// yields the root view.
    pub fn ascend(&mut self, people: &[Person], config: &RootConfig) -> View {
        match self.history.pop() {
            None => {
                self.reset();
                View::Root(self.root_view(people, config))
            }
            Some(entry) if entry.level.is_root() => View::Root(self.root_view(people, config)),
            Some(entry) => {
                self.current_person = Some(entry.person);
                self.current_level = entry.level;
                self.current_view(people, config)
            }
        }
    }

    /// Re-render the current state, recovering to root when it no longer
    /// resolves against the roster
    pub fn current_view(&mut self, people: &[Person], config: &RootConfig) -> View {
        if self.current_level.is_root() {
            return View::Root(self.root_view(people, config));
        }
        match self.resolve_current(people, config) {
            Ok(person) => View::Drill(build_drill_view(people, &person, self.current_level)),
            Err(e) => {
                warn!("{}; returning to root view", e);
                self.reset();
                View::Root(self.root_view(people, config))
            }
        }
    }

    /// Fresh roster copy of the current person
    fn resolve_current(&self, people: &[Person], config: &RootConfig) -> Result<Person> {
        let current = self
            .current_person
            .as_ref()
            .filter(|p| !p.name.trim().is_empty())
            .ok_or_else(|| Error::AmbiguousState("no current person below root".to_string()))?;

        if current.is_vacancy {
            let president = find_president(people);
            let vacancy = vacancy_person(president, config);
            if vacancy.has_name(&current.name) {
                return Ok(vacancy);
            }
        }

        people
            .iter()
            .find(|p| p.has_name(&current.name))
            .cloned()
            .ok_or_else(|| {
                Error::AmbiguousState(format!("{} is no longer in the roster", current.name))
            })
    }

    /// Follow a rename so the current view and history keep resolving
    pub fn rename(&mut self, old_name: &str, new_name: &str) {
        let entries = self
            .current_person
            .iter_mut()
            .chain(self.history.iter_mut().map(|e| &mut e.person));
        for person in entries {
            if person.has_name(old_name) {
                person.name = new_name.to_string();
            }
        }
    }

    /// Level a person should be descended from when selected in the current view
    pub fn selection_level(&self, person: &Person) -> Level {
        match self.current_level {
            Level::Root if self.current_person.as_ref().is_some_and(|p| p.has_name(&person.name)) => {
                Level::Root
            }
            Level::Root => Level::Tier(Tier::Director),
            _ => Level::Tier(person.tier()),
        }
    }
}
