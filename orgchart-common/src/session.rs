//! One user's working session: roster, navigation and filter together
//!
//! Every action fully updates state before the resulting view is rendered.
//! Views are always computed over the regime-filtered roster.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::RootConfig;
use crate::error::{Error, Result};
use crate::export::{export_rows, ExportReport};
use crate::hierarchy::{areas, manager_candidates, manager_for_area, titles};
use crate::model::{NewPerson, Person, PersonUpdate};
use crate::navigation::{build_root_view, DrillView, Navigator, RootView, View};
use crate::regime::RegimeFilter;
use crate::roster::{BackendFailure, Roster};
use crate::store::RecordStore;

/// User action from the presentation layer
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Descend {
        name: String,
    },
    Ascend,
    Add(NewPerson),
    Edit {
        #[serde(rename = "originalName")]
        original_name: String,
        update: PersonUpdate,
    },
    Delete {
        name: String,
    },
    /// Move subordinates without deleting their manager
    Reassign {
        name: String,
        #[serde(rename = "newManager")]
        new_manager: String,
    },
    /// Move subordinates, then delete their former manager
    ReassignAndDelete {
        name: String,
        #[serde(rename = "newManager")]
        new_manager: String,
    },
    FilterChange {
        tag: String,
    },
}

/// View after an action, plus store calls that failed along the way
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutcome {
    pub view: View,
    pub backend_failures: Vec<BackendFailure>,
}

/// Values for the add/edit/reassign form pickers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerOptions {
    pub areas: Vec<String>,
    pub titles: Vec<String>,
    pub managers: Vec<String>,
}

#[derive(Debug, Default)]
pub struct Session {
    roster: Roster,
    navigator: Navigator,
    regime: RegimeFilter,
    root_config: RootConfig,
}

impl Session {
    pub fn new(roster: Roster, root_config: RootConfig) -> Self {
        Self {
            roster,
            navigator: Navigator::new(),
            regime: RegimeFilter::All,
            root_config,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn regime(&self) -> RegimeFilter {
        self.regime
    }

    /// Swap in a freshly loaded roster and start over at the root
    pub fn replace_roster(&mut self, roster: Roster) {
        info!("Session roster replaced ({} people)", roster.len());
        self.roster = roster;
        self.navigator.reset();
    }

    fn filtered(&self) -> Vec<Person> {
        self.regime.apply(self.roster.people())
    }

    /// Re-render whatever is currently shown
    pub fn current_view(&mut self) -> View {
        let people = self.filtered();
        self.navigator.current_view(&people, &self.root_config)
    }

    /// Clear history and show the root
    pub fn root_view(&mut self) -> RootView {
        let people = self.filtered();
        self.navigator.reset();
        self.navigator.root_view(&people, &self.root_config)
    }

    /// Read-only drill view; navigation state is untouched
    pub fn drill_view(&self, name: &str) -> Result<DrillView> {
        let people = self.filtered();
        let person = self.resolve(&people, name)?;
        let level = self.navigator.selection_level(&person);
        Ok(self.navigator.drill_view(&people, &person, level))
    }

    pub fn options(&self, exclude: Option<&str>) -> PickerOptions {
        let people = self.roster.people();
        PickerOptions {
            areas: areas(people),
            titles: titles(people),
            managers: manager_candidates(people, exclude),
        }
    }

    /// Export the full, unfiltered roster
    pub fn export(&self) -> ExportReport {
        export_rows(self.roster.people())
    }

    /// Person by name in `people`, falling back to the root vacancy card
    fn resolve(&self, people: &[Person], name: &str) -> Result<Person> {
        if let Some(person) = people.iter().find(|p| p.has_name(name)) {
            return Ok(person.clone());
        }
        build_root_view(people, &self.root_config)
            .vacancy
            .filter(|v| v.has_name(name))
            .ok_or_else(|| Error::NotFound(format!("Person not found: {}", name)))
    }

    /// Apply one action and render the resulting view
    pub async fn apply(&mut self, store: &dyn RecordStore, action: Action) -> Result<ActionOutcome> {
        debug!(?action, "Applying action");
        let mut backend_failures = Vec::new();

        let view = match action {
            Action::Descend { name } => {
                let people = self.filtered();
                let person = self.resolve(&people, &name)?;
                let level = self.navigator.selection_level(&person);
                View::Drill(self.navigator.descend(&people, &person, level))
            }
            Action::Ascend => {
                let people = self.filtered();
                self.navigator.ascend(&people, &self.root_config)
            }
            Action::Add(new) => {
                let added = self.roster.add(store, new).await?;
                backend_failures = added.backend_failures;
                self.current_view()
            }
            Action::Edit {
                original_name,
                mut update,
            } => {
                let has_manager = update
                    .manager_name
                    .as_deref()
                    .is_some_and(|m| !m.trim().is_empty());
                if !has_manager {
                    let others: Vec<Person> = self
                        .roster
                        .people()
                        .iter()
                        .filter(|p| !p.has_name(&original_name))
                        .cloned()
                        .collect();
                    update.manager_name = manager_for_area(&others, update.area.trim());
                }
                let edited = self.roster.edit(store, &original_name, update).await?;
                backend_failures = edited.backend_failures;
                self.navigator.rename(&original_name, &edited.value.name);
                self.current_view()
            }
            Action::Delete { name } => {
                let deleted = self.roster.delete(store, &name).await?;
                backend_failures = deleted.backend_failures;
                self.current_view()
            }
            Action::Reassign { name, new_manager } => {
                let moved = self
                    .roster
                    .reassign_subordinates(store, &name, &new_manager)
                    .await?;
                backend_failures = moved.backend_failures;
                self.current_view()
            }
            Action::ReassignAndDelete { name, new_manager } => {
                let deleted = self
                    .roster
                    .reassign_and_delete(store, &name, &new_manager)
                    .await?;
                backend_failures = deleted.backend_failures;
                self.current_view()
            }
            Action::FilterChange { tag } => {
                self.regime = RegimeFilter::parse(&tag)?;
                info!("Regime filter set to {}", self.regime.tag());
                self.current_view()
            }
        };

        Ok(ActionOutcome {
            view,
            backend_failures,
        })
    }
}
