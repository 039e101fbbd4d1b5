//! Roster mutations with best-effort backend persistence
//!
//! The in-memory roster is authoritative. Every mutation is applied locally
//! and mirrored to the [`RecordStore`]. A store failure is logged and reported
//! in [`Mutation::backend_failures`]; the local change stays.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::hierarchy::HierarchyIndex;
use crate::model::{NewPerson, Person, PersonUpdate};
use crate::normalize::{manager_patch, normalize_rows, to_store_row};
use crate::store::{BackendError, RecordStore};

/// A store call that failed while the local change went through
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendFailure {
    /// Name of the person whose row was being written
    pub record: String,
    pub operation: &'static str,
    pub error: String,
}

/// Result of a local mutation plus any store failures it hit
#[derive(Debug, Clone)]
pub struct Mutation<T> {
    pub value: T,
    pub backend_failures: Vec<BackendFailure>,
}

impl<T> Mutation<T> {
    fn new(value: T, backend_failures: Vec<BackendFailure>) -> Self {
        Self {
            value,
            backend_failures,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.backend_failures.is_empty()
    }
}

fn failure(record: &str, operation: &'static str, error: &BackendError) -> BackendFailure {
    warn!(record, operation, "Backend {} failed: {}", operation, error);
    BackendFailure {
        record: record.to_string(),
        operation,
        error: error.to_string(),
    }
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::missing_field(field));
    }
    Ok(())
}

/// Patch the stored row for `person`, if it has one
async fn sync_row(
    store: &dyn RecordStore,
    person: &Person,
    patch: &Map<String, Value>,
    failures: &mut Vec<BackendFailure>,
) {
    let Some(id) = person.id.as_deref() else {
        debug!(person = %person.name, "Local-only record; skipping backend update");
        return;
    };
    if let Err(e) = store.update(id, patch).await {
        failures.push(failure(&person.name, "update", &e));
    }
}

/// Full working set of people
#[derive(Debug, Clone, Default)]
pub struct Roster {
    people: Vec<Person>,
}

impl Roster {
    pub fn new(people: Vec<Person>) -> Self {
        Self { people }
    }

    /// Fetch and normalize the whole table
    pub async fn load(store: &dyn RecordStore) -> Result<Self> {
        let rows = store.fetch_all().await?;
        let people = normalize_rows(rows);
        info!("Loaded {} people from record store", people.len());
        Ok(Self { people })
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// First person whose name matches case-insensitively
    pub fn find(&self, name: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.has_name(name))
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.people
            .iter()
            .position(|p| p.has_name(name))
            .ok_or_else(|| Error::NotFound(format!("Person not found: {}", name)))
    }

    /// Positions of the direct subordinates of the person at `pos`,
    /// excluding that person
    fn subordinate_positions(&self, pos: usize) -> Vec<usize> {
        HierarchyIndex::new(&self.people)
            .subordinate_positions(&self.people[pos])
            .into_iter()
            .filter(|&i| i != pos)
            .collect()
    }

    /// Add a person. A failed backend insert leaves a local-only record.
    pub async fn add(&mut self, store: &dyn RecordStore, new: NewPerson) -> Result<Mutation<Person>> {
        require(&new.name, "name")?;
        require(&new.title, "title")?;
        require(&new.area, "area")?;
        require(&new.manager_name, "manager")?;

        let mut person = Person {
            id: None,
            name: new.name.trim().to_string(),
            title: new.title.trim().to_string(),
            area: new.area.trim().to_string(),
            manager_name: new.manager_name.trim().to_string(),
            employment_type: new.employment_type,
            is_vacancy: false,
            phone: new.phone.trim().to_string(),
            notes: new.notes.trim().to_string(),
            created_at: None,
        };

        let mut failures = Vec::new();
        match store.insert(&to_store_row(&person)).await {
            Ok(stored) => {
                person.id = stored.get("id").and_then(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                });
                person.created_at = stored
                    .get("created_at")
                    .and_then(Value::as_str)
                    .map(str::to_string);
            }
            Err(e) => failures.push(failure(&person.name, "insert", &e)),
        }

        info!(person = %person.name, manager = %person.manager_name, "Added person");
        self.people.push(person.clone());
        Ok(Mutation::new(person, failures))
    }

    /// Replace the person named `original_name` and cascade a rename to the
    /// manager field of everyone who reported to the old name
    ///
    /// A `None` manager keeps the current one. Fields the update leaves as
    /// `None` keep their stored values.
    pub async fn edit(
        &mut self,
        store: &dyn RecordStore,
        original_name: &str,
        update: PersonUpdate,
    ) -> Result<Mutation<Person>> {
        require(&update.name, "name")?;
        require(&update.title, "title")?;
        require(&update.area, "area")?;

        let pos = self.position(original_name)?;
        let old = self.people[pos].clone();

        let manager_name = update
            .manager_name
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| old.manager_name.clone());
        let updated = Person {
            id: old.id.clone(),
            name: update.name.trim().to_string(),
            title: update.title.trim().to_string(),
            area: update.area.trim().to_string(),
            manager_name,
            employment_type: update.employment_type.or(old.employment_type),
            is_vacancy: old.is_vacancy,
            phone: update.phone.unwrap_or_else(|| old.phone.clone()),
            notes: update.notes.unwrap_or_else(|| old.notes.clone()),
            created_at: old.created_at.clone(),
        };

        let mut failures = Vec::new();
        sync_row(store, &updated, &to_store_row(&updated), &mut failures).await;
        self.people[pos] = updated.clone();

        if updated.name != old.name {
            let patch = manager_patch(&updated.name);
            let old_key = old.name.to_lowercase();
            let mut cascaded = 0usize;
            for i in 0..self.people.len() {
                if i == pos || self.people[i].manager_name.to_lowercase() != old_key {
                    continue;
                }
                self.people[i].manager_name = updated.name.clone();
                sync_row(store, &self.people[i], &patch, &mut failures).await;
                cascaded += 1;
            }
            info!(
                "Renamed {} to {}; updated manager of {} subordinate(s)",
                old.name, updated.name, cascaded
            );
        } else {
            info!(person = %updated.name, "Edited person");
        }

        Ok(Mutation::new(updated, failures))
    }

    /// Remove a person who has no subordinates
    pub async fn delete(&mut self, store: &dyn RecordStore, name: &str) -> Result<Mutation<Person>> {
        let pos = self.position(name)?;
        let subordinates = self.subordinate_positions(pos);
        if !subordinates.is_empty() {
            return Err(Error::ReassignmentRequired {
                name: self.people[pos].name.clone(),
                subordinates: subordinates
                    .into_iter()
                    .map(|i| self.people[i].name.clone())
                    .collect(),
            });
        }

        Ok(self.remove_at(store, pos).await)
    }

    /// Delete the stored row and drop the person at `pos` without checking
    /// for subordinates
    async fn remove_at(&mut self, store: &dyn RecordStore, pos: usize) -> Mutation<Person> {
        let mut failures = Vec::new();
        let person = &self.people[pos];
        match person.id.as_deref() {
            Some(id) => {
                if let Err(e) = store.delete(id).await {
                    failures.push(failure(&person.name, "delete", &e));
                }
            }
            None => debug!(person = %person.name, "Local-only record; skipping backend delete"),
        }

        let removed = self.people.remove(pos);
        info!(person = %removed.name, "Deleted person");
        Mutation::new(removed, failures)
    }

    /// Point every direct subordinate of `name` at `new_manager`
    ///
    /// The new manager must exist, hold a manager-rank title, and differ from
    /// the person being vacated.
    pub async fn reassign_subordinates(
        &mut self,
        store: &dyn RecordStore,
        name: &str,
        new_manager: &str,
    ) -> Result<Mutation<Vec<Person>>> {
        require(new_manager, "new manager")?;
        let pos = self.position(name)?;
        let target = self
            .find(new_manager)
            .ok_or_else(|| Error::NotFound(format!("Manager not found: {}", new_manager)))?;
        if target.has_name(&self.people[pos].name) {
            return Err(Error::ValidationFailed(
                "New manager must differ from the person being removed".to_string(),
            ));
        }
        if target.is_vacancy || !target.tier().is_manager_rank() {
            return Err(Error::ValidationFailed(format!(
                "{} cannot receive subordinates",
                target.name
            )));
        }
        let target_name = target.name.clone();

        let patch = manager_patch(&target_name);
        let mut failures = Vec::new();
        let mut moved = Vec::new();
        for i in self.subordinate_positions(pos) {
            self.people[i].manager_name = target_name.clone();
            sync_row(store, &self.people[i], &patch, &mut failures).await;
            moved.push(self.people[i].clone());
        }

        info!(
            "Reassigned {} subordinate(s) of {} to {}",
            moved.len(),
            self.people[pos].name,
            target_name
        );
        Ok(Mutation::new(moved, failures))
    }

    /// Reassign subordinates, then delete the now-empty position
    pub async fn reassign_and_delete(
        &mut self,
        store: &dyn RecordStore,
        name: &str,
        new_manager: &str,
    ) -> Result<Mutation<Person>> {
        let reassigned = self.reassign_subordinates(store, name, new_manager).await?;
        // The new manager's name may contain the old one, so the moved
        // subordinates would still match a fresh subordinate check.
        let pos = self.position(name)?;
        let mut deleted = self.remove_at(store, pos).await;
        let mut failures = reassigned.backend_failures;
        failures.append(&mut deleted.backend_failures);
        Ok(Mutation::new(deleted.value, failures))
    }
}
