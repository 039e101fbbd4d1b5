//! Hierarchy derivation over free-text manager names
//!
//! There is no parent id in the data. A person `p` reports to `m` when the
//! lowercased `p.manager_name` *contains* the lowercased `m.name`. This is a
//! substring test, not equality: a manager named "Jo" also picks up anyone
//! whose manager field reads "Joana". Existing data depends on that behaviour,
//! so it is kept as-is.
//!
//! Only direct-children lookups are ever performed, which makes cycles and
//! orphaned manager names harmless.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::model::Person;
use crate::tier::{classify, Level, Tier};

/// Precomputed lowercase join keys with memoized subordinate lookups
///
/// Build one per view pass; it borrows the (already filtered) roster.
pub struct HierarchyIndex<'a> {
    people: &'a [Person],
    manager_keys: Vec<String>,
    memo: RefCell<HashMap<String, Vec<usize>>>,
}

impl<'a> HierarchyIndex<'a> {
    pub fn new(people: &'a [Person]) -> Self {
        Self {
            people,
            manager_keys: people.iter().map(|p| p.manager_name.to_lowercase()).collect(),
            memo: RefCell::new(HashMap::new()),
        }
    }

    fn subordinate_indices(&self, manager_name: &str) -> Vec<usize> {
        let key = manager_name.to_lowercase();
        if key.is_empty() {
            return Vec::new();
        }
        if let Some(hit) = self.memo.borrow().get(&key) {
            return hit.clone();
        }
        let found: Vec<usize> = self
            .manager_keys
            .iter()
            .enumerate()
            .filter(|(_, m)| m.contains(&key))
            .map(|(i, _)| i)
            .collect();
        self.memo.borrow_mut().insert(key, found.clone());
        found
    }

    /// Direct subordinates of `manager`, in roster order
    pub fn subordinates_of(&self, manager: &Person) -> Vec<&'a Person> {
        self.subordinate_indices(&manager.name)
            .into_iter()
            .map(|i| &self.people[i])
            .collect()
    }

    /// Roster positions of the direct subordinates of `manager`
    pub fn subordinate_positions(&self, manager: &Person) -> Vec<usize> {
        self.subordinate_indices(&manager.name)
    }

    pub fn has_subordinates(&self, manager: &Person) -> bool {
        !self.subordinate_indices(&manager.name).is_empty()
    }
}

/// Direct subordinates of `manager` within `people`
pub fn direct_subordinates(people: &[Person], manager: &Person) -> Vec<Person> {
    HierarchyIndex::new(people)
        .subordinates_of(manager)
        .into_iter()
        .cloned()
        .collect()
}

/// Tier a subordinate is displayed under. Presidents below someone else
/// are shown alongside directors.
fn display_tier(person: &Person) -> Tier {
    match classify(&person.title) {
        Tier::President => Tier::Director,
        tier => tier,
    }
}

/// Tier to descend into after selecting a person at `level`
///
/// From the root (or a president) the next tier is always Director.
/// Otherwise it is the highest-authority tier present among `subordinates`,
/// or Staff when there are none.
pub fn next_tier(level: Level, subordinates: &[Person]) -> Tier {
    if matches!(level, Level::Root | Level::Tier(Tier::President)) {
        return Tier::Director;
    }
    subordinates
        .iter()
        .map(display_tier)
        .min()
        .unwrap_or(Tier::Staff)
}

/// First person whose title mentions "president" (covers "presidente")
pub fn find_president(people: &[Person]) -> Option<&Person> {
    people
        .iter()
        .find(|p| p.title.to_lowercase().contains("president"))
}

/// Directors reporting to `president`
///
/// Falls back to every director in the roster when none are linked to the
/// president by name, or when there is no president.
pub fn directors_of(president: Option<&Person>, people: &[Person]) -> Vec<Person> {
    let all: Vec<&Person> = people
        .iter()
        .filter(|p| classify(&p.title) == Tier::Director)
        .collect();

    if let Some(president) = president {
        let direct: Vec<Person> = all
            .iter()
            .filter(|d| d.manager_name.to_lowercase() == president.name.to_lowercase())
            .map(|d| (*d).clone())
            .collect();
        if !direct.is_empty() {
            return direct;
        }
    }
    all.into_iter().cloned().collect()
}

/// Subordinates sharing a display tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierGroup {
    pub tier: Tier,
    pub label: &'static str,
    pub people: Vec<Person>,
}

/// Group subordinates by tier in display order, omitting empty groups
pub fn group_by_tier(subordinates: &[Person]) -> Vec<TierGroup> {
    Tier::DISPLAY_ORDER
        .iter()
        .filter_map(|tier| {
            let people: Vec<Person> = subordinates
                .iter()
                .filter(|p| display_tier(p) == *tier)
                .cloned()
                .collect();
            (!people.is_empty()).then(|| TierGroup {
                tier: *tier,
                label: tier.label(),
                people,
            })
        })
        .collect()
}

/// Sorted unique names of people who can take over subordinates
pub fn manager_candidates(people: &[Person], exclude: Option<&str>) -> Vec<String> {
    let exclude = exclude.map(str::to_lowercase);
    people
        .iter()
        .filter(|p| !p.is_vacancy && !p.name.is_empty())
        .filter(|p| classify(&p.title).is_manager_rank())
        .filter(|p| exclude.as_deref() != Some(p.name.to_lowercase().as_str()))
        .map(|p| p.name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted unique non-empty areas
pub fn areas(people: &[Person]) -> Vec<String> {
    people
        .iter()
        .map(|p| p.area.clone())
        .filter(|a| !a.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted unique non-empty titles
pub fn titles(people: &[Person]) -> Vec<String> {
    people
        .iter()
        .map(|p| p.title.clone())
        .filter(|t| !t.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Manager to assign when only an area is known
///
/// First director, manager or coordinator working in `area`, otherwise the
/// president. Supervisors are not considered area owners.
pub fn manager_for_area(people: &[Person], area: &str) -> Option<String> {
    people
        .iter()
        .find(|p| {
            p.area == area
                && matches!(
                    classify(&p.title),
                    Tier::Director | Tier::Manager | Tier::Coordinator
                )
        })
        .or_else(|| find_president(people))
        .map(|p| p.name.clone())
}
