//! # Org Chart Common Library
//!
//! Core of the org chart service, shared with the web front end:
//! - Record normalization and rank classification
//! - Hierarchy derivation from free-text manager names
//! - Drill-down navigation with history
//! - Roster mutations against a record store
//! - Configuration loading

pub mod auth;
pub mod config;
pub mod error;
pub mod export;
pub mod hierarchy;
pub mod model;
pub mod navigation;
pub mod normalize;
pub mod regime;
pub mod roster;
pub mod session;
pub mod store;
pub mod tier;

pub use error::{Error, Result};
pub use model::{EmploymentType, NewPerson, Person, PersonUpdate};
pub use session::{Action, ActionOutcome, Session};
pub use tier::{classify, Level, Tier};
