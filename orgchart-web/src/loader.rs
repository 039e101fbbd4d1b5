//! Initial roster load
//!
//! The first fetch from the record store runs under a fixed timeout. When it
//! fails, times out, or comes back empty, the service falls back to a local
//! JSON roster. If that is unavailable too, it starts with an empty roster.

use std::path::{Path, PathBuf};
use std::time::Duration;

use orgchart_common::config::OrgchartConfig;
use orgchart_common::normalize::normalize_rows;
use orgchart_common::roster::Roster;
use orgchart_common::store::RecordStore;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

/// Initial fetch failures; a timeout is reported separately
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Initial fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("Initial fetch failed: {0}")]
    Backend(#[from] orgchart_common::Error),
}

/// Where the starting roster came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSource {
    Store,
    Fallback(PathBuf),
    Empty,
}

/// Fetch and normalize the store's table, bounded by `timeout`
pub async fn fetch_with_timeout(
    store: &dyn RecordStore,
    timeout: Duration,
) -> Result<Roster, LoadError> {
    match tokio::time::timeout(timeout, Roster::load(store)).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(LoadError::Timeout(timeout)),
    }
}

/// Read a local roster file holding a JSON array of rows
pub fn load_fallback(path: &Path) -> orgchart_common::Result<Roster> {
    let content = std::fs::read_to_string(path)?;
    let rows: Vec<Value> = serde_json::from_str(&content)?;
    Ok(Roster::new(normalize_rows(rows)))
}

/// Starting roster for the session, never failing
pub async fn load_initial_roster(
    store: &dyn RecordStore,
    config: &OrgchartConfig,
) -> (Roster, RosterSource) {
    let timeout = Duration::from_secs(config.store.fetch_timeout_secs);

    match fetch_with_timeout(store, timeout).await {
        Ok(roster) if !roster.is_empty() => {
            info!("✓ Loaded {} people from record store", roster.len());
            return (roster, RosterSource::Store);
        }
        Ok(_) => warn!("Record store returned no rows"),
        Err(LoadError::Timeout(t)) => error!("Record store did not answer within {:?}", t),
        Err(e) => error!("{}", e),
    }

    if let Some(path) = &config.fallback.roster_json {
        match load_fallback(path) {
            Ok(roster) => {
                info!(
                    "Loaded {} people from local roster {}",
                    roster.len(),
                    path.display()
                );
                return (roster, RosterSource::Fallback(path.clone()));
            }
            Err(e) => warn!("Local roster {} unavailable: {}", path.display(), e),
        }
    }

    warn!("Starting with an empty roster");
    (Roster::default(), RosterSource::Empty)
}
