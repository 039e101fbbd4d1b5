//! Record store seam
//!
//! The roster lives in a hosted table reached over HTTP. Every call returns
//! an explicit [`BackendError`] so that callers can decide whether a failure
//! is fatal. Rows travel as raw JSON objects; normalization happens above
//! this layer.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::auth::{verify_login, AccessRecord, AuthError, Authenticator, UserIdentity};

/// Record store failures
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),

    /// Store not configured, offline, or failure injected by a test
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Async CRUD over the roster table
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every row in the table
    async fn fetch_all(&self) -> Result<Vec<Value>, BackendError>;

    /// Insert one row, returning it as stored (with its id)
    async fn insert(&self, row: &Map<String, Value>) -> Result<Value, BackendError>;

    /// Patch the row with `id`, returning the updated rows
    async fn update(&self, id: &str, patch: &Map<String, Value>) -> Result<Vec<Value>, BackendError>;

    /// Delete the row with `id`, returning the deleted rows
    async fn delete(&self, id: &str) -> Result<Vec<Value>, BackendError>;
}

#[derive(Debug, Default)]
struct MemoryTable {
    rows: Vec<Map<String, Value>>,
    next_id: u64,
    failing: bool,
}

impl MemoryTable {
    fn check(&self) -> Result<(), BackendError> {
        if self.failing {
            return Err(BackendError::Unavailable("memory store set to fail".to_string()));
        }
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|r| row_id(r).as_deref() == Some(id))
    }
}

fn row_id(row: &Map<String, Value>) -> Option<String> {
    match row.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// In-process store used by tests and offline mode
///
/// Ids are assigned sequentially starting at 1. `set_failing(true)` makes
/// every call return [`BackendError::Unavailable`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: Mutex<MemoryTable>,
    access: Mutex<Vec<AccessRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `rows`; rows without an id get one
    pub fn with_rows(rows: Vec<Value>) -> Self {
        let mut table = MemoryTable::default();
        for row in rows {
            if let Value::Object(mut obj) = row {
                table.next_id += 1;
                if row_id(&obj).is_none() {
                    obj.insert("id".into(), Value::from(table.next_id));
                }
                table.rows.push(obj);
            }
        }
        let highest = table
            .rows
            .iter()
            .filter_map(|r| row_id(r)?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        table.next_id = table.next_id.max(highest);
        Self {
            table: Mutex::new(table),
            access: Mutex::new(Vec::new()),
        }
    }

    pub async fn set_failing(&self, failing: bool) {
        self.table.lock().await.failing = failing;
    }

    pub async fn add_access_record(&self, record: AccessRecord) {
        self.access.lock().await.push(record);
    }

    /// Snapshot of the stored rows
    pub async fn rows(&self) -> Vec<Value> {
        self.table
            .lock()
            .await
            .rows
            .iter()
            .cloned()
            .map(Value::Object)
            .collect()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_all(&self) -> Result<Vec<Value>, BackendError> {
        let table = self.table.lock().await;
        table.check()?;
        Ok(table.rows.iter().cloned().map(Value::Object).collect())
    }

    async fn insert(&self, row: &Map<String, Value>) -> Result<Value, BackendError> {
        let mut table = self.table.lock().await;
        table.check()?;
        table.next_id += 1;
        let mut stored = row.clone();
        stored.insert("id".into(), Value::from(table.next_id));
        debug!(id = table.next_id, "Memory store insert");
        table.rows.push(stored.clone());
        Ok(Value::Object(stored))
    }

    async fn update(&self, id: &str, patch: &Map<String, Value>) -> Result<Vec<Value>, BackendError> {
        let mut table = self.table.lock().await;
        table.check()?;
        let Some(pos) = table.position(id) else {
            return Ok(Vec::new());
        };
        let row = &mut table.rows[pos];
        for (k, v) in patch {
            row.insert(k.clone(), v.clone());
        }
        Ok(vec![Value::Object(row.clone())])
    }

    async fn delete(&self, id: &str) -> Result<Vec<Value>, BackendError> {
        let mut table = self.table.lock().await;
        table.check()?;
        Ok(table
            .position(id)
            .map(|pos| vec![Value::Object(table.rows.remove(pos))])
            .unwrap_or_default())
    }
}

#[async_trait]
impl Authenticator for MemoryStore {
    async fn authenticate(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        if self.table.lock().await.failing {
            return Err(AuthError::Backend(BackendError::Unavailable(
                "memory store set to fail".to_string(),
            )));
        }
        let records = self.access.lock().await;
        verify_login(&records, email, password)
    }
}
