//! Hosted record store client (Supabase PostgREST)
//!
//! Every request carries the project key both as `apikey` and as a bearer
//! token. Rows are addressed with `?id=eq.<id>` filters.

use async_trait::async_trait;
use orgchart_common::auth::{verify_login, AccessRecord, AuthError, Authenticator, UserIdentity};
use orgchart_common::config::StoreConfig;
use orgchart_common::store::{BackendError, RecordStore};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Map, Value};
use tracing::debug;

/// PostgREST client for the roster and access tables
#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
    access_table: String,
}

impl SupabaseStore {
    /// Client for the configured project. Fails when URL or key is missing.
    pub fn new(config: &StoreConfig) -> Result<Self, BackendError> {
        if !config.is_configured() {
            return Err(BackendError::Unavailable(
                "store URL and API key are not configured".to_string(),
            ));
        }
        Ok(Self {
            client: Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            table: config.table.clone(),
            access_table: config.access_table.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    /// Send and decode a JSON body, mapping non-2xx responses to `Status`
    async fn send(&self, builder: RequestBuilder) -> Result<Value, BackendError> {
        let resp = self
            .authorized(builder)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::decode(resp).await
    }

    async fn decode(resp: Response) -> Result<Value, BackendError> {
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }
        let text = resp
            .text()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(Value::Array(Vec::new()));
        }
        serde_json::from_str(&text).map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn into_rows(value: Value) -> Result<Vec<Value>, BackendError> {
        match value {
            Value::Array(rows) => Ok(rows),
            other => Err(BackendError::Decode(format!(
                "expected an array of rows, got {}",
                other
            ))),
        }
    }

    async fn access_records(&self, email: &str) -> Result<Vec<AccessRecord>, BackendError> {
        let builder = self
            .client
            .get(self.table_url(&self.access_table))
            .query(&[
                ("select", "id,email,nome,ativo,senha".to_string()),
                ("email", format!("eq.{}", email.trim())),
            ]);
        let rows = Self::into_rows(self.send(builder).await?)?;
        rows.into_iter()
            .map(|r| serde_json::from_value(r).map_err(|e| BackendError::Decode(e.to_string())))
            .collect()
    }
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn fetch_all(&self) -> Result<Vec<Value>, BackendError> {
        let builder = self
            .client
            .get(self.table_url(&self.table))
            .query(&[("select", "*")]);
        let rows = Self::into_rows(self.send(builder).await?)?;
        debug!("Fetched {} rows from {}", rows.len(), self.table);
        Ok(rows)
    }

    async fn insert(&self, row: &Map<String, Value>) -> Result<Value, BackendError> {
        let builder = self
            .client
            .post(self.table_url(&self.table))
            .header("Prefer", "return=representation")
            .json(&[row]);
        let mut rows = Self::into_rows(self.send(builder).await?)?;
        if rows.is_empty() {
            return Err(BackendError::Decode("insert returned no row".to_string()));
        }
        Ok(rows.swap_remove(0))
    }

    async fn update(&self, id: &str, patch: &Map<String, Value>) -> Result<Vec<Value>, BackendError> {
        let builder = self
            .client
            .patch(self.table_url(&self.table))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(patch);
        Self::into_rows(self.send(builder).await?)
    }

    async fn delete(&self, id: &str) -> Result<Vec<Value>, BackendError> {
        let builder = self
            .client
            .delete(self.table_url(&self.table))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation");
        Self::into_rows(self.send(builder).await?)
    }
}

#[async_trait]
impl Authenticator for SupabaseStore {
    async fn authenticate(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        let records = self.access_records(email).await?;
        verify_login(&records, email, password)
    }
}
