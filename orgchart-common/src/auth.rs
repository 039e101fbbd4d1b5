//! Login check against the access-record table
//!
//! Access records are compared in plain text, matching how the hosted table
//! stores them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::store::BackendError;

/// Login failures
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email and password are required")]
    MissingCredentials,

    /// Unknown email and wrong password are deliberately indistinguishable
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Access disabled for {0}")]
    Inactive(String),

    #[error("Login backend error: {0}")]
    Backend(#[from] BackendError),
}

/// One row of the access table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessRecord {
    #[serde(default)]
    pub id: Option<Value>,
    pub email: String,
    #[serde(default)]
    pub nome: String,
    /// Null or absent means active
    #[serde(default)]
    pub ativo: Option<bool>,
    #[serde(default)]
    pub senha: String,
}

impl AccessRecord {
    pub fn new(email: &str, nome: &str, senha: &str) -> Self {
        Self {
            id: None,
            email: email.to_string(),
            nome: nome.to_string(),
            ativo: Some(true),
            senha: senha.to_string(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.ativo.unwrap_or(true)
    }
}

/// Authenticated user, as returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub email: String,
    pub name: String,
}

/// Verify `email`/`password` against `records`
///
/// Emails compare case-insensitively after trimming.
pub fn verify_login(
    records: &[AccessRecord],
    email: &str,
    password: &str,
) -> Result<UserIdentity, AuthError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let record = records
        .iter()
        .find(|r| r.email.trim().eq_ignore_ascii_case(email))
        .ok_or_else(|| {
            debug!("Login attempt for unknown email");
            AuthError::InvalidCredentials
        })?;

    if record.senha != password {
        return Err(AuthError::InvalidCredentials);
    }
    if !record.is_active() {
        return Err(AuthError::Inactive(record.email.clone()));
    }

    info!(email = %record.email, "Login accepted");
    Ok(UserIdentity {
        email: record.email.clone(),
        name: record.nome.clone(),
    })
}

/// Credential check seam implemented by each store
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<AccessRecord> {
        let mut off = AccessRecord::new("off@example.com", "Off", "pw");
        off.ativo = Some(false);
        vec![AccessRecord::new("Ana@Example.com", "Ana", "segredo"), off]
    }

    #[test]
    fn test_valid_login() {
        let user = verify_login(&records(), " ana@example.com ", "segredo").unwrap();
        assert_eq!(user.name, "Ana");
        assert_eq!(user.email, "Ana@Example.com");
    }

    #[test]
    fn test_unknown_email_and_wrong_password_look_alike() {
        let unknown = verify_login(&records(), "who@example.com", "x").unwrap_err();
        let wrong = verify_login(&records(), "ana@example.com", "x").unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[test]
    fn test_missing_credentials() {
        assert!(matches!(
            verify_login(&records(), "", "x"),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            verify_login(&records(), "ana@example.com", ""),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_inactive_rejected() {
        assert!(matches!(
            verify_login(&records(), "off@example.com", "pw"),
            Err(AuthError::Inactive(_))
        ));
    }

    #[test]
    fn test_record_deserializes_with_defaults() {
        let record: AccessRecord =
            serde_json::from_value(serde_json::json!({ "id": 3, "email": "x@y.z" })).unwrap();
        assert!(record.is_active());
        assert_eq!(record.senha, "");
    }
}
