//! Named connection secrets.
//!
//! Database credentials may be kept out of the environment in a JSON document
//! keyed by secret name:
//!
//! ```json
//! {
//!   "dev/ls/db": {
//!     "database_user": "shortener",
//!     "database_password": "s3cret",
//!     "database_host": "db.internal:5432",
//!     "database_name": "links"
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

/// Secret name used when `DB_SECRET_NAME` is unset.
pub const DEFAULT_DB_SECRET_NAME: &str = "dev/ls/db";

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("Failed to read secrets file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed secrets document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Secret '{0}' not found")]
    NotFound(String),
}

/// Database credentials as stored in a secret.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionSecret {
    pub database_user: String,
    pub database_password: String,
    /// Host, optionally with `:port`.
    pub database_host: String,
    pub database_name: String,
}

impl ConnectionSecret {
    /// Builds a `postgres://` URL from the secret fields.
    pub fn postgres_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}/{}",
            self.database_user, self.database_password, self.database_host, self.database_name
        )
    }
}

/// Looks up connection secrets by name.
pub trait SecretSource {
    fn connection_secret(&self, name: &str) -> Result<ConnectionSecret, SecretError>;
}

/// Secret source backed by a JSON document on disk.
#[derive(Debug, Clone, Default)]
pub struct JsonFileSecretSource {
    secrets: HashMap<String, ConnectionSecret>,
}

impl JsonFileSecretSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SecretError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, SecretError> {
        let secrets = serde_json::from_str(raw)?;
        Ok(Self { secrets })
    }
}

impl SecretSource for JsonFileSecretSource {
    fn connection_secret(&self, name: &str) -> Result<ConnectionSecret, SecretError> {
        self.secrets
            .get(name)
            .cloned()
            .ok_or_else(|| SecretError::NotFound(name.to_string()))
    }
}
