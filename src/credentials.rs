use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;
use crate::error::{BqJobsError, Result};

/// A service-account key as downloaded from IAM.
///
/// Only the fields this crate reads are typed; everything else is kept in
/// `extra` so the staged copy carries the full key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub client_email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServiceAccountKey {
    pub fn from_json(content: &str) -> Result<Self> {
        let key: Self = serde_json::from_str(content)
            .map_err(|e| BqJobsError::Credentials(format!("malformed service account key: {}", e)))?;

        if let Some(kind) = &key.key_type {
            if kind != "service_account" {
                return Err(BqJobsError::Credentials(format!(
                    "expected key of type service_account, found {}",
                    kind
                )));
            }
        }

        Ok(key)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BqJobsError::Credentials(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Copies the key read from `secret_path` to `local_path`, replacing any
    /// file already there, and returns the parsed key.
    pub fn stage(secret_path: &Path, local_path: &Path) -> Result<Self> {
        let key = Self::read(secret_path)?;
        std::fs::write(local_path, serde_json::to_vec(&key)?)?;
        debug!("Staged service account key {} at {}", key.client_email, local_path.display());
        Ok(key)
    }
}
