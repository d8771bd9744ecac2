use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::error::{BqJobsError, Result};

pub const DEFAULT_LOCAL_KEY_FILE: &str = "bq-sa.json";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Settings for a [`crate::Warehouse`].
///
/// ```yaml
/// secret_path: /secrets/bq/service-account.json
/// local_key_file: bq-sa.json
/// poll_interval_ms: 500
/// location: EU
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    pub secret_path: PathBuf,

    #[serde(default = "default_local_key_file")]
    pub local_key_file: PathBuf,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Location jobs run in. `None` lets the service pick from the datasets involved.
    #[serde(default)]
    pub location: Option<String>,
}

fn default_local_key_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOCAL_KEY_FILE)
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl WarehouseConfig {
    pub fn new(secret_path: impl Into<PathBuf>) -> Self {
        Self {
            secret_path: secret_path.into(),
            local_key_file: default_local_key_file(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            location: None,
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BqJobsError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    pub fn with_local_key_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_key_file = path.into();
        self
    }

    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.secret_path.as_os_str().is_empty() {
            return Err(BqJobsError::Config("secret_path must not be empty".into()));
        }
        if self.local_key_file.as_os_str().is_empty() {
            return Err(BqJobsError::Config("local_key_file must not be empty".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(BqJobsError::Config("poll_interval_ms must be greater than 0".into()));
        }
        Ok(())
    }
}
