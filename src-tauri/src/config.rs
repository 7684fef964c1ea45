//! Console Configuration
//!
//! Backend endpoints and request timeout. Values come from defaults, then an
//! optional `console.json` in the app config directory, then environment
//! variables.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::domain::{DomainError, DomainResult};

pub const CONFIG_FILE_NAME: &str = "console.json";

pub const ENV_API_URL: &str = "BRANCH_CONSOLE_API_URL";
pub const ENV_UPLOAD_URL: &str = "BRANCH_CONSOLE_UPLOAD_URL";
pub const ENV_TIMEOUT_SECS: &str = "BRANCH_CONSOLE_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// REST base, e.g. `http://localhost:1337/api`
    pub api_url: String,
    /// Base for relative media URLs
    pub upload_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:1337/api".to_string(),
            upload_url: "http://localhost:1337".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ConsoleConfig {
    /// Load from `<dir>/console.json` (if present) and the process environment.
    pub fn load(config_dir: &Path) -> DomainResult<Self> {
        Self::load_with(config_dir, |key| std::env::var(key).ok())
    }

    /// Load from `<dir>/console.json` (if present), overridden through `lookup`.
    pub fn load_with<F>(config_dir: &Path, lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = config_dir.join(CONFIG_FILE_NAME);
        let config = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| DomainError::Storage(format!("{}: {}", path.display(), e)))?;
            Self::from_json(&raw)?
        } else {
            Self::default()
        };
        config.with_overrides(lookup)
    }

    pub fn from_json(raw: &str) -> DomainResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| DomainError::InvalidInput(format!("invalid {}: {}", CONFIG_FILE_NAME, e)))
    }

    /// Apply overrides from `lookup` (normally the environment) and validate.
    pub fn with_overrides<F>(mut self, lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_url) = lookup(ENV_API_URL) {
            self.api_url = api_url;
        }
        if let Some(upload_url) = lookup(ENV_UPLOAD_URL) {
            self.upload_url = upload_url;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = timeout.trim().parse().map_err(|_| {
                DomainError::InvalidInput(format!("{} must be a number of seconds", ENV_TIMEOUT_SECS))
            })?;
        }
        self.validate()
    }

    fn validate(mut self) -> DomainResult<Self> {
        self.api_url = normalize_url("api_url", &self.api_url)?;
        self.upload_url = normalize_url("upload_url", &self.upload_url)?;
        if self.request_timeout_secs == 0 {
            return Err(DomainError::InvalidInput(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn normalize_url(field: &str, raw: &str) -> DomainResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    Url::parse(trimmed)
        .map_err(|e| DomainError::InvalidInput(format!("{}: {}", field, e)))?;
    Ok(trimmed.to_string())
}
