//! Client configuration.
//!
//! Runtime options for the HTTP layer and poller, plus a small on-disk store
//! for credentials and endpoint overrides used by the `mxsdk` binary.
//!
//! Lookup priority for stored settings:
//! 1. `MENDIX_*` environment variables
//! 2. `config.json` in the config directory (defaults to ~/.mendix)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::credentials::Credentials;
use crate::platform::PlatformClient;

/// Default projects API endpoint (app lifecycle)
pub const DEFAULT_PROJECTS_API_ENDPOINT: &str = "https://sprintr.home.mendix.com";

/// Default model API endpoint (working copies and commits)
pub const DEFAULT_MODEL_API_ENDPOINT: &str = "https://model.api.mendix.com";

pub const ENV_USERNAME: &str = "MENDIX_USERNAME";
pub const ENV_API_KEY: &str = "MENDIX_API_KEY";
pub const ENV_PASSWORD: &str = "MENDIX_PASSWORD";
pub const ENV_OPENID: &str = "MENDIX_OPENID";
pub const ENV_PROJECTS_API: &str = "MENDIX_PROJECTS_API";
pub const ENV_MODEL_API: &str = "MENDIX_MODEL_API";
/// Set to "0" to accept invalid TLS certificates (development servers only)
pub const ENV_TLS_REJECT_UNAUTHORIZED: &str = "MENDIX_TLS_REJECT_UNAUTHORIZED";

const CONFIG_FILE_NAME: &str = "config.json";

/// Base URLs of the two platform services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub projects: String,
    pub model: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            projects: DEFAULT_PROJECTS_API_ENDPOINT.to_string(),
            model: DEFAULT_MODEL_API_ENDPOINT.to_string(),
        }
    }
}

impl Endpoints {
    pub fn new(projects: Option<&str>, model: Option<&str>) -> Self {
        let defaults = Self::default();
        Self {
            projects: projects.map(ToOwned::to_owned).unwrap_or(defaults.projects),
            model: model.map(ToOwned::to_owned).unwrap_or(defaults.model),
        }
    }
}

/// Options for the HTTP layer and the job poller.
#[derive(Debug, Clone)]
pub struct SdkOptions {
    /// Delay between two job status requests
    pub poll_delay: Duration,
    /// Upper bound on job status requests before giving up with a timeout
    pub max_poll_attempts: u32,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Retries for idempotent requests on transient failures
    pub max_retries: usize,
    /// Skip TLS certificate validation. Never enable against production.
    pub accept_invalid_certs: bool,
}

impl Default for SdkOptions {
    fn default() -> Self {
        Self {
            poll_delay: Duration::from_secs(1),
            max_poll_attempts: 120,
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            accept_invalid_certs: false,
        }
    }
}

impl SdkOptions {
    pub fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = delay;
        self
    }

    pub fn with_max_poll_attempts(mut self, attempts: u32) -> Self {
        self.max_poll_attempts = attempts;
        self
    }

    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Settings persisted in config.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects_api_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_api_endpoint: Option<String>,
    #[serde(default, skip_serializing)]
    pub accept_invalid_certs: bool,
}

impl StoredConfig {
    /// Overlay environment values on top of the stored ones.
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(v) = get(ENV_USERNAME) {
            self.username = Some(v);
        }
        if let Some(v) = get(ENV_API_KEY) {
            self.api_key = Some(v);
        }
        if let Some(v) = get(ENV_PASSWORD) {
            self.password = Some(v);
        }
        if let Some(v) = get(ENV_OPENID) {
            self.open_id = Some(v);
        }
        if let Some(v) = get(ENV_PROJECTS_API) {
            self.projects_api_endpoint = Some(v);
        }
        if let Some(v) = get(ENV_MODEL_API) {
            self.model_api_endpoint = Some(v);
        }
        if get(ENV_TLS_REJECT_UNAUTHORIZED).as_deref() == Some("0") {
            warn!(
                "{}=0: TLS certificate validation is disabled",
                ENV_TLS_REJECT_UNAUTHORIZED
            );
            self.accept_invalid_certs = true;
        }
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials().is_ok()
    }

    pub fn credentials(&self) -> crate::error::Result<Credentials> {
        Credentials::from_parts(
            self.username.as_deref(),
            self.api_key.as_deref(),
            self.password.as_deref(),
            self.open_id.as_deref(),
        )
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(
            self.projects_api_endpoint.as_deref(),
            self.model_api_endpoint.as_deref(),
        )
    }

    pub fn options(&self) -> SdkOptions {
        SdkOptions {
            accept_invalid_certs: self.accept_invalid_certs,
            ..SdkOptions::default()
        }
    }

    /// Build a client from these settings.
    pub fn to_client(&self) -> crate::error::Result<PlatformClient> {
        PlatformClient::with_credentials(self.credentials()?, self.endpoints(), self.options())
    }
}

/// Config file store
///
/// Manages config persistence in ~/.mendix/config.json (or a custom directory).
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    /// Create a new config store
    ///
    /// # Arguments
    /// * `config_dir` - Optional custom config directory. Defaults to ~/.mendix
    pub fn new(config_dir: Option<String>) -> Result<Self> {
        let base_dir = match config_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".mendix"),
        };

        std::fs::create_dir_all(&base_dir)
            .with_context(|| format!("Failed to create config directory: {:?}", base_dir))?;

        Ok(Self {
            config_path: base_dir.join(CONFIG_FILE_NAME),
        })
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Read the stored file only, without environment overrides.
    pub fn read_file(&self) -> Result<StoredConfig> {
        if !self.config_path.exists() {
            return Ok(StoredConfig::default());
        }

        let content = std::fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read config file: {:?}", self.config_path))?;

        match serde_json::from_str::<StoredConfig>(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!("Ignoring invalid config file {:?}: {}", self.config_path, e);
                Ok(StoredConfig::default())
            }
        }
    }

    /// Effective configuration: file values overridden by the environment.
    pub fn load(&self) -> Result<StoredConfig> {
        let config = self.read_file()?;
        Ok(config.apply_env(|name| std::env::var(name).ok()))
    }

    pub fn save(&self, config: &StoredConfig) -> Result<()> {
        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize config")?;

        std::fs::write(&self.config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", self.config_path))?;

        info!("Configuration saved");
        debug!("Configuration saved to {:?}", self.config_path);
        Ok(())
    }

    pub fn remove(&self) -> Result<()> {
        if self.config_path.exists() {
            std::fs::remove_file(&self.config_path).with_context(|| {
                format!("Failed to remove config file: {:?}", self.config_path)
            })?;
        }
        info!("Configuration removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> ConfigStore {
        ConfigStore::new(Some(dir.path().to_string_lossy().to_string())).unwrap()
    }

    #[test]
    fn test_missing_file_loads_default() {
        let tmp = tempdir().unwrap();
        let store = store_in(&tmp);
        assert_eq!(store.read_file().unwrap(), StoredConfig::default());
    }

    #[test]
    fn test_save_and_read() {
        let tmp = tempdir().unwrap();
        let store = store_in(&tmp);
        let config = StoredConfig {
            username: Some("someone@example.com".to_string()),
            api_key: Some("key".to_string()),
            ..StoredConfig::default()
        };

        store.save(&config).unwrap();
        let loaded = store.read_file().unwrap();
        assert_eq!(loaded, config);
        assert!(loaded.has_credentials());
    }

    #[test]
    fn test_remove() {
        let tmp = tempdir().unwrap();
        let store = store_in(&tmp);
        store.save(&StoredConfig::default()).unwrap();
        assert!(store.config_path().exists());

        store.remove().unwrap();
        assert!(!store.config_path().exists());
    }

    #[test]
    fn test_invalid_file_is_ignored() {
        let tmp = tempdir().unwrap();
        let store = store_in(&tmp);
        std::fs::write(store.config_path(), "{not json").unwrap();
        assert_eq!(store.read_file().unwrap(), StoredConfig::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> = [
            (ENV_API_KEY, "env-key"),
            (ENV_MODEL_API, "https://model.example"),
            (ENV_TLS_REJECT_UNAUTHORIZED, "0"),
            (ENV_PASSWORD, ""),
        ]
        .into_iter()
        .collect();

        let config = StoredConfig {
            username: Some("someone".to_string()),
            api_key: Some("file-key".to_string()),
            password: Some("file-pw".to_string()),
            ..StoredConfig::default()
        }
        .apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.password.as_deref(), Some("file-pw"));
        assert!(config.accept_invalid_certs);

        let endpoints = config.endpoints();
        assert_eq!(endpoints.model, "https://model.example");
        assert_eq!(endpoints.projects, DEFAULT_PROJECTS_API_ENDPOINT);
    }

    #[test]
    fn test_tls_validation_is_strict_by_default() {
        let config = StoredConfig::default().apply_env(|_| None);
        assert!(!config.accept_invalid_certs);
        assert!(!SdkOptions::default().accept_invalid_certs);
    }
}
