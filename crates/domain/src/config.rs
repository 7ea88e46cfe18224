//! Configuration management
//!
//! One immutable [`AppConfig`] is built at startup and handed to every
//! component. Nothing below this crate reads the environment.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_APP_ID, DEFAULT_BACKOFF_MULTIPLIER, DEFAULT_GENERATION_ENDPOINT,
    DEFAULT_INITIAL_DELAY_MS, DEFAULT_MAX_RETRIES, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::errors::{JournalError, Result};
use crate::types::identity::{BootstrapCredential, UserId};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub generation: GenerationConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Check every section; the first problem found is reported.
    pub fn validate(&self) -> Result<()> {
        self.store.validate()?;
        self.generation.validate()?;
        Ok(())
    }
}

/// Remote document store parameters
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub project_id: String,
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_domain: Option<String>,
    #[serde(default = "default_app_id")]
    pub app_id: String,
}

fn default_app_id() -> String {
    DEFAULT_APP_ID.to_string()
}

impl StoreConfig {
    pub fn new(project_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            api_key: api_key.into(),
            auth_domain: None,
            app_id: default_app_id(),
        }
    }

    /// Per-user collection the entries live in.
    pub fn collection_path(&self, user_id: &UserId) -> String {
        format!("artifacts/{}/users/{}/entries", self.app_id, user_id)
    }

    pub fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(JournalError::Configuration("store not configured: missing project_id".into()));
        }
        if self.api_key.trim().is_empty() {
            return Err(JournalError::Configuration("store not configured: missing api_key".into()));
        }
        if self.app_id.trim().is_empty() || self.app_id.contains('/') {
            return Err(JournalError::Configuration(format!("invalid app_id: {:?}", self.app_id)));
        }
        Ok(())
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("project_id", &self.project_id)
            .field("api_key", &"<redacted>")
            .field("auth_domain", &self.auth_domain)
            .field("app_id", &self.app_id)
            .finish()
    }
}

/// Generative service endpoint and retry policy
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub api_key: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_GENERATION_ENDPOINT.to_string()
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_initial_delay_ms() -> u64 {
    DEFAULT_INITIAL_DELAY_MS
}

fn default_backoff_multiplier() -> u32 {
    DEFAULT_BACKOFF_MULTIPLIER
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl GenerationConfig {
    /// Default endpoint and retry policy with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: api_key.into(),
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.endpoint).map_err(|e| {
            JournalError::Configuration(format!("invalid generation endpoint: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(JournalError::Configuration(format!(
                "generation endpoint must be http(s), got {}",
                url.scheme()
            )));
        }
        if self.api_key.trim().is_empty() {
            return Err(JournalError::Configuration("generation api_key is empty".into()));
        }
        if self.initial_delay_ms == 0 {
            return Err(JournalError::Configuration("initial_delay_ms must be positive".into()));
        }
        if self.backoff_multiplier < 1 {
            return Err(JournalError::Configuration("backoff_multiplier must be >= 1".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(JournalError::Configuration(
                "request_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("max_retries", &self.max_retries)
            .field("initial_delay_ms", &self.initial_delay_ms)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Automatic sign-in settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootstrap_credential: Option<BootstrapCredential>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            store: StoreConfig::new("echo-project", "store-key"),
            generation: GenerationConfig::new("gen-key"),
            auth: AuthConfig::default(),
        }
    }

    #[test]
    fn defaults_match_documented_policy() {
        let generation = GenerationConfig::new("k");
        assert_eq!(generation.max_retries, 5);
        assert_eq!(generation.initial_delay(), Duration::from_millis(1000));
        assert_eq!(generation.backoff_multiplier, 2);
        assert_eq!(generation.request_timeout(), Duration::from_secs(30));
        assert!(config().validate().is_ok());
    }

    #[test]
    fn collection_path_is_scoped_by_app_and_user() {
        let store = StoreConfig::new("p", "k");
        assert_eq!(
            store.collection_path(&UserId::new("u-42")),
            "artifacts/default-app-id/users/u-42/entries"
        );
    }

    #[test]
    fn missing_store_is_configuration_error() {
        let mut cfg = config();
        cfg.store.project_id = "  ".into();
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, JournalError::Configuration(ref m) if m.contains("store not configured")));
    }

    #[test]
    fn rejects_bad_endpoint() {
        let mut cfg = config();
        cfg.generation.endpoint = "not a url".into();
        assert!(matches!(cfg.validate(), Err(JournalError::Configuration(_))));

        cfg.generation.endpoint = "ftp://example.com/x".into();
        assert!(matches!(cfg.validate(), Err(JournalError::Configuration(_))));
    }

    #[test]
    fn debug_output_hides_keys() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("store-key"));
        assert!(!rendered.contains("gen-key"));
    }

    #[test]
    fn toml_fills_defaults() {
        let raw = r#"
            [store]
            project_id = "p"
            api_key = "k"

            [generation]
            api_key = "g"
        "#;
        let cfg: AppConfig = toml::from_str(raw).expect("parse");
        assert_eq!(cfg.store.app_id, "default-app-id");
        assert_eq!(cfg.generation.endpoint, DEFAULT_GENERATION_ENDPOINT);
        assert_eq!(cfg.generation.max_retries, 5);
        assert!(cfg.auth.bootstrap_credential.is_none());
    }
}
