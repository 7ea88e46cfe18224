//! Configuration loader
//!
//! Loads the application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. `ECHO_CONFIG_PATH`, when set, names the only file that is read
//! 2. Otherwise environment variables are tried first
//! 3. If they are incomplete, config files are probed
//! 4. JSON and TOML are both supported
//!
//! Every loaded configuration is validated before it is returned.
//!
//! ## Environment Variables
//! - `ECHO_STORE_PROJECT_ID`: Document store project (required)
//! - `ECHO_STORE_API_KEY`: Document store key (required)
//! - `ECHO_STORE_AUTH_DOMAIN`: Identity provider domain
//! - `ECHO_APP_ID`: Application id used to scope collections
//! - `ECHO_GENERATION_API_KEY`: Generative service key (required)
//! - `ECHO_GENERATION_ENDPOINT`: Generative service URL
//! - `ECHO_GENERATION_MAX_RETRIES`: Retries after a rate-limited attempt
//! - `ECHO_GENERATION_INITIAL_DELAY_MS`: First backoff delay
//! - `ECHO_GENERATION_BACKOFF_MULTIPLIER`: Backoff growth factor
//! - `ECHO_GENERATION_TIMEOUT_SECS`: Per-request timeout
//! - `ECHO_BOOTSTRAP_TOKEN`: Pre-issued sign-in token
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./echo.{json,toml}` or `./config.{json,toml}` (current working directory)
//! 2. `../config.{json,toml}` and `../../config.{json,toml}`
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use echo_domain::{
    AppConfig, AuthConfig, BootstrapCredential, GenerationConfig, JournalError, Result,
    StoreConfig,
};

pub const CONFIG_PATH_VAR: &str = "ECHO_CONFIG_PATH";

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `JournalError::Configuration` if no complete configuration can
/// be found or the one found is invalid.
pub fn load() -> Result<AppConfig> {
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        return load_from_file(Some(PathBuf::from(path)));
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from the process environment
///
/// # Errors
/// Returns `JournalError::Configuration` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<AppConfig> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Load configuration from an arbitrary variable source
///
/// `lookup` returns the value of a variable, or `None` if it is unset.
pub fn load_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<AppConfig> {
    let required = |key: &str| {
        lookup(key).filter(|v| !v.trim().is_empty()).ok_or_else(|| {
            JournalError::Configuration(format!("Missing required environment variable: {key}"))
        })
    };

    let mut store =
        StoreConfig::new(required("ECHO_STORE_PROJECT_ID")?, required("ECHO_STORE_API_KEY")?);
    store.auth_domain = lookup("ECHO_STORE_AUTH_DOMAIN");
    if let Some(app_id) = lookup("ECHO_APP_ID") {
        store.app_id = app_id;
    }

    let mut generation = GenerationConfig::new(required("ECHO_GENERATION_API_KEY")?);
    if let Some(endpoint) = lookup("ECHO_GENERATION_ENDPOINT") {
        generation.endpoint = endpoint;
    }
    if let Some(value) = parsed(&lookup, "ECHO_GENERATION_MAX_RETRIES")? {
        generation.max_retries = value;
    }
    if let Some(value) = parsed(&lookup, "ECHO_GENERATION_INITIAL_DELAY_MS")? {
        generation.initial_delay_ms = value;
    }
    if let Some(value) = parsed(&lookup, "ECHO_GENERATION_BACKOFF_MULTIPLIER")? {
        generation.backoff_multiplier = value;
    }
    if let Some(value) = parsed(&lookup, "ECHO_GENERATION_TIMEOUT_SECS")? {
        generation.request_timeout_secs = value;
    }

    let auth = AuthConfig {
        bootstrap_credential: lookup("ECHO_BOOTSTRAP_TOKEN")
            .filter(|token| !token.is_empty())
            .map(BootstrapCredential::new),
    };

    let config = AppConfig { store, generation, auth };
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `JournalError::Configuration` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid or required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(JournalError::Configuration(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            JournalError::Configuration(
                "store not configured: no config file found in any of the standard locations"
                    .to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| JournalError::Configuration(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| JournalError::Configuration(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| JournalError::Configuration(format!("Invalid JSON format: {e}"))),
        _ => Err(JournalError::Configuration(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        roots.push(exe_dir);
    }
    roots.iter().flat_map(|root| candidates(root)).find(|path| path.exists())
}

fn candidates(root: &Path) -> Vec<PathBuf> {
    vec![
        root.join("echo.json"),
        root.join("echo.toml"),
        root.join("config.json"),
        root.join("config.toml"),
        root.join("../config.json"),
        root.join("../config.toml"),
        root.join("../../config.json"),
        root.join("../../config.toml"),
    ]
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| JournalError::Configuration(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}
