//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the credentials are missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `EMPLOI_STORE_CLIENT_ID`: OAuth2 client id (required)
//! - `EMPLOI_STORE_CLIENT_SECRET`: OAuth2 client secret (required)
//! - `EMPLOI_STORE_API_URL`: Base URL of the partner APIs
//! - `EMPLOI_STORE_TOKEN_URL`: OAuth2 token endpoint
//! - `EMPLOI_STORE_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `EMPLOI_STORE_BATCH_SIZE`: Records per datastore request
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./emploi_store.json` or `./emploi_store.toml` (current working directory)
//! 2. `../emploi_store.json` or `../emploi_store.toml` (parent directory)
//! 3. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use emploistore_domain::constants::{
    ENV_API_URL, ENV_BATCH_SIZE, ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_TIMEOUT_SECS,
    ENV_TOKEN_URL,
};
use emploistore_domain::{ClientConfig, EmploiStoreError, Result};

use crate::errors::InfraError;

const CONFIG_FILE_STEM: &str = "emploi_store";

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the credentials
/// are not set there, falls back to loading from a config file.
///
/// # Errors
/// Returns `EmploiStoreError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<ClientConfig> {
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
/// See [`load_from_lookup`].
pub fn load_from_env() -> Result<ClientConfig> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Load configuration from any variable source
///
/// Credentials are required; the other variables override the production
/// defaults when set to a non-empty value.
///
/// # Errors
/// Returns `EmploiStoreError::Config` if a credential is missing or a numeric
/// variable cannot be parsed.
pub fn load_from_lookup<F>(lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let (client_id, client_secret) = resolve_credentials(None, None, &lookup)?;
    let mut config = ClientConfig::new(client_id, client_secret);

    if let Some(api_url) = non_empty(&lookup, ENV_API_URL) {
        config.api_url = api_url;
    }
    if let Some(token_url) = non_empty(&lookup, ENV_TOKEN_URL) {
        config.token_url = token_url;
    }
    if let Some(timeout) = parse_var::<u64, _>(&lookup, ENV_TIMEOUT_SECS)? {
        config.request_timeout_secs = timeout;
    }
    if let Some(batch_size) = parse_var::<usize, _>(&lookup, ENV_BATCH_SIZE)? {
        config.batch_size = batch_size;
    }

    validate(&config)?;
    Ok(config)
}

/// Pick explicit credentials, falling back to the environment
///
/// Empty values count as missing.
///
/// # Errors
/// Returns `EmploiStoreError::Config` naming the first missing credential.
pub fn resolve_credentials<F>(
    client_id: Option<&str>,
    client_secret: Option<&str>,
    lookup: F,
) -> Result<(String, String)>
where
    F: Fn(&str) -> Option<String>,
{
    let resolve = |explicit: Option<&str>, key: &str| {
        explicit
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .or_else(|| non_empty(&lookup, key))
    };

    let client_id = resolve(client_id, ENV_CLIENT_ID).ok_or_else(|| {
        EmploiStoreError::Config(format!("Client needs a client ID (set {ENV_CLIENT_ID})"))
    })?;
    let client_secret = resolve(client_secret, ENV_CLIENT_SECRET).ok_or_else(|| {
        EmploiStoreError::Config(format!("Client needs a client secret (set {ENV_CLIENT_SECRET})"))
    })?;

    Ok((client_id, client_secret))
}

/// Check the invariants every client relies on
///
/// # Errors
/// Returns `EmploiStoreError::Config` for empty credentials or URLs and for a
/// zero batch size.
pub fn validate(config: &ClientConfig) -> Result<()> {
    let required = [
        ("client_id", &config.client_id),
        ("client_secret", &config.client_secret),
        ("api_url", &config.api_url),
        ("token_url", &config.token_url),
    ];
    if let Some((name, _)) = required.iter().find(|(_, value)| value.is_empty()) {
        return Err(EmploiStoreError::Config(format!("{name} must not be empty")));
    }
    if config.batch_size == 0 {
        return Err(EmploiStoreError::Config("batch_size must be at least 1".to_string()));
    }
    Ok(())
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `EmploiStoreError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(EmploiStoreError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            EmploiStoreError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| EmploiStoreError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| InfraError::from(e).into()),
        "json" => serde_json::from_str(contents)
            .map_err(|e| EmploiStoreError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(EmploiStoreError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
        candidates.extend(candidates_in(&cwd.join("..")));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> [PathBuf; 2] {
    [dir.join(format!("{CONFIG_FILE_STEM}.json")), dir.join(format!("{CONFIG_FILE_STEM}.toml"))]
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| EmploiStoreError::Config(format!("Invalid {key}: {e}")))
        })
        .transpose()
}
