//! Configuration resolution
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or unreadable TOML file never stops startup; it is reported and
//! the remaining tiers are used.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable holding the database connection string
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Environment variable holding the speech-assessment API key
pub const API_KEY_ENV: &str = "LC_API_KEY";

/// Environment variable overriding the speech-assessment endpoint
pub const API_URL_ENV: &str = "LC_API_URL";

/// Unscripted speech-assessment endpoint (US English)
pub const DEFAULT_API_URL: &str =
    "https://apis.languageconfidence.ai/speech-assessment/unscripted/us";

/// Upper bound on one outbound assessment call
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Idle time after which a login session is dropped (8 hours)
pub const DEFAULT_SESSION_TTL_SECS: u64 = 8 * 60 * 60;

/// Contents of `config.toml`
///
/// All keys are optional; absent keys fall through to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub database_url: Option<String>,
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub session_ttl_secs: Option<u64>,
}

impl TomlConfig {
    /// Read and parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load the config file if present, falling back to an empty config
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(config) => {
                info!("Loaded config file {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Request timeout in seconds, defaulting when unset or zero
    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    /// Session idle timeout in seconds, defaulting when unset or zero
    pub fn session_ttl_secs(&self) -> u64 {
        self.session_ttl_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_SESSION_TTL_SECS)
    }
}

/// Default config file location (`~/.config/speakcheck/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("speakcheck").join("config.toml"))
}

/// OS-dependent default data folder
fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("speakcheck"))
        .unwrap_or_else(|| PathBuf::from("./speakcheck_data"))
}

/// Compiled default database URL (file in the data folder, created on demand)
pub fn default_database_url() -> String {
    let db_path = default_data_folder().join("speakcheck.db");
    format!("sqlite://{}?mode=rwc", db_path.display())
}

/// Non-empty, non-whitespace
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| is_valid_value(v))
}

/// Resolve the database URL
///
/// Only SQLite URLs are accepted.
pub fn resolve_database_url(cli_arg: Option<&str>, toml_config: &TomlConfig) -> Result<String> {
    let url = if let Some(url) = cli_arg.filter(|v| is_valid_value(v)) {
        info!("Database URL from command line");
        url.trim().to_string()
    } else if let Some(url) = env_value(DATABASE_URL_ENV) {
        info!("Database URL from {}", DATABASE_URL_ENV);
        url.trim().to_string()
    } else if let Some(url) = toml_config.database_url.as_deref().filter(|v| is_valid_value(v)) {
        info!("Database URL from config file");
        url.trim().to_string()
    } else {
        default_database_url()
    };

    if url.starts_with("sqlite:") {
        Ok(url)
    } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Err(Error::Config(
            "PostgreSQL is not supported; use a sqlite:// URL".to_string(),
        ))
    } else {
        Err(Error::Config(format!("Unsupported database URL: {}", url)))
    }
}

/// Resolve the speech-assessment API key
pub fn resolve_api_key(cli_arg: Option<&str>, toml_config: &TomlConfig) -> Result<String> {
    if let Some(key) = cli_arg.filter(|v| is_valid_value(v)) {
        info!("API key from command line");
        return Ok(key.trim().to_string());
    }

    if let Some(key) = env_value(API_KEY_ENV) {
        info!("API key from {}", API_KEY_ENV);
        return Ok(key.trim().to_string());
    }

    if let Some(key) = toml_config.api_key.as_deref().filter(|v| is_valid_value(v)) {
        info!("API key from config file");
        return Ok(key.trim().to_string());
    }

    Err(Error::Config(format!(
        "Speech-assessment API key not configured. Provide one of:\n\
         1. Command line: --api-key <key>\n\
         2. Environment: {}=<key> (a .env file is read at startup)\n\
         3. Config file: api_key = \"<key>\"",
        API_KEY_ENV
    )))
}

/// Resolve the speech-assessment endpoint (environment → TOML → default)
pub fn resolve_api_url(toml_config: &TomlConfig) -> String {
    env_value(API_URL_ENV)
        .or_else(|| toml_config.api_url.clone().filter(|v| is_valid_value(v)))
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}
