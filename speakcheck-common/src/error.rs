//! Error types shared by the SpeakCheck crates

use thiserror::Error;

/// Common result type for SpeakCheck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised below the HTTP layer (storage, configuration, startup)
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML configuration file
    #[error("Config file parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Missing or invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stored data could not be decoded
    #[error("Internal error: {0}")]
    Internal(String),
}
