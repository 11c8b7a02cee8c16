//! Core error types for focusjuju-core.
//!
//! Every fallible operation in the library returns one of these enums.
//! None of them is fatal to a running session: the session host turns
//! collaborator failures into warning events instead of propagating them.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusjuju-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Companion message source errors
    #[error("Message source error: {0}")]
    Message(#[from] MessageError),

    /// Session host errors
    #[error("Session host error: {0}")]
    Host(#[from] HostError),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// The data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[source] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A duration that must be positive was zero
    #[error("'{field}' must be greater than zero")]
    ZeroDuration { field: &'static str },

    /// Encouragement cadence longer than the session itself
    #[error("encouragement interval ({interval_secs}s) exceeds session duration ({duration_secs}s)")]
    IntervalExceedsDuration {
        interval_secs: u64,
        duration_secs: u64,
    },

    /// Score outside the 1..=5 scale
    #[error("'{field}' must be between 1 and 5, got {value}")]
    OutOfScale { field: &'static str, value: u8 },

    /// Unrecognised enum name
    #[error("Unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors raised by a companion message source.
#[derive(Error, Debug)]
pub enum MessageError {
    /// Transport failure talking to the hosted model
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the hosted model
    #[error("language model returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The API key environment variable is not set
    #[error("API key not configured (set {env_var})")]
    MissingApiKey { env_var: String },

    /// Response body did not have the expected shape
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Errors returned by a [`crate::SessionHandle`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The host task has shut down (teardown or panic)
    #[error("session host is no longer running")]
    Closed,
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) if e.code == rusqlite::ErrorCode::DatabaseLocked => {
                DatabaseError::Locked
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
