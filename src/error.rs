//! Error types for netcheck.
//!
//! Uses `thiserror` for ergonomic error definitions. Port and address errors
//! live next to their types in [`crate::types`].

use crate::types::{AddressError, PortError};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid configuration format: {0}")]
    InvalidFormat(String),

    #[error("unsupported configuration file extension: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("invalid durations: expected {lower:?} {operator} {upper:?}")]
    InvalidDurations {
        lower: Duration,
        upper: Duration,
        operator: &'static str,
    },

    #[error("{field} {value} must be positive")]
    NotPositive { field: &'static str, value: i64 },

    #[error("invalid backoff policy {0}")]
    InvalidPolicy(String),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised by the retrying HTTP client.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{method} {url} giving up after {attempts} attempt(s): {last_error}")]
    RetriesExhausted {
        method: String,
        url: String,
        attempts: u32,
        last_error: String,
    },
}

/// Errors surfaced by the command-line interface.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Port(#[from] PortError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
