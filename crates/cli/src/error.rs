//! Error types for CLI operations.

use contracts::ContractError;
use reporter::ReporterError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Scanner, configuration or export failure
    #[error(transparent)]
    Scan(#[from] ContractError),

    /// Reporter could not be started
    #[error("Failed to start reporter: {0}")]
    Reporter(#[from] ReporterError),

    /// Background task failure
    #[error("Scan task failed: {message}")]
    Task { message: String },

    /// Generic error wrapper
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn task(message: impl Into<String>) -> Self {
        Self::Task {
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
