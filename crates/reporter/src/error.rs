//! Reporter error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReporterError {
    /// HTTP client could not be built
    #[error("failed to build HTTP client for '{endpoint}': {message}")]
    ClientBuild { endpoint: String, message: String },

    /// Reporting enabled without an endpoint
    #[error("reporter enabled but no endpoint configured")]
    MissingEndpoint,

    #[error("reporter error: {0}")]
    Contract(#[from] contracts::ContractError),
}
