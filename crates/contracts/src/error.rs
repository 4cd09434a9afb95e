//! Layered error definitions
//!
//! Categorized by source: config / sensor / scan / report / export

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Sensor Errors =====
    /// Motion sensor missing on this device
    #[error("motion sensor unavailable: {kind}")]
    SensorUnavailable { kind: String },

    // ===== Scan Errors =====
    /// Operation not allowed in the current scan state
    #[error("invalid scan state: {message}")]
    ScanState { message: String },

    /// Append attempted on a frozen session
    #[error("session is frozen, record for '{device_id}' rejected")]
    SessionFrozen { device_id: String },

    // ===== Report Errors =====
    /// Transport failure (connect, timeout, body)
    #[error("report to '{endpoint}' failed: {message}")]
    ReportTransport { endpoint: String, message: String },

    /// Collector answered with a non-success status
    #[error("report to '{endpoint}' rejected with status {status}")]
    ReportStatus { endpoint: String, status: u16 },

    // ===== Export Errors =====
    /// Session export failure
    #[error("export of session '{session}' failed: {message}")]
    Export { session: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create scan state error
    pub fn scan_state(message: impl Into<String>) -> Self {
        Self::ScanState {
            message: message.into(),
        }
    }

    /// Create report transport error
    pub fn report_transport(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReportTransport {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create export error
    pub fn export(session: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Export {
            session: session.into(),
            message: message.into(),
        }
    }
}
