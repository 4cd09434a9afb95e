//! # Reporter
//!
//! Asynchronous delivery of correlated records to a remote collector.
//!
//! ## Architecture
//!
//! ```text
//! submit() ──try_send──▶ [bounded queue] ──▶ worker 1..N ──▶ ReportTransport
//!                              │                  │
//!                         (full: drop)       (error: log)
//!                              └────▶ dead letters ◀┘
//! ```
//!
//! Delivery is at-most-once: nothing is retried, failures are counted and
//! dead-lettered.

mod error;
mod handle;
mod metrics;
pub mod transports;

use std::time::Duration;

use contracts::ReporterConfig;
use tracing::info;

pub use error::ReporterError;
pub use handle::{DeadLetter, ReporterHandle, ReporterOptions};
pub use metrics::{ReporterMetrics, ReporterSnapshot};
pub use transports::{HttpTransport, LogTransport};

/// Start an HTTP reporter if reporting is enabled
///
/// Must be called inside a tokio runtime.
pub fn spawn_from_config(config: &ReporterConfig) -> Result<Option<ReporterHandle>, ReporterError> {
    if !config.enabled {
        info!("Remote reporting disabled");
        return Ok(None);
    }

    let endpoint = config
        .endpoint
        .as_deref()
        .ok_or(ReporterError::MissingEndpoint)?;
    let transport = HttpTransport::new(endpoint, Duration::from_millis(config.timeout_ms))?;

    info!(
        endpoint = %endpoint,
        workers = config.workers,
        queue_capacity = config.queue_capacity,
        "Remote reporting enabled"
    );
    Ok(Some(ReporterHandle::spawn(
        transport,
        ReporterOptions::from(config),
    )))
}
