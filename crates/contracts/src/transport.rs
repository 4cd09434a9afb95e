//! ReportTransport trait - RemoteReporter output interface
//!
//! Defines how one payload leaves the process.

use crate::{ContractError, ReportPayload};

/// Delivery of a single report payload
///
/// Implementations are shared by every reporter worker, so `deliver` takes
/// `&self`.
#[trait_variant::make(ReportTransport: Send)]
pub trait LocalReportTransport {
    /// Transport name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Deliver one payload
    ///
    /// # Errors
    /// Transport failure or non-success response; never retried by callers.
    async fn deliver(&self, payload: &ReportPayload) -> Result<(), ContractError>;
}
