//! LogTransport - writes payloads to the log instead of the network

use contracts::{ContractError, ReportPayload, ReportTransport};
use tracing::{info, instrument};

/// Dry-run transport, used when no collector is configured
pub struct LogTransport {
    name: String,
}

impl LogTransport {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ReportTransport for LogTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "log_transport_deliver", skip(self, payload), fields(transport = %self.name))]
    async fn deliver(&self, payload: &ReportPayload) -> Result<(), ContractError> {
        info!(
            mac_address = %payload.mac_address,
            rssi = payload.rssi,
            device_id = %payload.device_id,
            azimuth = ?payload.azimuth,
            "Report payload"
        );
        Ok(())
    }
}
