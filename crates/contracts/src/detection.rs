//! DetectionEvent - beacon scanner output

use serde::{Deserialize, Serialize};

use crate::DeviceId;

/// One reported beacon advertisement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionEvent {
    /// Hardware address of the advertiser
    pub device_id: DeviceId,

    /// Received signal strength (dBm)
    pub rssi: i32,

    /// Arrival time, epoch milliseconds
    pub timestamp_ms: i64,
}

impl DetectionEvent {
    pub fn new(device_id: impl Into<DeviceId>, rssi: i32, timestamp_ms: i64) -> Self {
        Self {
            device_id: device_id.into(),
            rssi,
            timestamp_ms,
        }
    }
}
