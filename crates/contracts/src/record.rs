//! CorrelatedRecord - Correlator output
//!
//! A detection joined with the heading that was current when it arrived.

use serde::{Deserialize, Serialize};

use crate::{CompassSector, DeviceId};

/// Record body before the session assigns its sequence number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDraft {
    /// Detection arrival time, epoch milliseconds
    pub timestamp_ms: i64,

    /// Arrival time formatted as `HH:mm:ss`
    pub time_of_day: String,

    pub device_id: DeviceId,

    pub rssi: i32,

    /// Truncated heading snapshot; `None` if the heading was unavailable
    pub azimuth: Option<u16>,

    /// Sector of `azimuth`
    pub direction: Option<CompassSector>,
}

impl RecordDraft {
    /// Seal the draft with its session sequence number
    pub fn into_record(self, seq: u64) -> CorrelatedRecord {
        CorrelatedRecord {
            seq,
            timestamp_ms: self.timestamp_ms,
            time_of_day: self.time_of_day,
            device_id: self.device_id,
            rssi: self.rssi,
            azimuth: self.azimuth,
            direction: self.direction,
        }
    }
}

/// Immutable, session-ordered correlated record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelatedRecord {
    /// 1-based, contiguous within a session
    pub seq: u64,

    pub timestamp_ms: i64,

    pub time_of_day: String,

    pub device_id: DeviceId,

    pub rssi: i32,

    pub azimuth: Option<u16>,

    pub direction: Option<CompassSector>,
}
