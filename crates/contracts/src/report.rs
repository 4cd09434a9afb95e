//! ReportPayload - wire shape sent to the remote collector

use serde::{Deserialize, Serialize};

use crate::{CorrelatedRecord, DeviceId};

/// JSON body POSTed per record.
///
/// `azimuth` serializes as `null` when the heading was unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub mac_address: DeviceId,
    pub rssi: i32,
    /// Identifier of the scanning device itself
    pub device_id: String,
    pub azimuth: Option<i32>,
}

impl ReportPayload {
    pub fn from_record(record: &CorrelatedRecord, local_device_id: &str) -> Self {
        Self {
            mac_address: record.device_id.clone(),
            rssi: record.rssi,
            device_id: local_device_id.to_string(),
            azimuth: record.azimuth.map(i32::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompassSector;

    fn record(azimuth: Option<u16>) -> CorrelatedRecord {
        CorrelatedRecord {
            seq: 1,
            timestamp_ms: 0,
            time_of_day: "00:00:00".to_string(),
            device_id: "60:98:66:32:98:58".into(),
            rssi: -61,
            azimuth,
            direction: azimuth.map(|_| CompassSector::E),
        }
    }

    #[test]
    fn test_payload_field_names() {
        let payload = ReportPayload::from_record(&record(Some(97)), "phone-01");
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["macAddress"], "60:98:66:32:98:58");
        assert_eq!(json["rssi"], -61);
        assert_eq!(json["deviceId"], "phone-01");
        assert_eq!(json["azimuth"], 97);
        assert_eq!(json.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_unavailable_heading_is_null() {
        let payload = ReportPayload::from_record(&record(None), "phone-01");
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["azimuth"].is_null());
    }
}
