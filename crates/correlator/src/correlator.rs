//! ScanEventCorrelator - joins detections with the current heading

use std::sync::Arc;

use contracts::{
    ClockZone, CorrelatedRecord, DetectionEvent, HeadingSource, RecordDraft, RecordSubmitter,
};
use tracing::{debug, trace};

use crate::allowlist::AllowlistFilter;
use crate::classifier::classify;
use crate::clock::time_of_day;
use crate::session::SessionLog;

/// Turns accepted detections into session records
///
/// Safe to call from any number of detection callbacks at once.
pub struct ScanEventCorrelator {
    allowlist: AllowlistFilter,
    heading: Arc<dyn HeadingSource>,
    session: Arc<SessionLog>,
    submitter: Option<Arc<dyn RecordSubmitter>>,
    clock: ClockZone,
}

impl ScanEventCorrelator {
    pub fn new(
        allowlist: AllowlistFilter,
        heading: Arc<dyn HeadingSource>,
        session: Arc<SessionLog>,
    ) -> Self {
        Self {
            allowlist,
            heading,
            session,
            submitter: None,
            clock: ClockZone::default(),
        }
    }

    /// Forward every stored record to `submitter`
    pub fn with_submitter(mut self, submitter: Arc<dyn RecordSubmitter>) -> Self {
        self.submitter = Some(submitter);
        self
    }

    pub fn with_clock(mut self, clock: ClockZone) -> Self {
        self.clock = clock;
        self
    }

    pub fn session(&self) -> &Arc<SessionLog> {
        &self.session
    }

    /// Handle one detection
    ///
    /// Returns the stored record, or `None` if the device is not allowlisted
    /// or the session is frozen.
    pub fn on_detection(&self, event: DetectionEvent) -> Option<CorrelatedRecord> {
        if !self.allowlist.accepts(&event.device_id) {
            trace!(device_id = %event.device_id, "Detection not allowlisted");
            observability::record_detection_filtered();
            return None;
        }

        // Snapshot at arrival, before any other work
        let reading = self.heading.current_heading();
        let azimuth = reading.truncated();
        let direction = azimuth.map(classify);

        let draft = RecordDraft {
            timestamp_ms: event.timestamp_ms,
            time_of_day: time_of_day(event.timestamp_ms, self.clock),
            device_id: event.device_id,
            rssi: event.rssi,
            azimuth,
            direction,
        };

        let record = self.session.append(draft).ok()?;
        debug!(
            seq = record.seq,
            device_id = %record.device_id,
            rssi = record.rssi,
            azimuth = ?record.azimuth,
            direction = ?record.direction,
            "Detection correlated"
        );
        observability::record_detection_accepted(&record.device_id, record.direction);

        if let Some(submitter) = &self.submitter {
            submitter.submit(&record);
        }
        Some(record)
    }
}
