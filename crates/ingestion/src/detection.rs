//! Mock beacon scanners
//!
//! - [`MockDetectionSource`]: random detections from a device list
//! - [`ManualDetectionSource`]: detections pushed by the caller

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use contracts::{DetectionCallback, DetectionEvent, DetectionSource, DeviceId};
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::listener::ListenState;
use crate::metrics::{SourceMetrics, SourceSnapshot};

/// Mock scanner configuration
#[derive(Debug, Clone)]
pub struct MockDetectionConfig {
    /// Devices in range; each detection picks one uniformly
    pub devices: Vec<String>,
    /// Detections per second
    pub rate_hz: f64,
    /// Inclusive RSSI range (dBm)
    pub rssi_min: i32,
    pub rssi_max: i32,
}

impl Default for MockDetectionConfig {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            rate_hz: 4.0,
            rssi_min: -95,
            rssi_max: -45,
        }
    }
}

/// Scanner that reports random devices at a fixed rate
pub struct MockDetectionSource {
    name: String,
    config: MockDetectionConfig,
    state: ListenState,
    metrics: Arc<SourceMetrics>,
}

impl MockDetectionSource {
    pub fn new(name: impl Into<String>, config: MockDetectionConfig) -> Self {
        Self {
            name: name.into(),
            config,
            state: ListenState::default(),
            metrics: Arc::new(SourceMetrics::new()),
        }
    }

    pub fn metrics(&self) -> SourceSnapshot {
        self.metrics.snapshot()
    }
}

impl DetectionSource for MockDetectionSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn listen(&self, callback: DetectionCallback) {
        let Some(subscription) = self.state.begin() else {
            return;
        };
        self.metrics.record_subscription();

        let name = self.name.clone();
        let devices: Vec<DeviceId> = self.config.devices.iter().map(|d| d.as_str().into()).collect();
        let (lo, hi) = (
            self.config.rssi_min.min(self.config.rssi_max),
            self.config.rssi_min.max(self.config.rssi_max),
        );
        let interval = Duration::from_secs_f64(1.0 / self.config.rate_hz.max(0.1));
        let metrics = Arc::clone(&self.metrics);

        thread::spawn(move || {
            let mut rng = rand::rng();
            debug!(source = %name, devices = devices.len(), "mock scanner started");

            while subscription.is_active() {
                if let Some(device) = devices.choose(&mut rng) {
                    let event = DetectionEvent {
                        device_id: device.clone(),
                        rssi: rng.random_range(lo..=hi),
                        timestamp_ms: Utc::now().timestamp_millis(),
                    };
                    trace!(source = %name, device_id = %event.device_id, rssi = event.rssi, "mock detection");
                    callback(event);
                    metrics.record_emitted();
                }
                thread::sleep(interval);
            }

            debug!(source = %name, "mock scanner stopped");
        });
    }

    fn stop(&self) {
        self.state.end();
    }

    fn is_listening(&self) -> bool {
        self.state.is_listening()
    }
}

/// Scanner driven by the caller; `emit` runs the callback on the calling thread
pub struct ManualDetectionSource {
    name: String,
    callback: Mutex<Option<DetectionCallback>>,
    state: ListenState,
    metrics: Arc<SourceMetrics>,
}

impl ManualDetectionSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            callback: Mutex::new(None),
            state: ListenState::default(),
            metrics: Arc::new(SourceMetrics::new()),
        }
    }

    /// Deliver `event` if listening; returns whether it was delivered
    pub fn emit(&self, event: DetectionEvent) -> bool {
        let callback = match self.callback.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        match callback {
            Some(callback) if self.state.is_listening() => {
                callback(event);
                self.metrics.record_emitted();
                true
            }
            _ => false,
        }
    }

    /// `emit` with the current wall-clock time
    pub fn emit_now(&self, device_id: &str, rssi: i32) -> bool {
        self.emit(DetectionEvent::new(device_id, rssi, Utc::now().timestamp_millis()))
    }

    pub fn metrics(&self) -> SourceSnapshot {
        self.metrics.snapshot()
    }
}

impl DetectionSource for ManualDetectionSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn listen(&self, callback: DetectionCallback) {
        if self.state.begin().is_none() {
            return;
        }
        self.metrics.record_subscription();
        if let Ok(mut slot) = self.callback.lock() {
            *slot = Some(callback);
        }
    }

    fn stop(&self) {
        self.state.end();
        if let Ok(mut slot) = self.callback.lock() {
            *slot = None;
        }
    }

    fn is_listening(&self) -> bool {
        self.state.is_listening()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_mock_scanner_uses_configured_devices() {
        let source = MockDetectionSource::new(
            "mock",
            MockDetectionConfig {
                devices: vec!["AA:AA".into(), "BB:BB".into()],
                rate_hz: 500.0,
                rssi_min: -70,
                rssi_max: -60,
            },
        );
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        source.listen(Arc::new(move |event| sink.lock().unwrap().push(event)));
        thread::sleep(Duration::from_millis(60));
        source.stop();

        let seen = seen.lock().unwrap();
        assert!(!seen.is_empty());
        let ids: HashSet<&str> = seen.iter().map(|e| e.device_id.as_str()).collect();
        assert!(ids.is_subset(&HashSet::from(["AA:AA", "BB:BB"])));
        assert!(seen.iter().all(|e| (-70..=-60).contains(&e.rssi)));
    }

    #[test]
    fn test_mock_scanner_without_devices_emits_nothing() {
        let source = MockDetectionSource::new("empty", MockDetectionConfig {
            rate_hz: 500.0,
            ..MockDetectionConfig::default()
        });
        source.listen(Arc::new(|_| panic!("no devices configured")));
        thread::sleep(Duration::from_millis(20));
        source.stop();
        assert_eq!(source.metrics().emitted, 0);
    }

    #[test]
    fn test_manual_source_only_delivers_while_listening() {
        let source = ManualDetectionSource::new("manual");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        assert!(!source.emit_now("AA:AA", -60));
        source.listen(Arc::new(move |event: DetectionEvent| {
            sink.lock().unwrap().push(event.rssi)
        }));
        assert!(source.emit(DetectionEvent::new("AA:AA", -61, 1)));
        source.stop();
        assert!(!source.emit(DetectionEvent::new("AA:AA", -62, 2)));

        assert_eq!(*seen.lock().unwrap(), vec![-61]);
        assert_eq!(source.metrics().emitted, 1);
    }

    #[test]
    fn test_manual_source_listen_is_idempotent() {
        let source = ManualDetectionSource::new("manual");
        let hits = Arc::new(Mutex::new(Vec::new()));
        let (h1, h2) = (Arc::clone(&hits), Arc::clone(&hits));

        source.listen(Arc::new(move |_| h1.lock().unwrap().push("first")));
        source.listen(Arc::new(move |_| h2.lock().unwrap().push("second")));
        source.emit(DetectionEvent::new("AA:AA", -60, 0));

        assert_eq!(*hits.lock().unwrap(), vec!["first"]);
        assert_eq!(source.metrics().subscriptions, 1);
    }
}
