//! Scan orchestrator - wires sources, reporter and controller for one session.
//!
//! Platform sensors are simulated: the device turns at a constant rate and
//! a mock scanner hears the allowlisted beacons plus a few foreign ones.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use contracts::{DetectionSource, MotionSource, RecordSubmitter, ScanBlueprint};
use ingestion::{
    HeadingProfile, MockDetectionConfig, MockDetectionSource, MockMotionConfig, MockMotionSource,
};
use observability::SessionStatsAggregator;
use scanner::ScanController;
use tracing::{info, warn};

use super::RunStats;
use crate::error::{CliError, Result};

/// Settings for one `run`
#[derive(Debug, Clone)]
pub struct ScanRunConfig {
    pub blueprint: ScanBlueprint,
    /// Stop after this long (None = wait for the shutdown signal)
    pub duration: Option<Duration>,
    pub session_name: String,
    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
    /// Simulated turn rate (degrees per second)
    pub turn_rate: f64,
    /// Simulated detections per second
    pub detection_rate: f64,
    /// Simulated beacons outside the allowlist
    pub foreign_beacons: usize,
}

/// One scan session from start to export
pub struct ScanRun {
    config: ScanRunConfig,
}

impl ScanRun {
    pub fn new(config: ScanRunConfig) -> Self {
        Self { config }
    }

    /// Scan until the duration elapses or `shutdown` resolves, then export
    ///
    /// The returned stats carry the export error, if any; records gathered
    /// before a failed export are still summarized.
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> Result<RunStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let reporter = reporter::spawn_from_config(&blueprint.reporter)?.map(Arc::new);

        let motion_config = MockMotionConfig {
            rate_hz: blueprint.orientation.sample_rate_hz,
            profile: HeadingProfile::Rotating {
                start_deg: 0.0,
                deg_per_sec: self.config.turn_rate,
            },
        };
        let motion_sources: Vec<Arc<dyn MotionSource>> =
            MockMotionSource::set_for(&blueprint.orientation.available_sensors, &motion_config)
                .into_iter()
                .map(|source| Arc::new(source) as Arc<dyn MotionSource>)
                .collect();

        let detection_source = Arc::new(MockDetectionSource::new(
            "mock-scanner",
            MockDetectionConfig {
                devices: simulated_devices(blueprint, self.config.foreign_beacons),
                rate_hz: self.config.detection_rate,
                ..MockDetectionConfig::default()
            },
        ));

        let mut builder = ScanController::builder(blueprint)
            .motion_sources(motion_sources)
            .detection_source(Arc::clone(&detection_source) as Arc<dyn DetectionSource>);
        if let Some(ref reporter) = reporter {
            builder = builder.submitter(Arc::clone(reporter) as Arc<dyn RecordSubmitter>);
        }
        let controller = Arc::new(builder.build()?);

        controller.on_foreground();
        controller.start_scan()?;

        info!(
            strategy = ?controller.active_strategy().map(|s| s.as_str()),
            duration = ?self.config.duration,
            session = %self.config.session_name,
            "Scanning"
        );

        let deadline = async {
            match self.config.duration {
                Some(duration) => tokio::time::sleep(duration).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = deadline => info!("Scan duration elapsed"),
            _ = shutdown => warn!("Received shutdown signal, stopping scan..."),
        }

        // Stopping waits for in-flight callbacks and writes the file
        let stop_controller = Arc::clone(&controller);
        let session_name = self.config.session_name.clone();
        let exported = tokio::task::spawn_blocking(move || stop_controller.stop_scan(&session_name))
            .await
            .map_err(|e| CliError::task(e.to_string()))?;

        let (records, export_path, export_error) = match exported {
            Ok(session) => {
                info!(path = %session.path.display(), records = session.records.len(), "Session exported");
                (session.records, Some(session.path), None)
            }
            Err(e) => {
                warn!(error = %e, "Session export failed");
                (controller.session_records(), None, Some(e.to_string()))
            }
        };
        let heading = controller.heading();
        controller.shutdown();

        let mut session_stats = SessionStatsAggregator::new();
        session_stats.extend(&records);

        let (reporter_stats, dead_letters) = match reporter {
            Some(reporter) => {
                let snapshot = reporter.shutdown().await;
                let dead = reporter.drain_dead_letters();
                for letter in dead.iter().take(5) {
                    warn!(mac_address = %letter.payload.mac_address, reason = %letter.reason, "Undelivered record");
                }
                (Some(snapshot), dead.len())
            }
            None => (None, 0),
        };

        Ok(RunStats {
            session_name: self.config.session_name,
            duration: start_time.elapsed(),
            detections_heard: detection_source.metrics().emitted,
            records: records.len(),
            last_heading: heading.truncated(),
            export_path,
            export_error,
            session: session_stats.summary(),
            reporter: reporter_stats,
            dead_letters,
        })
    }
}

/// Allowlisted beacons followed by `foreign` addresses no allowlist contains
fn simulated_devices(blueprint: &ScanBlueprint, foreign: usize) -> Vec<String> {
    let mut devices = blueprint.allowlist.devices.clone();
    devices.extend((0..foreign).map(|i| format!("02:00:00:00:00:{:02X}", i)));
    devices
}
