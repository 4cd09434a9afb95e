//! ScanController - lifecycle of one scanner instance

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use contracts::{
    ContractError, CorrelatedRecord, DetectionSource, ExportConfig, HeadingReading, HeadingSource,
    MotionSource, RecordSubmitter, ScanBlueprint,
};
use correlator::{AllowlistFilter, ScanEventCorrelator, SessionLog};
use exporter::CsvExporter;
use orientation::{OrientationEstimator, StrategyKind};
use tracing::{debug, info, instrument, warn};

/// A stopped and exported session
#[derive(Debug, Clone)]
pub struct ExportedSession {
    /// CSV text as written
    pub document: String,
    pub path: PathBuf,
    pub records: Vec<CorrelatedRecord>,
}

#[derive(Debug, Default)]
struct ControlState {
    scanning: bool,
    motion_subscribed: bool,
    /// Bumped by every `start_scan`
    session_generation: u64,
}

/// Builder for [`ScanController`]
pub struct ScanControllerBuilder {
    estimator: OrientationEstimator,
    allowlist: AllowlistFilter,
    export: ExportConfig,
    motion_sources: Vec<Arc<dyn MotionSource>>,
    detection_source: Option<Arc<dyn DetectionSource>>,
    submitter: Option<Arc<dyn RecordSubmitter>>,
}

impl ScanControllerBuilder {
    /// Add a motion sensor; only kinds the active strategy needs are used
    pub fn motion_source(mut self, source: Arc<dyn MotionSource>) -> Self {
        self.motion_sources.push(source);
        self
    }

    pub fn motion_sources(mut self, sources: impl IntoIterator<Item = Arc<dyn MotionSource>>) -> Self {
        self.motion_sources.extend(sources);
        self
    }

    pub fn detection_source(mut self, source: Arc<dyn DetectionSource>) -> Self {
        self.detection_source = Some(source);
        self
    }

    /// Receives every stored record (typically the remote reporter)
    pub fn submitter(mut self, submitter: Arc<dyn RecordSubmitter>) -> Self {
        self.submitter = Some(submitter);
        self
    }

    pub fn build(self) -> Result<ScanController, ContractError> {
        let detection_source = self
            .detection_source
            .ok_or_else(|| ContractError::scan_state("no detection source configured"))?;

        let estimator = Arc::new(self.estimator);
        for kind in estimator.required_sensors() {
            if !self.motion_sources.iter().any(|s| s.kind() == *kind) {
                warn!(kind = %kind, "Required motion sensor has no source, heading may stay unavailable");
            }
        }

        let session = Arc::new(SessionLog::new());
        let heading: Arc<dyn HeadingSource> = estimator.clone();
        let mut correlator = ScanEventCorrelator::new(self.allowlist, heading, Arc::clone(&session))
            .with_clock(self.export.clock);
        if let Some(submitter) = self.submitter {
            correlator = correlator.with_submitter(submitter);
        }

        Ok(ScanController {
            estimator,
            motion_sources: self.motion_sources,
            detection_source,
            correlator: Arc::new(correlator),
            session,
            gate: Arc::new(RwLock::new(None)),
            state: Mutex::new(ControlState::default()),
            export: self.export,
        })
    }
}

/// Drives one scanner: sensor subscriptions, scan sessions and export
///
/// Control methods may be called from any thread; they are serialized
/// internally. Detection and motion callbacks run on the sources' threads.
pub struct ScanController {
    estimator: Arc<OrientationEstimator>,
    motion_sources: Vec<Arc<dyn MotionSource>>,
    detection_source: Arc<dyn DetectionSource>,
    correlator: Arc<ScanEventCorrelator>,
    session: Arc<SessionLog>,
    /// Generation of the session being recorded, `None` when stopped
    ///
    /// Stop takes the write lock to wait out callbacks. A callback only
    /// records while the gate holds the generation it was registered with.
    gate: Arc<RwLock<Option<u64>>>,
    state: Mutex<ControlState>,
    export: ExportConfig,
}

impl ScanController {
    pub fn builder(blueprint: &ScanBlueprint) -> ScanControllerBuilder {
        ScanControllerBuilder {
            estimator: OrientationEstimator::new(&blueprint.orientation),
            allowlist: AllowlistFilter::from_config(&blueprint.allowlist),
            export: blueprint.export.clone(),
            motion_sources: Vec::new(),
            detection_source: None,
            submitter: None,
        }
    }

    fn state(&self) -> MutexGuard<'_, ControlState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_gate(&self, session: Option<u64>) {
        // Blocks until in-flight detection callbacks release their read guard
        let mut gate = self.gate.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *gate = session;
    }

    /// Subscribe the motion sensors the active strategy consumes
    ///
    /// Idempotent; a no-op without a heading strategy.
    #[instrument(name = "scan_on_foreground", skip(self))]
    pub fn on_foreground(&self) {
        let mut state = self.state();
        if state.motion_subscribed {
            debug!("Motion sensors already subscribed");
            return;
        }

        let required = self.estimator.required_sensors();
        let mut subscribed = 0usize;
        for source in &self.motion_sources {
            if !required.contains(&source.kind()) {
                continue;
            }
            let estimator = Arc::clone(&self.estimator);
            source.listen(Arc::new(move |sample| estimator.on_sample(sample)));
            subscribed += 1;
        }

        state.motion_subscribed = true;
        info!(
            strategy = ?self.estimator.active_strategy().map(|k| k.as_str()),
            sources = subscribed,
            "Motion sensors subscribed"
        );
    }

    /// Release motion sensors; the last heading is kept
    #[instrument(name = "scan_on_background", skip(self))]
    pub fn on_background(&self) {
        let mut state = self.state();
        if !state.motion_subscribed {
            return;
        }
        for source in &self.motion_sources {
            source.stop();
        }
        state.motion_subscribed = false;
        info!("Motion sensors released");
    }

    /// Start a new session
    ///
    /// # Errors
    /// `ScanState` if a scan is already running.
    #[instrument(name = "scan_start", skip(self))]
    pub fn start_scan(&self) -> Result<(), ContractError> {
        let mut state = self.state();
        if state.scanning {
            return Err(ContractError::scan_state("scan already running"));
        }

        state.session_generation += 1;
        let generation = state.session_generation;
        self.session.reset();
        self.set_gate(Some(generation));

        let gate = Arc::clone(&self.gate);
        let correlator = Arc::clone(&self.correlator);
        self.detection_source.listen(Arc::new(move |event| {
            let current = gate.read().unwrap_or_else(|poisoned| poisoned.into_inner());
            // Late deliveries from an earlier session's callback are dropped
            if *current == Some(generation) {
                correlator.on_detection(event);
            }
        }));

        state.scanning = true;
        info!(source = %self.detection_source.name(), generation, "Scan started");
        Ok(())
    }

    /// Stop the running session and export it as `<session_name>.csv`
    ///
    /// No detection is recorded once this returns. An invalid name is
    /// rejected before anything stops. If only the write fails, the scan is
    /// still stopped and the frozen records stay available through
    /// [`ScanController::session_records`].
    #[instrument(name = "scan_stop", skip(self))]
    pub fn stop_scan(&self, session_name: &str) -> Result<ExportedSession, ContractError> {
        exporter::validate_session_name(session_name)?;

        let mut state = self.state();
        if !state.scanning {
            return Err(ContractError::scan_state("no scan running"));
        }

        self.detection_source.stop();
        self.set_gate(None);
        self.session.freeze();
        state.scanning = false;
        drop(state);

        let records = self.session.snapshot_all();
        info!(records = records.len(), "Scan stopped");

        let file = CsvExporter::write_session(&self.export.output_dir, session_name, &records)?;
        Ok(ExportedSession {
            document: file.document,
            path: file.path,
            records,
        })
    }

    /// Release every source; a running scan is stopped without export
    pub fn shutdown(&self) {
        let mut state = self.state();
        if state.scanning {
            self.detection_source.stop();
            self.set_gate(None);
            self.session.freeze();
            state.scanning = false;
        }
        drop(state);
        self.on_background();
    }

    pub fn heading(&self) -> HeadingReading {
        self.estimator.current_heading()
    }

    pub fn active_strategy(&self) -> Option<StrategyKind> {
        self.estimator.active_strategy()
    }

    pub fn is_scanning(&self) -> bool {
        self.state().scanning
    }

    /// Copy of the current (or last) session
    pub fn session_records(&self) -> Vec<CorrelatedRecord> {
        self.session.snapshot_all()
    }
}
