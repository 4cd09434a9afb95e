//! Mock motion sensor
//!
//! Implements `MotionSource`: a background thread synthesizes samples for a
//! device lying flat and turning according to a [`HeadingProfile`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use contracts::{MotionCallback, MotionSample, MotionSensorKind, MotionSource};
use orientation::synth::{field_samples_for_heading, rotation_vector_for_heading};
use tracing::{debug, trace};

use crate::listener::ListenState;
use crate::metrics::{SourceMetrics, SourceSnapshot};

/// Heading the simulated device points at, set from outside
#[derive(Debug, Clone)]
pub struct ManualHeading(Arc<AtomicU64>);

impl ManualHeading {
    pub fn new(degrees: f64) -> Self {
        Self(Arc::new(AtomicU64::new(degrees.to_bits())))
    }

    pub fn set(&self, degrees: f64) {
        self.0.store(degrees.to_bits(), Ordering::SeqCst);
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::SeqCst))
    }
}

/// How the simulated heading evolves
#[derive(Clone)]
pub enum HeadingProfile {
    Fixed(f64),
    /// Constant turn rate, clockwise for positive rates
    Rotating { start_deg: f64, deg_per_sec: f64 },
    Manual(ManualHeading),
}

impl HeadingProfile {
    pub fn heading_at(&self, elapsed: Duration) -> f64 {
        match self {
            Self::Fixed(deg) => *deg,
            Self::Rotating {
                start_deg,
                deg_per_sec,
            } => start_deg + deg_per_sec * elapsed.as_secs_f64(),
            Self::Manual(manual) => manual.get(),
        }
    }
}

impl fmt::Debug for HeadingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(deg) => write!(f, "Fixed({deg})"),
            Self::Rotating {
                start_deg,
                deg_per_sec,
            } => write!(f, "Rotating({start_deg} + {deg_per_sec}/s)"),
            Self::Manual(manual) => write!(f, "Manual({})", manual.get()),
        }
    }
}

/// Mock motion sensor configuration
#[derive(Debug, Clone)]
pub struct MockMotionConfig {
    /// Samples per second
    pub rate_hz: f64,
    pub profile: HeadingProfile,
}

impl Default for MockMotionConfig {
    fn default() -> Self {
        Self {
            rate_hz: 15.0,
            profile: HeadingProfile::Fixed(0.0),
        }
    }
}

/// Mock motion sensor of one kind
pub struct MockMotionSource {
    kind: MotionSensorKind,
    config: MockMotionConfig,
    state: ListenState,
    metrics: Arc<SourceMetrics>,
}

impl MockMotionSource {
    pub fn new(kind: MotionSensorKind, config: MockMotionConfig) -> Self {
        Self {
            kind,
            config,
            state: ListenState::default(),
            metrics: Arc::new(SourceMetrics::new()),
        }
    }

    /// One source per kind, all following the same profile
    pub fn set_for(kinds: &[MotionSensorKind], config: &MockMotionConfig) -> Vec<Self> {
        kinds
            .iter()
            .map(|kind| Self::new(*kind, config.clone()))
            .collect()
    }

    pub fn metrics(&self) -> SourceSnapshot {
        self.metrics.snapshot()
    }

    /// Sample of `kind` for a flat device at `heading_deg`
    pub fn sample_for(kind: MotionSensorKind, heading_deg: f64) -> MotionSample {
        match kind {
            MotionSensorKind::RotationVector => {
                MotionSample::RotationVector(rotation_vector_for_heading(heading_deg))
            }
            MotionSensorKind::Accelerometer => {
                MotionSample::Accelerometer(field_samples_for_heading(heading_deg).0)
            }
            MotionSensorKind::MagneticField => {
                MotionSample::MagneticField(field_samples_for_heading(heading_deg).1)
            }
        }
    }
}

impl MotionSource for MockMotionSource {
    fn kind(&self) -> MotionSensorKind {
        self.kind
    }

    fn listen(&self, callback: MotionCallback) {
        // Idempotent: ignore while already listening
        let Some(subscription) = self.state.begin() else {
            return;
        };
        self.metrics.record_subscription();

        let kind = self.kind;
        let config = self.config.clone();
        let metrics = Arc::clone(&self.metrics);
        let interval = Duration::from_secs_f64(1.0 / config.rate_hz.max(0.1));

        thread::spawn(move || {
            let started = Instant::now();
            debug!(kind = %kind, rate_hz = config.rate_hz, profile = ?config.profile, "mock motion source started");

            while subscription.is_active() {
                let heading = config.profile.heading_at(started.elapsed());
                callback(Self::sample_for(kind, heading));
                metrics.record_emitted();
                trace!(kind = %kind, heading, "mock motion sample sent");

                thread::sleep(interval);
            }

            debug!(kind = %kind, "mock motion source stopped");
        });
    }

    fn stop(&self) {
        self.state.end();
    }

    fn is_listening(&self) -> bool {
        self.state.is_listening()
    }
}

/// Motion sensor driven by the caller; `emit` runs the callback inline
pub struct ManualMotionSource {
    kind: MotionSensorKind,
    callback: Mutex<Option<MotionCallback>>,
    state: ListenState,
    metrics: Arc<SourceMetrics>,
}

impl ManualMotionSource {
    pub fn new(kind: MotionSensorKind) -> Self {
        Self {
            kind,
            callback: Mutex::new(None),
            state: ListenState::default(),
            metrics: Arc::new(SourceMetrics::new()),
        }
    }

    /// Deliver a sample for a flat device at `heading_deg` if listening
    pub fn emit_heading(&self, heading_deg: f64) -> bool {
        self.emit(MockMotionSource::sample_for(self.kind, heading_deg))
    }

    pub fn emit(&self, sample: MotionSample) -> bool {
        let callback = match self.callback.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        match callback {
            Some(callback) if self.state.is_listening() => {
                callback(sample);
                self.metrics.record_emitted();
                true
            }
            _ => false,
        }
    }

    pub fn metrics(&self) -> SourceSnapshot {
        self.metrics.snapshot()
    }
}

impl MotionSource for ManualMotionSource {
    fn kind(&self) -> MotionSensorKind {
        self.kind
    }

    fn listen(&self, callback: MotionCallback) {
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
