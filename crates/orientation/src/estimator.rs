//! OrientationEstimator - strategy selection and heading publication

use std::sync::{Arc, Mutex};

use contracts::{
    DisplayRotation, FusionPreference, HeadingReading, HeadingSource, MotionSample,
    MotionSensorKind, OrientationConfig,
};
use tracing::{debug, info, trace, warn};

use crate::cell::HeadingCell;
use crate::strategy::{
    CompositeFusion, DirectVectorFusion, FusionOutcome, FusionStrategy, HeadingFusion, StrategyKind,
};

/// Fuses motion samples into the shared heading
///
/// Runs at most one strategy, chosen at construction. Sample callbacks may
/// arrive from any thread; readers never take the strategy lock.
#[derive(Debug)]
pub struct OrientationEstimator {
    strategy: Option<Mutex<FusionStrategy>>,
    kind: Option<StrategyKind>,
    cell: Arc<HeadingCell>,
}

impl OrientationEstimator {
    pub fn new(config: &OrientationConfig) -> Self {
        let remap = config.remap_axes.then_some(config.display_rotation);
        Self::with_sensors(config.strategy, &config.available_sensors, remap)
    }

    /// Build for an explicit set of available sensors
    ///
    /// `remap` is the display rotation applied by the composite strategy.
    pub fn with_sensors(
        preference: FusionPreference,
        available: &[MotionSensorKind],
        remap: Option<DisplayRotation>,
    ) -> Self {
        let has = |kind: MotionSensorKind| available.contains(&kind);
        let direct = has(MotionSensorKind::RotationVector);
        let composite = has(MotionSensorKind::Accelerometer) && has(MotionSensorKind::MagneticField);

        let strategy = match preference {
            FusionPreference::Auto if direct => Some(FusionStrategy::DirectVector(DirectVectorFusion)),
            FusionPreference::Auto if composite => {
                warn!("Rotation vector sensor unavailable, falling back to accelerometer + magnetometer");
                Some(FusionStrategy::Composite(CompositeFusion::new(remap)))
            }
            FusionPreference::DirectVector if direct => {
                Some(FusionStrategy::DirectVector(DirectVectorFusion))
            }
            FusionPreference::Composite if composite => {
                Some(FusionStrategy::Composite(CompositeFusion::new(remap)))
            }
            _ => None,
        };

        let kind = strategy.as_ref().map(FusionStrategy::kind);
        match kind {
            Some(kind) => info!(strategy = %kind, "Orientation estimator ready"),
            None => warn!(
                preference = ?preference,
                available = ?available,
                "No heading strategy available, heading will stay unavailable"
            ),
        }

        Self {
            strategy: strategy.map(Mutex::new),
            kind,
            cell: Arc::new(HeadingCell::new()),
        }
    }

    /// Feed one sample; called from motion source callbacks
    pub fn on_sample(&self, sample: MotionSample) {
        let Some(strategy) = &self.strategy else {
            return;
        };

        // Publish under the strategy lock so updates land in ingest order
        let (outcome, published) = {
            let mut guard = strategy.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let outcome = guard.ingest(&sample);
            let published = match outcome {
                FusionOutcome::Updated(degrees) => {
                    self.cell.store(degrees);
                    self.cell.load().degrees
                }
                _ => 0.0,
            };
            (outcome, published)
        };

        let name = self.kind.map(|k| k.as_str()).unwrap_or("none");
        match outcome {
            FusionOutcome::Updated(_) => {
                trace!(strategy = name, heading = published, "Heading updated");
                observability::record_heading_update(name, published);
            }
            FusionOutcome::Degenerate => {
                debug!(strategy = name, kind = %sample.kind(), "Sample rejected, heading kept");
                observability::record_fusion_rejected(name);
            }
            FusionOutcome::Ignored | FusionOutcome::Pending => {}
        }
    }

    pub fn current_heading(&self) -> HeadingReading {
        self.cell.load()
    }

    pub fn active_strategy(&self) -> Option<StrategyKind> {
        self.kind
    }

    /// Sensor kinds to subscribe; empty without a strategy
    pub fn required_sensors(&self) -> &'static [MotionSensorKind] {
        self.kind.map(|k| k.required_sensors()).unwrap_or(&[])
    }

    /// Forget the last heading (reads as unavailable until the next update)
    pub fn reset(&self) {
        self.cell.clear();
    }
}

impl HeadingSource for OrientationEstimator {
    fn current_heading(&self) -> HeadingReading {
        OrientationEstimator::current_heading(self)
    }
}
