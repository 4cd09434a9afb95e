//! Heading fusion strategies.

use std::fmt;

use contracts::{DisplayRotation, MotionSample, MotionSensorKind, RotationVector, Vector3};
use tracing::trace;

use crate::rotation::{
    azimuth_degrees, matrix_from_gravity_magnetic, matrix_from_rotation_vector, remap_for_display,
};

/// Result of feeding one sample to a strategy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FusionOutcome {
    /// New azimuth in degrees (not yet normalized)
    Updated(f64),
    /// Sample kind not consumed by this strategy
    Ignored,
    /// Waiting for the complementary sample
    Pending,
    /// Inputs cannot define a frame; previous heading stands
    Degenerate,
}

pub trait HeadingFusion {
    fn ingest(&mut self, sample: &MotionSample) -> FusionOutcome;
}

/// Which strategy is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    DirectVector,
    Composite,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectVector => "direct_vector",
            Self::Composite => "composite",
        }
    }

    /// Sensor kinds the strategy subscribes to
    pub fn required_sensors(&self) -> &'static [MotionSensorKind] {
        match self {
            Self::DirectVector => &[MotionSensorKind::RotationVector],
            Self::Composite => &[MotionSensorKind::Accelerometer, MotionSensorKind::MagneticField],
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Heading straight from the platform's fused rotation vector
#[derive(Debug, Default)]
pub struct DirectVectorFusion;

impl DirectVectorFusion {
    fn update(&self, rv: &RotationVector) -> FusionOutcome {
        let matrix = matrix_from_rotation_vector(rv);
        finite_azimuth(azimuth_degrees(&matrix))
    }
}

impl HeadingFusion for DirectVectorFusion {
    fn ingest(&mut self, sample: &MotionSample) -> FusionOutcome {
        match sample {
            MotionSample::RotationVector(rv) => self.update(rv),
            _ => FusionOutcome::Ignored,
        }
    }
}

/// Heading from the latest accelerometer and magnetometer readings
///
/// Each reading is kept independently; a new value of either recomputes the
/// heading once both have been seen.
#[derive(Debug, Default)]
pub struct CompositeFusion {
    gravity: Option<Vector3>,
    geomagnetic: Option<Vector3>,
    /// Display rotation applied to the matrix, if remapping is enabled
    remap: Option<DisplayRotation>,
}

impl CompositeFusion {
    pub fn new(remap: Option<DisplayRotation>) -> Self {
        Self {
            remap,
            ..Self::default()
        }
    }

    fn recompute(&self) -> FusionOutcome {
        let (Some(gravity), Some(geomagnetic)) = (&self.gravity, &self.geomagnetic) else {
            return FusionOutcome::Pending;
        };

        let Some(matrix) = matrix_from_gravity_magnetic(gravity, geomagnetic) else {
            trace!("Gravity/geomagnetic pair rejected");
            return FusionOutcome::Degenerate;
        };

        let matrix = match self.remap {
            Some(rotation) => remap_for_display(&matrix, rotation),
            None => matrix,
        };
        finite_azimuth(azimuth_degrees(&matrix))
    }
}

impl HeadingFusion for CompositeFusion {
    fn ingest(&mut self, sample: &MotionSample) -> FusionOutcome {
        match sample {
            MotionSample::Accelerometer(v) => self.gravity = Some(*v),
            MotionSample::MagneticField(v) => self.geomagnetic = Some(*v),
            MotionSample::RotationVector(_) => return FusionOutcome::Ignored,
        }
        self.recompute()
    }
}

fn finite_azimuth(degrees: f64) -> FusionOutcome {
    if degrees.is_finite() {
        FusionOutcome::Updated(degrees)
    } else {
        FusionOutcome::Degenerate
    }
}

/// The one strategy an estimator runs
#[derive(Debug)]
pub enum FusionStrategy {
    DirectVector(DirectVectorFusion),
    Composite(CompositeFusion),
}

impl FusionStrategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::DirectVector(_) => StrategyKind::DirectVector,
            Self::Composite(_) => StrategyKind::Composite,
        }
    }
}

impl HeadingFusion for FusionStrategy {
    fn ingest(&mut self, sample: &MotionSample) -> FusionOutcome {
        match self {
            Self::DirectVector(s) => s.ingest(sample),
            Self::Composite(s) => s.ingest(sample),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{field_samples_for_heading, rotation_vector_for_heading};

    fn updated(outcome: FusionOutcome) -> f64 {
        match outcome {
            FusionOutcome::Updated(deg) => contracts::normalize_degrees(deg),
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn test_direct_vector_ignores_other_kinds() {
        let mut fusion = DirectVectorFusion;
        let (gravity, _) = field_samples_for_heading(0.0);
        assert_eq!(
            fusion.ingest(&MotionSample::Accelerometer(gravity)),
            FusionOutcome::Ignored
        );

        let heading = updated(fusion.ingest(&MotionSample::RotationVector(
            rotation_vector_for_heading(45.0),
        )));
        assert!((heading - 45.0).abs() < 1e-6);
    }

    #[test]
    fn test_composite_waits_for_both_readings() {
        let mut fusion = CompositeFusion::new(None);
        let (gravity, field) = field_samples_for_heading(100.0);

        assert_eq!(
            fusion.ingest(&MotionSample::MagneticField(field)),
            FusionOutcome::Pending
        );
        let heading = updated(fusion.ingest(&MotionSample::Accelerometer(gravity)));
        assert!((heading - 100.0).abs() < 1e-6);

        // A new magnetometer reading alone is enough once gravity is known
        let (_, field) = field_samples_for_heading(200.0);
        let heading = updated(fusion.ingest(&MotionSample::MagneticField(field)));
        assert!((heading - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_composite_degenerate_pair() {
        let mut fusion = CompositeFusion::new(None);
        fusion.ingest(&MotionSample::Accelerometer(Vector3::new(0.0, 0.0, 9.8)));
        assert_eq!(
            fusion.ingest(&MotionSample::MagneticField(Vector3::new(0.0, 0.0, 45.0))),
            FusionOutcome::Degenerate
        );
        assert_eq!(
            fusion.ingest(&MotionSample::RotationVector(RotationVector::default())),
            FusionOutcome::Ignored
        );
    }

    #[test]
    fn test_composite_remap() {
        let mut fusion = CompositeFusion::new(Some(DisplayRotation::Rotation180));
        let (gravity, field) = field_samples_for_heading(30.0);
        fusion.ingest(&MotionSample::Accelerometer(gravity));
        let heading = updated(fusion.ingest(&MotionSample::MagneticField(field)));
        assert!((heading - 210.0).abs() < 1e-6);
    }

    #[test]
    fn test_required_sensors() {
        assert_eq!(
            StrategyKind::DirectVector.required_sensors(),
            &[MotionSensorKind::RotationVector]
        );
        assert_eq!(StrategyKind::Composite.required_sensors().len(), 2);
        assert_eq!(StrategyKind::Composite.to_string(), "composite");
    }
}
