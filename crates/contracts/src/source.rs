//! Source traits - motion sensor and beacon scanner abstractions
//!
//! The platform delivers both streams through callbacks on threads it owns.
//! These traits put real platform bindings and mock generators behind the
//! same interface.

use std::sync::Arc;

use crate::{DetectionEvent, MotionSample, MotionSensorKind};

/// Motion sample callback
pub type MotionCallback = Arc<dyn Fn(MotionSample) + Send + Sync>;

/// Detection callback
pub type DetectionCallback = Arc<dyn Fn(DetectionEvent) + Send + Sync>;

/// A single motion sensor
///
/// # Example
///
/// ```ignore
/// let sensor: Box<dyn MotionSource> = platform.motion_sensor(MotionSensorKind::RotationVector);
/// sensor.listen(Arc::new(move |sample| estimator.on_sample(sample)));
/// // ...
/// sensor.stop();
/// ```
pub trait MotionSource: Send + Sync {
    /// Sensor kind delivered by this source
    fn kind(&self) -> MotionSensorKind;

    /// Register the sample callback
    ///
    /// Repeated calls while listening are ignored; a sensor never delivers
    /// to two callbacks at once.
    fn listen(&self, callback: MotionCallback);

    /// Stop delivering samples
    fn stop(&self);

    /// Whether the source is currently delivering
    fn is_listening(&self) -> bool;
}

/// A beacon scanner
pub trait DetectionSource: Send + Sync {
    /// Scanner name (used for logging)
    fn name(&self) -> &str;

    /// Register the detection callback; idempotent while listening
    fn listen(&self, callback: DetectionCallback);

    /// Stop scanning
    fn stop(&self);

    fn is_listening(&self) -> bool;
}
