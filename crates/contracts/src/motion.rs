//! MotionSample - motion sensor output
//!
//! Raw samples as delivered by the platform sensor subsystem. Each kind
//! arrives on its own schedule; nothing orders one kind against another.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Motion sensor kinds the estimator knows how to consume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionSensorKind {
    /// Fused rotation vector (unit quaternion, vector part + optional scalar)
    RotationVector,
    /// Accelerometer (m/s², includes gravity)
    Accelerometer,
    /// Magnetometer (μT)
    MagneticField,
}

impl MotionSensorKind {
    pub const ALL: [MotionSensorKind; 3] = [
        MotionSensorKind::RotationVector,
        MotionSensorKind::Accelerometer,
        MotionSensorKind::MagneticField,
    ];
}

impl fmt::Display for MotionSensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RotationVector => "rotation_vector",
            Self::Accelerometer => "accelerometer",
            Self::MagneticField => "magnetic_field",
        };
        f.write_str(name)
    }
}

/// 3D vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Rotation vector sample.
///
/// `w` is the quaternion scalar part; some sensors omit it and it is then
/// derived from the vector part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub w: Option<f64>,
}

/// A single motion sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionSample {
    RotationVector(RotationVector),
    Accelerometer(Vector3),
    MagneticField(Vector3),
}

impl MotionSample {
    pub fn kind(&self) -> MotionSensorKind {
        match self {
            Self::RotationVector(_) => MotionSensorKind::RotationVector,
            Self::Accelerometer(_) => MotionSensorKind::Accelerometer,
            Self::MagneticField(_) => MotionSensorKind::MagneticField,
        }
    }
}

/// Screen rotation relative to the device's natural orientation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayRotation {
    #[default]
    Rotation0,
    Rotation90,
    Rotation180,
    Rotation270,
}
