//! Synthetic samples for a device lying flat at a given heading.
//!
//! Used by mock motion sources and tests.

use contracts::{RotationVector, Vector3};

use crate::rotation::STANDARD_GRAVITY;

/// Horizontal component of a mid-latitude geomagnetic field (μT)
const FIELD_HORIZONTAL_UT: f64 = 22.0;

/// Vertical component, pointing into the ground (μT)
const FIELD_VERTICAL_UT: f64 = 40.0;

/// Rotation vector for a flat device whose top edge points at `heading_deg`
pub fn rotation_vector_for_heading(heading_deg: f64) -> RotationVector {
    // Clockwise heading is a negative rotation about the up axis
    let half = -heading_deg.to_radians() / 2.0;
    RotationVector {
        x: 0.0,
        y: 0.0,
        z: half.sin(),
        w: Some(half.cos()),
    }
}

/// Accelerometer and magnetometer readings for a flat device at `heading_deg`
pub fn field_samples_for_heading(heading_deg: f64) -> (Vector3, Vector3) {
    let (sin, cos) = heading_deg.to_radians().sin_cos();
    let gravity = Vector3::new(0.0, 0.0, STANDARD_GRAVITY);
    let field = Vector3::new(
        -sin * FIELD_HORIZONTAL_UT,
        cos * FIELD_HORIZONTAL_UT,
        -FIELD_VERTICAL_UT,
    );
    (gravity, field)
}
