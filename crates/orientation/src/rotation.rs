//! Rotation matrix derivation and azimuth extraction.
//!
//! Matrices map device coordinates to world coordinates (x east, y north,
//! z up), rows = world axes.

use contracts::{DisplayRotation, RotationVector, Vector3 as SampleVector};
use nalgebra::{Matrix3, RowVector3, Vector3};

/// Standard gravity (m/s²)
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Below this fraction of standard gravity the device is treated as falling
const FREE_FALL_FRACTION: f64 = 0.1;

/// Minimum |magnetic × gravity| before the horizontal axis is trusted
const MIN_HORIZONTAL_NORM: f64 = 0.1;

fn to_vector(sample: &SampleVector) -> Vector3<f64> {
    Vector3::new(sample.x, sample.y, sample.z)
}

/// Rotation matrix from a rotation-vector (unit quaternion) sample
///
/// The scalar part is derived as `sqrt(max(0, 1 - x² - y² - z²))` when the
/// sensor omits it.
pub fn matrix_from_rotation_vector(rv: &RotationVector) -> Matrix3<f64> {
    let (q1, q2, q3) = (rv.x, rv.y, rv.z);
    let q0 = rv
        .w
        .unwrap_or_else(|| (1.0 - q1 * q1 - q2 * q2 - q3 * q3).max(0.0).sqrt());

    let sq_q1 = 2.0 * q1 * q1;
    let sq_q2 = 2.0 * q2 * q2;
    let sq_q3 = 2.0 * q3 * q3;
    let q1_q2 = 2.0 * q1 * q2;
    let q3_q0 = 2.0 * q3 * q0;
    let q1_q3 = 2.0 * q1 * q3;
    let q2_q0 = 2.0 * q2 * q0;
    let q2_q3 = 2.0 * q2 * q3;
    let q1_q0 = 2.0 * q1 * q0;

    Matrix3::new(
        1.0 - sq_q2 - sq_q3,
        q1_q2 - q3_q0,
        q1_q3 + q2_q0,
        q1_q2 + q3_q0,
        1.0 - sq_q1 - sq_q3,
        q2_q3 - q1_q0,
        q1_q3 - q2_q0,
        q2_q3 + q1_q0,
        1.0 - sq_q1 - sq_q2,
    )
}

/// Rotation matrix from gravity and geomagnetic vectors
///
/// Returns `None` when the inputs cannot define a frame: non-finite values,
/// free fall, or a magnetic field (near) parallel to gravity.
pub fn matrix_from_gravity_magnetic(
    gravity: &SampleVector,
    geomagnetic: &SampleVector,
) -> Option<Matrix3<f64>> {
    let a = to_vector(gravity);
    let e = to_vector(geomagnetic);
    if !a.iter().chain(e.iter()).all(|v| v.is_finite()) {
        return None;
    }

    let norm_a = a.norm();
    if norm_a < FREE_FALL_FRACTION * STANDARD_GRAVITY {
        return None;
    }

    let h = e.cross(&a);
    let norm_h = h.norm();
    if norm_h < MIN_HORIZONTAL_NORM {
        return None;
    }

    let h = h / norm_h;
    let a = a / norm_a;
    let m = a.cross(&h);

    Some(Matrix3::from_rows(&[
        h.transpose(),
        m.transpose(),
        a.transpose(),
    ]))
}

/// Remap device axes so the azimuth stays referenced to the screen's "up"
/// after a display rotation.
pub fn remap_for_display(matrix: &Matrix3<f64>, rotation: DisplayRotation) -> Matrix3<f64> {
    // Rows: where the new x and y axes point in old device coordinates;
    // z = x × y.
    let (x, y) = match rotation {
        DisplayRotation::Rotation0 => return *matrix,
        DisplayRotation::Rotation90 => (Vector3::new(0.0, 1.0, 0.0), Vector3::new(-1.0, 0.0, 0.0)),
        DisplayRotation::Rotation180 => {
            (Vector3::new(-1.0, 0.0, 0.0), Vector3::new(0.0, -1.0, 0.0))
        }
        DisplayRotation::Rotation270 => {
            (Vector3::new(0.0, -1.0, 0.0), Vector3::new(1.0, 0.0, 0.0))
        }
    };
    let z = x.cross(&y);
    let remap = Matrix3::from_rows(&[
        RowVector3::new(x.x, x.y, x.z),
        RowVector3::new(y.x, y.y, y.z),
        RowVector3::new(z.x, z.y, z.z),
    ]);
    matrix * remap
}

/// Azimuth (rotation about the vertical axis) in degrees, not normalized
pub fn azimuth_degrees(matrix: &Matrix3<f64>) -> f64 {
    matrix[(0, 1)].atan2(matrix[(1, 1)]).to_degrees()
}
