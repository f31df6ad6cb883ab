//! Right-handed rotations about a unit axis
//!
//! Rotation scans turn the crystal about a single goniometer axis, so every
//! rotation in the prediction code is an axis-angle rotation. Angles are in
//! radians throughout this module.

use nalgebra::{Matrix3, Vector3};
use thiserror::Error;

/// Threshold below which an axis (or cross product of axes) is considered zero
const AXIS_EPSILON: f64 = 1e-10;

/// Error when an axis cannot define a rotation frame
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DegenerateAxisError {
    /// The axis has (near) zero length
    #[error("rotation axis has zero length")]
    ZeroLength,
    /// The rotation axis is parallel to the reference (beam) direction
    #[error("rotation axis is parallel to the beam: angle between them is {angle_degrees:.4}°")]
    ParallelToBeam { angle_degrees: f64 },
}

/// Rotate a vector about a unit axis through the origin (Rodrigues' formula).
///
/// Positive angles rotate counter-clockwise when looking down the axis
/// towards the origin.
///
/// # Arguments
/// * `v` - Vector to rotate
/// * `axis` - Unit rotation axis
/// * `angle` - Rotation angle in radians
pub fn rotate_around_axis(v: &Vector3<f64>, axis: &Vector3<f64>, angle: f64) -> Vector3<f64> {
    let (sin_a, cos_a) = angle.sin_cos();
    v * cos_a + axis.cross(v) * sin_a + axis * (axis.dot(v) * (1.0 - cos_a))
}

/// Build the 3x3 matrix of a rotation about a unit axis.
///
/// `rotation_matrix(axis, angle) * v` equals `rotate_around_axis(v, axis, angle)`.
pub fn rotation_matrix(axis: &Vector3<f64>, angle: f64) -> Matrix3<f64> {
    let (sin_a, cos_a) = angle.sin_cos();
    let t = 1.0 - cos_a;
    let (x, y, z) = (axis.x, axis.y, axis.z);

    Matrix3::new(
        t * x * x + cos_a,
        t * x * y - sin_a * z,
        t * x * z + sin_a * y,
        t * x * y + sin_a * z,
        t * y * y + cos_a,
        t * y * z - sin_a * x,
        t * x * z - sin_a * y,
        t * y * z + sin_a * x,
        t * z * z + cos_a,
    )
}

/// Orthonormal frame attached to a rotation axis and a beam direction.
///
/// - `m2` is the unit rotation axis
/// - `m1 = m2 × s0 / |m2 × s0|` is perpendicular to both axis and beam
/// - `m3 = m1 × m2` completes the right-handed set and lies in the plane of
///   the axis and the beam
///
/// Under a rotation about `m2` the `m2` component of a vector is invariant
/// and its (`m3`, `m1`) components turn as a 2D vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationFrame {
    pub m1: Vector3<f64>,
    pub m2: Vector3<f64>,
    pub m3: Vector3<f64>,
}

impl RotationFrame {
    /// Create the frame from a rotation axis and beam vector (neither needs to be unit length).
    ///
    /// # Returns
    /// * `Ok(RotationFrame)` - The orthonormal frame
    /// * `Err(DegenerateAxisError)` - If either vector is zero or they are parallel
    pub fn new(axis: &Vector3<f64>, beam: &Vector3<f64>) -> Result<Self, DegenerateAxisError> {
        let axis_norm = axis.norm();
        let beam_norm = beam.norm();
        if axis_norm < AXIS_EPSILON || beam_norm < AXIS_EPSILON {
            return Err(DegenerateAxisError::ZeroLength);
        }

        let m2 = axis / axis_norm;
        let cross = m2.cross(&(beam / beam_norm));
        if cross.norm() < AXIS_EPSILON {
            let cos_angle = (m2.dot(beam) / beam_norm).clamp(-1.0, 1.0);
            return Err(DegenerateAxisError::ParallelToBeam {
                angle_degrees: cos_angle.acos().to_degrees(),
            });
        }

        let m1 = cross.normalize();
        let m3 = m1.cross(&m2);
        Ok(Self { m1, m2, m3 })
    }

    /// Express a lab-frame vector in (m1, m2, m3) components
    pub fn to_frame(&self, v: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(v.dot(&self.m1), v.dot(&self.m2), v.dot(&self.m3))
    }

    /// Convert (m1, m2, m3) components back to a lab-frame vector
    pub fn from_frame(&self, c: &Vector3<f64>) -> Vector3<f64> {
        self.m1 * c.x + self.m2 * c.y + self.m3 * c.z
    }
}
