//! Rotation angles at which a reciprocal-lattice point diffracts.
//!
//! A point `p` diffracts when, after rotating the crystal by `phi` about the
//! goniometer axis `m2`, it lies on the Ewald sphere:
//!
//! ```text
//! |s0 + R(phi) p| = |s0|   <=>   2 s0 · R(phi) p + |p|² = 0
//! ```
//!
//! Working in the frame `(m1, m2, m3)` of [`RotationFrame`], where `s0` has
//! no `m1` component, the `m2` component of `p` is invariant and the
//! `(m3, m1)` components turn as a 2D vector of length
//! `rho = sqrt(p1² + p3²)`. The `m3` component after rotation is
//! `p3 cos(phi) - p1 sin(phi) = rho cos(phi - phi0)` with
//! `phi0 = atan2(-p1, p3)`, so the condition collapses to
//!
//! ```text
//! cos(phi - phi0) = c = -(|p|² / 2 + s0₂ p2) / (s0₃ rho)
//! ```
//!
//! which has the two solutions `phi0 - acos(c)` and `phi0 + acos(c)` when
//! `|c| <= 1`, and none otherwise.

use diffraction_math::{DegenerateAxisError, RotationFrame};
use nalgebra::Vector3;

/// Solver for the diffracting rotation angles of a fixed beam and axis.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationAngles {
    frame: RotationFrame,
    /// Component of s0 along the rotation axis
    s0_m2: f64,
    /// Component of s0 along m3, strictly positive by construction
    s0_m3: f64,
}

impl RotationAngles {
    /// Create the solver.
    ///
    /// # Arguments
    /// * `s0` - Incident beam vector (unit direction scaled by 1/wavelength)
    /// * `m2` - Rotation axis
    ///
    /// # Returns
    /// * `Ok(RotationAngles)` - Ready solver
    /// * `Err(DegenerateAxisError)` - If either vector is zero or the axis is
    ///   parallel to the beam, in which case the diffraction condition does
    ///   not depend on the rotation angle
    pub fn new(s0: &Vector3<f64>, m2: &Vector3<f64>) -> Result<Self, DegenerateAxisError> {
        let frame = RotationFrame::new(m2, s0)?;
        Ok(Self {
            s0_m2: s0.dot(&frame.m2),
            s0_m3: s0.dot(&frame.m3),
            frame,
        })
    }

    /// Unit rotation axis used by the solver
    pub fn rotation_axis(&self) -> Vector3<f64> {
        self.frame.m2
    }

    /// Solve for the rotation angles (radians) at which `pstar0` diffracts.
    ///
    /// # Returns
    /// * `Some([phi0 - acos(c), phi0 + acos(c)])` - Always in this order; the
    ///   two values coincide when the point grazes the sphere
    /// * `None` - If `|c| > 1` (the point never reaches the sphere) or `c` is
    ///   not finite (the point lies on the rotation axis)
    pub fn calculate(&self, pstar0: &Vector3<f64>) -> Option<[f64; 2]> {
        let p = self.frame.to_frame(pstar0);
        let (p1, p2, p3) = (p.x, p.y, p.z);

        let rho = (p1 * p1 + p3 * p3).sqrt();
        let c = -(0.5 * pstar0.norm_squared() + self.s0_m2 * p2) / (self.s0_m3 * rho);

        // Also rejects NaN and infinities from rho == 0
        if !(c.abs() <= 1.0) {
            return None;
        }

        let phi0 = (-p1).atan2(p3);
        let delta = c.acos();
        Some([phi0 - delta, phi0 + delta])
    }
}
