//! Miller index to lab-frame reciprocal space vector.

use crate::error::PredictionError;
use diffraction_math::{rotate_around_axis, DegenerateAxisError, MillerIndex};
use nalgebra::{Matrix3, Vector3};

/// Maps Miller indices to lab-frame reciprocal-lattice vectors.
///
/// At rotation angle zero the vector is `pstar0 = UB * h`; at angle phi it
/// is `pstar0` rotated by phi about the goniometer axis.
#[derive(Debug, Clone, PartialEq)]
pub struct FromHklToRsv {
    ub: Matrix3<f64>,
    m2: Vector3<f64>,
}

impl FromHklToRsv {
    /// Create the transform from an orientation matrix and rotation axis
    pub fn new(ub: Matrix3<f64>, m2: Vector3<f64>) -> Result<Self, PredictionError> {
        if !(m2.norm() > 0.0) {
            return Err(DegenerateAxisError::ZeroLength.into());
        }
        Ok(Self {
            ub,
            m2: m2.normalize(),
        })
    }

    /// Reciprocal-lattice vector of `h` at rotation angle zero: `UB * h`
    pub fn pstar0(&self, h: &MillerIndex) -> Vector3<f64> {
        h.transform(&self.ub)
    }

    /// Reciprocal-lattice vector of `h` at rotation angle `phi` (degrees)
    pub fn apply(&self, h: &MillerIndex, phi: f64) -> Vector3<f64> {
        rotate_around_axis(&self.pstar0(h), &self.m2, phi.to_radians())
    }

    /// Apply to index-aligned sequences of Miller indices and angles (degrees).
    ///
    /// # Errors
    /// * `PredictionError::LengthMismatch` - If the sequences differ in length
    pub fn apply_all(
        &self,
        indices: &[MillerIndex],
        phi: &[f64],
    ) -> Result<Vec<Vector3<f64>>, PredictionError> {
        if indices.len() != phi.len() {
            return Err(PredictionError::LengthMismatch {
                left: indices.len(),
                right: phi.len(),
            });
        }
        Ok(indices
            .iter()
            .zip(phi)
            .map(|(h, &angle)| self.apply(h, angle))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn transform() -> FromHklToRsv {
        let ub = Matrix3::from_diagonal(&Vector3::new(0.1, 0.05, 0.02));
        FromHklToRsv::new(ub, Vector3::new(0.0, 3.0, 0.0)).unwrap()
    }

    #[test]
    fn test_pstar0() {
        let v = transform().pstar0(&MillerIndex::new(1, 2, -5));
        assert_relative_eq!(v, Vector3::new(0.1, 0.1, -0.1), epsilon = 1e-12);
    }

    #[test]
    fn test_apply_at_zero_is_pstar0() {
        let t = transform();
        let h = MillerIndex::new(3, -1, 2);
        assert_relative_eq!(t.apply(&h, 0.0), t.pstar0(&h), epsilon = 1e-15);
    }

    #[test]
    fn test_apply_rotates_about_axis() {
        let t = transform();
        // (1,0,0) -> (0.1,0,0) rotated +90 degrees about y lands on -z
        let v = t.apply(&MillerIndex::new(1, 0, 0), 90.0);
        assert_relative_eq!(v, Vector3::new(0.0, 0.0, -0.1), epsilon = 1e-12);
    }

    #[test]
    fn test_apply_all() {
        let t = transform();
        let indices = [MillerIndex::new(1, 0, 0), MillerIndex::new(0, 1, 0)];
        let vectors = t.apply_all(&indices, &[0.0, 45.0]).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_relative_eq!(vectors[0], Vector3::new(0.1, 0.0, 0.0), epsilon = 1e-12);
        // On-axis vector is unchanged by the rotation
        assert_relative_eq!(vectors[1], Vector3::new(0.0, 0.05, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_apply_all_length_mismatch() {
        let t = transform();
        let result = t.apply_all(&[MillerIndex::new(1, 0, 0)], &[0.0, 1.0]);
        assert_eq!(
            result,
            Err(PredictionError::LengthMismatch { left: 1, right: 2 })
        );
    }

    #[test]
    fn test_zero_axis_rejected() {
        assert!(FromHklToRsv::new(Matrix3::identity(), Vector3::zeros()).is_err());
    }
}
