//! Crystal orientation model.

use crate::error::ModelError;
use diffraction_math::MillerIndex;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Smallest |det UB| accepted for an orientation matrix (Å⁻³)
const MIN_UB_DETERMINANT: f64 = 1e-15;

/// Crystal described by its orientation matrix UB.
///
/// `UB * h` is the lab-frame reciprocal-lattice vector of Miller index `h`
/// at rotation angle zero, in reciprocal Ångström.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crystal {
    ub: Matrix3<f64>,
}

impl Crystal {
    /// Create a crystal from a non-singular UB matrix
    pub fn new(ub: Matrix3<f64>) -> Result<Self, ModelError> {
        let crystal = Self { ub };
        crystal.validate()?;
        Ok(crystal)
    }

    /// Check the invariants that deserialisation cannot enforce
    pub fn validate(&self) -> Result<(), ModelError> {
        let determinant = self.ub.determinant();
        if !(determinant.abs() > MIN_UB_DETERMINANT) {
            return Err(ModelError::SingularOrientation { determinant });
        }
        Ok(())
    }

    /// The orientation matrix
    pub fn ub(&self) -> &Matrix3<f64> {
        &self.ub
    }

    /// Real-space basis, one lattice vector (Å) per column of `UB⁻ᵀ`
    pub fn real_space_vectors(&self) -> Result<[Vector3<f64>; 3], ModelError> {
        let inverse = self.ub.try_inverse().ok_or(ModelError::SingularOrientation {
            determinant: self.ub.determinant(),
        })?;
        let a = inverse.transpose();
        Ok([
            a.column(0).into_owned(),
            a.column(1).into_owned(),
            a.column(2).into_owned(),
        ])
    }

    /// Reciprocal-lattice vector of `h` at rotation angle zero
    pub fn reciprocal_vector(&self, h: &MillerIndex) -> Vector3<f64> {
        h.transform(&self.ub)
    }

    /// Resolution (d-spacing, Å) of a Miller index; infinite for (0, 0, 0)
    pub fn resolution(&self, h: &MillerIndex) -> f64 {
        1.0 / self.reciprocal_vector(h).norm()
    }
}
