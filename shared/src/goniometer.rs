//! Single-axis goniometer model.

use crate::error::ModelError;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Goniometer turning the crystal about one fixed lab-frame axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goniometer {
    rotation_axis: Vector3<f64>,
}

impl Goniometer {
    /// Create a goniometer, normalising the axis
    pub fn new(rotation_axis: Vector3<f64>) -> Result<Self, ModelError> {
        let goniometer = Self { rotation_axis };
        goniometer.validate()?;
        Ok(Self {
            rotation_axis: rotation_axis.normalize(),
        })
    }

    /// Check the invariants that deserialisation cannot enforce
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(self.rotation_axis.norm() > 0.0) {
            return Err(ModelError::ZeroVector("rotation axis"));
        }
        Ok(())
    }

    /// Unit rotation axis
    pub fn rotation_axis(&self) -> Vector3<f64> {
        self.rotation_axis.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_is_normalised() {
        let gonio = Goniometer::new(Vector3::new(3.0, 0.0, 4.0)).unwrap();
        assert_relative_eq!(gonio.rotation_axis(), Vector3::new(0.6, 0.0, 0.8));
    }

    #[test]
    fn test_zero_axis_rejected() {
        assert_eq!(
            Goniometer::new(Vector3::zeros()),
            Err(ModelError::ZeroVector("rotation axis"))
        );
    }
}
