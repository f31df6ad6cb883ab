//! Monochromatic incident beam model.

use crate::error::ModelError;
use crate::units::{Length, LengthExt};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Incident X-ray beam: a propagation direction and a wavelength.
///
/// The direction points from the source through the sample towards the
/// detector. The wavelength is in Ångström, so the wave vector
/// [`Beam::s0`] is in reciprocal Ångström.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    direction: Vector3<f64>,
    wavelength: f64,
}

impl Beam {
    /// Create a beam, normalising the direction.
    ///
    /// # Returns
    /// * `Ok(Beam)` - Validated beam
    /// * `Err(ModelError)` - If the direction is zero or the wavelength is not positive
    pub fn new(direction: Vector3<f64>, wavelength: f64) -> Result<Self, ModelError> {
        let beam = Self {
            direction,
            wavelength,
        };
        beam.validate()?;
        Ok(Self {
            direction: direction.normalize(),
            wavelength,
        })
    }

    /// Check the invariants that deserialisation cannot enforce
    pub fn validate(&self) -> Result<(), ModelError> {
        // Negated comparisons also reject NaN
        if !(self.wavelength > 0.0) {
            return Err(ModelError::NonPositiveWavelength(self.wavelength));
        }
        if !(self.direction.norm() > 0.0) {
            return Err(ModelError::ZeroVector("beam direction"));
        }
        Ok(())
    }

    /// Unit propagation direction
    pub fn direction(&self) -> Vector3<f64> {
        self.direction.normalize()
    }

    /// Wavelength in Ångström
    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    /// Wavelength as a typed length
    pub fn wavelength_length(&self) -> Length {
        Length::from_angstroms(self.wavelength)
    }

    /// Incident wave vector: unit direction scaled by 1/wavelength
    pub fn s0(&self) -> Vector3<f64> {
        self.direction() / self.wavelength
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_s0_scaled_by_inverse_wavelength() {
        let beam = Beam::new(Vector3::new(0.0, 0.0, 2.0), 0.5).unwrap();
        assert_relative_eq!(beam.direction(), Vector3::z());
        assert_relative_eq!(beam.s0(), Vector3::new(0.0, 0.0, 2.0));
        assert_relative_eq!(beam.s0().norm(), 1.0 / beam.wavelength());
    }

    #[test]
    fn test_rejects_bad_wavelength() {
        assert_eq!(
            Beam::new(Vector3::z(), 0.0),
            Err(ModelError::NonPositiveWavelength(0.0))
        );
        assert!(Beam::new(Vector3::z(), -1.0).is_err());
        assert!(Beam::new(Vector3::z(), f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_zero_direction() {
        assert_eq!(
            Beam::new(Vector3::zeros(), 1.0),
            Err(ModelError::ZeroVector("beam direction"))
        );
    }

    #[test]
    fn test_deserialized_beam_is_validated_separately() {
        let beam: Beam =
            serde_json::from_str(r#"{"direction":[0.0,0.0,1.0],"wavelength":-2.0}"#).unwrap();
        assert!(beam.validate().is_err());
    }

    #[test]
    fn test_wavelength_length() {
        let beam = Beam::new(Vector3::z(), 0.9795).unwrap();
        assert_relative_eq!(beam.wavelength_length().as_angstroms(), 0.9795, epsilon = 1e-12);
    }
}
