//! Type-safe angle and length units for diffraction geometry
//!
//! Scan ranges are given in degrees while the rotation math works in radians,
//! and wavelengths are given in Ångström while detector distances are in
//! millimeters. These wrappers around `uom` keep the conversions explicit.

use uom::si::angle::{degree, radian};
use uom::si::length::{angstrom, millimeter};

/// Type alias for plane angles
pub type Angle = uom::si::f64::Angle;

/// Type alias for length measurements
pub type Length = uom::si::f64::Length;

/// Extension trait for angle conversions
pub trait AngleExt {
    /// Create angle from degrees
    fn from_degrees(deg: f64) -> Self;

    /// Get angle in degrees
    fn as_degrees(&self) -> f64;

    /// Create angle from radians
    fn from_radians(rad: f64) -> Self;

    /// Get angle in radians
    fn as_radians(&self) -> f64;
}

/// Extension trait for length conversions used by beam and detector models
pub trait LengthExt {
    /// Create length from Ångström (wavelengths)
    fn from_angstroms(a: f64) -> Self;

    /// Get length in Ångström
    fn as_angstroms(&self) -> f64;

    /// Create length from millimeters (detector geometry)
    fn from_millimeters(mm: f64) -> Self;

    /// Get length in millimeters
    fn as_millimeters(&self) -> f64;
}

impl AngleExt for Angle {
    fn from_degrees(deg: f64) -> Self {
        Angle::new::<degree>(deg)
    }

    fn as_degrees(&self) -> f64 {
        self.get::<degree>()
    }

    fn from_radians(rad: f64) -> Self {
        Angle::new::<radian>(rad)
    }

    fn as_radians(&self) -> f64 {
        self.get::<radian>()
    }
}

impl LengthExt for Length {
    fn from_angstroms(a: f64) -> Self {
        Length::new::<angstrom>(a)
    }

    fn as_angstroms(&self) -> f64 {
        self.get::<angstrom>()
    }

    fn from_millimeters(mm: f64) -> Self {
        Length::new::<millimeter>(mm)
    }

    fn as_millimeters(&self) -> f64 {
        self.get::<millimeter>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_angle_conversions() {
        let a = Angle::from_degrees(180.0);
        assert_relative_eq!(a.as_radians(), PI, epsilon = 1e-12);

        let b = Angle::from_radians(-PI / 6.0);
        assert_relative_eq!(b.as_degrees(), -30.0, epsilon = 1e-10);
    }

    #[test]
    fn test_length_conversions() {
        let wavelength = Length::from_angstroms(1.0);
        assert_relative_eq!(wavelength.as_millimeters(), 1e-7, epsilon = 1e-18);

        let distance = Length::from_millimeters(250.0);
        assert_relative_eq!(distance.as_angstroms(), 2.5e9, max_relative = 1e-12);
    }
}
