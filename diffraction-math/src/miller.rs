//! Miller index type for reciprocal-lattice points.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer triple identifying a reciprocal-lattice point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MillerIndex {
    pub h: i32,
    pub k: i32,
    pub l: i32,
}

impl MillerIndex {
    /// Create a new Miller index
    pub const fn new(h: i32, k: i32, l: i32) -> Self {
        Self { h, k, l }
    }

    /// The origin of reciprocal space, never a diffracting point
    pub const fn zero() -> Self {
        Self::new(0, 0, 0)
    }

    /// True for (0, 0, 0)
    pub fn is_zero(&self) -> bool {
        self.h == 0 && self.k == 0 && self.l == 0
    }

    /// Index as a floating point column vector
    pub fn to_vector3(&self) -> Vector3<f64> {
        Vector3::new(self.h as f64, self.k as f64, self.l as f64)
    }

    /// Apply an orientation (UB) matrix: `UB * h`
    pub fn transform(&self, ub: &Matrix3<f64>) -> Vector3<f64> {
        ub * self.to_vector3()
    }
}

impl From<(i32, i32, i32)> for MillerIndex {
    fn from(hkl: (i32, i32, i32)) -> Self {
        Self::new(hkl.0, hkl.1, hkl.2)
    }
}

impl From<[i32; 3]> for MillerIndex {
    fn from(hkl: [i32; 3]) -> Self {
        Self::new(hkl[0], hkl[1], hkl[2])
    }
}

impl From<MillerIndex> for [i32; 3] {
    fn from(index: MillerIndex) -> Self {
        [index.h, index.k, index.l]
    }
}

impl fmt::Display for MillerIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {})", self.h, self.k, self.l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero() {
        assert!(MillerIndex::zero().is_zero());
        assert!(!MillerIndex::new(0, 0, 1).is_zero());
        assert!(!MillerIndex::new(-1, 0, 0).is_zero());
    }

    #[test]
    fn test_transform_identity() {
        let h = MillerIndex::new(1, -2, 3);
        let v = h.transform(&Matrix3::identity());
        assert_relative_eq!(v, Vector3::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn test_transform_scaled_cell() {
        // Orthorhombic cell a=10, b=20, c=40 in the standard setting
        let ub = Matrix3::from_diagonal(&Vector3::new(0.1, 0.05, 0.025));
        let v = MillerIndex::new(2, 2, 4).transform(&ub);
        assert_relative_eq!(v, Vector3::new(0.2, 0.1, 0.1), epsilon = 1e-12);
    }

    #[test]
    fn test_conversions() {
        let h: MillerIndex = (1, 2, 3).into();
        assert_eq!(h, MillerIndex::from([1, 2, 3]));
        let arr: [i32; 3] = h.into();
        assert_eq!(arr, [1, 2, 3]);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", MillerIndex::new(1, -1, 0)), "(1, -1, 0)");
    }

    #[test]
    fn test_serde_roundtrip() {
        let original = MillerIndex::new(-3, 4, 7);
        let json = serde_json::to_string(&original).unwrap();
        let recovered: MillerIndex = serde_json::from_str(&json).unwrap();
        assert_eq!(original, recovered);
    }
}
