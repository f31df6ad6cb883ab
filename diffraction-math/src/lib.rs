//! diffraction-math - Mathematical building blocks for rotation-scan spot prediction
//!
//! This crate provides the small amount of pure math shared by the geometry
//! models and the prediction core:
//!
//! - **MillerIndex** - Integer reciprocal-lattice point identity (h, k, l)
//! - **Rotation** - Right-handed rotation of vectors about a unit axis
//! - **RotationFrame** - Orthonormal frame built from a rotation axis and beam
//!
//! # Example
//!
//! ```
//! use diffraction_math::{rotate_around_axis, MillerIndex};
//! use nalgebra::Vector3;
//!
//! let h = MillerIndex::new(1, 0, 0);
//! assert!(!h.is_zero());
//!
//! let axis = Vector3::new(0.0, 1.0, 0.0);
//! let v = rotate_around_axis(&Vector3::new(1.0, 0.0, 0.0), &axis, std::f64::consts::FRAC_PI_2);
//! assert!((v.z + 1.0).abs() < 1e-12);
//! ```

pub mod miller;
pub mod rotation;

pub use miller::MillerIndex;
pub use rotation::{rotate_around_axis, rotation_matrix, DegenerateAxisError, RotationFrame};
