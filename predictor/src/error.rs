//! Error type for prediction setup and batch operations.

use diffraction_math::DegenerateAxisError;
use shared::ModelError;
use thiserror::Error;

/// Errors that abort a prediction operation.
///
/// All of these are caller mistakes. Geometric non-solutions (no crossing
/// angle, angle outside the scan, ray missing the detector) are not errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("input sequences have different lengths: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
    #[error("resolution limit must be positive, got {0} Å")]
    InvalidResolution(f64),
    #[error("invalid model: {0}")]
    Model(#[from] ModelError),
    #[error("invalid rotation geometry: {0}")]
    Geometry(#[from] DegenerateAxisError),
}
