//! Validation errors for the experiment models.

use thiserror::Error;

/// Error raised when a model is constructed (or loaded) with invalid parameters.
///
/// These are caller mistakes: a prediction cannot proceed with any of them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("wavelength must be strictly positive, got {0}")]
    NonPositiveWavelength(f64),
    #[error("{0} vector has zero length")]
    ZeroVector(&'static str),
    #[error("pixel size must be positive, got ({0}, {1}) mm")]
    NonPositivePixelSize(f64, f64),
    #[error("image size must be non-empty, got {0}x{1}")]
    EmptyImage(usize, usize),
    #[error("fast and slow axes are parallel")]
    ParallelPanelAxes,
    #[error("panel plane passes through the sample position (det = {determinant:.3e})")]
    PlaneThroughSample { determinant: f64 },
    #[error("detector must have at least one panel")]
    NoPanels,
    #[error("oscillation width must be positive, got {0}°")]
    NonPositiveOscillation(f64),
    #[error("scan must contain at least one frame")]
    EmptyScan,
    #[error("orientation matrix is singular (det = {determinant:.3e})")]
    SingularOrientation { determinant: f64 },
}
