//! Rotation-scan spot prediction
//!
//! This crate predicts where and when reciprocal-lattice points of a rotating
//! crystal satisfy the diffraction condition, and tabulates diffracted beam
//! directions over detector pixels.
//!
//! The prediction pipeline, per candidate Miller index `h`:
//!
//! 1. `pstar0 = UB * h` ([`FromHklToRsv`])
//! 2. Solve for the rotation angles where `pstar0` crosses the Ewald sphere
//!    ([`RotationAngles`])
//! 3. Keep angles recorded by the scan
//! 4. `s1 = s0 + R(phi) * pstar0`, intersect with the detector
//!    ([`FromBeamVectorToDetector`]) and keep hits inside a panel
//! 5. Convert the angle to a frame number and emit a [`PredictedReflection`]
//!
//! Geometric misses at any step are ordinary filters, never errors.

pub mod beam_vector_map;
pub mod error;
pub mod index_generator;
pub mod rotation_angles;
pub mod spot_predictor;
pub mod transform;

pub use beam_vector_map::{
    beam_vector_map, beam_vector_map_centres, beam_vector_map_detector, beam_vector_map_pixels,
    BeamVectorMapError,
};
pub use error::PredictionError;
pub use index_generator::{from_sentinel, ResolutionIndexGenerator};
pub use rotation_angles::RotationAngles;
pub use spot_predictor::{
    PredictedReflection, PredictionColumns, PredictionStats, Predictions, SpotPredictor,
};
pub use transform::{FromBeamVectorToDetector, FromHklToRsv};
