//! Coordinate transforms between Miller indices, reciprocal space and the detector.

pub mod from_beam_vector_to_detector;
pub mod from_hkl_to_rsv;

pub use from_beam_vector_to_detector::FromBeamVectorToDetector;
pub use from_hkl_to_rsv::FromHklToRsv;
