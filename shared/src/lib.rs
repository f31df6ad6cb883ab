//! Shared experiment models for rotation-scan spot prediction.
//!
//! This crate holds the geometric models that the prediction core consumes:
//! the incident beam, planar detector panels, the goniometer rotation axis,
//! the rotation scan and the crystal orientation. It also provides the JSON
//! experiment description that ties them together, and small argument and
//! unit helpers used by the command line tools.

pub mod beam;
pub mod crystal;
pub mod detector;
pub mod error;
pub mod experiment;
pub mod goniometer;
pub mod image_size;
pub mod range_arg;
pub mod scan;
pub mod units;

pub use beam::Beam;
pub use crystal::Crystal;
pub use detector::{Detector, Panel};
pub use error::ModelError;
pub use experiment::{ConfigError, Experiment};
pub use goniometer::Goniometer;
pub use image_size::ImageSize;
pub use range_arg::ScanRangeArg;
pub use scan::Scan;
