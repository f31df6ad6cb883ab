//! JSON experiment description.
//!
//! An experiment bundles every model a prediction run needs. It is stored as
//! a single JSON document, for example:
//!
//! ```json
//! {
//!   "beam": { "direction": [0.0, 0.0, 1.0], "wavelength": 0.9795 },
//!   "detector": { "panels": [ {
//!       "name": "main",
//!       "origin": [-212.0, -218.0, 200.0],
//!       "fast_axis": [1.0, 0.0, 0.0],
//!       "slow_axis": [0.0, 1.0, 0.0],
//!       "pixel_size": [0.172, 0.172],
//!       "image_size": { "fast": 2463, "slow": 2527 } } ] },
//!   "goniometer": { "rotation_axis": [1.0, 0.0, 0.0] },
//!   "scan": { "oscillation_start": 0.0, "oscillation_width": 0.1, "num_frames": 900 },
//!   "crystal": { "ub": [0.0127, 0.0, 0.0, 0.0, 0.0127, 0.0, 0.0, 0.0, 0.0127] }
//! }
//! ```
//!
//! Matrices are stored column-major, as nalgebra serialises them.

use crate::beam::Beam;
use crate::crystal::Crystal;
use crate::detector::Detector;
use crate::error::ModelError;
use crate::goniometer::Goniometer;
use crate::scan::Scan;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading or saving an experiment description
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed experiment JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid experiment model: {0}")]
    Invalid(#[from] ModelError),
}

/// Everything needed to predict spots for one rotation scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub beam: Beam,
    pub detector: Detector,
    pub goniometer: Goniometer,
    pub scan: Scan,
    pub crystal: Crystal,
}

impl Experiment {
    /// Validate every model
    pub fn validate(&self) -> Result<(), ModelError> {
        self.beam.validate()?;
        self.detector.validate()?;
        self.goniometer.validate()?;
        self.scan.validate()?;
        self.crystal.validate()
    }

    /// Parse and validate an experiment from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let experiment: Experiment = serde_json::from_str(json)?;
        experiment.validate()?;
        Ok(experiment)
    }

    /// Serialise to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save to JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load from JSON file, validating every model
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let experiment = Self::from_json(&json)?;
        log::debug!(
            "Loaded experiment from {}: {} panel(s), {} frame(s)",
            path.display(),
            experiment.detector.len(),
            experiment.scan.num_frames()
        );
        Ok(experiment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::Panel;
    use crate::image_size::ImageSize;
    use nalgebra::{Matrix3, Vector3};

    fn experiment() -> Experiment {
        Experiment {
            beam: Beam::new(Vector3::z(), 1.0).unwrap(),
            detector: Detector::single(
                Panel::normal_to_beam("main", 100.0, (25.0, 25.0), (0.1, 0.1), ImageSize::new(500, 500))
                    .unwrap(),
            ),
            goniometer: Goniometer::new(Vector3::x()).unwrap(),
            scan: Scan::new(0.0, 1.0, 90).unwrap(),
            crystal: Crystal::new(Matrix3::identity() * 0.02).unwrap(),
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let original = experiment();
        let json = original.to_json().unwrap();
        let recovered = Experiment::from_json(&json).unwrap();
        assert_eq!(original, recovered);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("experiment.json");
        let original = experiment();
        original.save_to_file(&path).unwrap();
        let recovered = Experiment::load_from_file(&path).unwrap();
        assert_eq!(original, recovered);
    }

    #[test]
    fn test_documented_example_parses() {
        let json = r#"{
          "beam": { "direction": [0.0, 0.0, 1.0], "wavelength": 0.9795 },
          "detector": { "panels": [ {
              "name": "main",
              "origin": [-212.0, -218.0, 200.0],
              "fast_axis": [1.0, 0.0, 0.0],
              "slow_axis": [0.0, 1.0, 0.0],
              "pixel_size": [0.172, 0.172],
              "image_size": { "fast": 2463, "slow": 2527 } } ] },
          "goniometer": { "rotation_axis": [1.0, 0.0, 0.0] },
          "scan": { "oscillation_start": 0.0, "oscillation_width": 0.1, "num_frames": 900 },
          "crystal": { "ub": [0.0127, 0.0, 0.0, 0.0, 0.0127, 0.0, 0.0, 0.0, 0.0127] }
        }"#;
        let experiment = Experiment::from_json(json).unwrap();
        assert_eq!(experiment.detector.len(), 1);
        assert_eq!(experiment.scan.num_frames(), 900);
    }

    #[test]
    fn test_invalid_model_rejected_on_load() {
        let mut bad = experiment();
        bad.scan = serde_json::from_str(r#"{"oscillation_start":0.0,"oscillation_width":-1.0,"num_frames":5}"#)
            .unwrap();
        let json = serde_json::to_string(&bad).unwrap();
        assert!(matches!(
            Experiment::from_json(&json),
            Err(ConfigError::Invalid(ModelError::NonPositiveOscillation(_)))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Experiment::load_from_file(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Experiment::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
