//! Spot prediction for a rotation scan.
//!
//! [`SpotPredictor`] runs every candidate Miller index through the rotation
//! angle solver and the detector projection, keeping the reflections that
//! diffract within the scan and land on a panel.

use crate::error::PredictionError;
use crate::index_generator::ResolutionIndexGenerator;
use crate::rotation_angles::RotationAngles;
use crate::transform::{FromBeamVectorToDetector, FromHklToRsv};
use diffraction_math::{rotate_around_axis, MillerIndex};
use nalgebra::{Vector2, Vector3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use shared::units::{Angle, AngleExt};
use shared::{Beam, Crystal, Detector, Experiment, Goniometer, Scan};
use std::fmt;
use std::ops::AddAssign;

/// Candidates handed to each rayon task by [`SpotPredictor::predict_parallel`]
const PARALLEL_CHUNK_SIZE: usize = 256;

/// A reflection predicted to be recorded on the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedReflection {
    pub miller_index: MillerIndex,
    /// Rotation angle in degrees, inside the scan range
    pub rotation_angle: f64,
    /// Diffracted beam vector `s1`, with `|s1| = 1 / wavelength`
    pub beam_vector: Vector3<f64>,
    /// Index of the panel the beam hits
    pub panel: usize,
    /// Fast pixel, slow pixel, and continuous zero-based frame number
    pub image_coord: Vector3<f64>,
}

/// Counts of where candidates dropped out of the pipeline.
///
/// `candidates` counts Miller indices; every other field counts solutions,
/// of which each solvable index has two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionStats {
    pub candidates: usize,
    pub unsolvable: usize,
    pub outside_scan: usize,
    pub no_intersection: usize,
    pub outside_panel: usize,
    pub predicted: usize,
}

impl AddAssign for PredictionStats {
    fn add_assign(&mut self, other: Self) {
        self.candidates += other.candidates;
        self.unsolvable += other.unsolvable;
        self.outside_scan += other.outside_scan;
        self.no_intersection += other.no_intersection;
        self.outside_panel += other.outside_panel;
        self.predicted += other.predicted;
    }
}

impl fmt::Display for PredictionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} candidates: {} unsolvable, {} outside scan, {} missed detector, \
             {} off panel, {} predicted",
            self.candidates,
            self.unsolvable,
            self.outside_scan,
            self.no_intersection,
            self.outside_panel,
            self.predicted
        )
    }
}

/// Result of a prediction run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Predictions {
    pub reflections: Vec<PredictedReflection>,
    pub stats: PredictionStats,
}

impl Predictions {
    pub fn len(&self) -> usize {
        self.reflections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reflections.is_empty()
    }

    /// Split into index-aligned columns
    pub fn to_columns(&self) -> PredictionColumns {
        PredictionColumns::from(self.reflections.as_slice())
    }
}

/// Predicted reflections as parallel, equal-length columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionColumns {
    pub miller_indices: Vec<MillerIndex>,
    pub rotation_angles: Vec<f64>,
    pub beam_vectors: Vec<Vector3<f64>>,
    pub image_coords: Vec<Vector3<f64>>,
    pub panels: Vec<usize>,
}

impl PredictionColumns {
    pub fn len(&self) -> usize {
        self.miller_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.miller_indices.is_empty()
    }
}

impl From<&[PredictedReflection]> for PredictionColumns {
    fn from(reflections: &[PredictedReflection]) -> Self {
        let mut columns = Self::default();
        for r in reflections {
            columns.miller_indices.push(r.miller_index);
            columns.rotation_angles.push(r.rotation_angle);
            columns.beam_vectors.push(r.beam_vector);
            columns.image_coords.push(r.image_coord);
            columns.panels.push(r.panel);
        }
        columns
    }
}

/// Predicts spot positions for one crystal in one rotation scan.
///
/// The models are validated and copied at construction; the predictor is
/// immutable afterwards and can be shared across threads.
#[derive(Debug, Clone)]
pub struct SpotPredictor {
    s0: Vector3<f64>,
    rotation_axis: Vector3<f64>,
    detector: Detector,
    scan: Scan,
    crystal: Crystal,
    hkl_to_rsv: FromHklToRsv,
    rotation_angles: RotationAngles,
    beam_to_detector: FromBeamVectorToDetector,
}

impl SpotPredictor {
    /// Build a predictor from the experiment models
    ///
    /// # Errors
    /// * `PredictionError::Model` - If any model is invalid
    /// * `PredictionError::Geometry` - If the rotation axis is parallel to the beam
    pub fn new(
        beam: &Beam,
        detector: &Detector,
        goniometer: &Goniometer,
        scan: &Scan,
        crystal: &Crystal,
    ) -> Result<Self, PredictionError> {
        beam.validate()?;
        detector.validate()?;
        goniometer.validate()?;
        scan.validate()?;
        crystal.validate()?;

        let s0 = beam.s0();
        let rotation_axis = goniometer.rotation_axis();
        let rotation_angles = RotationAngles::new(&s0, &rotation_axis)?;

        Ok(Self {
            s0,
            rotation_axis: rotation_angles.rotation_axis(),
            detector: detector.clone(),
            scan: scan.clone(),
            crystal: crystal.clone(),
            hkl_to_rsv: FromHklToRsv::new(*crystal.ub(), rotation_axis)?,
            beam_to_detector: FromBeamVectorToDetector::new(detector)?,
            rotation_angles,
        })
    }

    /// Build a predictor from a complete experiment description
    pub fn from_experiment(experiment: &Experiment) -> Result<Self, PredictionError> {
        Self::new(
            &experiment.beam,
            &experiment.detector,
            &experiment.goniometer,
            &experiment.scan,
            &experiment.crystal,
        )
    }

    /// Incident beam vector
    pub fn s0(&self) -> Vector3<f64> {
        self.s0
    }

    pub fn scan(&self) -> &Scan {
        &self.scan
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    /// Predict reflections for a sequence of candidate Miller indices.
    ///
    /// Output follows input order; the two solutions of one index appear in
    /// the solver's order. Candidates that do not diffract, diffract outside
    /// the scan or miss every panel are dropped and counted in the stats.
    pub fn predict<I>(&self, indices: I) -> Predictions
    where
        I: IntoIterator<Item = MillerIndex>,
    {
        let mut predictions = Predictions::default();
        for h in indices {
            self.predict_index(&h, &mut predictions.reflections, &mut predictions.stats);
        }
        log::debug!("Spot prediction: {}", predictions.stats);
        predictions
    }

    /// Same result as [`Self::predict`], computed with rayon.
    pub fn predict_parallel(&self, indices: &[MillerIndex]) -> Predictions {
        let partials: Vec<Predictions> = indices
            .par_chunks(PARALLEL_CHUNK_SIZE)
            .map(|chunk| {
                let mut partial = Predictions::default();
                for h in chunk {
                    self.predict_index(h, &mut partial.reflections, &mut partial.stats);
                }
                partial
            })
            .collect();

        let mut predictions = Predictions::default();
        for partial in partials {
            predictions.reflections.extend(partial.reflections);
            predictions.stats += partial.stats;
        }
        log::debug!("Parallel spot prediction: {}", predictions.stats);
        predictions
    }

    /// Predict every reflection with d-spacing of at least `d_min` Ångström
    ///
    /// # Errors
    /// * `PredictionError::InvalidResolution` - If `d_min` is not positive
    pub fn predict_to_resolution(&self, d_min: f64) -> Result<Predictions, PredictionError> {
        let generator = ResolutionIndexGenerator::new(&self.crystal, d_min)?;
        log::info!(
            "Generating indices to {:.3} Å (max |h|, |k|, |l| = {:?})",
            d_min,
            generator.max_index()
        );
        Ok(self.predict(generator))
    }

    fn predict_index(
        &self,
        h: &MillerIndex,
        out: &mut Vec<PredictedReflection>,
        stats: &mut PredictionStats,
    ) {
        stats.candidates += 1;

        let pstar0 = self.hkl_to_rsv.pstar0(h);
        let Some(angles) = self.rotation_angles.calculate(&pstar0) else {
            stats.unsolvable += 2;
            return;
        };

        for phi in angles {
            let degrees = Angle::from_radians(phi).as_degrees();
            let Some(rotation_angle) = self.scan.equivalent_angle(degrees) else {
                stats.outside_scan += 1;
                continue;
            };

            let pstar = rotate_around_axis(&pstar0, &self.rotation_axis, phi);
            let beam_vector = self.s0 + pstar;

            match self.find_panel(&beam_vector) {
                PanelHit::Inside(panel, xy) => {
                    let frame = self.scan.frame_from_angle(rotation_angle);
                    out.push(PredictedReflection {
                        miller_index: *h,
                        rotation_angle,
                        beam_vector,
                        panel,
                        image_coord: Vector3::new(xy.x, xy.y, frame),
                    });
                    stats.predicted += 1;
                }
                PanelHit::OffPanel => stats.outside_panel += 1,
                PanelHit::Miss => stats.no_intersection += 1,
            }
        }
    }

    /// First panel whose bounds contain the beam's intersection point
    fn find_panel(&self, s1: &Vector3<f64>) -> PanelHit {
        let mut hit_plane = false;
        for panel in 0..self.beam_to_detector.num_panels() {
            let Some(xy) = self.beam_to_detector.apply(panel, s1) else {
                continue;
            };
            if self.detector.is_coordinate_valid(panel, &xy) {
                return PanelHit::Inside(panel, xy);
            }
            hit_plane = true;
        }
        if hit_plane {
            PanelHit::OffPanel
        } else {
            PanelHit::Miss
        }
    }
}

enum PanelHit {
    Inside(usize, Vector2<f64>),
    OffPanel,
    Miss,
}
