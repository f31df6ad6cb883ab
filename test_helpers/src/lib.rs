//! Test helpers for the spot prediction workspace
//!
//! Canonical experiment geometries shared by integration tests, random
//! crystal orientations, and a project-local directory for test artifacts.

use diffraction_math::rotation_matrix;
use nalgebra::{Matrix3, Vector3};
use once_cell::sync::Lazy;
use rand::Rng;
use shared::{Beam, Crystal, Detector, Experiment, Goniometer, ImageSize, Panel, Scan};
use std::env;
use std::f64::consts::PI;
use std::path::{Path, PathBuf};

/// Error type for test helper operations
#[derive(thiserror::Error, Debug)]
pub enum TestHelperError {
    #[error("workspace root not found: {0}")]
    WorkspaceRootNotFound(String),
}

/// Walk up from the current directory to the `Cargo.toml` declaring `[workspace]`
pub fn find_workspace_root() -> Result<PathBuf, TestHelperError> {
    let mut dir = env::current_dir()
        .map_err(|e| TestHelperError::WorkspaceRootNotFound(e.to_string()))?;
    loop {
        let manifest = dir.join("Cargo.toml");
        if let Ok(content) = std::fs::read_to_string(&manifest) {
            if content.contains("[workspace]") {
                return Ok(dir);
            }
        }
        if !dir.pop() {
            return Err(TestHelperError::WorkspaceRootNotFound(
                "no [workspace] manifest above the current directory".to_string(),
            ));
        }
    }
}

static WORKSPACE_ROOT: Lazy<PathBuf> =
    Lazy::new(|| find_workspace_root().expect("Failed to find workspace root"));

/// Path under `<workspace>/test_output`, creating the directory on first use
pub fn output_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let dir = WORKSPACE_ROOT.join("test_output");
    std::fs::create_dir_all(&dir).expect("Failed to create test output directory");
    dir.join(path)
}

/// Wavelength of the canonical experiment (Å)
pub const WAVELENGTH: f64 = 0.9795;

/// Unit cell edge of the canonical cubic crystal (Å)
pub const CELL_EDGE: f64 = 78.0;

/// Single 2463 x 2527 panel of 0.172mm pixels, 200mm from the sample.
pub fn pixel_array_panel(name: &str, distance: f64) -> Panel {
    Panel::normal_to_beam(
        name,
        distance,
        (212.0, 218.0),
        (0.172, 0.172),
        ImageSize::new(2463, 2527),
    )
    .expect("valid panel geometry")
}

/// Cubic crystal with cell edge `a`, turned by a fixed off-axis rotation
/// so that no lattice row lies along the beam or the goniometer axis.
pub fn tilted_cubic(a: f64) -> Crystal {
    let u = rotation_matrix(&Vector3::new(1.0, 2.0, 3.0).normalize(), 0.4);
    Crystal::new(u * Matrix3::from_diagonal_element(1.0 / a)).expect("non-singular UB")
}

/// Cubic crystal with cell edge `a` in a uniformly random orientation
pub fn random_cubic<R: Rng>(rng: &mut R, a: f64) -> Crystal {
    let axis = loop {
        let v = Vector3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let n: f64 = v.norm();
        if n > 0.1 && n <= 1.0 {
            break v / n;
        }
    };
    let angle = rng.gen_range(0.0..2.0 * PI);
    let u = rotation_matrix(&axis, angle);
    Crystal::new(u * Matrix3::from_diagonal_element(1.0 / a)).expect("non-singular UB")
}

/// Beam along +z, axis along +x, 90 degrees in 0.1 degree frames.
pub fn canonical_experiment() -> Experiment {
    Experiment {
        beam: Beam::new(Vector3::z(), WAVELENGTH).expect("valid beam"),
        detector: Detector::single(pixel_array_panel("main", 200.0)),
        goniometer: Goniometer::new(Vector3::x()).expect("valid axis"),
        scan: Scan::new(0.0, 0.1, 900).expect("valid scan"),
        crystal: tilted_cubic(CELL_EDGE),
    }
}

/// Shared instance of [`canonical_experiment`]
pub static CANONICAL_EXPERIMENT: Lazy<Experiment> = Lazy::new(canonical_experiment);

/// Canonical experiment with the detector split into a top and bottom half.
///
/// The halves have the same plane as the single panel, with the bottom
/// half's origin moved down by the top half's height.
pub fn split_panel_experiment() -> Experiment {
    let mut experiment = canonical_experiment();
    let rows = 2527 / 2;
    let top = Panel::normal_to_beam(
        "top",
        200.0,
        (212.0, 218.0),
        (0.172, 0.172),
        ImageSize::new(2463, rows),
    )
    .expect("valid panel geometry");
    let bottom = Panel::normal_to_beam(
        "bottom",
        200.0,
        (212.0, 218.0 - rows as f64 * 0.172),
        (0.172, 0.172),
        ImageSize::new(2463, 2527 - rows),
    )
    .expect("valid panel geometry");
    experiment.detector = Detector::new(vec![top, bottom]).expect("two panels");
    experiment
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_workspace_root_exists() {
        let root = find_workspace_root().unwrap();
        assert!(root.join("Cargo.toml").exists());
    }

    #[test]
    fn test_output_path() {
        let path = output_path("probe.json");
        assert!(path.parent().unwrap().is_dir());
        assert!(path.ends_with("test_output/probe.json"));
    }

    #[test]
    fn test_canonical_experiment_is_valid() {
        CANONICAL_EXPERIMENT.validate().unwrap();
        split_panel_experiment().validate().unwrap();
    }

    #[test]
    fn test_random_cubic_preserves_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let crystal = random_cubic(&mut rng, 50.0);
        for v in crystal.real_space_vectors().unwrap() {
            assert!((v.norm() - 50.0).abs() < 1e-9);
        }
    }
}
