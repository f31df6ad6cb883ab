//! Diffracted beam vectors tabulated over detector pixels.
//!
//! Each panel is divided into `n_div × n_div` sub-pixels and the beam vector
//! pointing at every sample position is stored in an array indexed
//! `[slow, fast]`. Sample positions are either sub-pixel centres or
//! sub-pixel corners; corner sampling includes the far edge, so its grid
//! is one larger in each direction.

use nalgebra::{Vector2, Vector3};
use ndarray::{Array2, Axis};
use rayon::prelude::*;
use shared::{Beam, Detector, Panel};
use thiserror::Error;

/// Invalid inputs to the beam vector tabulation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BeamVectorMapError {
    #[error("wavelength must be positive, got {0} Å")]
    NonPositiveWavelength(f64),
    #[error("number of sub-divisions must be at least 1")]
    ZeroDivisions,
}

/// Tabulate the beam vector over a panel at sub-pixel resolution.
///
/// With `corner` unset the grid has shape `(slow * n_div, fast * n_div)` and
/// cell `(j, i)` samples pixel coordinate `((i + 0.5) / n_div, (j + 0.5) / n_div)`.
/// With `corner` set the shape gains one row and one column and cell
/// `(j, i)` samples `(i / n_div, j / n_div)`. Every vector has length
/// `1 / wavelength` and points from the sample to the sample position.
///
/// # Errors
/// * `BeamVectorMapError::NonPositiveWavelength` - If the beam wavelength is not positive
/// * `BeamVectorMapError::ZeroDivisions` - If `n_div` is zero
pub fn beam_vector_map(
    panel: &Panel,
    beam: &Beam,
    n_div: usize,
    corner: bool,
) -> Result<Array2<Vector3<f64>>, BeamVectorMapError> {
    let wavelength = beam.wavelength();
    if !(wavelength > 0.0) {
        return Err(BeamVectorMapError::NonPositiveWavelength(wavelength));
    }
    if n_div == 0 {
        return Err(BeamVectorMapError::ZeroDivisions);
    }

    let (slow, fast) = panel.image_size().grid_shape();
    let (mut rows, mut cols) = (slow * n_div, fast * n_div);
    let offset = if corner {
        rows += 1;
        cols += 1;
        0.0
    } else {
        0.5
    };

    let n_div_r = 1.0 / n_div as f64;
    let wavelength_r = 1.0 / wavelength;

    let mut map = Array2::from_elem((rows, cols), Vector3::zeros());
    map.axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(j, mut row)| {
            let y = (j as f64 + offset) * n_div_r;
            for (i, s1) in row.iter_mut().enumerate() {
                let x = (i as f64 + offset) * n_div_r;
                let lab = panel.pixel_to_lab(&Vector2::new(x, y));
                *s1 = lab.normalize() * wavelength_r;
            }
        });

    log::debug!(
        "Beam vector map for panel '{}': {}x{} samples (n_div={}, corner={})",
        panel.name,
        cols,
        rows,
        n_div,
        corner
    );
    Ok(map)
}

/// One sample per pixel, at corners or centres
pub fn beam_vector_map_pixels(
    panel: &Panel,
    beam: &Beam,
    corner: bool,
) -> Result<Array2<Vector3<f64>>, BeamVectorMapError> {
    beam_vector_map(panel, beam, 1, corner)
}

/// One sample per pixel, at pixel centres
pub fn beam_vector_map_centres(
    panel: &Panel,
    beam: &Beam,
) -> Result<Array2<Vector3<f64>>, BeamVectorMapError> {
    beam_vector_map(panel, beam, 1, false)
}

/// Tabulate every panel of a detector, in panel order
pub fn beam_vector_map_detector(
    detector: &Detector,
    beam: &Beam,
    n_div: usize,
    corner: bool,
) -> Result<Vec<Array2<Vector3<f64>>>, BeamVectorMapError> {
    detector
        .panels()
        .iter()
        .map(|panel| beam_vector_map(panel, beam, n_div, corner))
        .collect()
}
