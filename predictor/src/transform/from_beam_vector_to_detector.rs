//! Intersection of diffracted beams with detector panels.
//!
//! For a panel with `D = [fast | slow | origin]`, a lab point on the panel
//! plane is `D * (x, y, 1)` with `(x, y)` in panel millimeters. A ray from
//! the sample along `s1` meets the plane at `t * s1 = D * (x, y, 1)`, so
//! `v = D⁻¹ s1 = (x, y, 1) / t`. The ray hits the plane in front of the
//! sample only when `v.z > 0`; then `(x, y) = (v.x / v.z, v.y / v.z)`.

use nalgebra::{Matrix3, Vector2, Vector3};
use shared::{Detector, ModelError};

/// Precomputed inverse panel matrix
#[derive(Debug, Clone, PartialEq)]
struct PanelTransform {
    d_inverse: Matrix3<f64>,
    pixel_size: (f64, f64),
}

/// Projects diffracted beam vectors onto the panels of a detector.
#[derive(Debug, Clone, PartialEq)]
pub struct FromBeamVectorToDetector {
    panels: Vec<PanelTransform>,
}

impl FromBeamVectorToDetector {
    /// Precompute `D⁻¹` for every panel
    ///
    /// # Errors
    /// * `ModelError::PlaneThroughSample` - If a panel matrix cannot be inverted
    pub fn new(detector: &Detector) -> Result<Self, ModelError> {
        let panels = detector
            .panels()
            .iter()
            .map(|panel| {
                let d = panel.d_matrix();
                let d_inverse = d.try_inverse().ok_or(ModelError::PlaneThroughSample {
                    determinant: d.determinant(),
                })?;
                Ok(PanelTransform {
                    d_inverse,
                    pixel_size: panel.pixel_size(),
                })
            })
            .collect::<Result<Vec<_>, ModelError>>()?;
        Ok(Self { panels })
    }

    /// Number of panels handled
    pub fn num_panels(&self) -> usize {
        self.panels.len()
    }

    /// Intersect a ray with a panel plane, in panel millimeters.
    ///
    /// `s1` need not be unit length. Returns `None` if the panel index is
    /// unknown, the ray is parallel to the panel plane, or the plane lies
    /// behind the sample along the ray. The result is not bounds checked.
    pub fn apply_millimeter(&self, panel: usize, s1: &Vector3<f64>) -> Option<Vector2<f64>> {
        self.panels.get(panel)?.intersect(s1)
    }

    /// Intersect a ray with a panel plane, in pixel coordinates.
    ///
    /// Same conditions as [`Self::apply_millimeter`]. The result is not
    /// bounds checked; use the detector model for that.
    pub fn apply(&self, panel: usize, s1: &Vector3<f64>) -> Option<Vector2<f64>> {
        let transform = self.panels.get(panel)?;
        let mm = transform.intersect(s1)?;
        let (px, py) = transform.pixel_size;
        Some(Vector2::new(mm.x / px, mm.y / py))
    }
}

impl PanelTransform {
    fn intersect(&self, s1: &Vector3<f64>) -> Option<Vector2<f64>> {
        let v = self.d_inverse * s1;
        if !(v.z > 0.0) {
            return None;
        }
        Some(Vector2::new(v.x / v.z, v.y / v.z))
    }
}
