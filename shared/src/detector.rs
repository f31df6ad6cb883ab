//! Planar detector panels and multi-panel detectors.
//!
//! A panel is a flat rectangle of pixels placed in the laboratory frame. Its
//! geometry is fixed by three lab-frame vectors (in millimeters, sample at
//! the origin):
//!
//! - `origin`: lab position of the outer corner of pixel (0, 0)
//! - `fast_axis`: unit direction of increasing pixel x
//! - `slow_axis`: unit direction of increasing pixel y
//!
//! Continuous pixel coordinates run from `(0, 0)` at the origin corner to
//! `(fast, slow)` at the opposite corner, so the centre of pixel `(i, j)` is
//! at `(i + 0.5, j + 0.5)`.

use crate::error::ModelError;
use crate::image_size::ImageSize;
use nalgebra::{Matrix3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Smallest |fast × slow| accepted for a panel
const MIN_AXIS_CROSS: f64 = 1e-6;

/// Smallest |det D| accepted, in mm (scale of origin distance)
const MIN_PLANE_DETERMINANT: f64 = 1e-9;

/// A single flat detector panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Human readable identifier
    pub name: String,
    origin: Vector3<f64>,
    fast_axis: Vector3<f64>,
    slow_axis: Vector3<f64>,
    /// Pixel pitch along (fast, slow) in millimeters
    pixel_size: (f64, f64),
    image_size: ImageSize,
}

impl Panel {
    /// Create a panel from its lab-frame geometry.
    ///
    /// The fast and slow axes are normalised.
    ///
    /// # Arguments
    /// * `name` - Panel identifier
    /// * `origin` - Lab position of the (0, 0) pixel corner in mm
    /// * `fast_axis` - Direction of increasing pixel x
    /// * `slow_axis` - Direction of increasing pixel y
    /// * `pixel_size` - Pixel pitch (fast, slow) in mm
    /// * `image_size` - Number of pixels (fast, slow)
    ///
    /// # Returns
    /// * `Ok(Panel)` - Validated panel
    /// * `Err(ModelError)` - If the axes are degenerate, the pixel size or image size is
    ///   invalid, or the panel plane passes through the sample
    pub fn new(
        name: impl Into<String>,
        origin: Vector3<f64>,
        fast_axis: Vector3<f64>,
        slow_axis: Vector3<f64>,
        pixel_size: (f64, f64),
        image_size: ImageSize,
    ) -> Result<Self, ModelError> {
        if !(fast_axis.norm() > 0.0) {
            return Err(ModelError::ZeroVector("fast axis"));
        }
        if !(slow_axis.norm() > 0.0) {
            return Err(ModelError::ZeroVector("slow axis"));
        }
        let panel = Self {
            name: name.into(),
            origin,
            fast_axis: fast_axis.normalize(),
            slow_axis: slow_axis.normalize(),
            pixel_size,
            image_size,
        };
        panel.validate()?;
        Ok(panel)
    }

    /// Panel perpendicular to +z at `distance` mm from the sample.
    ///
    /// Fast runs along +x and slow along +y. The direct beam along +z hits
    /// the panel at `beam_centre` (fast, slow) given in millimeters from the
    /// origin corner.
    pub fn normal_to_beam(
        name: impl Into<String>,
        distance: f64,
        beam_centre: (f64, f64),
        pixel_size: (f64, f64),
        image_size: ImageSize,
    ) -> Result<Self, ModelError> {
        Self::new(
            name,
            Vector3::new(-beam_centre.0, -beam_centre.1, distance),
            Vector3::x(),
            Vector3::y(),
            pixel_size,
            image_size,
        )
    }

    /// Check the invariants that deserialisation cannot enforce
    pub fn validate(&self) -> Result<(), ModelError> {
        let (px, py) = self.pixel_size;
        if !(px > 0.0 && py > 0.0) {
            return Err(ModelError::NonPositivePixelSize(px, py));
        }
        if self.image_size.is_empty() {
            return Err(ModelError::EmptyImage(
                self.image_size.fast,
                self.image_size.slow,
            ));
        }
        if self.fast_axis.cross(&self.slow_axis).norm() < MIN_AXIS_CROSS {
            return Err(ModelError::ParallelPanelAxes);
        }
        let determinant = self.d_matrix().determinant();
        if !(determinant.abs() > MIN_PLANE_DETERMINANT) {
            return Err(ModelError::PlaneThroughSample { determinant });
        }
        Ok(())
    }

    /// Lab position of the (0, 0) pixel corner (mm)
    pub fn origin(&self) -> Vector3<f64> {
        self.origin
    }

    /// Unit fast axis
    pub fn fast_axis(&self) -> Vector3<f64> {
        self.fast_axis.normalize()
    }

    /// Unit slow axis
    pub fn slow_axis(&self) -> Vector3<f64> {
        self.slow_axis.normalize()
    }

    /// Unit normal `fast × slow`
    pub fn normal(&self) -> Vector3<f64> {
        self.fast_axis().cross(&self.slow_axis()).normalize()
    }

    /// Pixel pitch (fast, slow) in mm
    pub fn pixel_size(&self) -> (f64, f64) {
        self.pixel_size
    }

    /// Image dimensions in pixels
    pub fn image_size(&self) -> ImageSize {
        self.image_size
    }

    /// Physical panel dimensions (fast, slow) in mm
    pub fn size_mm(&self) -> (f64, f64) {
        (
            self.image_size.fast as f64 * self.pixel_size.0,
            self.image_size.slow as f64 * self.pixel_size.1,
        )
    }

    /// Matrix with columns `[fast, slow, origin]`.
    ///
    /// Maps homogeneous panel millimeter coordinates `(x, y, 1)` to the lab frame.
    pub fn d_matrix(&self) -> Matrix3<f64> {
        Matrix3::from_columns(&[self.fast_axis(), self.slow_axis(), self.origin])
    }

    /// Distance from the sample to the panel plane along its normal (mm)
    pub fn distance(&self) -> f64 {
        self.origin.dot(&self.normal()).abs()
    }

    /// Convert pixel coordinates to panel millimeters
    pub fn pixel_to_millimeter(&self, px: &Vector2<f64>) -> Vector2<f64> {
        Vector2::new(px.x * self.pixel_size.0, px.y * self.pixel_size.1)
    }

    /// Convert panel millimeters to pixel coordinates
    pub fn millimeter_to_pixel(&self, mm: &Vector2<f64>) -> Vector2<f64> {
        Vector2::new(mm.x / self.pixel_size.0, mm.y / self.pixel_size.1)
    }

    /// Lab position (mm) of a panel millimeter coordinate
    pub fn millimeter_to_lab(&self, mm: &Vector2<f64>) -> Vector3<f64> {
        self.origin + self.fast_axis() * mm.x + self.slow_axis() * mm.y
    }

    /// Lab position (mm) of a continuous pixel coordinate
    pub fn pixel_to_lab(&self, px: &Vector2<f64>) -> Vector3<f64> {
        self.millimeter_to_lab(&self.pixel_to_millimeter(px))
    }

    /// True if the pixel coordinate lies on the panel
    pub fn is_coordinate_valid(&self, px: &Vector2<f64>) -> bool {
        self.image_size.contains(px.x, px.y)
    }
}

/// A detector made of one or more panels.
///
/// Panels are kept in the order given; lookups that could match several
/// panels report the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detector {
    panels: Vec<Panel>,
}

impl Detector {
    /// Create a detector from a non-empty list of panels
    pub fn new(panels: Vec<Panel>) -> Result<Self, ModelError> {
        let detector = Self { panels };
        detector.validate()?;
        Ok(detector)
    }

    /// Create a single-panel detector
    pub fn single(panel: Panel) -> Self {
        Self {
            panels: vec![panel],
        }
    }

    /// Check every panel, and that there is at least one
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.panels.is_empty() {
            return Err(ModelError::NoPanels);
        }
        self.panels.iter().try_for_each(Panel::validate)
    }

    /// All panels in order
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Panel by index
    pub fn panel(&self, index: usize) -> Option<&Panel> {
        self.panels.get(index)
    }

    /// Number of panels
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// True if the detector has no panels (only possible before validation)
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Total number of pixels across all panels
    pub fn total_pixel_count(&self) -> usize {
        self.panels
            .iter()
            .map(|p| p.image_size().pixel_count())
            .sum()
    }

    /// True if the pixel coordinate lies on the given panel
    pub fn is_coordinate_valid(&self, panel: usize, px: &Vector2<f64>) -> bool {
        self.panels
            .get(panel)
            .is_some_and(|p| p.is_coordinate_valid(px))
    }
}
