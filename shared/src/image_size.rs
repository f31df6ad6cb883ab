//! Panel image dimensions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Image dimensions of a detector panel.
///
/// `fast` counts pixels along the panel's fast (readout) axis and `slow`
/// along the slow axis. A pixel grid stored row-major has `slow` rows of
/// `fast` columns, which is the order ndarray shapes use: `(slow, fast)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    /// Pixels along the fast axis (columns)
    pub fast: usize,
    /// Pixels along the slow axis (rows)
    pub slow: usize,
}

impl ImageSize {
    /// Create a new ImageSize
    pub fn new(fast: usize, slow: usize) -> Self {
        Self { fast, slow }
    }

    /// Get total number of pixels
    pub fn pixel_count(&self) -> usize {
        self.fast * self.slow
    }

    /// True if either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.fast == 0 || self.slow == 0
    }

    /// Shape of a row-major grid covering the image, as `(rows, columns)`
    pub fn grid_shape(&self) -> (usize, usize) {
        (self.slow, self.fast)
    }

    /// Check whether a continuous pixel coordinate lies on the image.
    ///
    /// The valid region is `[0, fast) x [0, slow)`.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.fast as f64 && y < self.slow as f64
    }
}

impl From<(usize, usize)> for ImageSize {
    fn from(dimensions: (usize, usize)) -> Self {
        Self::new(dimensions.0, dimensions.1)
    }
}

impl From<ImageSize> for (usize, usize) {
    fn from(size: ImageSize) -> Self {
        (size.fast, size.slow)
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.fast, self.slow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_count() {
        let size = ImageSize::new(2463, 2527);
        assert_eq!(size.pixel_count(), 2463 * 2527);
        assert!(!size.is_empty());
        assert!(ImageSize::new(0, 100).is_empty());
    }

    #[test]
    fn test_grid_shape_is_rows_then_columns() {
        let size = ImageSize::new(100, 50);
        assert_eq!(size.grid_shape(), (50, 100));
    }

    #[test]
    fn test_contains() {
        let size = ImageSize::new(100, 50);
        assert!(size.contains(0.0, 0.0));
        assert!(size.contains(99.9, 49.9));
        assert!(!size.contains(100.0, 0.0));
        assert!(!size.contains(0.0, 50.0));
        assert!(!size.contains(-0.1, 10.0));
        assert!(!size.contains(f64::NAN, 10.0));
    }

    #[test]
    fn test_tuple_conversions() {
        let size: ImageSize = (320usize, 240usize).into();
        assert_eq!(size, ImageSize::new(320, 240));
        let tuple: (usize, usize) = size.into();
        assert_eq!(tuple, (320, 240));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ImageSize::new(2463, 2527)), "2463x2527");
    }

    #[test]
    fn test_serde_roundtrip() {
        let original = ImageSize::new(1024, 2048);
        let json = serde_json::to_string(&original).unwrap();
        assert_eq!(json, r#"{"fast":1024,"slow":2048}"#);
        let recovered: ImageSize = serde_json::from_str(&json).unwrap();
        assert_eq!(original, recovered);
    }
}
