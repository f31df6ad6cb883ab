//! Rotation scan model: which rotation angles were recorded and on which frame.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// A contiguous rotation scan of equal-width frames.
///
/// Frame `n` (zero-based) covers rotation angles
/// `[start + n * width, start + (n + 1) * width)` in degrees. The whole scan
/// covers the half-open interval `[start, start + num_frames * width)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    /// Rotation angle at the start of frame 0 (degrees)
    oscillation_start: f64,
    /// Rotation per frame (degrees)
    oscillation_width: f64,
    num_frames: usize,
}

impl Scan {
    /// Create a scan
    ///
    /// # Arguments
    /// * `oscillation_start` - Angle at the start of the first frame (degrees)
    /// * `oscillation_width` - Angle covered by each frame (degrees, positive)
    /// * `num_frames` - Number of frames (at least one)
    pub fn new(
        oscillation_start: f64,
        oscillation_width: f64,
        num_frames: usize,
    ) -> Result<Self, ModelError> {
        let scan = Self {
            oscillation_start,
            oscillation_width,
            num_frames,
        };
        scan.validate()?;
        Ok(scan)
    }

    /// Check the invariants that deserialisation cannot enforce
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(self.oscillation_width > 0.0) {
            return Err(ModelError::NonPositiveOscillation(self.oscillation_width));
        }
        if self.num_frames == 0 {
            return Err(ModelError::EmptyScan);
        }
        Ok(())
    }

    /// Angle at the start of frame 0 (degrees)
    pub fn oscillation_start(&self) -> f64 {
        self.oscillation_start
    }

    /// Angle per frame (degrees)
    pub fn oscillation_width(&self) -> f64 {
        self.oscillation_width
    }

    /// Number of frames
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Scan limits `(start, end)` in degrees; `end` is exclusive
    pub fn angle_range(&self) -> (f64, f64) {
        (
            self.oscillation_start,
            self.oscillation_start + self.num_frames as f64 * self.oscillation_width,
        )
    }

    /// True if `angle` (degrees) was recorded by this scan
    pub fn is_angle_valid(&self, angle: f64) -> bool {
        let (start, end) = self.angle_range();
        angle >= start && angle < end
    }

    /// Find the 360°-equivalent of `angle` that was recorded by this scan.
    ///
    /// Returns the smallest `angle + k * 360` (integer k) inside the scan,
    /// or `None` if every equivalent lies outside. For scans longer than a
    /// full turn only the first pass is reported.
    pub fn equivalent_angle(&self, angle: f64) -> Option<f64> {
        if !angle.is_finite() {
            return None;
        }
        let (start, _) = self.angle_range();
        let offset = (angle - start).rem_euclid(360.0);
        // rem_euclid rounds up to exactly 360 for tiny negative inputs
        let offset = if offset >= 360.0 { 0.0 } else { offset };
        let candidate = start + offset;
        self.is_angle_valid(candidate).then_some(candidate)
    }

    /// Continuous zero-based frame number of a rotation angle (degrees).
    ///
    /// The integer part is the frame index; the fraction is the position
    /// within the frame.
    pub fn frame_from_angle(&self, angle: f64) -> f64 {
        (angle - self.oscillation_start) / self.oscillation_width
    }

    /// Rotation angle (degrees) of a continuous zero-based frame number
    pub fn angle_from_frame(&self, frame: f64) -> f64 {
        self.oscillation_start + frame * self.oscillation_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_angle_range() {
        let scan = Scan::new(10.0, 0.5, 20).unwrap();
        assert_eq!(scan.angle_range(), (10.0, 20.0));
    }

    #[test]
    fn test_is_angle_valid_half_open() {
        let scan = Scan::new(0.0, 1.0, 90).unwrap();
        assert!(scan.is_angle_valid(0.0));
        assert!(scan.is_angle_valid(89.999));
        assert!(!scan.is_angle_valid(90.0));
        assert!(!scan.is_angle_valid(-0.001));
    }

    #[test]
    fn test_frame_from_angle() {
        let scan = Scan::new(-5.0, 0.1, 100).unwrap();
        assert_relative_eq!(scan.frame_from_angle(-5.0), 0.0);
        assert_relative_eq!(scan.frame_from_angle(0.0), 50.0, epsilon = 1e-9);
        assert_relative_eq!(scan.angle_from_frame(scan.frame_from_angle(2.345)), 2.345, epsilon = 1e-12);
    }

    #[test]
    fn test_equivalent_angle_wraps_into_scan() {
        let scan = Scan::new(0.0, 1.0, 360).unwrap();
        assert_relative_eq!(scan.equivalent_angle(-210.0).unwrap(), 150.0, epsilon = 1e-12);
        assert_relative_eq!(scan.equivalent_angle(30.0).unwrap(), 30.0);
        assert_relative_eq!(scan.equivalent_angle(400.0).unwrap(), 40.0, epsilon = 1e-12);
    }

    #[test]
    fn test_equivalent_angle_outside_scan() {
        let scan = Scan::new(0.0, 1.0, 10).unwrap();
        assert_eq!(scan.equivalent_angle(90.0), None);
        assert_eq!(scan.equivalent_angle(-90.0), None);
        assert_eq!(scan.equivalent_angle(f64::NAN), None);
        assert_relative_eq!(scan.equivalent_angle(-355.0).unwrap(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_equivalent_angle_negative_start() {
        let scan = Scan::new(-180.0, 1.0, 360).unwrap();
        assert_relative_eq!(scan.equivalent_angle(270.0).unwrap(), -90.0, epsilon = 1e-12);
    }

    #[test]
    fn test_equivalent_angle_just_below_start() {
        let scan = Scan::new(0.0, 1.0, 360).unwrap();
        let angle = scan.equivalent_angle(-1e-15).unwrap();
        assert_relative_eq!(angle, 0.0, epsilon = 1e-12);
        assert!(scan.is_angle_valid(angle));

        let scan = Scan::new(25.0, 0.5, 10).unwrap();
        let angle = scan.equivalent_angle(25.0 - 1e-14).unwrap();
        assert_relative_eq!(angle, 25.0, epsilon = 1e-12);
        assert!(angle < 30.0);
    }

    #[test]
    fn test_invalid_scans() {
        assert_eq!(Scan::new(0.0, 0.0, 10), Err(ModelError::NonPositiveOscillation(0.0)));
        assert_eq!(Scan::new(0.0, 1.0, 0), Err(ModelError::EmptyScan));
    }
}
