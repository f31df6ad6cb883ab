//! Scan range argument for the command line tools.
//!
//! Provides a clap-compatible type describing a rotation scan as
//! `start:stop:width` in degrees, with parsing, validation and conversion
//! into a [`Scan`].

use crate::error::ModelError;
use crate::scan::Scan;
use std::fmt;
use std::str::FromStr;

/// Parse a rotation scan range string.
///
/// # Format
/// Input format: "start:stop:width"
/// - **start**: Rotation angle at the start of the first frame (degrees)
/// - **stop**: Rotation angle at the end of the last frame (degrees)
/// - **width**: Oscillation width of each frame (degrees, positive)
///
/// # Validation Rules
/// - **Width positive**: Scans always advance in increasing phi
/// - **Ordered**: start must be less than stop
/// - **Numeric validation**: All components must be valid floating-point
///
/// # Examples
/// - "0:90:0.1" - 900 frames of 0.1° from 0° to 90°
/// - "-45:45:1" - 90 frames of 1° centred on 0°
///
/// Invalid formats that return errors:
/// - "0:90" - Missing width component
/// - "0:90:0" - Width cannot be zero
/// - "90:0:1" - stop must exceed start
pub fn parse_scan_range(s: &str) -> Result<(f64, f64, f64), String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 3 {
        return Err("Scan range must be in format 'start:stop:width'".to_string());
    }

    let start = parts[0]
        .trim()
        .parse::<f64>()
        .map_err(|_| "Invalid start angle".to_string())?;
    let stop = parts[1]
        .trim()
        .parse::<f64>()
        .map_err(|_| "Invalid stop angle".to_string())?;
    let width = parts[2]
        .trim()
        .parse::<f64>()
        .map_err(|_| "Invalid oscillation width".to_string())?;

    if width <= 0.0 {
        return Err("Oscillation width must be positive".to_string());
    }

    if start >= stop {
        return Err("Scan start must be less than scan stop".to_string());
    }

    Ok((start, stop, width))
}

/// Rotation scan given on the command line as `start:stop:width` degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanRangeArg {
    pub start: f64,
    pub stop: f64,
    pub width: f64,
}

impl FromStr for ScanRangeArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, stop, width) = parse_scan_range(s)?;
        Ok(Self { start, stop, width })
    }
}

impl fmt::Display for ScanRangeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.start, self.stop, self.width)
    }
}

impl ScanRangeArg {
    /// Number of whole frames covering `[start, stop]`.
    ///
    /// A trailing partial frame is counted as a full frame, so the scan
    /// always reaches at least `stop`.
    pub fn num_frames(&self) -> usize {
        let frames = (self.stop - self.start) / self.width;
        // Guard against 89.99999999 style rounding of exact multiples
        let rounded = frames.round();
        if (frames - rounded).abs() < 1e-9 {
            rounded as usize
        } else {
            frames.ceil() as usize
        }
    }

    /// Build the scan model described by this range
    pub fn to_scan(&self) -> Result<Scan, ModelError> {
        Scan::new(self.start, self.width, self.num_frames())
    }
}
