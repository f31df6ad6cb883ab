//! Sources of candidate Miller indices.
//!
//! The predictor accepts any `IntoIterator<Item = MillerIndex>`. This module
//! provides a resolution-limited generator for a crystal, and an adapter
//! for producer callbacks that signal exhaustion with `(0, 0, 0)`.

use crate::error::PredictionError;
use diffraction_math::MillerIndex;
use nalgebra::Matrix3;
use shared::{Crystal, ModelError};

/// Relative slack on the resolution sphere for rounding in `UB * h`
const RESOLUTION_TOLERANCE: f64 = 1e-9;

/// Every non-zero Miller index with d-spacing at least `d_min`.
///
/// Indices are produced in lexicographic order, `h` slowest and `l`
/// fastest, each running from `-max` to `+max` for its axis. The per-axis
/// bound follows from `h_i = row_i(UB⁻¹) · (UB h)`, so
/// `|h_i| <= |row_i(UB⁻¹)| / d_min` covers the whole resolution sphere.
#[derive(Debug, Clone)]
pub struct ResolutionIndexGenerator {
    ub: Matrix3<f64>,
    max_index: [i32; 3],
    max_norm_squared: f64,
    next: Option<[i32; 3]>,
}

impl ResolutionIndexGenerator {
    /// Create a generator for `crystal` down to `d_min` Ångström
    ///
    /// # Errors
    /// * `PredictionError::InvalidResolution` - If `d_min` is not positive
    /// * `PredictionError::Model` - If the UB matrix is singular
    pub fn new(crystal: &Crystal, d_min: f64) -> Result<Self, PredictionError> {
        if !(d_min > 0.0 && d_min.is_finite()) {
            return Err(PredictionError::InvalidResolution(d_min));
        }
        let ub = *crystal.ub();
        let inverse = ub.try_inverse().ok_or(ModelError::SingularOrientation {
            determinant: ub.determinant(),
        })?;

        let mut max_index = [0i32; 3];
        for (i, max) in max_index.iter_mut().enumerate() {
            let bound = inverse.row(i).norm() / d_min;
            *max = (bound + RESOLUTION_TOLERANCE).floor() as i32;
        }

        let [mh, mk, ml] = max_index;
        Ok(Self {
            ub,
            max_index,
            max_norm_squared: (1.0 + RESOLUTION_TOLERANCE) / (d_min * d_min),
            next: Some([-mh, -mk, -ml]),
        })
    }

    /// Largest `|h|`, `|k|` and `|l|` that can occur
    pub fn max_index(&self) -> [i32; 3] {
        self.max_index
    }

    fn advance(&mut self, current: [i32; 3]) {
        let [mh, mk, ml] = self.max_index;
        let [h, k, l] = current;
        self.next = if l < ml {
            Some([h, k, l + 1])
        } else if k < mk {
            Some([h, k + 1, -ml])
        } else if h < mh {
            Some([h + 1, -mk, -ml])
        } else {
            None
        };
    }
}

impl Iterator for ResolutionIndexGenerator {
    type Item = MillerIndex;

    fn next(&mut self) -> Option<MillerIndex> {
        while let Some(current) = self.next {
            self.advance(current);
            let index = MillerIndex::from(current);
            if index.is_zero() {
                continue;
            }
            if index.transform(&self.ub).norm_squared() <= self.max_norm_squared {
                return Some(index);
            }
        }
        None
    }
}

/// Adapt a producer that returns `(0, 0, 0)` once exhausted.
///
/// The sentinel itself is never yielded, and the producer is not called
/// again after returning it.
pub fn from_sentinel<F>(mut producer: F) -> impl Iterator<Item = MillerIndex>
where
    F: FnMut() -> MillerIndex,
{
    std::iter::from_fn(move || {
        let index = producer();
        (!index.is_zero()).then_some(index)
    })
    .fuse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use std::collections::HashSet;

    fn cubic(a: f64) -> Crystal {
        Crystal::new(Matrix3::from_diagonal_element(1.0 / a)).unwrap()
    }

    #[test]
    fn test_cubic_bounds() {
        // a = 10 Å, d_min = 2.5 Å: |h| <= 4 along each axis
        let generator = ResolutionIndexGenerator::new(&cubic(10.0), 2.5).unwrap();
        assert_eq!(generator.max_index(), [4, 4, 4]);

        let indices: Vec<MillerIndex> = generator.collect();
        assert!(indices.contains(&MillerIndex::new(4, 0, 0)));
        assert!(indices.contains(&MillerIndex::new(0, -4, 0)));
        assert!(!indices.contains(&MillerIndex::new(3, 3, 3)));
        assert!(!indices.contains(&MillerIndex::zero()));
    }

    #[test]
    fn test_all_within_resolution() {
        let crystal = cubic(10.0);
        let d_min = 3.0;
        for h in ResolutionIndexGenerator::new(&crystal, d_min).unwrap() {
            assert!(crystal.resolution(&h) >= d_min * (1.0 - 1e-9), "{h}");
        }
    }

    #[test]
    fn test_complete_against_brute_force() {
        let ub = Matrix3::new(0.08, 0.01, 0.0, -0.02, 0.06, 0.015, 0.0, 0.01, 0.05);
        let crystal = Crystal::new(ub).unwrap();
        let d_min = 4.0;

        let generated: HashSet<MillerIndex> = ResolutionIndexGenerator::new(&crystal, d_min)
            .unwrap()
            .collect();

        let mut expected = HashSet::new();
        for h in -30..=30 {
            for k in -30..=30 {
                for l in -30..=30 {
                    let index = MillerIndex::new(h, k, l);
                    if !index.is_zero() && crystal.resolution(&index) >= d_min {
                        expected.insert(index);
                    }
                }
            }
        }
        assert_eq!(generated, expected);
    }

    #[test]
    fn test_lexicographic_order() {
        let indices: Vec<MillerIndex> = ResolutionIndexGenerator::new(&cubic(10.0), 4.0)
            .unwrap()
            .collect();
        let mut sorted = indices.clone();
        sorted.sort();
        assert_eq!(indices, sorted);
        // h² + k² + l² <= 6.25
        assert_eq!(indices.first(), Some(&MillerIndex::new(-2, -1, -1)));
        assert_eq!(indices.last(), Some(&MillerIndex::new(2, 1, 1)));
    }

    #[test]
    fn test_low_resolution_yields_nothing() {
        let mut generator = ResolutionIndexGenerator::new(&cubic(10.0), 50.0).unwrap();
        assert_eq!(generator.max_index(), [0, 0, 0]);
        assert_eq!(generator.next(), None);
    }

    #[test]
    fn test_friedel_pairs_present() {
        let set: HashSet<MillerIndex> = ResolutionIndexGenerator::new(&cubic(7.0), 2.0)
            .unwrap()
            .collect();
        for h in &set {
            assert!(set.contains(&MillerIndex::new(-h.h, -h.k, -h.l)));
        }
    }

    #[test]
    fn test_invalid_resolution() {
        for d_min in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                ResolutionIndexGenerator::new(&cubic(10.0), d_min),
                Err(PredictionError::InvalidResolution(_))
            ));
        }
    }

    #[test]
    fn test_from_sentinel_stops_at_zero() {
        let source = [
            MillerIndex::new(1, 0, 0),
            MillerIndex::new(0, 2, -1),
            MillerIndex::zero(),
            MillerIndex::new(5, 5, 5),
        ];
        let mut calls = 0;
        let collected: Vec<MillerIndex> = from_sentinel(|| {
            let h = source[calls];
            calls += 1;
            h
        })
        .collect();
        assert_eq!(collected, source[..2].to_vec());
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_from_sentinel_immediately_exhausted() {
        assert_eq!(from_sentinel(MillerIndex::zero).count(), 0);
    }

    #[test]
    fn test_resolution_matches_ub_norm() {
        let crystal = cubic(5.0);
        let h = MillerIndex::new(1, 1, 0);
        let expected = 1.0 / Vector3::new(0.2, 0.2, 0.0).norm();
        approx::assert_relative_eq!(crystal.resolution(&h), expected, epsilon = 1e-12);
    }
}
