//! Closed value intervals.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed interval `[min, max]` of admissible values.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    /// Smallest admissible value.
    pub min: f64,
    /// Largest admissible value.
    pub max: f64,
}

impl ValueRange {
    /// Create a new range.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn new(min: f64, max: f64) -> Self {
        assert!(min <= max, "range min ({}) must not exceed max ({})", min, max);
        Self { min, max }
    }

    /// Whether `value` lies inside the range.
    ///
    /// NaN is never contained.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Whether `value` is strictly outside the range.
    ///
    /// NaN is not reported as out of range; non-finite detection is a
    /// separate check.
    #[inline]
    pub fn excludes(&self, value: f64) -> bool {
        value < self.min || value > self.max
    }

    /// Clamp `value` into the range.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:e}, {:e}]", self.min, self.max)
    }
}
