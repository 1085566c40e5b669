//! Clamped, non-empty slices for windowed statistics
//!
//! Beat features and mood windows take sums, minima and maxima over
//! ranges that are clamped to the bounds of the underlying array. A
//! range clamped down to zero width has no meaningful statistic, so a
//! [`RangeSelection`] can only be constructed over at least one element
//! and the statistics themselves are infallible.

use crate::error::AnalysisError;

/// A non-empty view into a slice of `f64`
#[derive(Debug, Clone, Copy)]
pub struct RangeSelection<'a> {
    values: &'a [f64],
}

impl<'a> RangeSelection<'a> {
    /// Select `values[start..end]` after clamping both bounds to `[0, len]`
    ///
    /// Bounds are signed so callers can pass `index - radius` without
    /// checking for underflow first.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::DegenerateWindow` if the clamped range is empty.
    pub fn clamped(values: &'a [f64], start: i64, end: i64) -> Result<Self, AnalysisError> {
        let len = values.len() as i64;
        let lo = start.clamp(0, len) as usize;
        let hi = end.clamp(0, len) as usize;

        if lo >= hi {
            return Err(AnalysisError::DegenerateWindow(format!(
                "Range [{}, {}) is empty after clamping to length {}",
                start,
                end,
                values.len()
            )));
        }

        Ok(Self {
            values: &values[lo..hi],
        })
    }

    /// Sum of the selection
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Minimum of the selection
    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Maximum of the selection
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}
