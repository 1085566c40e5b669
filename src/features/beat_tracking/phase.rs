//! Brute-force phase search on a fixed-period grid
//!
//! Both the eighth-note grid anchor and the whole-beat offset are an
//! arg-max over a small set of integer phases: for each phase `φ`, sum
//! `values[round(φ + k * period)]` for every `k` that stays inside the
//! slice, and keep the phase with the largest sum.

use crate::error::AnalysisError;

/// Find the phase whose grid collects the most energy
///
/// # Arguments
///
/// * `values` - Series to sample
/// * `period` - Grid spacing in indices, `>= 1`
/// * `candidates` - Number of phases tried, `0..candidates`
///
/// # Returns
///
/// The best phase. Ties go to the lowest phase.
///
/// # Errors
///
/// - `DegenerateWindow` if `values` is empty
/// - `InvalidInput` if `period < 1` or `candidates == 0`
pub fn best_phase(values: &[f64], period: f64, candidates: usize) -> Result<usize, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::DegenerateWindow(
            "Phase search over an empty series".to_string(),
        ));
    }

    if !(period.is_finite() && period >= 1.0) {
        return Err(AnalysisError::InvalidInput(format!(
            "Grid period must be >= 1, got {}",
            period
        )));
    }

    if candidates == 0 {
        return Err(AnalysisError::InvalidInput(
            "Phase search needs at least one candidate".to_string(),
        ));
    }

    let mut best = 0usize;
    let mut best_sum = f64::NEG_INFINITY;

    for phase in 0..candidates {
        let sum = grid_sum(values, phase as f64, period);
        if sum > best_sum {
            best_sum = sum;
            best = phase;
        }
    }

    Ok(best)
}

/// Sum of `values` sampled at `round(phase + k * period)` for `k = 0, 1, ...`
fn grid_sum(values: &[f64], phase: f64, period: f64) -> f64 {
    let mut sum = 0.0;
    let mut k = 0usize;
    loop {
        let index = (phase + k as f64 * period).round() as usize;
        match values.get(index) {
            Some(v) => sum += v,
            None => break,
        }
        k += 1;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_integer_phase() {
        let values: Vec<f64> = (0..100).map(|i| if i % 10 == 3 { 1.0 } else { 0.0 }).collect();
        assert_eq!(best_phase(&values, 10.0, 10).unwrap(), 3);
    }

    #[test]
    fn test_fractional_period() {
        // Peaks at round(2 + k * 7.5)
        let mut values = vec![0.0f64; 200];
        let mut k = 0;
        while (2.0 + k as f64 * 7.5).round() < 200.0 {
            values[(2.0 + k as f64 * 7.5).round() as usize] = 1.0;
            k += 1;
        }
        assert_eq!(best_phase(&values, 7.5, 8).unwrap(), 2);
    }

    #[test]
    fn test_ties_pick_lowest_phase() {
        let values = vec![0.0f64; 64];
        assert_eq!(best_phase(&values, 8.0, 8).unwrap(), 0);
    }

    #[test]
    fn test_candidates_beyond_series() {
        // Phases past the end sum to zero but are still valid candidates
        let values = vec![0.0, 0.0, 5.0];
        assert_eq!(best_phase(&values, 8.0, 8).unwrap(), 2);
    }

    #[test]
    fn test_empty_is_degenerate() {
        assert!(matches!(
            best_phase(&[], 8.0, 8),
            Err(AnalysisError::DegenerateWindow(_))
        ));
    }

    #[test]
    fn test_invalid_period() {
        assert!(best_phase(&[1.0, 2.0], 0.5, 1).is_err());
        assert!(best_phase(&[1.0, 2.0], 2.0, 0).is_err());
    }
}
