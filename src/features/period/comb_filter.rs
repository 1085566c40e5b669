//! Comb cost: mean absolute self-difference at a lag
//!
//! `comb(x, L) = mean_i |x[i] - x[i + L]|` over every `i` with `i + L < len`.
//! A series that nearly repeats every `L` samples has a low comb cost at
//! `L`, so the cost curve over candidate lags dips at the beat period.
//!
//! Fractional lags are answered by linear interpolation between the costs
//! at the two neighbouring integer lags.

use crate::error::AnalysisError;

/// Comb cost at an integer lag
///
/// Lag 0 is identically zero for any series.
///
/// # Errors
///
/// Returns `AnalysisError::DegenerateWindow` if `lag >= values.len()`,
/// since no pair of samples is `lag` apart.
pub fn comb(values: &[f64], lag: usize) -> Result<f64, AnalysisError> {
    if lag == 0 {
        return Ok(0.0);
    }

    if lag >= values.len() {
        return Err(AnalysisError::DegenerateWindow(format!(
            "Comb lag {} leaves no overlap in a series of length {}",
            lag,
            values.len()
        )));
    }

    let count = values.len() - lag;
    let sum: f64 = values[..count]
        .iter()
        .zip(&values[lag..])
        .map(|(&a, &b)| (a - b).abs())
        .sum();

    Ok(sum / count as f64)
}

/// Comb cost at a fractional lag
///
/// `(1 - t) * comb(floor(lag)) + t * comb(floor(lag) + 1)` with
/// `t = lag - floor(lag)`. The upper neighbour is only evaluated when `t > 0`.
///
/// # Errors
///
/// - `InvalidInput` if `lag` is negative or not finite
/// - `DegenerateWindow` if either neighbouring lag has no overlap
pub fn comb_interpolated(values: &[f64], lag: f64) -> Result<f64, AnalysisError> {
    if !lag.is_finite() || lag < 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid comb lag: {}",
            lag
        )));
    }

    let lower = lag.floor();
    let t = lag - lower;
    let lower = lower as usize;

    let low_cost = comb(values, lower)?;
    if t == 0.0 {
        return Ok(low_cost);
    }

    let high_cost = comb(values, lower + 1)?;
    Ok((1.0 - t) * low_cost + t * high_cost)
}
