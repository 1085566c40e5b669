//! Tempo estimation from the flux series
//!
//! # Algorithm
//!
//! 1. For every integer BPM in `[min_bpm - 1, max_bpm + 1]`, convert the tempo to a
//!    flux-index period `p = sample_rate * 60 / (hop_size * bpm)`
//! 2. Cost the candidate as `comb(p) + comb(2p) + comb(4p)`. Adding the two harmonics
//!    penalises half- and double-tempo candidates that only match one of the lags
//! 3. Pick the interior local minimum (lower than both neighbours) with the lowest cost
//!
//! The outermost candidates only exist so that `min_bpm` and `max_bpm` can be
//! recognised as local minima. They are never returned.
//!
//! # Example
//!
//! ```no_run
//! use beatgrid_dsp::features::period::tempo::estimate_bpm;
//!
//! let flux = vec![0.0f64; 10000];
//! let bpm = estimate_bpm(&flux, 44100.0, 128, 70, 170)?;
//! # Ok::<(), beatgrid_dsp::AnalysisError>(())
//! ```

use super::comb_filter::comb_interpolated;
use super::TempoCandidate;
use crate::error::AnalysisError;

/// Highest `max_bpm` accepted by the search
pub const MAX_SEARCH_BPM: u32 = 1000;

/// Flux-index period of one beat at `bpm`
pub fn period_for_bpm(bpm: f64, sample_rate: f64, hop_size: usize) -> f64 {
    sample_rate * 60.0 / (hop_size as f64 * bpm)
}

/// Tempo whose beat period is `period` flux indices
///
/// The relation is its own inverse: `bpm_for_period(period_for_bpm(b)) == b`.
pub fn bpm_for_period(period: f64, sample_rate: f64, hop_size: usize) -> f64 {
    sample_rate * 60.0 / (hop_size as f64 * period)
}

/// Comb cost of every candidate BPM in `[min_bpm - 1, max_bpm + 1]`
///
/// Returned in ascending BPM order.
///
/// # Errors
///
/// - `InvalidInput` if `max_bpm + 1` overflows
/// - `DegenerateWindow` if the flux series is too short for the slowest
///   candidate's fourth harmonic lag
pub fn tempo_cost_curve(
    flux: &[f64],
    sample_rate: f64,
    hop_size: usize,
    min_bpm: u32,
    max_bpm: u32,
) -> Result<Vec<TempoCandidate>, AnalysisError> {
    let lower = min_bpm.saturating_sub(1).max(1);
    let upper = max_bpm.checked_add(1).ok_or_else(|| {
        AnalysisError::InvalidInput(format!("Invalid max BPM: {}", max_bpm))
    })?;

    (lower..=upper)
        .map(|bpm| {
            let period = period_for_bpm(bpm as f64, sample_rate, hop_size);
            let cost = comb_interpolated(flux, period)?
                + comb_interpolated(flux, 2.0 * period)?
                + comb_interpolated(flux, 4.0 * period)?;
            Ok(TempoCandidate {
                bpm: bpm as f64,
                cost,
            })
        })
        .collect()
}

/// Estimate tempo to the nearest integer BPM
///
/// # Arguments
///
/// * `flux` - Spectral flux series
/// * `sample_rate` - Sample rate in Hz
/// * `hop_size` - Hop used to compute the flux
/// * `min_bpm` - Lowest BPM that may be returned (default: 70)
/// * `max_bpm` - Highest BPM that may be returned (default: 170)
///
/// # Errors
///
/// - `InvalidInput` for a non-positive sample rate, zero hop, inverted range
///   or `max_bpm` above [`MAX_SEARCH_BPM`]
/// - `DegenerateWindow` if the flux is too short for the harmonic lags
/// - `NoTempoFound` if the cost curve has no interior local minimum,
///   as happens for silence
pub fn estimate_bpm(
    flux: &[f64],
    sample_rate: f64,
    hop_size: usize,
    min_bpm: u32,
    max_bpm: u32,
) -> Result<f64, AnalysisError> {
    log::debug!(
        "Estimating BPM: {} flux values, {} Hz, hop={}, range=[{}, {}] BPM",
        flux.len(),
        sample_rate,
        hop_size,
        min_bpm,
        max_bpm
    );

    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid sample rate: {}",
            sample_rate
        )));
    }

    if hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid hop size: 0".to_string(),
        ));
    }

    if min_bpm < 2 || min_bpm >= max_bpm {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid BPM range: [{}, {}]",
            min_bpm, max_bpm
        )));
    }

    if max_bpm > MAX_SEARCH_BPM {
        return Err(AnalysisError::InvalidInput(format!(
            "Max BPM {} above supported {}",
            max_bpm, MAX_SEARCH_BPM
        )));
    }

    let curve = tempo_cost_curve(flux, sample_rate, hop_size, min_bpm, max_bpm)?;

    let best = curve
        .windows(3)
        .filter(|w| w[1].cost < w[0].cost && w[1].cost < w[2].cost)
        .map(|w| &w[1])
        .min_by(|a, b| a.cost.total_cmp(&b.cost));

    match best {
        Some(candidate) => {
            log::debug!(
                "Selected {:.0} BPM (comb cost {:.6})",
                candidate.bpm,
                candidate.cost
            );
            Ok(candidate.bpm)
        }
        None => {
            log::warn!("Comb cost curve has no interior local minimum");
            Err(AnalysisError::NoTempoFound(format!(
                "No local minimum in comb cost over [{}, {}] BPM",
                min_bpm, max_bpm
            )))
        }
    }
}
