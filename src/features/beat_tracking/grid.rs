//! Eighth-note grid extraction with periodic re-anchoring
//!
//! A single phase and period drift over a whole track: real tempo is
//! never perfectly constant and the frame hop adds phase jitter. The
//! flux is therefore cut into consecutive active regions of `stride`
//! frames. Each region gets its own phase, searched over a block of
//! `block_length` frames centred on the region, and emits the grid
//! points that fall inside it.
//!
//! # Example
//!
//! ```no_run
//! use beatgrid_dsp::features::beat_tracking::grid::extract_beat_indices;
//!
//! let flux = vec![0.0f64; 10000];
//! let indices = extract_beat_indices(&flux, 20.19, 5000, 1000)?;
//! # Ok::<(), beatgrid_dsp::AnalysisError>(())
//! ```

use super::phase::best_phase;
use crate::error::AnalysisError;

/// Extract beat-candidate indices on the eighth-note grid
///
/// # Arguments
///
/// * `flux` - Onset strength series (typically smoothed spectral flux)
/// * `period_eighth` - Eighth-note grid spacing in flux indices (`beat period / 8`)
/// * `block_length` - Length of the phase search block (default: 5000)
/// * `stride` - Length of each active region (default: 1000)
///
/// # Returns
///
/// Strictly increasing indices into `flux`.
///
/// # Errors
///
/// - `InvalidInput` if `period_eighth < 1`, `stride == 0` or `block_length < stride`
/// - `DegenerateWindow` if `flux` is empty
pub fn extract_beat_indices(
    flux: &[f64],
    period_eighth: f64,
    block_length: usize,
    stride: usize,
) -> Result<Vec<usize>, AnalysisError> {
    log::debug!(
        "Extracting beat grid: {} flux values, eighth period={:.3}, block={}, stride={}",
        flux.len(),
        period_eighth,
        block_length,
        stride
    );

    if !(period_eighth.is_finite() && period_eighth >= 1.0) {
        return Err(AnalysisError::InvalidInput(format!(
            "Eighth-note period must be >= 1 flux frame, got {}",
            period_eighth
        )));
    }

    if stride == 0 || block_length < stride {
        return Err(AnalysisError::InvalidInput(format!(
            "Block length ({}) must be >= stride ({}) and stride > 0",
            block_length, stride
        )));
    }

    if flux.is_empty() {
        return Err(AnalysisError::DegenerateWindow(
            "Beat grid over an empty flux series".to_string(),
        ));
    }

    let len = flux.len();
    let candidates = period_eighth.ceil() as usize;
    let mut indices = Vec::with_capacity((len as f64 / period_eighth) as usize + 1);
    let mut active_start = 0usize;
    let mut blocks = 0usize;

    while active_start < len {
        // A tail shorter than one stride is folded into the last region
        let active_end = if active_start + 2 * stride > len {
            len
        } else {
            active_start + stride
        };

        let centre = active_start + stride / 2;
        let block_start = centre.saturating_sub(block_length / 2);
        let block_end = (centre + block_length / 2).min(len);

        let phase = best_phase(&flux[block_start..block_end], period_eighth, candidates)?;

        let mut k = 0usize;
        loop {
            let index = block_start + (phase as f64 + k as f64 * period_eighth).round() as usize;
            if index >= active_end {
                break;
            }
            if index >= active_start {
                indices.push(index);
            }
            k += 1;
        }

        log::trace!(
            "Grid block [{}, {}): phase {} from search window [{}, {})",
            active_start,
            active_end,
            phase,
            block_start,
            block_end
        );

        blocks += 1;
        active_start = active_end;
    }

    log::debug!(
        "Beat grid: {} candidate indices over {} re-anchored blocks",
        indices.len(),
        blocks
    );

    Ok(indices)
}
