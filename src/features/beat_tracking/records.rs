//! Beat records from grid candidates
//!
//! Turns candidate flux indices into timestamped, section-numbered beat
//! records carrying intensity and prominence.
//!
//! # Algorithm
//!
//! For each candidate index, in order:
//!
//! 1. `time = (index + 18) * hop_size / sample_rate`
//! 2. Reject the candidate unless `time > last_time + last_delta / 2`, where
//!    `last_delta` is the gap between the two previously accepted beats
//! 3. Compare `time` with the predicted grid time
//!    `section_start + beat_in_section * 60 / (bpm * 8)`. A miss by more than the
//!    tolerance starts a new section at `time`
//! 4. `intensity = Σ flux[index - r ..= index + r]`,
//!    `prominence = max(flux[index - r ..= index + r]) / (1 + min(flux[prev ..= index]))`
//!
//! Finally the records before the first whole beat are dropped: the offset
//! `0..8` whose every-eighth intensities sum highest marks the downbeat-aligned start.

use super::phase::best_phase;
use super::BEAT_SUBDIVISIONS;
use crate::analysis::result::BeatRecord;
use crate::error::AnalysisError;
use crate::features::onset::FLUX_LOOKBACK;
use crate::features::range::RangeSelection;

/// Flux index to time offset: the lookback plus half a frame's centre offset, in hops
pub const TIME_OFFSET_FRAMES: usize = FLUX_LOOKBACK + 8;

/// Wall-clock time in seconds of a flux index
pub fn index_to_time(index: usize, sample_rate: f64, hop_size: usize) -> f64 {
    (index + TIME_OFFSET_FRAMES) as f64 * hop_size as f64 / sample_rate
}

/// Parameters for [`build_beat_records`]
#[derive(Debug, Clone, Copy)]
pub struct RecordParams {
    /// Sample rate in Hz
    pub sample_rate: f64,

    /// Hop used to compute the flux
    pub hop_size: usize,

    /// Estimated tempo
    pub bpm: f64,

    /// Section tolerance in seconds (default: 0.005)
    pub timing_tolerance: f64,

    /// Half-width of the intensity/prominence window (default: 5)
    pub feature_radius: usize,
}

/// Prediction state for the current section
struct SectionTracker {
    section: u32,
    beat_in_section: u32,
    section_start: Option<f64>,
    grid_step: f64,
    tolerance: f64,
}

impl SectionTracker {
    fn new(grid_step: f64, tolerance: f64) -> Self {
        Self {
            section: 0,
            beat_in_section: 0,
            section_start: None,
            grid_step,
            tolerance,
        }
    }

    /// Place an accepted beat, returning its `(section, beat_in_section)`
    fn place(&mut self, time: f64) -> (u32, u32) {
        match self.section_start {
            None => {
                self.section_start = Some(time);
            }
            Some(start) => {
                let predicted = start + self.beat_in_section as f64 * self.grid_step;
                if (time - predicted).abs() > self.tolerance {
                    log::trace!(
                        "New section at {:.4}s (predicted {:.4}s)",
                        time,
                        predicted
                    );
                    self.section += 1;
                    self.beat_in_section = 0;
                    self.section_start = Some(time);
                }
            }
        }

        let placed = (self.section, self.beat_in_section);
        self.beat_in_section += 1;
        placed
    }
}

/// Build beat records from grid candidates
///
/// # Arguments
///
/// * `flux` - Raw spectral flux series
/// * `indices` - Strictly increasing candidate indices into `flux`
/// * `params` - Timing and feature parameters
///
/// # Returns
///
/// Records ordered by time, starting on the first whole beat.
///
/// # Errors
///
/// - `InvalidInput` for a non-positive sample rate or BPM, a zero hop, or an index outside `flux`
/// - `DegenerateWindow` if no candidate survives (e.g. `indices` is empty)
pub fn build_beat_records(
    flux: &[f64],
    indices: &[usize],
    params: RecordParams,
) -> Result<Vec<BeatRecord>, AnalysisError> {
    log::debug!(
        "Building beat records: {} candidates, bpm={:.1}, tolerance={:.4}s",
        indices.len(),
        params.bpm,
        params.timing_tolerance
    );

    if !(params.sample_rate.is_finite() && params.sample_rate > 0.0) {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid sample rate: {}",
            params.sample_rate
        )));
    }

    if !(params.bpm.is_finite() && params.bpm > 0.0) {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid BPM: {}",
            params.bpm
        )));
    }

    if params.hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid hop size: 0".to_string(),
        ));
    }

    if let Some(&bad) = indices.iter().find(|&&i| i >= flux.len()) {
        return Err(AnalysisError::InvalidInput(format!(
            "Beat index {} outside flux series of length {}",
            bad,
            flux.len()
        )));
    }

    let grid_step = 60.0 / (params.bpm * BEAT_SUBDIVISIONS as f64);
    let radius = params.feature_radius as i64;
    let mut tracker = SectionTracker::new(grid_step, params.timing_tolerance);

    let mut records = Vec::with_capacity(indices.len());
    let mut last_time: Option<f64> = None;
    let mut last_delta = 0.0f64;
    let mut prev_index = 0usize;
    let mut rejected = 0usize;

    for &index in indices {
        let time = index_to_time(index, params.sample_rate, params.hop_size);

        if let Some(last) = last_time {
            if time <= last + last_delta / 2.0 {
                rejected += 1;
                continue;
            }
            last_delta = time - last;
        }

        let (section, beat_in_section) = tracker.place(time);

        let at = index as i64;
        let local = RangeSelection::clamped(flux, at - radius, at + radius + 1)?;
        let preceding = RangeSelection::clamped(flux, prev_index as i64, at + 1)?;

        records.push(BeatRecord {
            time,
            section,
            beat_in_section,
            intensity: local.sum(),
            prominence: local.max() / (1.0 + preceding.min()),
        });

        last_time = Some(time);
        prev_index = index;
    }

    if records.is_empty() {
        return Err(AnalysisError::DegenerateWindow(
            "No beat candidates to build records from".to_string(),
        ));
    }

    let offset = whole_beat_offset(&records)?;
    records.drain(..offset);

    log::debug!(
        "Beat records: {} kept, {} rejected by spacing, {} dropped before first whole beat, {} sections",
        records.len(),
        rejected,
        offset,
        records.last().map(|r| r.section + 1).unwrap_or(0)
    );

    Ok(records)
}

/// Offset `0..8` of the first downbeat-aligned record
pub fn whole_beat_offset(records: &[BeatRecord]) -> Result<usize, AnalysisError> {
    let intensities: Vec<f64> = records.iter().map(|r| r.intensity).collect();
    best_phase(
        &intensities,
        BEAT_SUBDIVISIONS as f64,
        BEAT_SUBDIVISIONS,
    )
}
