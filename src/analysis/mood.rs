//! Windowed mood descriptors
//!
//! Beats are chunked into windows of `window` records. Each window yields
//! two raw sums:
//!
//! - freneticism: `Σ intensity`
//! - physicality: `Σ prominence`
//!
//! Each raw sum is bucketed against a baseline that averages the track's
//! own statistics (mean and sample deviation over all windows) with a
//! fixed reference taken from a corpus of tracks:
//!
//! ```text
//! mean = (track_mean + reference_mean) / 2
//! dev  = (track_dev  + reference_dev)  / 2
//! raw < mean - dev / 2  => Low
//! raw > mean + dev / 2  => High
//! otherwise             => Medium
//! ```

use serde::{Deserialize, Serialize};

use super::result::{BeatRecord, MoodDescriptor, MoodLevel};
use crate::error::AnalysisError;
use crate::features::range::RangeSelection;

/// Mean and deviation of one raw mood signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceStats {
    /// Mean of the raw window sum
    pub mean: f64,

    /// Standard deviation of the raw window sum
    pub deviation: f64,
}

impl ReferenceStats {
    /// Average two baselines component-wise
    pub fn blend(self, other: ReferenceStats) -> ReferenceStats {
        ReferenceStats {
            mean: (self.mean + other.mean) / 2.0,
            deviation: (self.deviation + other.deviation) / 2.0,
        }
    }

    /// Bucket a raw value against `mean ± deviation / 2`
    pub fn level(&self, raw: f64) -> MoodLevel {
        let half = self.deviation / 2.0;
        if raw < self.mean - half {
            MoodLevel::Low
        } else if raw > self.mean + half {
            MoodLevel::High
        } else {
            MoodLevel::Medium
        }
    }
}

/// Reference corpus statistics for both mood signals
///
/// Computed offline from a corpus of analysed tracks and supplied as
/// constants. Tests substitute their own values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodReference {
    /// Statistics of `Σ intensity` per window
    pub freneticism: ReferenceStats,

    /// Statistics of `Σ prominence` per window
    pub physicality: ReferenceStats,
}

impl MoodReference {
    /// Reject non-finite or negative statistics
    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (name, stats) in [
            ("freneticism", self.freneticism),
            ("physicality", self.physicality),
        ] {
            if !(stats.mean.is_finite() && stats.deviation.is_finite() && stats.deviation >= 0.0)
            {
                return Err(AnalysisError::InvalidInput(format!(
                    "Invalid {} reference: mean={}, deviation={}",
                    name, stats.mean, stats.deviation
                )));
            }
        }
        Ok(())
    }
}

impl Default for MoodReference {
    fn default() -> Self {
        Self {
            freneticism: ReferenceStats {
                mean: 2.4e6,
                deviation: 1.1e6,
            },
            physicality: ReferenceStats {
                mean: 190.0,
                deviation: 85.0,
            },
        }
    }
}

/// Raw sums of one window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSums {
    /// Time of the window's first beat
    pub time: f64,

    /// `Σ intensity`
    pub freneticism: f64,

    /// `Σ prominence`
    pub physicality: f64,
}

/// Raw window sums
///
/// Window `i` covers records `[i * window, max)` with `max = min((i + 1) * window, len)`.
/// Its timestamp is that of its first record, but its sums run over
/// `[max - window, max)` (clamped at 0), so a short final window borrows
/// records from the previous one and still sums a full window when it can.
pub fn window_sums(beats: &[BeatRecord], window: usize) -> Result<Vec<WindowSums>, AnalysisError> {
    if window == 0 {
        return Err(AnalysisError::InvalidInput(
            "Mood window must be > 0".to_string(),
        ));
    }

    let intensity: Vec<f64> = beats.iter().map(|b| b.intensity).collect();
    let prominence: Vec<f64> = beats.iter().map(|b| b.prominence).collect();

    (0..beats.len())
        .step_by(window)
        .map(|start| {
            let max = (start + window).min(beats.len()) as i64;
            let lo = max - window as i64;
            Ok(WindowSums {
                time: beats[start].time,
                freneticism: RangeSelection::clamped(&intensity, lo, max)?.sum(),
                physicality: RangeSelection::clamped(&prominence, lo, max)?.sum(),
            })
        })
        .collect()
}

/// Mean and sample standard deviation of a series
///
/// Returns `None` for fewer than two values, where the sample deviation is undefined.
fn track_stats(values: &[f64]) -> Option<ReferenceStats> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(ReferenceStats {
        mean,
        deviation: variance.sqrt(),
    })
}

/// Compute mood descriptors for a beat sequence
///
/// # Arguments
///
/// * `beats` - Beat records ordered by time
/// * `window` - Records per window (default: 64)
/// * `reference` - Reference corpus statistics
///
/// # Returns
///
/// `ceil(beats.len() / window)` descriptors in time order.
///
/// # Errors
///
/// - `DegenerateWindow` if `beats` is empty
/// - `InvalidInput` if `window == 0` or the reference is not finite
pub fn compute_mood(
    beats: &[BeatRecord],
    window: usize,
    reference: &MoodReference,
) -> Result<Vec<MoodDescriptor>, AnalysisError> {
    log::debug!(
        "Computing mood: {} beats, window={}",
        beats.len(),
        window
    );

    if beats.is_empty() {
        return Err(AnalysisError::DegenerateWindow(
            "Mood over an empty beat sequence".to_string(),
        ));
    }

    reference.validate()?;

    let sums = window_sums(beats, window)?;

    let freneticism: Vec<f64> = sums.iter().map(|s| s.freneticism).collect();
    let physicality: Vec<f64> = sums.iter().map(|s| s.physicality).collect();

    let baseline = |values: &[f64], fixed: ReferenceStats| match track_stats(values) {
        Some(track) => track.blend(fixed),
        None => {
            log::debug!("Single mood window, using reference baseline only");
            fixed
        }
    };
    let frenetic_baseline = baseline(&freneticism, reference.freneticism);
    let physical_baseline = baseline(&physicality, reference.physicality);

    log::debug!(
        "Mood baselines: freneticism {:.2} ± {:.2}, physicality {:.2} ± {:.2}",
        frenetic_baseline.mean,
        frenetic_baseline.deviation,
        physical_baseline.mean,
        physical_baseline.deviation
    );

    Ok(sums
        .iter()
        .map(|s| MoodDescriptor {
            time: s.time,
            freneticism: frenetic_baseline.level(s.freneticism),
            physicality: physical_baseline.level(s.physicality),
        })
        .collect())
}
