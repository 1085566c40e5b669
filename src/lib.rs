//! # Beatgrid DSP
//!
//! Beat grid extraction and rhythmic mood descriptors for rhythm-driven
//! applications such as games and visualizers.
//!
//! ## Features
//!
//! - **Spectral Flux**: Half-wave rectified magnitude difference, 10 frames apart
//! - **BPM Detection**: Harmonic comb search over integer tempos
//! - **Beat Grid**: Eighth-note grid with periodic phase re-anchoring
//! - **Beat Records**: Section numbering, intensity and prominence per beat
//! - **Mood**: Freneticism and physicality buckets per window of beats
//!
//! ## Quick Start
//!
//! ```no_run
//! use beatgrid_dsp::{analyze_beats, AnalysisConfig};
//!
//! // Load audio samples (mono, f64, normalized)
//! let samples: Vec<f64> = vec![]; // Your audio data
//! let sample_rate = 44100.0;
//!
//! let result = analyze_beats(&samples, sample_rate, AnalysisConfig::default())?;
//!
//! println!("BPM: {:.0}, {} beats", result.bpm, result.beats.len());
//! for mood in &result.moods {
//!     println!("{}", mood);
//! }
//! # Ok::<(), beatgrid_dsp::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Waveform → Spectral Flux → BPM → Grid Indices → Beat Records → Mood
//! ```
//!
//! Every stage fully materializes its output before the next one starts.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;

// Re-export main types
pub use analysis::metadata::AnalysisMetadata;
pub use analysis::mood::{MoodReference, ReferenceStats};
pub use analysis::result::{BeatAnalysis, BeatRecord, MoodDescriptor, MoodLevel};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use io::Waveform;

use features::beat_tracking::records::RecordParams;
use features::beat_tracking::BEAT_SUBDIVISIONS;

/// Main analysis function
///
/// Runs the whole pipeline on a mono waveform and returns the tempo, the
/// beat records and one mood descriptor per window of beats.
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz (typically 44100 or 48000)
/// * `config` - Analysis configuration parameters
///
/// # Errors
///
/// Every error is fatal to the invocation; there is no partial result.
///
/// - `InvalidInput` for an invalid configuration or sample rate
/// - `InputTooShort` if the waveform yields no flux
/// - `NoTempoFound` if no periodicity is found (e.g. silence)
/// - `DegenerateWindow` if a statistic would be taken over an empty range
pub fn analyze_beats(
    samples: &[f64],
    sample_rate: f64,
    config: AnalysisConfig,
) -> Result<BeatAnalysis, AnalysisError> {
    use std::time::Instant;
    let start_time = Instant::now();

    log::debug!(
        "Starting beat analysis: {} samples at {} Hz",
        samples.len(),
        sample_rate
    );

    config.validate()?;

    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid sample rate: {}",
            sample_rate
        )));
    }

    // 1. Onset strength
    use features::onset::smoothing::rolling_sum;
    use features::onset::spectral_flux::compute_flux;
    let flux = compute_flux(samples, config.frame_size, config.hop_size)?;

    // 2. Tempo
    use features::period::tempo::{estimate_bpm, period_for_bpm};
    let bpm = estimate_bpm(
        &flux,
        sample_rate,
        config.hop_size,
        config.min_bpm,
        config.max_bpm,
    )?;

    // 3. Eighth-note grid on smoothed flux
    use features::beat_tracking::grid::extract_beat_indices;
    let period_eighth =
        period_for_bpm(bpm, sample_rate, config.hop_size) / BEAT_SUBDIVISIONS as f64;
    let smoothed = rolling_sum(&flux, config.grid_smoothing_radius);
    let indices = extract_beat_indices(
        &smoothed,
        period_eighth,
        config.grid_block_length,
        config.grid_block_stride,
    )?;

    // 4. Beat records on raw flux
    use features::beat_tracking::records::build_beat_records;
    let beats = build_beat_records(
        &flux,
        &indices,
        RecordParams {
            sample_rate,
            hop_size: config.hop_size,
            bpm,
            timing_tolerance: config.timing_tolerance,
            feature_radius: config.feature_radius,
        },
    )?;

    // 5. Mood
    use analysis::mood::compute_mood;
    let moods = compute_mood(&beats, config.mood_window, &config.mood_reference)?;

    let processing_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    log::debug!(
        "Beat analysis done: {:.0} BPM, {} beats, {} mood windows in {:.1} ms",
        bpm,
        beats.len(),
        moods.len(),
        processing_time_ms
    );

    Ok(BeatAnalysis {
        bpm,
        beats,
        moods,
        metadata: AnalysisMetadata {
            duration_seconds: samples.len() as f64 / sample_rate,
            sample_rate,
            flux_frames: flux.len(),
            candidate_count: indices.len(),
            processing_time_ms,
            ..AnalysisMetadata::default()
        },
    })
}

/// Analyze a decoded [`Waveform`]
pub fn analyze_waveform(
    waveform: &Waveform,
    config: AnalysisConfig,
) -> Result<BeatAnalysis, AnalysisError> {
    analyze_beats(waveform.samples(), waveform.sample_rate(), config)
}
