//! Configuration parameters for beat analysis

use crate::analysis::mood::MoodReference;
use crate::error::AnalysisError;
use crate::features::period::tempo::MAX_SEARCH_BPM;

/// Analysis configuration parameters
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    // STFT parameters
    /// Frame size for the spectral transform, must be a power of two (default: 2048)
    pub frame_size: usize,

    /// Hop between successive frames in samples (default: 128)
    pub hop_size: usize,

    // BPM detection
    /// Lowest integer BPM searched (default: 70)
    pub min_bpm: u32,

    /// Highest integer BPM searched, at most [`MAX_SEARCH_BPM`] (default: 170)
    pub max_bpm: u32,

    // Beat grid
    /// Length of the phase search block in flux frames (default: 5000)
    pub grid_block_length: usize,

    /// Stride between re-anchors in flux frames (default: 1000)
    pub grid_block_stride: usize,

    /// Radius of the rolling sum applied to flux before grid search (default: 5, 0 disables)
    pub grid_smoothing_radius: usize,

    // Beat features
    /// Half-width of the flux window used for intensity and prominence (default: 5)
    pub feature_radius: usize,

    /// Maximum distance between predicted and observed beat time
    /// before a new section starts, in seconds (default: 0.005)
    pub timing_tolerance: f64,

    // Mood
    /// Number of beat records per mood window (default: 64)
    pub mood_window: usize,

    /// Reference corpus statistics blended into mood normalization
    pub mood_reference: MoodReference,
}

impl AnalysisConfig {
    /// Check that the options are mutually consistent
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.frame_size == 0 || !self.frame_size.is_power_of_two() {
            return Err(AnalysisError::InvalidInput(format!(
                "Frame size must be a power of two, got {}",
                self.frame_size
            )));
        }

        if self.hop_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "Hop size must be > 0".to_string(),
            ));
        }

        if self.min_bpm < 2 || self.min_bpm >= self.max_bpm {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid BPM range: [{}, {}]",
                self.min_bpm, self.max_bpm
            )));
        }

        if self.max_bpm > MAX_SEARCH_BPM {
            return Err(AnalysisError::InvalidInput(format!(
                "Max BPM {} above supported {}",
                self.max_bpm, MAX_SEARCH_BPM
            )));
        }

        if self.grid_block_stride == 0 || self.grid_block_length < self.grid_block_stride {
            return Err(AnalysisError::InvalidInput(format!(
                "Grid block length ({}) must be >= stride ({}) and stride > 0",
                self.grid_block_length, self.grid_block_stride
            )));
        }

        if !(self.timing_tolerance.is_finite() && self.timing_tolerance >= 0.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid timing tolerance: {}",
                self.timing_tolerance
            )));
        }

        if self.mood_window == 0 {
            return Err(AnalysisError::InvalidInput(
                "Mood window must be > 0".to_string(),
            ));
        }

        self.mood_reference.validate()
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            hop_size: 128,
            min_bpm: 70,
            max_bpm: 170,
            grid_block_length: 5000,
            grid_block_stride: 1000,
            grid_smoothing_radius: 5,
            feature_radius: 5,
            timing_tolerance: 0.005,
            mood_window: 64,
            mood_reference: MoodReference::default(),
        }
    }
}
