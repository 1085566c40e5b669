//! Analysis metadata structures

use serde::{Deserialize, Serialize};

/// Analysis metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Audio duration in seconds
    pub duration_seconds: f64,

    /// Sample rate in Hz
    pub sample_rate: f64,

    /// Number of spectral flux values
    pub flux_frames: usize,

    /// Number of grid candidates before spacing and whole-beat filtering
    pub candidate_count: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: f64,

    /// Algorithm version
    pub algorithm_version: String,
}

impl Default for AnalysisMetadata {
    fn default() -> Self {
        Self {
            duration_seconds: 0.0,
            sample_rate: 0.0,
            flux_frames: 0,
            candidate_count: 0,
            processing_time_ms: 0.0,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
