//! Error types for the beat analysis pipeline

use std::fmt;

/// Errors that can occur during beat analysis
///
/// Every variant is fatal to the pipeline invocation. The computation is
/// deterministic, so a caller wanting a different outcome re-runs with an
/// adjusted [`AnalysisConfig`](crate::AnalysisConfig).
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Invalid input parameters
    InvalidInput(String),

    /// Waveform shorter than one transform frame, or too short to yield any flux
    InputTooShort(String),

    /// The comb cost curve has no interior local minimum
    NoTempoFound(String),

    /// A sum/min/max was requested over an empty selection
    DegenerateWindow(String),

    /// Audio decoding error
    DecodingError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::InputTooShort(msg) => write!(f, "Input too short: {}", msg),
            AnalysisError::NoTempoFound(msg) => write!(f, "No tempo found: {}", msg),
            AnalysisError::DegenerateWindow(msg) => write!(f, "Degenerate window: {}", msg),
            AnalysisError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<hound::Error> for AnalysisError {
    fn from(err: hound::Error) -> Self {
        AnalysisError::DecodingError(err.to_string())
    }
}
