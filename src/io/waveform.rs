//! Decoded mono waveform

use crate::error::AnalysisError;

/// Mono samples in [-1.0, 1.0] paired with their sample rate
///
/// Produced once by a decoder and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f64>,
    sample_rate: f64,
}

impl Waveform {
    /// Wrap decoded samples
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the sample rate is not a positive finite number.
    pub fn new(samples: Vec<f64>, sample_rate: f64) -> Result<Self, AnalysisError> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid sample rate: {}",
                sample_rate
            )));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Samples
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}
