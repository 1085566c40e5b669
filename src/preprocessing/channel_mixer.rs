//! Channel mixing utilities (interleaved multichannel to mono)

use crate::error::AnalysisError;

/// Downmix interleaved frames to mono by averaging the channels
///
/// # Arguments
///
/// * `interleaved` - Samples laid out `[c0, c1, .., c0, c1, ..]`
/// * `channels` - Number of channels per frame
///
/// # Returns
///
/// One sample per frame. A trailing partial frame is dropped.
pub fn downmix_interleaved(interleaved: &[f64], channels: usize) -> Result<Vec<f64>, AnalysisError> {
    if channels == 0 {
        return Err(AnalysisError::InvalidInput(
            "Channel count must be > 0".to_string(),
        ));
    }

    if channels == 1 {
        return Ok(interleaved.to_vec());
    }

    if interleaved.len() % channels != 0 {
        log::warn!(
            "Dropping {} samples of a partial {}-channel frame",
            interleaved.len() % channels,
            channels
        );
    }

    let scale = 1.0 / channels as f64;
    Ok(interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f64>() * scale)
        .collect())
}
