//! Spectral flux onset strength
//!
//! Measures the positive change in the magnitude spectrum between a frame
//! and the frame ten hops earlier.
//!
//! # Algorithm
//!
//! 1. Slide a rectangular frame of `frame_size` samples over the waveform, advancing by `hop_size`
//! 2. Take the magnitude of the `frame_size / 2 + 1` non-negative frequency bins of each frame
//! 3. Keep the last 11 magnitude spectra in a ring indexed by `frame % 11`
//! 4. Once frame `k >= 10` is available: `flux[k - 10] = Σ_j max(0, |X_k[j]| - |X_{k-10}[j]|)`
//!
//! Half-wave rectification suppresses decaying resonance and keeps attacks,
//! which line up with percussive onsets. The ring bounds memory to
//! `11 * (frame_size / 2 + 1)` values whatever the waveform length.
//!
//! # Example
//!
//! ```no_run
//! use beatgrid_dsp::features::onset::spectral_flux::compute_flux;
//!
//! let samples = vec![0.0f64; 44100 * 30];
//! let flux = compute_flux(&samples, 2048, 128)?;
//! println!("{} flux frames", flux.len());
//! # Ok::<(), beatgrid_dsp::AnalysisError>(())
//! ```

use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use super::FLUX_LOOKBACK;
use crate::error::AnalysisError;

/// Number of magnitude spectra held in the ring
const RING_SLOTS: usize = FLUX_LOOKBACK + 1;

/// Forward transform plan plus its buffers, held for one `compute_flux` call
///
/// Dropping the context releases the plan and both buffers, so every exit
/// path out of `compute_flux` (including `?` on an error) frees it.
struct TransformContext {
    fft: Arc<dyn Fft<f64>>,
    buffer: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl TransformContext {
    fn acquire(frame_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(frame_size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        log::trace!("Acquired {}-point transform context", frame_size);
        Self {
            fft,
            buffer: vec![Complex::new(0.0, 0.0); frame_size],
            scratch,
        }
    }

    /// Write the magnitudes of the first `out.len()` bins of `frame` into `out`
    fn magnitudes(&mut self, frame: &[f64], out: &mut [f64]) {
        for (slot, &x) in self.buffer.iter_mut().zip(frame) {
            *slot = Complex::new(x, 0.0);
        }
        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);
        for (m, c) in out.iter_mut().zip(&self.buffer) {
            *m = c.norm();
        }
    }
}

impl Drop for TransformContext {
    fn drop(&mut self) {
        log::trace!("Released {}-point transform context", self.buffer.len());
    }
}

/// Number of flux values produced for a waveform of `n` samples
///
/// `floor((n - frame_size + hop_size) / hop_size) - 10`, computed in signed
/// arithmetic so short inputs come out as zero or negative instead of wrapping.
pub fn flux_length(n: usize, frame_size: usize, hop_size: usize) -> i64 {
    let numerator = n as i64 - frame_size as i64 + hop_size as i64;
    numerator.div_euclid(hop_size as i64) - FLUX_LOOKBACK as i64
}

/// Compute the spectral flux series of a mono waveform
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `frame_size` - Transform length, a power of two (typically 2048)
/// * `hop_size` - Hop between successive frames (typically 128)
///
/// # Returns
///
/// Non-negative flux values, one per frame after the 10-frame lookback.
/// Index `i` belongs to frame `i`, starting at sample `i * hop_size`.
///
/// # Errors
///
/// - `InvalidInput` if `frame_size` is not a power of two or `hop_size` is 0
/// - `InputTooShort` if the waveform is shorter than one frame or yields no flux
pub fn compute_flux(
    samples: &[f64],
    frame_size: usize,
    hop_size: usize,
) -> Result<Vec<f64>, AnalysisError> {
    if frame_size == 0 || !frame_size.is_power_of_two() {
        return Err(AnalysisError::InvalidInput(format!(
            "Frame size must be a power of two, got {}",
            frame_size
        )));
    }

    if hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Hop size must be > 0".to_string(),
        ));
    }

    if samples.len() < frame_size {
        return Err(AnalysisError::InputTooShort(format!(
            "Waveform has {} samples, fewer than one {}-sample frame",
            samples.len(),
            frame_size
        )));
    }

    let flux_len = flux_length(samples.len(), frame_size, hop_size);
    if flux_len <= 0 {
        return Err(AnalysisError::InputTooShort(format!(
            "Waveform of {} samples yields {} flux frames (frame={}, hop={})",
            samples.len(),
            flux_len,
            frame_size,
            hop_size
        )));
    }
    let flux_len = flux_len as usize;
    let num_frames = flux_len + FLUX_LOOKBACK;
    let num_bins = frame_size / 2 + 1;

    log::debug!(
        "Computing spectral flux: {} samples, frame={}, hop={}, {} frames, {} bins",
        samples.len(),
        frame_size,
        hop_size,
        num_frames,
        num_bins
    );

    let mut context = TransformContext::acquire(frame_size);
    let mut ring = vec![vec![0.0f64; num_bins]; RING_SLOTS];
    let mut flux = vec![0.0f64; flux_len];

    for frame in 0..num_frames {
        let start = frame * hop_size;
        let slot = frame % RING_SLOTS;
        context.magnitudes(&samples[start..start + frame_size], &mut ring[slot]);

        if frame >= FLUX_LOOKBACK {
            let then = &ring[(frame - FLUX_LOOKBACK) % RING_SLOTS];
            let now = &ring[slot];
            flux[frame - FLUX_LOOKBACK] = now
                .iter()
                .zip(then)
                .map(|(&n, &t)| (n - t).max(0.0))
                .sum();
        }
    }

    let peak = flux.iter().copied().fold(0.0f64, f64::max);
    log::debug!("Spectral flux: {} values, peak={:.3}", flux.len(), peak);

    Ok(flux)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit impulses every `period` samples
    fn click_train(len: usize, period: usize) -> Vec<f64> {
        let mut samples = vec![0.0f64; len];
        for pos in (0..len).step_by(period) {
            samples[pos] = 1.0;
        }
        samples
    }

    #[test]
    fn test_flux_length_formula() {
        assert_eq!(flux_length(44100, 2048, 128), (44100 - 2048 + 128) / 128 - 10);
        assert_eq!(flux_length(2048, 2048, 128), -9);
        assert_eq!(flux_length(2048 + 10 * 128, 2048, 128), 1);
    }

    #[test]
    fn test_silence_gives_zero_flux() {
        let samples = vec![0.0f64; 44100];
        let flux = compute_flux(&samples, 2048, 128).unwrap();
        assert_eq!(flux.len() as i64, flux_length(44100, 2048, 128));
        assert!(flux.iter().all(|&f| f == 0.0));
    }

    #[test]
    fn test_flux_is_non_negative() {
        let samples: Vec<f64> = (0..22050)
            .map(|i| {
                let t = i as f64 / 44100.0;
                let envelope = (-(t % 0.25) * 20.0).exp();
                (t * 2.0 * std::f64::consts::PI * 220.0).sin() * envelope
            })
            .collect();
        let flux = compute_flux(&samples, 1024, 128).unwrap();
        assert!(flux.iter().all(|&f| f >= 0.0));
        assert!(flux.iter().any(|&f| f > 0.0));
    }

    #[test]
    fn test_single_impulse_flux_box() {
        // A lone impulse has a flat magnitude spectrum in every frame that
        // contains it, so flux is a box of height num_bins and width 10.
        let frame_size = 256;
        let hop = 16;
        let mut samples = vec![0.0f64; 4096];
        samples[2000] = 1.0;

        let flux = compute_flux(&samples, frame_size, hop).unwrap();
        let num_bins = (frame_size / 2 + 1) as f64;

        let active: Vec<usize> = flux
            .iter()
            .enumerate()
            .filter(|(_, &f)| f > 1e-9)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(active.len(), FLUX_LOOKBACK);
        for &i in &active {
            assert!((flux[i] - num_bins).abs() < 1e-6);
        }
        // The first frame containing the impulse is frame ceil((2000 - 255) / 16) = 110,
        // whose flux lands 10 slots earlier.
        assert_eq!(active[0], 100);
    }

    #[test]
    fn test_click_train_is_periodic() {
        let flux = compute_flux(&click_train(44100 * 2, 4096), 2048, 128).unwrap();
        // 4096 samples = 32 hops
        for i in 0..flux.len() - 32 {
            assert!((flux[i] - flux[i + 32]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        let samples = vec![0.0f64; 10000];
        let result = compute_flux(&samples, 1000, 128);
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_zero_hop() {
        let samples = vec![0.0f64; 10000];
        assert!(compute_flux(&samples, 1024, 0).is_err());
    }

    #[test]
    fn test_shorter_than_frame_is_too_short() {
        let samples = vec![0.5f64; 1000];
        let result = compute_flux(&samples, 2048, 128);
        assert!(matches!(result, Err(AnalysisError::InputTooShort(_))));
    }

    #[test]
    fn test_too_few_frames_is_too_short() {
        // Enough for 10 frames but not the 11th
        let samples = vec![0.5f64; 2048 + 9 * 128];
        let result = compute_flux(&samples, 2048, 128);
        assert!(matches!(result, Err(AnalysisError::InputTooShort(_))));
    }
}
