//! Integration tests for the beat analysis pipeline

use beatgrid_dsp::features::beat_tracking::grid::extract_beat_indices;
use beatgrid_dsp::features::onset::smoothing::rolling_sum;
use beatgrid_dsp::features::onset::spectral_flux::compute_flux;
use beatgrid_dsp::features::period::tempo::{estimate_bpm, period_for_bpm};
use beatgrid_dsp::io::decoder::decode_wav;
use beatgrid_dsp::{analyze_beats, analyze_waveform, AnalysisConfig, AnalysisError};

const SAMPLE_RATE: f64 = 44100.0;

/// Metronome: a unit impulse at every beat
fn click_track(duration_seconds: f64, bpm: f64) -> Vec<f64> {
    let len = (duration_seconds * SAMPLE_RATE) as usize;
    let beat = SAMPLE_RATE * 60.0 / bpm;
    let mut samples = vec![0.0f64; len];
    let mut k = 0;
    loop {
        let pos = (k as f64 * beat).round() as usize;
        if pos >= len {
            break;
        }
        samples[pos] = 1.0;
        k += 1;
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_track_120_bpm_tempo() {
        let samples = click_track(20.0, 120.0);
        let flux = compute_flux(&samples, 2048, 128).unwrap();
        let bpm = estimate_bpm(&flux, SAMPLE_RATE, 128, 70, 170).unwrap();
        assert!(
            (bpm - 120.0).abs() <= 1.2,
            "BPM should be within 1% of 120, got {}",
            bpm
        );
    }

    #[test]
    fn test_end_to_end_128_bpm() {
        let samples = click_track(30.0, 128.0);
        let config = AnalysisConfig::default();
        let result = analyze_beats(&samples, SAMPLE_RATE, config.clone())
            .expect("Analysis should succeed");

        assert_eq!(result.bpm, 128.0, "expected 128 BPM, got {}", result.bpm);

        // 8 grid points per beat over the flux series
        let period_eighth = period_for_bpm(128.0, SAMPLE_RATE, 128) / 8.0;
        let expected = result.metadata.flux_frames as f64 / period_eighth;
        assert!(
            (result.metadata.candidate_count as f64 - expected).abs() <= 12.0,
            "expected ~{:.0} grid candidates, got {}",
            expected,
            result.metadata.candidate_count
        );

        assert!(result.beats.len() <= result.metadata.candidate_count);
        assert!(result.beats.len() + 20 >= result.metadata.candidate_count);

        // Monotone time, consecutive numbering within a section
        for w in result.beats.windows(2) {
            assert!(w[1].time >= w[0].time);
            if w[1].section == w[0].section {
                assert_eq!(w[1].beat_in_section, w[0].beat_in_section + 1);
            } else {
                assert_eq!(w[1].beat_in_section, 0);
            }
        }

        // The sequence starts on a click, and only every eighth record is one
        let first = &result.beats[0];
        assert!(first.intensity > 0.0);
        for beat in &result.beats[1..8] {
            assert!(first.intensity > beat.intensity);
        }

        let expected_moods = (result.beats.len() + config.mood_window - 1) / config.mood_window;
        assert_eq!(result.moods.len(), expected_moods);
        assert_eq!(result.moods[0].time, result.beats[0].time);

        // Deterministic for fixed input and reference
        let again = analyze_beats(&samples, SAMPLE_RATE, config).unwrap();
        assert_eq!(again.beats, result.beats);
        assert_eq!(again.moods, result.moods);
    }

    #[test]
    fn test_grid_on_click_track_flux() {
        let samples = click_track(20.0, 128.0);
        let flux = compute_flux(&samples, 2048, 128).unwrap();
        let period_eighth = period_for_bpm(128.0, SAMPLE_RATE, 128) / 8.0;
        let indices = extract_beat_indices(&rolling_sum(&flux, 5), period_eighth, 5000, 1000).unwrap();

        for w in indices.windows(2) {
            assert!(w[1] > w[0]);
        }
        assert!(indices.iter().all(|&i| i < flux.len()));
    }

    #[test]
    fn test_silence_reports_no_tempo() {
        let samples = vec![0.0f64; 44100 * 10];
        let flux = compute_flux(&samples, 2048, 128).unwrap();
        assert!(flux.iter().all(|&f| f == 0.0));

        let result = analyze_beats(&samples, SAMPLE_RATE, AnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::NoTempoFound(_))));
    }

    #[test]
    fn test_too_short_input() {
        let samples = vec![0.0f64; 1000];
        let result = analyze_beats(&samples, SAMPLE_RATE, AnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::InputTooShort(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let samples = click_track(5.0, 120.0);
        let config = AnalysisConfig {
            hop_size: 0,
            ..AnalysisConfig::default()
        };
        let result = analyze_beats(&samples, SAMPLE_RATE, config);
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));

        let result = analyze_beats(&samples, 0.0, AnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_wav_roundtrip_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("click_128.wav");

        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for s in click_track(20.0, 128.0) {
            let v = (s * i16::MAX as f64) as i16;
            writer.write_sample(v).unwrap();
            writer.write_sample(v).unwrap();
        }
        writer.finalize().unwrap();

        let waveform = decode_wav(&path).expect("WAV should decode");
        assert_eq!(waveform.sample_rate(), SAMPLE_RATE);
        assert_eq!(waveform.samples().len(), 44100 * 20);

        let result = analyze_waveform(&waveform, AnalysisConfig::default()).unwrap();
        assert!((result.bpm - 128.0).abs() <= 1.0, "got {}", result.bpm);
        assert!(!result.beats.is_empty());
    }

    #[test]
    fn test_result_serializes() {
        let samples = click_track(12.0, 128.0);
        let result = analyze_beats(&samples, SAMPLE_RATE, AnalysisConfig::default()).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["beats"].as_array().unwrap().len(), result.beats.len());
        let level = json["moods"][0]["freneticism"].as_u64().unwrap();
        assert!(level <= 2);
    }
}
