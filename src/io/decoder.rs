//! WAV decoding using hound
//!
//! Reads integer or float PCM, scales integer samples to [-1.0, 1.0]
//! and averages channels down to mono.

use std::io::Read;
use std::path::Path;

use super::waveform::Waveform;
use crate::error::AnalysisError;
use crate::preprocessing::channel_mixer::downmix_interleaved;

/// Decode a WAV file to a mono waveform
///
/// # Arguments
///
/// * `path` - Path to a PCM WAV file
///
/// # Errors
///
/// Returns `DecodingError` if the file cannot be opened or parsed.
pub fn decode_wav<P: AsRef<Path>>(path: P) -> Result<Waveform, AnalysisError> {
    log::debug!("Decoding WAV file: {}", path.as_ref().display());
    let reader = hound::WavReader::open(path)?;
    decode_reader(reader)
}

/// Decode WAV data from any reader
pub fn decode_wav_from<R: Read>(source: R) -> Result<Waveform, AnalysisError> {
    let reader = hound::WavReader::new(source)?;
    decode_reader(reader)
}

fn decode_reader<R: Read>(mut reader: hound::WavReader<R>) -> Result<Waveform, AnalysisError> {
    let spec = reader.spec();

    let interleaved: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(AnalysisError::DecodingError(format!(
                    "Unsupported bit depth: {}",
                    spec.bits_per_sample
                )));
            }
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f64 / max_value))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let samples = downmix_interleaved(&interleaved, spec.channels as usize)?;

    log::debug!(
        "Decoded {} frames, {} channel(s), {} Hz, {} bit {:?}",
        samples.len(),
        spec.channels,
        spec.sample_rate,
        spec.bits_per_sample,
        spec.sample_format
    );

    Waveform::new(samples, spec.sample_rate as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn wav_bytes(spec: hound::WavSpec, samples: &[i16]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_decode_stereo_int16() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let bytes = wav_bytes(spec, &[16384, 16384, -32768, 0, 0, 0]);
        let wave = decode_wav_from(Cursor::new(bytes)).unwrap();

        assert_eq!(wave.sample_rate(), 22050.0);
        assert_eq!(wave.samples(), &[0.5, -0.5, 0.0]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = decode_wav_from(Cursor::new(vec![0u8; 16]));
        assert!(matches!(result, Err(AnalysisError::DecodingError(_))));
    }

    #[test]
    fn test_missing_file_fails() {
        let result = decode_wav("/nonexistent/definitely/missing.wav");
        assert!(matches!(result, Err(AnalysisError::DecodingError(_))));
    }
}
