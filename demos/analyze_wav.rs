//! Example: Analyze a WAV file
//!
//! Prints the tempo, every beat record and the mood descriptors.
//!
//! ```text
//! cargo run --example analyze_wav -- path/to/track.wav
//! ```

use beatgrid_dsp::io::decoder::decode_wav;
use beatgrid_dsp::{analyze_waveform, AnalysisConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: analyze_wav <file.wav>")?;

    println!("Getting beat data for {}...", path);
    let waveform = decode_wav(&path)?;
    let result = analyze_waveform(&waveform, AnalysisConfig::default())?;

    println!("BPM: {:.0}", result.bpm);
    for beat in &result.beats {
        println!("{}", beat);
    }

    println!();
    for mood in &result.moods {
        println!("{}", mood);
    }

    println!(
        "{} beats, {} mood windows, {:.1} ms",
        result.beats.len(),
        result.moods.len(),
        result.metadata.processing_time_ms
    );

    Ok(())
}
