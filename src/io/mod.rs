//! Audio I/O modules
//!
//! The waveform source boundary: a decoded, mono waveform and a WAV
//! decoder that produces one with hound.

pub mod decoder;
pub mod waveform;

pub use waveform::Waveform;
