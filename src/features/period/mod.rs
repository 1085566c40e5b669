//! Period estimation modules
//!
//! Convert the flux series to a tempo using:
//! - Comb cost (mean absolute self-difference at a lag)
//! - Harmonic comb search over integer BPM candidates

pub mod comb_filter;
pub mod tempo;

/// One point of the tempo cost curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoCandidate {
    /// Candidate tempo in BPM
    pub bpm: f64,

    /// Summed comb cost at the beat period and its 2x and 4x harmonics (lower is better)
    pub cost: f64,
}
