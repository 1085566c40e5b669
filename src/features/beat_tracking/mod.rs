//! Beat tracking modules
//!
//! Generate a beat grid and beat records from a tempo estimate:
//! - Phase search on a fixed-period grid
//! - Eighth-note grid extraction with drift re-anchoring
//! - Beat records with section numbering, intensity and prominence

pub mod grid;
pub mod phase;
pub mod records;

/// Grid subdivisions per beat (eighth-note grid)
pub const BEAT_SUBDIVISIONS: usize = 8;
