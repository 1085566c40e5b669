//! Feature extraction modules
//!
//! This module contains the per-stage algorithms of the pipeline:
//! - Onset strength (spectral flux)
//! - Period estimation (BPM detection)
//! - Beat tracking (grid extraction and beat records)
//! - Clamped range statistics shared by the stages

pub mod beat_tracking;
pub mod onset;
pub mod period;
pub mod range;
