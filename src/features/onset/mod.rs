//! Onset strength modules
//!
//! - Spectral flux over a short-time transform
//! - Rolling-sum smoothing of the flux series

pub mod smoothing;
pub mod spectral_flux;

/// Frames between the two spectra compared by spectral flux
///
/// The first `FLUX_LOOKBACK` frames are consumed as lookback and produce
/// no flux value of their own.
pub const FLUX_LOOKBACK: usize = 10;
