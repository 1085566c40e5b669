//! Analysis and result aggregation modules
//!
//! Combines beat records into the final analysis:
//! - Windowed mood descriptors
//! - Result types
//! - Metadata

pub mod metadata;
pub mod mood;
pub mod result;
