//! Analysis result types

use std::fmt;

use serde::{Deserialize, Serialize};

use super::metadata::AnalysisMetadata;

/// One accepted beat on the eighth-note grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeatRecord {
    /// Time in seconds
    pub time: f64,

    /// Section number, incremented whenever timing departs from the predicted grid
    pub section: u32,

    /// Position within the section, reset to 0 at each new section
    pub beat_in_section: u32,

    /// Sum of flux around the beat
    pub intensity: f64,

    /// Local peak flux over (1 + minimum flux since the previous beat)
    pub prominence: f64,
}

impl fmt::Display for BeatRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Time: {:>10.3}, Section: {:>4}, Beat: {:>4}, Intensity: {:>12.2}, Prominence: {:>10.2}",
            self.time, self.section, self.beat_in_section, self.intensity, self.prominence
        )
    }
}

/// Three-level mood bucket, serialized as `0`, `1` or `2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum MoodLevel {
    /// Below the blended mean by more than half a deviation
    Low,
    /// Within half a deviation of the blended mean
    Medium,
    /// Above the blended mean by more than half a deviation
    High,
}

impl MoodLevel {
    /// Numeric value of the level (0, 1 or 2)
    pub fn value(self) -> u8 {
        match self {
            MoodLevel::Low => 0,
            MoodLevel::Medium => 1,
            MoodLevel::High => 2,
        }
    }
}

impl From<MoodLevel> for u8 {
    fn from(level: MoodLevel) -> Self {
        level.value()
    }
}

impl TryFrom<u8> for MoodLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MoodLevel::Low),
            1 => Ok(MoodLevel::Medium),
            2 => Ok(MoodLevel::High),
            other => Err(format!("mood level must be 0, 1 or 2, got {}", other)),
        }
    }
}

/// Mood of one window of beats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodDescriptor {
    /// Time of the window's first beat in seconds
    pub time: f64,

    /// Rhythmic density bucket
    pub freneticism: MoodLevel,

    /// Rhythmic energy bucket
    pub physicality: MoodLevel,
}

impl fmt::Display for MoodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Time: {:>10.2}, Freneticism: {:>3}, Physicality: {:>3}",
            self.time,
            self.freneticism.value(),
            self.physicality.value()
        )
    }
}

/// Complete analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeatAnalysis {
    /// Estimated tempo (integer BPM)
    pub bpm: f64,

    /// Beat records, starting on the first whole beat
    pub beats: Vec<BeatRecord>,

    /// One mood descriptor per window of beats
    pub moods: Vec<MoodDescriptor>,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}
