//! Tunable configuration for extraction and cube aggregation.

use std::time::Duration;

/// Configuration for per-profile bisector extraction.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Half-width of the symmetric parabolic fit window around the line
    /// minimum (window length `2·fit_half_width + 1` samples).
    pub fit_half_width: usize,
    /// Emit per-profile trace output (fitted centre, depth, level count).
    pub verbose: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            fit_half_width: 2,
            verbose: false,
        }
    }
}

/// Configuration for cube-level velocity aggregation.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VelocityConfig {
    /// Per-profile extraction settings.
    pub extract: ExtractConfig,
    /// Pause between pixel extractions, a live-visualization aid.
    ///
    /// Zero (the default) selects the parallel per-pixel path; a nonzero
    /// delay forces sequential processing with a sleep between pixels.
    /// Returned values are identical either way.
    pub pixel_delay: Duration,
}
