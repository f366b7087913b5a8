//! Presentation modes and the interval-to-parameter mapping they share.
//!
//! # Responsibility
//! - Name the four visual interpretations of a per-character attribute.
//! - Provide one [`VisualMapping`] that every mode is expressed through.
//!
//! # Invariants
//! - Clamped mappings never produce a value outside `[fast, slow]`.
//! - The unbounded mapping is `0` at or below the minimum interval.

use crate::config::{CadenceConfig, ParameterRange};
use serde::{Deserialize, Serialize};

/// Which visual attribute the cadence engine drives for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationMode {
    /// Font stretch: narrow when fast, wide when slow.
    Width,
    /// Opacity: full when fast, faint when slow.
    Opacity,
    /// Vertical wave amplitude: high when fast, flat when slow.
    Wave,
    /// Letter spacing: zero when fast, growing linearly when slow.
    LetterSpacing,
}

impl PresentationMode {
    pub const ALL: [PresentationMode; 4] = [
        Self::Width,
        Self::Opacity,
        Self::Wave,
        Self::LetterSpacing,
    ];

    /// Stable string id used in config files and CLI arguments.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Opacity => "opacity",
            Self::Wave => "wave",
            Self::LetterSpacing => "letter_spacing",
        }
    }

    /// Parses a mode id. Accepts `spacing` as a short alias.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "width" => Some(Self::Width),
            "opacity" => Some(Self::Opacity),
            "wave" => Some(Self::Wave),
            "letter_spacing" | "spacing" => Some(Self::LetterSpacing),
            _ => None,
        }
    }
}

/// Clamp window applied to raw inter-key intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalBounds {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl IntervalBounds {
    /// Normalizes an interval into `[0, 1]`.
    pub fn normalize(self, interval_ms: i64) -> f64 {
        let min = self.min_ms as f64;
        let max = self.max_ms as f64;
        let clamped = (interval_ms as f64).clamp(min, max);
        (clamped - min) / (max - min)
    }
}

/// Interval-to-parameter mapping shared by all presentation modes.
///
/// Direction is encoded by the ordering of `fast` and `slow`: width grows
/// with slower typing, opacity and wave amplitude shrink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualMapping {
    /// Linear interpolation between two endpoints, clamped at both ends.
    Clamped(ParameterRange),
    /// Linear growth above the minimum interval with no upper clamp.
    Unbounded { per_ms: f64 },
}

impl VisualMapping {
    pub fn for_mode(mode: PresentationMode, config: &CadenceConfig) -> Self {
        match mode {
            PresentationMode::Width => Self::Clamped(config.width),
            PresentationMode::Opacity => Self::Clamped(config.opacity),
            PresentationMode::Wave => Self::Clamped(config.wave_amplitude),
            PresentationMode::LetterSpacing => Self::Unbounded {
                per_ms: config.letter_spacing_per_ms,
            },
        }
    }

    /// Value assigned when no interval is available (first keystroke).
    pub fn default_value(&self) -> f64 {
        match self {
            Self::Clamped(range) => range.fast,
            Self::Unbounded { .. } => 0.0,
        }
    }

    /// Maps one inter-key interval to the mode's parameter.
    pub fn map(&self, interval_ms: i64, bounds: IntervalBounds) -> f64 {
        match self {
            Self::Clamped(range) => {
                let t = bounds.normalize(interval_ms);
                range.fast + (range.slow - range.fast) * t
            }
            Self::Unbounded { per_ms } => {
                let excess = interval_ms.saturating_sub(bounds.min_ms as i64).max(0);
                excess as f64 * per_ms
            }
        }
    }
}
