//! Tunable constants for cadence styling, idle spacing and timers.
//!
//! # Responsibility
//! - Hold every calibrated constant used by the sampler, spacing mapper and
//!   recurring timers in one serde-friendly struct.
//! - Reject configurations that would break the interval normalization.
//!
//! # Invariants
//! - `min_interval_ms < max_interval_ms`.
//! - Timer periods are strictly positive.
//! - All floating-point values are finite.

use crate::model::mode::PresentationMode;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fast/slow endpoints of one clamped visual parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    /// Value produced at or below `min_interval_ms`.
    pub fast: f64,
    /// Value produced at or above `max_interval_ms`.
    pub slow: f64,
}

impl ParameterRange {
    pub const fn new(fast: f64, slow: f64) -> Self {
        Self { fast, slow }
    }
}

/// Calibration for the keystroke-cadence engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    /// Lower clamp of the inter-key interval, in milliseconds.
    pub min_interval_ms: u64,
    /// Upper clamp of the inter-key interval, in milliseconds.
    pub max_interval_ms: u64,
    /// Font stretch percentage range.
    pub width: ParameterRange,
    /// Opacity range.
    pub opacity: ParameterRange,
    /// Vertical wave amplitude range.
    pub wave_amplitude: ParameterRange,
    /// Letter spacing growth per millisecond above `min_interval_ms`.
    pub letter_spacing_per_ms: f64,
    /// Layout offset units per idle second before the first keystroke.
    pub spacing_per_second: f64,
    /// Live clock redisplay period while an entry is composing-empty.
    pub timestamp_tick_ms: u64,
    /// Idle spacing recomputation period.
    pub spacing_tick_ms: u64,
    /// Focus reconciliation period while an entry is active.
    pub focus_tick_ms: u64,
    /// Fixed UTC offset for displayed timestamps; local time when absent.
    pub utc_offset_minutes: Option<i32>,
    /// Mode selected when a session starts.
    pub initial_mode: PresentationMode,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 75,
            max_interval_ms: 200,
            width: ParameterRange::new(25.0, 150.0),
            opacity: ParameterRange::new(1.0, 0.25),
            wave_amplitude: ParameterRange::new(8.0, 0.0),
            letter_spacing_per_ms: 0.03,
            spacing_per_second: 4.0,
            timestamp_tick_ms: 250,
            spacing_tick_ms: 50,
            focus_tick_ms: 100,
            utc_offset_minutes: None,
            initial_mode: PresentationMode::Width,
        }
    }
}

impl CadenceConfig {
    /// Parses a JSON document; missing fields take their defaults.
    ///
    /// # Errors
    /// - `ConfigError::Parse` when the document is not valid JSON for this shape.
    /// - Any error returned by [`CadenceConfig::validate`].
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_interval_ms >= self.max_interval_ms {
            return Err(ConfigError::InvalidIntervalBounds {
                min_ms: self.min_interval_ms,
                max_ms: self.max_interval_ms,
            });
        }

        for (name, period) in [
            ("timestamp_tick_ms", self.timestamp_tick_ms),
            ("spacing_tick_ms", self.spacing_tick_ms),
            ("focus_tick_ms", self.focus_tick_ms),
        ] {
            if period == 0 {
                return Err(ConfigError::ZeroPeriod(name));
            }
        }

        let values = [
            ("width.fast", self.width.fast),
            ("width.slow", self.width.slow),
            ("opacity.fast", self.opacity.fast),
            ("opacity.slow", self.opacity.slow),
            ("wave_amplitude.fast", self.wave_amplitude.fast),
            ("wave_amplitude.slow", self.wave_amplitude.slow),
            ("letter_spacing_per_ms", self.letter_spacing_per_ms),
            ("spacing_per_second", self.spacing_per_second),
        ];
        for (name, value) in values {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
        }

        if let Some(minutes) = self.utc_offset_minutes {
            if minutes.abs() >= 24 * 60 {
                return Err(ConfigError::InvalidUtcOffset(minutes));
            }
        }

        Ok(())
    }
}

/// Configuration validation/parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    InvalidIntervalBounds { min_ms: u64, max_ms: u64 },
    ZeroPeriod(&'static str),
    NonFinite(&'static str),
    InvalidUtcOffset(i32),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "invalid cadence config: {message}"),
            Self::InvalidIntervalBounds { min_ms, max_ms } => write!(
                f,
                "min_interval_ms ({min_ms}) must be < max_interval_ms ({max_ms})"
            ),
            Self::ZeroPeriod(name) => write!(f, "{name} must be > 0"),
            Self::NonFinite(name) => write!(f, "{name} must be a finite number"),
            Self::InvalidUtcOffset(minutes) => {
                write!(f, "utc_offset_minutes ({minutes}) is out of range")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{CadenceConfig, ConfigError};
    use crate::model::mode::PresentationMode;

    #[test]
    fn defaults_are_valid() {
        CadenceConfig::default()
            .validate()
            .expect("default config should validate");
    }

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let config = CadenceConfig::from_json_str(
            r#"{ "max_interval_ms": 300, "initial_mode": "letter_spacing" }"#,
        )
        .expect("partial config should parse");
        assert_eq!(config.max_interval_ms, 300);
        assert_eq!(config.min_interval_ms, 75);
        assert_eq!(config.initial_mode, PresentationMode::LetterSpacing);
    }

    #[test]
    fn rejects_inverted_interval_bounds() {
        let err = CadenceConfig::from_json_str(r#"{ "min_interval_ms": 200, "max_interval_ms": 75 }"#)
            .expect_err("inverted bounds must fail");
        assert_eq!(
            err,
            ConfigError::InvalidIntervalBounds {
                min_ms: 200,
                max_ms: 75
            }
        );
    }

    #[test]
    fn rejects_zero_timer_period() {
        let config = CadenceConfig {
            spacing_tick_ms: 0,
            ..CadenceConfig::default()
        };
        assert_eq!(
            config.validate().expect_err("zero period must fail"),
            ConfigError::ZeroPeriod("spacing_tick_ms")
        );
    }

    #[test]
    fn rejects_malformed_json() {
        let err = CadenceConfig::from_json_str("{ not json").expect_err("malformed must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
