//! Cadence sampler: keystroke timestamps to one visual parameter.
//!
//! # Invariants
//! - The first keystroke of an entry, and the first after a deletion, gets
//!   the mapping's default value.
//! - Every sample records its instant as the previous keystroke.

use crate::config::CadenceConfig;
use crate::model::entry::EpochMs;
use crate::model::mode::{IntervalBounds, PresentationMode, VisualMapping};

#[derive(Debug, Clone, PartialEq)]
pub struct CadenceSampler {
    mapping: VisualMapping,
    bounds: IntervalBounds,
    previous: Option<EpochMs>,
}

impl CadenceSampler {
    pub fn new(mapping: VisualMapping, bounds: IntervalBounds) -> Self {
        Self {
            mapping,
            bounds,
            previous: None,
        }
    }

    pub fn for_mode(mode: PresentationMode, config: &CadenceConfig) -> Self {
        Self::new(
            VisualMapping::for_mode(mode, config),
            IntervalBounds {
                min_ms: config.min_interval_ms,
                max_ms: config.max_interval_ms,
            },
        )
    }

    pub fn mapping(&self) -> VisualMapping {
        self.mapping
    }

    pub fn default_value(&self) -> f64 {
        self.mapping.default_value()
    }

    pub fn previous_keystroke(&self) -> Option<EpochMs> {
        self.previous
    }

    /// Computes the parameter for a keystroke at `now` and remembers `now`.
    pub fn sample(&mut self, now: EpochMs) -> f64 {
        let value = match self.previous {
            Some(previous) => self.mapping.map(now - previous, self.bounds),
            None => self.mapping.default_value(),
        };
        self.previous = Some(now);
        value
    }

    /// Forgets the previous keystroke, e.g. after a deletion.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}
