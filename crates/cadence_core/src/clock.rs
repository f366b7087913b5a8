//! Time sources for stamping journal events.
//!
//! Journal operations take explicit `now` values so state transitions are
//! deterministic; a [`Clock`] is what callers use to produce them.

use crate::model::entry::EpochMs;
use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock {
    fn now_ms(&self) -> EpochMs;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> EpochMs {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

/// Manually advanced clock for scripted sessions and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<EpochMs>,
}

impl ManualClock {
    pub fn starting_at(now: EpochMs) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now.set(self.now.get().saturating_add(delta_ms));
    }

    pub fn set(&self, now: EpochMs) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> EpochMs {
        self.now.get()
    }
}
