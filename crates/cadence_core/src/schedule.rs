//! Recurring timers reconciled against entry state.
//!
//! # Responsibility
//! - Track the three kinds of recurring timed work the journal needs.
//! - Arm and cancel timers level-triggered: the caller states which timers
//!   should exist right now, and anything else is cancelled.
//!
//! # Invariants
//! - At most one timer per `(kind, entry)` pair.
//! - A cancelled timer never fires.
//! - A timer fires at most once per `fire_due` call; missed periods are
//!   skipped rather than replayed.

use crate::model::entry::{EntryId, EpochMs};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Re-format the live clock of a composing-empty entry.
    TimestampRedisplay,
    /// Recompute idle spacing of a composing-empty entry.
    IdleSpacing,
    /// Re-focus the active entry's surface when focus was lost.
    FocusRetention,
}

impl TimerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TimestampRedisplay => "timestamp_redisplay",
            Self::IdleSpacing => "idle_spacing",
            Self::FocusRetention => "focus_retention",
        }
    }
}

/// A timer the caller wants armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSpec {
    pub kind: TimerKind,
    pub entry_id: EntryId,
    pub period_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RecurringTimer {
    spec: TimerSpec,
    next_due: EpochMs,
}

#[derive(Debug, Clone, Default)]
pub struct TimerSet {
    timers: Vec<RecurringTimer>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn is_armed(&self, kind: TimerKind, entry_id: EntryId) -> bool {
        self.timers
            .iter()
            .any(|timer| timer.spec.kind == kind && timer.spec.entry_id == entry_id)
    }

    /// Makes the armed set equal to `desired`.
    ///
    /// Newly armed timers are due immediately. Timers whose period changed are
    /// re-armed.
    pub fn reconcile(&mut self, desired: &[TimerSpec], now: EpochMs) {
        self.timers.retain(|timer| {
            let keep = desired.contains(&timer.spec);
            if !keep {
                debug!(
                    "event=timer_cancel module=schedule status=ok kind={} entry_id={}",
                    timer.spec.kind.as_str(),
                    timer.spec.entry_id
                );
            }
            keep
        });

        for spec in desired {
            if self.timers.iter().any(|timer| timer.spec == *spec) {
                continue;
            }
            debug!(
                "event=timer_arm module=schedule status=ok kind={} entry_id={} period_ms={}",
                spec.kind.as_str(),
                spec.entry_id,
                spec.period_ms
            );
            self.timers.push(RecurringTimer {
                spec: *spec,
                next_due: now,
            });
        }
    }

    /// Returns every timer due at `now` and schedules its next run.
    pub fn fire_due(&mut self, now: EpochMs) -> Vec<TimerSpec> {
        let mut fired = Vec::new();
        for timer in &mut self.timers {
            if timer.next_due > now {
                continue;
            }
            let period = i64::try_from(timer.spec.period_ms).unwrap_or(i64::MAX).max(1);
            let missed = (now - timer.next_due) / period;
            timer.next_due = timer
                .next_due
                .saturating_add(period.saturating_mul(missed + 1));
            fired.push(timer.spec);
        }
        fired
    }

    /// Cancels every timer.
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{TimerKind, TimerSet, TimerSpec};
    use crate::model::entry::EntryId;

    fn spec(kind: TimerKind, id: u64, period_ms: u64) -> TimerSpec {
        TimerSpec {
            kind,
            entry_id: EntryId::new(id),
            period_ms,
        }
    }

    #[test]
    fn armed_timer_fires_immediately_then_on_period() {
        let mut timers = TimerSet::new();
        timers.reconcile(&[spec(TimerKind::IdleSpacing, 1, 50)], 1_000);

        assert_eq!(timers.fire_due(1_000).len(), 1);
        assert!(timers.fire_due(1_049).is_empty());
        assert_eq!(timers.fire_due(1_050).len(), 1);
    }

    #[test]
    fn missed_periods_fire_once() {
        let mut timers = TimerSet::new();
        timers.reconcile(&[spec(TimerKind::FocusRetention, 1, 100)], 0);
        timers.fire_due(0);

        assert_eq!(timers.fire_due(1_000).len(), 1);
        assert!(timers.fire_due(1_050).is_empty());
        assert_eq!(timers.fire_due(1_100).len(), 1);
    }

    #[test]
    fn reconcile_cancels_undesired_timers() {
        let mut timers = TimerSet::new();
        timers.reconcile(
            &[
                spec(TimerKind::TimestampRedisplay, 1, 250),
                spec(TimerKind::FocusRetention, 1, 100),
            ],
            0,
        );
        timers.reconcile(&[spec(TimerKind::FocusRetention, 1, 100)], 10);

        assert!(!timers.is_armed(TimerKind::TimestampRedisplay, EntryId::new(1)));
        assert!(timers.is_armed(TimerKind::FocusRetention, EntryId::new(1)));
        let fired = timers.fire_due(10_000);
        assert_eq!(fired, vec![spec(TimerKind::FocusRetention, 1, 100)]);
    }

    #[test]
    fn reconcile_keeps_schedule_of_existing_timer() {
        let mut timers = TimerSet::new();
        let idle = spec(TimerKind::IdleSpacing, 2, 50);
        timers.reconcile(&[idle], 0);
        timers.fire_due(0);
        timers.reconcile(&[idle], 20);
        assert!(timers.fire_due(20).is_empty());
    }
}
