//! Timestamp display formats with a persisted, user-cycled choice.
//!
//! # Responsibility
//! - Format entry timestamps as a date line and a time line.
//! - Advance through a fixed rotation of formats on request and persist the
//!   chosen index through a [`PreferenceStore`].
//!
//! # Invariants
//! - Indices are always within their rotation; unreadable stored values fall
//!   back to the first format.

use crate::model::entry::EpochMs;
use crate::repo::preference_repo::{PreferenceStore, RepoResult};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone};
use log::{info, warn};

pub const DATE_FORMAT_KEY: &str = "dateFormat";
pub const TIME_FORMAT_KEY: &str = "timeFormat";

/// `Jan 5, 2026` and `01/05/2026`.
const DATE_FORMATS: &[&str] = &["%b %-d, %Y", "%m/%d/%Y"];
/// `14:03:09` and `2:03:09 PM`.
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%-I:%M:%S %p"];

const UNKNOWN_TIME: &str = "--";

/// Date/time formatter whose format choice cycles and persists.
pub struct FormatCycler<S: PreferenceStore> {
    store: S,
    date_index: usize,
    time_index: usize,
    utc_offset: Option<FixedOffset>,
}

impl<S: PreferenceStore> FormatCycler<S> {
    /// Loads persisted indices from `store`.
    ///
    /// `utc_offset_minutes` pins display to a fixed offset; `None` uses the
    /// host's local time zone.
    pub fn new(store: S, utc_offset_minutes: Option<i32>) -> Self {
        let date_index = load_index(&store, DATE_FORMAT_KEY, DATE_FORMATS.len());
        let time_index = load_index(&store, TIME_FORMAT_KEY, TIME_FORMATS.len());
        Self {
            store,
            date_index,
            time_index,
            utc_offset: utc_offset_minutes.and_then(|minutes| FixedOffset::east_opt(minutes * 60)),
        }
    }

    pub fn date_index(&self) -> usize {
        self.date_index
    }

    pub fn time_index(&self) -> usize {
        self.time_index
    }

    /// Advances the date format and persists the new index.
    pub fn cycle_date_format(&mut self) -> RepoResult<usize> {
        self.date_index = (self.date_index + 1) % DATE_FORMATS.len();
        self.store
            .set(DATE_FORMAT_KEY, &self.date_index.to_string())?;
        info!(
            "event=format_cycle module=format status=ok kind=date index={}",
            self.date_index
        );
        Ok(self.date_index)
    }

    /// Advances the time format and persists the new index.
    pub fn cycle_time_format(&mut self) -> RepoResult<usize> {
        self.time_index = (self.time_index + 1) % TIME_FORMATS.len();
        self.store
            .set(TIME_FORMAT_KEY, &self.time_index.to_string())?;
        info!(
            "event=format_cycle module=format status=ok kind=time index={}",
            self.time_index
        );
        Ok(self.time_index)
    }

    pub fn format_date(&self, at: EpochMs) -> String {
        self.format_with(at, DATE_FORMATS[self.date_index])
    }

    pub fn format_time(&self, at: EpochMs) -> String {
        self.format_with(at, TIME_FORMATS[self.time_index])
    }

    /// Calendar-day comparison in display time.
    pub fn is_same_day(&self, left: EpochMs, right: EpochMs) -> bool {
        match (self.to_display(left), self.to_display(right)) {
            (Some(left), Some(right)) => left.date() == right.date(),
            _ => false,
        }
    }

    fn format_with(&self, at: EpochMs, pattern: &str) -> String {
        self.to_display(at)
            .map(|local| local.format(pattern).to_string())
            .unwrap_or_else(|| UNKNOWN_TIME.to_string())
    }

    fn to_display(&self, at: EpochMs) -> Option<NaiveDateTime> {
        match self.utc_offset {
            Some(offset) => offset
                .timestamp_millis_opt(at)
                .single()
                .map(|local| local.naive_local()),
            None => Local
                .timestamp_millis_opt(at)
                .single()
                .map(|local: DateTime<Local>| local.naive_local()),
        }
    }
}

fn load_index<S: PreferenceStore>(store: &S, key: &str, len: usize) -> usize {
    match store.get(key) {
        Ok(Some(raw)) => match raw.trim().parse::<usize>() {
            Ok(index) if index < len => index,
            _ => {
                warn!("event=format_load module=format status=fallback key={key} reason=invalid_value");
                0
            }
        },
        Ok(None) => 0,
        Err(err) => {
            warn!("event=format_load module=format status=fallback key={key} error={err}");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FormatCycler, DATE_FORMAT_KEY};
    use crate::repo::preference_repo::{InMemoryPreferenceStore, PreferenceStore};

    /// 2026-01-05T14:03:09Z
    const AT: i64 = 1_767_621_789_000;

    #[test]
    fn formats_follow_rotation() {
        let store = InMemoryPreferenceStore::new();
        let mut cycler = FormatCycler::new(&store, Some(0));
        assert_eq!(cycler.format_date(AT), "Jan 5, 2026");
        assert_eq!(cycler.format_time(AT), "14:03:09");

        cycler.cycle_date_format().expect("cycle date");
        cycler.cycle_time_format().expect("cycle time");
        assert_eq!(cycler.format_date(AT), "01/05/2026");
        assert_eq!(cycler.format_time(AT), "2:03:09 PM");

        assert_eq!(cycler.cycle_date_format().expect("wrap"), 0);
    }

    #[test]
    fn invalid_stored_index_falls_back_to_first_format() {
        let store = InMemoryPreferenceStore::new();
        store.set(DATE_FORMAT_KEY, "7").expect("seed");
        let cycler = FormatCycler::new(&store, Some(0));
        assert_eq!(cycler.date_index(), 0);
    }

    #[test]
    fn same_day_respects_offset() {
        let store = InMemoryPreferenceStore::new();
        let utc = FormatCycler::new(&store, Some(0));
        let ten_hours = 10 * 60 * 60 * 1_000;
        assert!(!utc.is_same_day(AT, AT + ten_hours));

        let west = FormatCycler::new(&store, Some(-10 * 60));
        assert!(west.is_same_day(AT, AT + ten_hours));
    }
}
