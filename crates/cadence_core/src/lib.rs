//! Core of the cadence journal: an append-only journal whose characters are
//! styled by the rhythm they were typed in.
//! This crate is the single source of truth for journal invariants.

pub mod cadence;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod schedule;
pub mod service;

pub use cadence::sampler::CadenceSampler;
pub use cadence::spacing::PauseSpacing;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CadenceConfig, ConfigError, ParameterRange};
pub use logging::{default_log_level, init_logging, init_logging_with, logging_status, LoggingOptions};
pub use model::attributes::{AttributePatch, AttributeStore, TextEdit};
pub use model::entry::{Entry, EntryId, EpochMs, LifecycleState};
pub use model::mode::{IntervalBounds, PresentationMode, VisualMapping};
pub use render::styled::{styled_runs, RunStyle, StyledRenderer};
pub use render::surface::{CaretAnchor, EditableSurface, RunNode, NBSP};
pub use repo::preference_repo::{
    InMemoryPreferenceStore, PreferenceStore, RepoError, RepoResult, SqlitePreferenceStore,
};
pub use schedule::{TimerKind, TimerSet, TimerSpec};
pub use service::format_service::FormatCycler;
pub use service::journal_service::{
    CommitOutcome, EditOutcome, EntryHeader, Journal, JournalError, TickEffect,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
