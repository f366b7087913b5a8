//! Entry domain model and lifecycle transitions.
//!
//! # Responsibility
//! - Define the journaled unit of text and its lifecycle state.
//! - Own the transition side effects (timestamps, pause capture, reset).
//!
//! # Invariants
//! - `id` is assigned once by the journal and never reused.
//! - `Committed` is terminal; committed text and attributes never change.
//! - `pause_duration_ms` is captured at most once per composing attempt.
//! - `attributes.len()` equals the character count of `text` after every edit.

use crate::cadence::spacing::PauseSpacing;
use crate::model::attributes::AttributeStore;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Unix epoch milliseconds.
pub type EpochMs = i64;

/// Stable sequence number of an entry within one journal session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Accepting input, no text yet. Shows the live clock.
    Composing,
    /// Accepting input with a fixed display timestamp.
    Frozen,
    /// Read-only.
    Committed,
}

impl LifecycleState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Composing => "composing",
            Self::Frozen => "frozen",
            Self::Committed => "committed",
        }
    }
}

/// One journaled unit of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub(crate) id: EntryId,
    pub(crate) text: String,
    pub(crate) state: LifecycleState,
    pub(crate) started_at: Option<EpochMs>,
    pub(crate) frozen_at: Option<EpochMs>,
    pub(crate) pause_duration_ms: Option<i64>,
    /// Layout offset derived from the idle pause before this entry.
    pub(crate) pause_offset: f64,
    pub(crate) attributes: AttributeStore,
    /// Whether this entry wants input focus.
    pub(crate) is_active: bool,
}

impl Entry {
    /// Creates an empty, active entry in `Composing` state.
    pub fn new(id: EntryId, attributes: AttributeStore) -> Self {
        Self {
            id,
            text: String::new(),
            state: LifecycleState::Composing,
            started_at: None,
            frozen_at: None,
            pause_duration_ms: None,
            pause_offset: 0.0,
            attributes,
            is_active: true,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn started_at(&self) -> Option<EpochMs> {
        self.started_at
    }

    pub fn frozen_at(&self) -> Option<EpochMs> {
        self.frozen_at
    }

    pub fn pause_duration_ms(&self) -> Option<i64> {
        self.pause_duration_ms
    }

    pub fn pause_offset(&self) -> f64 {
        self.pause_offset
    }

    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_committed(&self) -> bool {
        self.state == LifecycleState::Committed
    }

    /// Character count of `text`.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Display instant: the frozen timestamp, or `now` while still composing.
    pub fn display_time(&self, now: EpochMs) -> EpochMs {
        self.frozen_at.unwrap_or(now)
    }

    /// Returns whether a commit signal at `caret` would be accepted.
    ///
    /// The line holding the caret, up to the caret, must contain at least one
    /// non-whitespace character.
    pub fn can_commit_at(&self, caret: usize) -> bool {
        if self.is_committed() {
            return false;
        }
        let before_caret: String = self.text.chars().take(caret).collect();
        let current_line = before_caret.rsplit('\n').next().unwrap_or("");
        !current_line.trim().is_empty()
    }

    /// `Composing -> Frozen` on the first non-empty text.
    ///
    /// Captures the pause since `previous_commit` exactly once.
    pub(crate) fn begin_typing(
        &mut self,
        now: EpochMs,
        previous_commit: Option<EpochMs>,
        spacing: &PauseSpacing,
    ) {
        debug_assert_eq!(self.state, LifecycleState::Composing);
        self.state = LifecycleState::Frozen;
        self.started_at = Some(now);
        self.frozen_at = Some(now);
        if self.pause_duration_ms.is_none() {
            if let Some(commit_at) = previous_commit {
                let pause = (now - commit_at).max(0);
                self.pause_duration_ms = Some(pause);
                self.pause_offset = spacing.offset_for(pause);
            }
        }
    }

    /// `Frozen -> Composing` when the text is cleared before commit.
    pub(crate) fn reset_to_empty(&mut self) {
        self.state = LifecycleState::Composing;
        self.text.clear();
        self.started_at = None;
        self.frozen_at = None;
        self.pause_duration_ms = None;
        self.pause_offset = 0.0;
        self.attributes.clear();
    }

    /// `Frozen -> Committed`. Freezes the pause (`0` when never captured).
    pub(crate) fn commit(&mut self, spacing: &PauseSpacing) {
        let pause = self.pause_duration_ms.unwrap_or(0);
        self.pause_duration_ms = Some(pause);
        self.pause_offset = spacing.offset_for(pause);
        self.state = LifecycleState::Committed;
        self.is_active = false;
    }
}
