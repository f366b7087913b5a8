//! Journal use-case service: the entry collection controller.
//!
//! # Responsibility
//! - Own the ordered entries of one session and the editable surface of the
//!   active entry.
//! - Route edit, commit, tick and mode-switch events through the cadence
//!   sampler, attribute store, lifecycle transitions and styled renderer.
//!
//! # Invariants
//! - Exactly one entry is not committed, and it is the last one.
//! - Every method takes `&mut self`; one event is fully applied before the
//!   next is observed.
//! - Timers are reconciled after every state change, so none outlives the
//!   condition that armed it.
//! - Entry text never reaches the log.

use crate::cadence::sampler::CadenceSampler;
use crate::cadence::spacing::PauseSpacing;
use crate::config::{CadenceConfig, ConfigError};
use crate::model::attributes::{AttributePatch, AttributeStore, TextEdit};
use crate::model::entry::{Entry, EntryId, EpochMs, LifecycleState};
use crate::model::mode::PresentationMode;
use crate::render::styled::{styled_runs, StyledRenderer};
use crate::render::surface::{EditableSurface, RunNode};
use crate::repo::preference_repo::PreferenceStore;
use crate::schedule::{TimerKind, TimerSet, TimerSpec};
use crate::service::format_service::FormatCycler;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Misuse of the journal API. Ordinary input never produces these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalError {
    UnknownEntry(EntryId),
    EntryCommitted(EntryId),
}

impl Display for JournalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownEntry(id) => write!(f, "entry not found: {id}"),
            Self::EntryCommitted(id) => write!(f, "entry {id} is committed and read-only"),
        }
    }
}

impl Error for JournalError {}

/// Result of one edit event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditOutcome {
    pub entry_id: EntryId,
    pub state: LifecycleState,
    pub patch: AttributePatch,
    /// Attribute assigned to inserted characters, if any.
    pub sampled: Option<f64>,
    /// Logical caret offset after the surface rebuild.
    pub caret: usize,
}

/// Result of a commit signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed {
        entry_id: EntryId,
        next_entry_id: EntryId,
    },
    /// Current line before the caret was blank; nothing changed.
    Ignored,
}

/// Observable work done by a timer tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickEffect {
    /// The live clock of this entry should be redisplayed for `at`.
    RedisplayTimestamp { entry_id: EntryId, at: EpochMs },
    SpacingUpdated { entry_id: EntryId, offset: f64 },
    /// Focus had been lost and was restored.
    Refocused { entry_id: EntryId },
}

/// Display header of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    /// Present only when the day differs from the previous entry's.
    pub date: Option<String>,
    pub time: String,
}

/// One journaling session.
pub struct Journal {
    config: CadenceConfig,
    mode: PresentationMode,
    entries: Vec<Entry>,
    next_id: u64,
    previous_commit: Option<EpochMs>,
    sampler: CadenceSampler,
    spacing: PauseSpacing,
    renderer: StyledRenderer,
    surface: EditableSurface,
    timers: TimerSet,
}

impl Journal {
    /// Starts a session at `now` with one empty, focused entry.
    pub fn new(config: CadenceConfig, now: EpochMs) -> Result<Self, ConfigError> {
        config.validate()?;
        let mode = config.initial_mode;
        let sampler = CadenceSampler::for_mode(mode, &config);
        let spacing = PauseSpacing::new(config.spacing_per_second);

        let mut journal = Self {
            config,
            mode,
            entries: Vec::new(),
            next_id: 0,
            previous_commit: None,
            sampler,
            spacing,
            renderer: StyledRenderer::new(),
            surface: EditableSurface::new(),
            timers: TimerSet::new(),
        };
        journal.open_entry();
        journal.reconcile_timers(now);
        info!(
            "event=session_start module=journal status=ok mode={}",
            mode.as_str()
        );
        Ok(journal)
    }

    pub fn config(&self) -> &CadenceConfig {
        &self.config
    }

    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// The single entry accepting input.
    pub fn active_entry(&self) -> &Entry {
        &self.entries[self.active_index()]
    }

    pub fn active_id(&self) -> EntryId {
        self.active_entry().id
    }

    pub fn previous_commit(&self) -> Option<EpochMs> {
        self.previous_commit
    }

    pub fn sampler(&self) -> &CadenceSampler {
        &self.sampler
    }

    pub fn timers(&self) -> &TimerSet {
        &self.timers
    }

    pub fn surface(&self) -> &EditableSurface {
        &self.surface
    }

    /// Native editing access. Call [`Journal::handle_input`] afterwards.
    pub fn surface_mut(&mut self) -> &mut EditableSurface {
        &mut self.surface
    }

    /// Handles an input event after the surface was edited natively.
    ///
    /// Reads the new text and caret from the surface, then applies the edit.
    pub fn handle_input(&mut self, now: EpochMs) -> Result<EditOutcome, JournalError> {
        let new_text = self.surface.text_content();
        let caret = self.surface.caret_offset();
        self.apply_edit(self.active_id(), &new_text, caret, now)
    }

    /// Applies one edit to entry `id`.
    ///
    /// `caret_after` is the caret offset once the edit landed; `None` means
    /// it could not be determined and end of text is assumed.
    pub fn apply_edit(
        &mut self,
        id: EntryId,
        new_text: &str,
        caret_after: Option<usize>,
        now: EpochMs,
    ) -> Result<EditOutcome, JournalError> {
        let index = self.index_of(id)?;
        let previous_commit = self.previous_commit;
        let entry = &mut self.entries[index];
        if entry.is_committed() {
            warn!("event=entry_edit module=journal status=rejected entry_id={id} reason=committed");
            return Err(JournalError::EntryCommitted(id));
        }

        let edit = TextEdit::between(&entry.text, new_text, 0);
        let caret = caret_after.unwrap_or(edit.new_len).min(edit.new_len);
        let edit = TextEdit {
            cursor_after: caret,
            ..edit
        };

        let (patch, sampled) = if edit.new_len == 0 {
            if entry.state == LifecycleState::Frozen {
                entry.reset_to_empty();
                debug!("event=entry_reset module=journal status=ok entry_id={id}");
            }
            self.sampler.reset();
            (entry.attributes.apply_edit(edit, 0.0), None)
        } else {
            if entry.state == LifecycleState::Composing {
                entry.begin_typing(now, previous_commit, &self.spacing);
                info!(
                    "event=entry_freeze module=journal status=ok entry_id={} pause_ms={}",
                    id,
                    entry.pause_duration_ms.unwrap_or(0)
                );
            }

            let sampled = if edit.new_len > edit.old_len {
                Some(self.sampler.sample(now))
            } else {
                if edit.new_len < edit.old_len {
                    self.sampler.reset();
                }
                None
            };
            let value = sampled.unwrap_or_else(|| entry.attributes.default_value());
            (entry.attributes.apply_edit(edit, value), sampled)
        };

        entry.text = new_text.to_string();
        let state = entry.state;
        let caret = self
            .renderer
            .render_at(&mut self.surface, &entry.text, &entry.attributes, caret);

        debug!(
            "event=entry_edit module=journal status=ok entry_id={} state={} old_len={} new_len={} caret={}",
            id,
            state.as_str(),
            edit.old_len,
            edit.new_len,
            caret
        );
        self.reconcile_timers(now);

        Ok(EditOutcome {
            entry_id: id,
            state,
            patch,
            sampled,
            caret,
        })
    }

    /// Commit signal for the active entry, using the surface caret.
    pub fn commit(&mut self, now: EpochMs) -> CommitOutcome {
        let caret = self
            .surface
            .caret_offset()
            .unwrap_or_else(|| self.active_entry().char_len());
        self.commit_at(caret, now)
    }

    /// Commit signal with an explicit caret offset.
    pub fn commit_at(&mut self, caret: usize, now: EpochMs) -> CommitOutcome {
        let index = self.active_index();
        let entry = &mut self.entries[index];
        if !entry.can_commit_at(caret) {
            debug!(
                "event=entry_commit module=journal status=ignored entry_id={} reason=blank_line",
                entry.id
            );
            return CommitOutcome::Ignored;
        }

        entry.commit(&self.spacing);
        let entry_id = entry.id;
        info!(
            "event=entry_commit module=journal status=ok entry_id={} chars={} pause_ms={}",
            entry_id,
            entry.char_len(),
            entry.pause_duration_ms.unwrap_or(0)
        );

        self.previous_commit = Some(now);
        self.sampler.reset();
        let next_entry_id = self.open_entry();
        self.reconcile_timers(now);

        CommitOutcome::Committed {
            entry_id,
            next_entry_id,
        }
    }

    /// Advances recurring timers to `now` and applies their work.
    pub fn tick(&mut self, now: EpochMs) -> Vec<TickEffect> {
        self.reconcile_timers(now);

        let mut effects = Vec::new();
        for fired in self.timers.fire_due(now) {
            let Some(index) = self.entries.iter().position(|entry| entry.id == fired.entry_id)
            else {
                continue;
            };
            match fired.kind {
                TimerKind::TimestampRedisplay => effects.push(TickEffect::RedisplayTimestamp {
                    entry_id: fired.entry_id,
                    at: now,
                }),
                TimerKind::IdleSpacing => {
                    if let Some(commit_at) = self.previous_commit {
                        let offset = self.spacing.offset_for(now - commit_at);
                        self.entries[index].pause_offset = offset;
                        effects.push(TickEffect::SpacingUpdated {
                            entry_id: fired.entry_id,
                            offset,
                        });
                    }
                }
                TimerKind::FocusRetention => {
                    if !self.surface.is_focused() {
                        self.surface.focus();
                        let entry = &self.entries[index];
                        self.renderer
                            .render(&mut self.surface, &entry.text, &entry.attributes);
                        debug!(
                            "event=surface_refocus module=journal status=ok entry_id={}",
                            fired.entry_id
                        );
                        effects.push(TickEffect::Refocused {
                            entry_id: fired.entry_id,
                        });
                    }
                }
            }
        }
        effects
    }

    /// Switches the presentation mode.
    ///
    /// Committed entries keep the mode they were written in. The active
    /// entry's per-character values restart from the new mode's default.
    pub fn set_mode(&mut self, mode: PresentationMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.sampler = CadenceSampler::for_mode(mode, &self.config);
        let default_value = self.sampler.default_value();

        let index = self.active_index();
        let entry = &mut self.entries[index];
        let len = entry.char_len();
        entry.attributes.reset_for_mode(mode, default_value, len);
        self.renderer
            .render(&mut self.surface, &entry.text, &entry.attributes);
        info!(
            "event=mode_switch module=journal status=ok mode={} entry_id={}",
            mode.as_str(),
            entry.id
        );
    }

    /// Read-only styled runs for any entry.
    pub fn runs_for(&self, id: EntryId) -> Result<Vec<RunNode>, JournalError> {
        let entry = self.entry(id).ok_or(JournalError::UnknownEntry(id))?;
        Ok(styled_runs(&entry.text, &entry.attributes))
    }

    /// Date/time header for entry `id` as of `now`.
    ///
    /// Uncommitted entries without a frozen timestamp use the live clock.
    pub fn header<S: PreferenceStore>(
        &self,
        id: EntryId,
        now: EpochMs,
        formats: &FormatCycler<S>,
    ) -> Result<EntryHeader, JournalError> {
        let index = self.index_of(id)?;
        let at = self.entries[index].display_time(now);
        let show_date = match index.checked_sub(1) {
            Some(previous) => {
                let previous_at = self.entries[previous].display_time(now);
                !formats.is_same_day(at, previous_at)
            }
            None => true,
        };

        Ok(EntryHeader {
            date: show_date.then(|| formats.format_date(at)),
            time: formats.format_time(at),
        })
    }

    fn open_entry(&mut self) -> EntryId {
        let id = EntryId::new(self.next_id);
        self.next_id += 1;
        let attributes = AttributeStore::new(self.mode, self.sampler.default_value());
        self.entries.push(Entry::new(id, attributes));
        self.surface.clear();
        self.surface.focus();
        debug!("event=entry_open module=journal status=ok entry_id={id}");
        id
    }

    fn active_index(&self) -> usize {
        self.entries.len() - 1
    }

    fn index_of(&self, id: EntryId) -> Result<usize, JournalError> {
        self.entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(JournalError::UnknownEntry(id))
    }

    fn desired_timers(&self) -> Vec<TimerSpec> {
        let entry = self.active_entry();
        let mut desired = Vec::with_capacity(3);
        if entry.state == LifecycleState::Composing {
            desired.push(TimerSpec {
                kind: TimerKind::TimestampRedisplay,
                entry_id: entry.id,
                period_ms: self.config.timestamp_tick_ms,
            });
            if self.previous_commit.is_some() {
                desired.push(TimerSpec {
                    kind: TimerKind::IdleSpacing,
                    entry_id: entry.id,
                    period_ms: self.config.spacing_tick_ms,
                });
            }
        }
        if entry.is_active {
            desired.push(TimerSpec {
                kind: TimerKind::FocusRetention,
                entry_id: entry.id,
                period_ms: self.config.focus_tick_ms,
            });
        }
        desired
    }

    fn reconcile_timers(&mut self, now: EpochMs) {
        let desired = self.desired_timers();
        self.timers.reconcile(&desired, now);
    }
}
