//! Per-character attribute array kept in lock-step with entry text.
//!
//! # Responsibility
//! - Store one scalar per character of an entry, tagged with the presentation
//!   mode that gives the scalars meaning.
//! - Patch the array for insertions/deletions reported by an edit event.
//!
//! # Invariants
//! - After [`AttributeStore::apply_edit`] returns, `len() == edit.new_len`.
//! - Positions are character offsets, never byte offsets.
//! - Unknown positions degrade to the mode default; edits are never rejected.

use crate::model::mode::PresentationMode;
use serde::{Deserialize, Serialize};

/// Lengths and caret position describing one text edit, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEdit {
    pub old_len: usize,
    pub new_len: usize,
    /// Caret offset after the edit was applied to the text.
    pub cursor_after: usize,
}

impl TextEdit {
    /// Builds an edit from the two text snapshots.
    pub fn between(old_text: &str, new_text: &str, cursor_after: usize) -> Self {
        Self {
            old_len: old_text.chars().count(),
            new_len: new_text.chars().count(),
            cursor_after,
        }
    }
}

/// What [`AttributeStore::apply_edit`] did to the array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributePatch {
    Inserted { at: usize, count: usize },
    Removed { at: usize, count: usize },
    /// Equal-length replacement; only the length is guaranteed.
    Resynced,
    Cleared,
    Unchanged,
}

/// Ordered per-character scalars for one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeStore {
    mode: PresentationMode,
    default_value: f64,
    values: Vec<f64>,
}

impl AttributeStore {
    pub fn new(mode: PresentationMode, default_value: f64) -> Self {
        Self {
            mode,
            default_value,
            values: Vec::new(),
        }
    }

    /// Rebuilds a store from previously captured values.
    pub fn from_values(mode: PresentationMode, default_value: f64, values: Vec<f64>) -> Self {
        Self {
            mode,
            default_value,
            values,
        }
    }

    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value for character `index`, or the mode default when out of range.
    pub fn value_at(&self, index: usize) -> f64 {
        self.values
            .get(index)
            .copied()
            .unwrap_or(self.default_value)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Drops all values and re-fills `len` defaults for another mode.
    pub fn reset_for_mode(&mut self, mode: PresentationMode, default_value: f64, len: usize) {
        self.mode = mode;
        self.default_value = default_value;
        self.values.clear();
        self.values.resize(len, default_value);
    }

    /// Pads with the default or truncates until `len() == target_len`.
    pub fn resync(&mut self, target_len: usize) {
        self.values.resize(target_len, self.default_value);
    }

    /// Patches the array for one edit, inserting `value` for new characters.
    ///
    /// Inserted characters end at `cursor_after`; deleted characters started
    /// at `cursor_after`. Offsets past the end are clamped.
    pub fn apply_edit(&mut self, edit: TextEdit, value: f64) -> AttributePatch {
        if edit.new_len == 0 {
            self.values.clear();
            return AttributePatch::Cleared;
        }

        let patch = if edit.new_len > edit.old_len {
            let count = edit.new_len - edit.old_len;
            let at = edit.cursor_after.saturating_sub(count).min(self.values.len());
            self.values
                .splice(at..at, std::iter::repeat(value).take(count));
            AttributePatch::Inserted { at, count }
        } else if edit.new_len < edit.old_len {
            let requested = edit.old_len - edit.new_len;
            let at = edit.cursor_after.min(self.values.len());
            let count = requested.min(self.values.len() - at);
            self.values.drain(at..at + count);
            AttributePatch::Removed { at, count }
        } else if self.values.len() != edit.new_len {
            AttributePatch::Resynced
        } else {
            AttributePatch::Unchanged
        };

        // Covers equal-length replacement and any drift from earlier clamping.
        if self.values.len() != edit.new_len {
            self.resync(edit.new_len);
        }
        patch
    }
}

#[cfg(test)]
mod tests {
    use super::{AttributePatch, AttributeStore, TextEdit};
    use crate::model::mode::PresentationMode;

    fn store_with(values: &[f64]) -> AttributeStore {
        let mut store = AttributeStore::new(PresentationMode::Width, 25.0);
        let mut len = 0;
        for value in values {
            store.apply_edit(
                TextEdit {
                    old_len: len,
                    new_len: len + 1,
                    cursor_after: len + 1,
                },
                *value,
            );
            len += 1;
        }
        store
    }

    #[test]
    fn insert_in_middle_lands_before_cursor() {
        let mut store = store_with(&[1.0, 2.0, 3.0]);
        let patch = store.apply_edit(
            TextEdit {
                old_len: 3,
                new_len: 4,
                cursor_after: 2,
            },
            9.0,
        );
        assert_eq!(patch, AttributePatch::Inserted { at: 1, count: 1 });
        assert_eq!(store.values(), &[1.0, 9.0, 2.0, 3.0]);
    }

    #[test]
    fn insert_at_start_prepends() {
        let mut store = store_with(&[1.0, 2.0]);
        store.apply_edit(
            TextEdit {
                old_len: 2,
                new_len: 4,
                cursor_after: 2,
            },
            7.0,
        );
        assert_eq!(store.values(), &[7.0, 7.0, 1.0, 2.0]);
    }

    #[test]
    fn backspace_removes_character_before_caret() {
        let mut store = store_with(&[1.0, 2.0, 3.0]);
        let patch = store.apply_edit(
            TextEdit {
                old_len: 3,
                new_len: 2,
                cursor_after: 1,
            },
            0.0,
        );
        assert_eq!(patch, AttributePatch::Removed { at: 1, count: 1 });
        assert_eq!(store.values(), &[1.0, 3.0]);
    }

    #[test]
    fn delete_past_end_is_clamped() {
        let mut store = store_with(&[1.0, 2.0, 3.0]);
        store.apply_edit(
            TextEdit {
                old_len: 3,
                new_len: 1,
                cursor_after: 2,
            },
            0.0,
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.values(), &[1.0]);
    }

    #[test]
    fn equal_length_replacement_only_keeps_length() {
        let mut store = store_with(&[1.0, 2.0]);
        let patch = store.apply_edit(
            TextEdit {
                old_len: 2,
                new_len: 2,
                cursor_after: 2,
            },
            5.0,
        );
        assert_eq!(patch, AttributePatch::Unchanged);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn drifted_array_is_padded_with_default() {
        let mut store = AttributeStore::new(PresentationMode::Opacity, 1.0);
        let patch = store.apply_edit(
            TextEdit {
                old_len: 3,
                new_len: 3,
                cursor_after: 1,
            },
            0.5,
        );
        assert_eq!(patch, AttributePatch::Resynced);
        assert_eq!(store.values(), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn empty_text_clears_everything() {
        let mut store = store_with(&[1.0, 2.0]);
        let patch = store.apply_edit(TextEdit::between("ab", "", 0), 0.0);
        assert_eq!(patch, AttributePatch::Cleared);
        assert!(store.is_empty());
    }

    #[test]
    fn text_edit_counts_characters_not_bytes() {
        let edit = TextEdit::between("né", "néé", 3);
        assert_eq!(edit.old_len, 2);
        assert_eq!(edit.new_len, 3);
    }
}
