//! DOM-like editable surface.
//!
//! # Responsibility
//! - Hold the styled run nodes presented for the active entry.
//! - Hold the native caret as a node-relative anchor, and focus state.
//! - Mutate runs the way a native editor would before an input event fires.
//!
//! # Invariants
//! - Node offsets count characters.
//! - A caret anchor may be stale; readers clamp instead of failing.

use crate::render::styled::RunStyle;

/// Non-collapsing space used in run content for plain spaces.
pub const NBSP: char = '\u{00A0}';

/// One text-bearing child of the surface container.
#[derive(Debug, Clone, PartialEq)]
pub struct RunNode {
    pub content: String,
    pub style: RunStyle,
}

impl RunNode {
    pub fn new(content: impl Into<String>, style: RunStyle) -> Self {
        Self {
            content: content.into(),
            style,
        }
    }

    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Native caret location, relative to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretAnchor {
    /// Inside run `node`, `offset` characters from its start.
    Text { node: usize, offset: usize },
    /// Between container children, before child `child`.
    Container { child: usize },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditableSurface {
    runs: Vec<RunNode>,
    caret: Option<CaretAnchor>,
    focused: bool,
}

impl EditableSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runs(&self) -> &[RunNode] {
        &self.runs
    }

    pub fn caret(&self) -> Option<CaretAnchor> {
        self.caret
    }

    pub fn set_caret(&mut self, caret: Option<CaretAnchor>) {
        self.caret = caret;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Focus moved to another surface. The caret is dropped with it.
    pub fn blur(&mut self) {
        self.focused = false;
        self.caret = None;
    }

    /// Plain text of all runs, with non-collapsing spaces read back as spaces.
    pub fn text_content(&self) -> String {
        self.runs
            .iter()
            .flat_map(|run| run.content.chars())
            .map(|ch| if ch == NBSP { ' ' } else { ch })
            .collect()
    }

    pub fn char_len(&self) -> usize {
        self.runs.iter().map(RunNode::char_len).sum()
    }

    /// Removes every run and parks the caret at the container start.
    pub fn clear(&mut self) {
        self.runs.clear();
        self.caret = Some(CaretAnchor::Container { child: 0 });
    }

    pub(crate) fn replace_runs(&mut self, runs: Vec<RunNode>) {
        self.runs = runs;
    }

    /// Logical caret offset: characters in all runs before the caret node plus
    /// the offset inside it. `None` when there is no caret or it points at a
    /// node that no longer exists.
    pub fn caret_offset(&self) -> Option<usize> {
        match self.caret? {
            CaretAnchor::Text { node, offset } => {
                let target = self.runs.get(node)?;
                let before: usize = self.runs[..node].iter().map(RunNode::char_len).sum();
                Some(before + offset.min(target.char_len()))
            }
            CaretAnchor::Container { child } => {
                let child = child.min(self.runs.len());
                Some(self.runs[..child].iter().map(RunNode::char_len).sum())
            }
        }
    }

    /// Node-relative anchor for a logical offset, clamped to the text length.
    pub fn anchor_at(&self, offset: usize) -> CaretAnchor {
        let mut walked = 0;
        let mut last_text = None;
        for (index, run) in self.runs.iter().enumerate() {
            let len = run.char_len();
            if len == 0 {
                continue;
            }
            if walked + len >= offset {
                return CaretAnchor::Text {
                    node: index,
                    offset: offset - walked,
                };
            }
            walked += len;
            last_text = Some((index, len));
        }

        match last_text {
            Some((node, len)) => CaretAnchor::Text { node, offset: len },
            None => CaretAnchor::Container { child: 0 },
        }
    }

    /// Places the caret at a logical offset.
    pub fn move_caret_to(&mut self, offset: usize) {
        self.caret = Some(self.anchor_at(offset));
    }

    /// Inserts text at the caret as a native editor would: into the caret's
    /// run, inheriting that run's style. Without a caret, appends at the end.
    pub fn type_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let inserted = text.chars().count();
        let (node, offset) = self.text_insertion_point();
        let run = &mut self.runs[node];
        let byte_index = byte_offset(&run.content, offset);
        run.content.insert_str(byte_index, text);
        self.caret = Some(CaretAnchor::Text {
            node,
            offset: offset + inserted,
        });
    }

    /// Deletes the character before the caret. Returns `false` at the start.
    pub fn delete_backward(&mut self) -> bool {
        let offset = self.caret_offset().unwrap_or_else(|| self.char_len());
        if offset == 0 {
            return false;
        }
        self.remove_char_at(offset - 1);
        self.caret = Some(self.anchor_at(offset - 1));
        true
    }

    /// Deletes the character after the caret. Returns `false` at the end.
    pub fn delete_forward(&mut self) -> bool {
        let offset = self.caret_offset().unwrap_or_else(|| self.char_len());
        if offset >= self.char_len() {
            return false;
        }
        self.remove_char_at(offset);
        self.caret = Some(self.anchor_at(offset));
        true
    }

    fn remove_char_at(&mut self, logical: usize) {
        let mut walked = 0;
        for run in &mut self.runs {
            let len = run.char_len();
            if logical < walked + len {
                let start = byte_offset(&run.content, logical - walked);
                run.content.remove(start);
                return;
            }
            walked += len;
        }
    }

    fn text_insertion_point(&mut self) -> (usize, usize) {
        if self.runs.is_empty() {
            self.runs.push(RunNode::new("", RunStyle::Plain));
            return (0, 0);
        }

        match self.caret {
            Some(CaretAnchor::Text { node, offset }) if node < self.runs.len() => {
                (node, offset.min(self.runs[node].char_len()))
            }
            Some(CaretAnchor::Container { child }) if child > 0 => {
                let node = (child - 1).min(self.runs.len() - 1);
                (node, self.runs[node].char_len())
            }
            Some(CaretAnchor::Container { .. }) => (0, 0),
            _ => {
                let node = self.runs.len() - 1;
                (node, self.runs[node].char_len())
            }
        }
    }
}

fn byte_offset(content: &str, char_offset: usize) -> usize {
    content
        .char_indices()
        .nth(char_offset)
        .map_or(content.len(), |(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::{CaretAnchor, EditableSurface, RunNode, NBSP};
    use crate::render::styled::RunStyle;

    fn per_char(text: &str) -> EditableSurface {
        let mut surface = EditableSurface::new();
        surface.replace_runs(
            text.chars()
                .map(|ch| RunNode::new(ch.to_string(), RunStyle::Plain))
                .collect(),
        );
        surface
    }

    #[test]
    fn caret_offset_walks_preceding_runs() {
        let mut surface = per_char("abcd");
        surface.set_caret(Some(CaretAnchor::Text { node: 2, offset: 1 }));
        assert_eq!(surface.caret_offset(), Some(3));
        surface.set_caret(Some(CaretAnchor::Container { child: 1 }));
        assert_eq!(surface.caret_offset(), Some(1));
    }

    #[test]
    fn stale_node_caret_is_unresolved() {
        let mut surface = per_char("ab");
        surface.set_caret(Some(CaretAnchor::Text { node: 7, offset: 0 }));
        assert_eq!(surface.caret_offset(), None);
    }

    #[test]
    fn anchor_at_clamps_to_end() {
        let surface = per_char("ab");
        assert_eq!(surface.anchor_at(0), CaretAnchor::Text { node: 0, offset: 0 });
        assert_eq!(surface.anchor_at(2), CaretAnchor::Text { node: 1, offset: 1 });
        assert_eq!(surface.anchor_at(40), CaretAnchor::Text { node: 1, offset: 1 });
        assert_eq!(
            EditableSurface::new().anchor_at(3),
            CaretAnchor::Container { child: 0 }
        );
    }

    #[test]
    fn typing_into_empty_surface_creates_plain_run() {
        let mut surface = EditableSurface::new();
        surface.clear();
        surface.type_text("hé");
        assert_eq!(surface.text_content(), "hé");
        assert_eq!(surface.caret_offset(), Some(2));
    }

    #[test]
    fn typing_mid_text_inserts_inside_caret_run() {
        let mut surface = per_char("ac");
        surface.move_caret_to(1);
        surface.type_text("b");
        assert_eq!(surface.text_content(), "abc");
        assert_eq!(surface.caret_offset(), Some(2));
    }

    #[test]
    fn delete_backward_and_forward() {
        let mut surface = per_char("abc");
        surface.move_caret_to(2);
        assert!(surface.delete_backward());
        assert_eq!(surface.text_content(), "ac");
        assert_eq!(surface.caret_offset(), Some(1));
        assert!(surface.delete_forward());
        assert_eq!(surface.text_content(), "a");
        assert!(!surface.delete_forward());
    }

    #[test]
    fn text_content_reads_nbsp_as_space() {
        let surface = per_char(&format!("a{NBSP}b"));
        assert_eq!(surface.text_content(), "a b");
    }
}
