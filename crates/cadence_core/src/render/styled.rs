//! Cursor-preserving styled renderer.
//!
//! # Responsibility
//! - Turn `(text, attributes)` into one styled run per character.
//! - Rebuild the editable surface from that model on every edit while
//!   carrying the caret across as a logical character offset.
//!
//! # Invariants
//! - Rendering never fails: an unresolved caret lands at end of text.
//! - Rendering twice with an unchanged model and caret yields the same caret.
//! - Empty text produces no runs at all.

use crate::model::attributes::AttributeStore;
use crate::model::mode::PresentationMode;
use crate::render::surface::{EditableSurface, RunNode, NBSP};
use log::trace;

/// Phase advance per character for the wave mode, in radians.
const WAVE_PHASE_STEP: f64 = 0.6;

/// Visual styling of one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunStyle {
    /// Native text inserted by the editor before the next rebuild.
    Plain,
    Stretch { percent: f64 },
    Opacity { alpha: f64 },
    /// Vertical displacement sampled from a sine wave at this run's index.
    Wave { amplitude: f64, phase: f64 },
    LetterSpacing { px: f64 },
}

impl RunStyle {
    pub fn for_attribute(mode: PresentationMode, value: f64, index: usize) -> Self {
        match mode {
            PresentationMode::Width => Self::Stretch { percent: value },
            PresentationMode::Opacity => Self::Opacity { alpha: value },
            PresentationMode::Wave => Self::Wave {
                amplitude: value,
                phase: index as f64 * WAVE_PHASE_STEP,
            },
            PresentationMode::LetterSpacing => Self::LetterSpacing { px: value },
        }
    }

    /// Inline CSS declaration for this style.
    pub fn css(&self) -> String {
        match self {
            Self::Plain => String::new(),
            Self::Stretch { percent } => format!("font-stretch: {percent:.1}%"),
            Self::Opacity { alpha } => format!("opacity: {alpha:.3}"),
            Self::Wave { amplitude, phase } => {
                format!("transform: translateY({:.2}px)", amplitude * phase.sin())
            }
            Self::LetterSpacing { px } => format!("letter-spacing: {px:.2}px"),
        }
    }
}

/// Builds read-only runs for `text`, one per character.
pub fn styled_runs(text: &str, attributes: &AttributeStore) -> Vec<RunNode> {
    text.chars()
        .enumerate()
        .map(|(index, ch)| {
            let content = if ch == ' ' {
                NBSP.to_string()
            } else {
                ch.to_string()
            };
            RunNode::new(
                content,
                RunStyle::for_attribute(attributes.mode(), attributes.value_at(index), index),
            )
        })
        .collect()
}

/// Rebuilds the editable surface from the authoritative model.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyledRenderer;

impl StyledRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Full protocol: read the caret offset from the surface, rebuild, restore.
    ///
    /// Returns the restored logical caret offset.
    pub fn render(
        &self,
        surface: &mut EditableSurface,
        text: &str,
        attributes: &AttributeStore,
    ) -> usize {
        let text_len = text.chars().count();
        let caret = surface.caret_offset().unwrap_or(text_len);
        self.render_at(surface, text, attributes, caret)
    }

    /// Rebuilds with a caret offset already resolved by the caller.
    pub fn render_at(
        &self,
        surface: &mut EditableSurface,
        text: &str,
        attributes: &AttributeStore,
        caret: usize,
    ) -> usize {
        if text.is_empty() {
            surface.clear();
            return 0;
        }

        let runs = styled_runs(text, attributes);
        let run_count = runs.len();
        surface.replace_runs(runs);

        let anchor = surface.anchor_at(caret);
        surface.set_caret(Some(anchor));
        let restored = surface.caret_offset().unwrap_or(run_count);
        trace!(
            "event=surface_render module=render status=ok runs={} caret={} restored={}",
            run_count,
            caret,
            restored
        );
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::{styled_runs, RunStyle, StyledRenderer};
    use crate::model::attributes::AttributeStore;
    use crate::model::mode::PresentationMode;
    use crate::render::surface::{EditableSurface, NBSP};

    fn store(mode: PresentationMode, values: &[f64]) -> AttributeStore {
        AttributeStore::from_values(mode, 0.0, values.to_vec())
    }

    #[test]
    fn spaces_become_non_collapsing() {
        let runs = styled_runs("a b", &store(PresentationMode::Width, &[25.0, 25.0, 25.0]));
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[1].content, NBSP.to_string());
    }

    #[test]
    fn styles_follow_attribute_values() {
        let runs = styled_runs("ab", &store(PresentationMode::Opacity, &[1.0, 0.25]));
        assert_eq!(runs[0].style, RunStyle::Opacity { alpha: 1.0 });
        assert_eq!(runs[1].style, RunStyle::Opacity { alpha: 0.25 });
        assert_eq!(runs[1].style.css(), "opacity: 0.250");
    }

    #[test]
    fn css_declarations_per_mode() {
        assert_eq!(RunStyle::Stretch { percent: 25.0 }.css(), "font-stretch: 25.0%");
        assert_eq!(RunStyle::LetterSpacing { px: 1.5 }.css(), "letter-spacing: 1.50px");
        assert_eq!(
            RunStyle::Wave {
                amplitude: 8.0,
                phase: 0.0
            }
            .css(),
            "transform: translateY(0.00px)"
        );
        assert_eq!(RunStyle::Plain.css(), "");
    }

    #[test]
    fn unresolved_caret_lands_at_end() {
        let mut surface = EditableSurface::new();
        let attrs = store(PresentationMode::Width, &[25.0, 25.0]);
        let caret = StyledRenderer::new().render(&mut surface, "hi", &attrs);
        assert_eq!(caret, 2);
        assert_eq!(surface.caret_offset(), Some(2));
    }

    #[test]
    fn empty_text_clears_surface() {
        let mut surface = EditableSurface::new();
        let attrs = store(PresentationMode::Width, &[25.0]);
        StyledRenderer::new().render(&mut surface, "x", &attrs);
        let empty = AttributeStore::new(PresentationMode::Width, 25.0);
        let caret = StyledRenderer::new().render(&mut surface, "", &empty);
        assert_eq!(caret, 0);
        assert!(surface.runs().is_empty());
    }
}
