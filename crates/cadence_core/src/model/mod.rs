//! Journal domain model.
//!
//! # Responsibility
//! - Define entries, their lifecycle, and the per-character attribute array.
//! - Define the presentation modes that give attribute values meaning.
//!
//! # Invariants
//! - Every entry is identified by a stable, never-reused `EntryId`.
//! - Committed entries are immutable.

pub mod attributes;
pub mod entry;
pub mod mode;
