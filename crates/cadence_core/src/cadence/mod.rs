//! Keystroke timing to visual parameters.
//!
//! # Responsibility
//! - Turn inter-key intervals into per-character attribute values.
//! - Turn idle time before an entry's first keystroke into layout spacing.

pub mod sampler;
pub mod spacing;
