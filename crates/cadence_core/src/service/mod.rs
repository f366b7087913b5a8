//! Journal use-case services.
//!
//! # Responsibility
//! - Orchestrate model, cadence and render components into event handlers.
//! - Keep UI layers decoupled from storage details.

pub mod format_service;
pub mod journal_service;
