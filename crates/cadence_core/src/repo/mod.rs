//! Repository layer for persisted preferences.
//!
//! # Responsibility
//! - Define the preference store contract consumed by display services.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Only display preferences are persisted; entry content never is.

pub mod preference_repo;
