//! Styled presentation of entry text on an editable surface.
//!
//! # Responsibility
//! - Model the editable surface as an arena of run nodes plus a caret anchor.
//! - Rebuild that surface from `(text, attributes)` without losing the caret.
//!
//! # See also
//! - `service::journal_service` for when rebuilds happen.

pub mod styled;
pub mod surface;
