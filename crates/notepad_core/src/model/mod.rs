//! Note domain model.
//!
//! # Responsibility
//! - Define the single persisted record (`Note`) and its validation rules.
//! - Provide display helpers shared by list and editor projections.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Categories are free-text values on notes, never a separate entity.

pub mod note;
