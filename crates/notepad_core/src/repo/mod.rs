//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the note persistence contract used by services and the view model.
//! - Isolate SQLite query details from business orchestration.
//! - Publish live query results to registered observers after writes.
//!
//! # Invariants
//! - Repository writes must enforce `Note::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod live;
pub mod note_repo;
