//! Repository layer over the course snapshot.
//!
//! # Responsibility
//! - Define use-case oriented CRUD contracts for courses, units and topics.
//! - Isolate read-modify-write snapshot handling from services and views.
//!
//! # Invariants
//! - Creation/update against a missing parent returns a `NotFound` variant.
//! - Deletes are idempotent: a missing target returns `Ok(false)` and the
//!   stored snapshot is not rewritten.

pub mod course_repo;
