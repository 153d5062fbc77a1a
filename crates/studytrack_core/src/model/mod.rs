//! Study-tracking domain model.
//!
//! # Responsibility
//! - Define the canonical Course -> Unit -> Topic hierarchy.
//! - Keep the persisted JSON shape compatible with browser-exported data.
//!
//! # Invariants
//! - Every entity is identified by a stable UUID that is never reused.
//! - Ownership is strictly hierarchical; a topic belongs to exactly one unit.

pub mod course;
pub mod topic;
