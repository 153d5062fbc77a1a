//! Core use-case services.
//!
//! # Responsibility
//! - Apply form-level validation before repository writes.
//! - Resolve page routes to the nearest existing entity.

pub mod navigation;
pub mod study_service;
