//! In-memory store holding the serialized snapshot.
//!
//! Keeps JSON text rather than live structs, so reads go through the same
//! codec as persistent backends.

use crate::model::course::Course;
use crate::store::codec::{decode_courses, encode_courses};
use crate::store::{CourseStore, StoreResult};
use std::cell::RefCell;

/// Single-threaded in-memory backend, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    raw: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with raw stored text, e.g. a browser export.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RefCell::new(Some(raw.into())),
        }
    }

    /// Returns the currently stored JSON text, if any.
    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }
}

impl CourseStore for MemoryStore {
    fn read(&self) -> StoreResult<Vec<Course>> {
        match self.raw.borrow().as_deref() {
            Some(raw) => decode_courses(raw),
            None => Ok(Vec::new()),
        }
    }

    fn write(&self, courses: &[Course]) -> StoreResult<()> {
        let encoded = encode_courses(courses)?;
        *self.raw.borrow_mut() = Some(encoded);
        Ok(())
    }
}
