//! Persistent store adapters for the course snapshot.
//!
//! # Responsibility
//! - Define the whole-snapshot `read`/`write` contract used by the repository.
//! - Provide in-memory, SQLite key/value and JSON file backends.
//!
//! # Invariants
//! - A missing stored value reads as an empty course list.
//! - Writes replace the entire snapshot; there are no partial updates.
//! - Malformed stored JSON surfaces as `StoreError::InvalidData`, never a panic.
//! - No locking: two processes writing the same backend are last-write-wins.

use crate::model::course::Course;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod codec;
mod file;
mod memory;
mod sqlite;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Key under which the course list is stored, matching the browser app.
pub const STORAGE_KEY: &str = "courses";

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by store backends.
#[derive(Debug)]
pub enum StoreError {
    /// SQLite bootstrap or query failure.
    Db(rusqlite::Error),
    /// File-system failure for the JSON file backend.
    Io { path: PathBuf, source: std::io::Error },
    /// Snapshot could not be encoded.
    Encode(serde_json::Error),
    /// Stored value is not a valid course list.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Encode(err) => write!(f, "failed to encode course list: {err}"),
            Self::InvalidData(message) => write!(f, "invalid stored course data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(value)
    }
}

/// Whole-snapshot storage backend for the course list.
pub trait CourseStore {
    /// Reads the full course list; empty when nothing has been stored yet.
    fn read(&self) -> StoreResult<Vec<Course>>;
    /// Replaces the full course list.
    fn write(&self, courses: &[Course]) -> StoreResult<()>;
}

impl<S: CourseStore + ?Sized> CourseStore for &S {
    fn read(&self) -> StoreResult<Vec<Course>> {
        (**self).read()
    }

    fn write(&self, courses: &[Course]) -> StoreResult<()> {
        (**self).write(courses)
    }
}

impl<S: CourseStore + ?Sized> CourseStore for Box<S> {
    fn read(&self) -> StoreResult<Vec<Course>> {
        (**self).read()
    }

    fn write(&self, courses: &[Course]) -> StoreResult<()> {
        (**self).write(courses)
    }
}
