//! Core domain logic for the study tracker.
//! This crate is the single source of truth for course/unit/topic invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sort;
pub mod store;

pub use config::{AppConfig, ConfigOverrides, StorageBackend};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::course::{Course, CourseId, Unit, UnitId};
pub use model::topic::{NewTopic, Topic, TopicId, TopicPatch, KNOWLEDGE_LEVEL_MAX};
pub use repo::course_repo::{CourseRepository, RepoError, RepoResult, SnapshotCourseRepository};
pub use service::navigation::{Resolution, Route, RouteError};
pub use service::study_service::{ServiceError, ServiceResult, StudyService, TopicDraft};
pub use sort::{course_rows, sort_rows, unit_rows, SortDirection, SortKey, SortState, TopicRow};
pub use store::{
    CourseStore, JsonFileStore, MemoryStore, SqliteStore, StoreError, StoreResult, STORAGE_KEY,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
