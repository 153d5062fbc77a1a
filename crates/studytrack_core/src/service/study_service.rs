//! Study use-case service.
//!
//! # Responsibility
//! - Enforce the add-course/unit/topic dialogs' required-field rules.
//! - Keep knowledge levels within `0..=KNOWLEDGE_LEVEL_MAX`.
//! - Delegate persistence to a `CourseRepository`.
//!
//! # Invariants
//! - Names are stored trimmed and never blank.
//! - Due dates written through this service are real calendar dates in
//!   `YYYY-MM-DD` form.

use crate::model::course::{Course, CourseId, Unit, UnitId};
use crate::model::topic::{NewTopic, Topic, TopicId, TopicPatch, KNOWLEDGE_LEVEL_MAX};
use crate::repo::course_repo::{CourseRepository, RepoError};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

// Zero-padded shape; chrono checks the date itself.
static DUE_DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("due date regex is valid"));

/// Errors from study service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Course, unit or topic name is blank after trim.
    InvalidName,
    /// Due date is not a `YYYY-MM-DD` calendar date.
    InvalidDueDate(String),
    /// Knowledge level exceeds `KNOWLEDGE_LEVEL_MAX`.
    KnowledgeLevelOutOfRange(u8),
    /// Repository-level failure, including not-found.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "name must not be blank"),
            Self::InvalidDueDate(value) => {
                write!(f, "due date must be YYYY-MM-DD, got `{value}`")
            }
            Self::KnowledgeLevelOutOfRange(level) => write!(
                f,
                "knowledge level must be between 0 and {KNOWLEDGE_LEVEL_MAX}, got {level}"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Raw add-topic form input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopicDraft {
    pub name: String,
    pub due_date: String,
    pub description: String,
    pub knowledge_level: u8,
}

/// Study-tracking service facade.
pub struct StudyService<R: CourseRepository> {
    repo: R,
}

impl<R: CourseRepository> StudyService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrows the underlying repository for read paths.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn list_courses(&self) -> ServiceResult<Vec<Course>> {
        Ok(self.repo.list_courses()?)
    }

    /// Creates a course from dialog input.
    pub fn create_course(&self, name: &str) -> ServiceResult<Course> {
        let name = normalize_name(name)?;
        Ok(self.repo.add_course(&name)?)
    }

    /// Creates a unit from dialog input.
    pub fn create_unit(&self, course_id: CourseId, name: &str) -> ServiceResult<Unit> {
        let name = normalize_name(name)?;
        Ok(self.repo.add_unit(course_id, &name)?)
    }

    /// Creates a topic from dialog input, with empty notes.
    pub fn create_topic(
        &self,
        course_id: CourseId,
        unit_id: UnitId,
        draft: TopicDraft,
    ) -> ServiceResult<Topic> {
        let name = normalize_name(&draft.name)?;
        let due_date = normalize_due_date(&draft.due_date)?;
        ensure_level(draft.knowledge_level)?;
        let description = draft.description.trim();

        let topic = NewTopic {
            name,
            description: (!description.is_empty()).then(|| description.to_string()),
            due_date,
            knowledge_level: draft.knowledge_level,
            notes: None,
        };
        Ok(self.repo.add_topic(course_id, unit_id, topic)?)
    }

    /// Validates and applies a partial topic update.
    pub fn update_topic(
        &self,
        course_id: CourseId,
        unit_id: UnitId,
        topic_id: TopicId,
        mut patch: TopicPatch,
    ) -> ServiceResult<Topic> {
        if let Some(name) = patch.name.take() {
            patch.name = Some(normalize_name(&name)?);
        }
        if let Some(due_date) = patch.due_date.take() {
            patch.due_date = Some(normalize_due_date(&due_date)?);
        }
        if let Some(level) = patch.knowledge_level {
            ensure_level(level)?;
        }
        Ok(self
            .repo
            .update_topic(course_id, unit_id, topic_id, &patch)?)
    }

    /// Knowledge-level selector change.
    pub fn set_knowledge_level(
        &self,
        course_id: CourseId,
        unit_id: UnitId,
        topic_id: TopicId,
        level: u8,
    ) -> ServiceResult<Topic> {
        self.update_topic(course_id, unit_id, topic_id, TopicPatch::knowledge_level(level))
    }

    /// Notes editor save; stored verbatim, empty clears.
    pub fn save_notes(
        &self,
        course_id: CourseId,
        unit_id: UnitId,
        topic_id: TopicId,
        notes: &str,
    ) -> ServiceResult<Topic> {
        self.update_topic(course_id, unit_id, topic_id, TopicPatch::notes(notes))
    }

    pub fn delete_course(&self, course_id: CourseId) -> ServiceResult<bool> {
        Ok(self.repo.delete_course(course_id)?)
    }

    pub fn delete_unit(&self, course_id: CourseId, unit_id: UnitId) -> ServiceResult<bool> {
        Ok(self.repo.delete_unit(course_id, unit_id)?)
    }

    pub fn delete_topic(
        &self,
        course_id: CourseId,
        unit_id: UnitId,
        topic_id: TopicId,
    ) -> ServiceResult<bool> {
        Ok(self.repo.delete_topic(course_id, unit_id, topic_id)?)
    }
}

fn normalize_name(value: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidName);
    }
    Ok(trimmed.to_string())
}

fn normalize_due_date(value: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    let is_calendar_date = DUE_DATE_SHAPE.is_match(trimmed)
        && NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok();
    if !is_calendar_date {
        return Err(ServiceError::InvalidDueDate(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}

fn ensure_level(level: u8) -> ServiceResult<()> {
    if level > KNOWLEDGE_LEVEL_MAX {
        return Err(ServiceError::KnowledgeLevelOutOfRange(level));
    }
    Ok(())
}
