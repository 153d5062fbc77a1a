//! Course repository contract and snapshot implementation.
//!
//! # Responsibility
//! - Provide CRUD over Courses -> Units -> Topics.
//! - Apply every mutation as read full snapshot, change one thing, write full
//!   snapshot back through a `CourseStore`.
//!
//! # Invariants
//! - New ids are unique among every id present in the snapshot.
//! - Deleting a parent removes every nested child with it.
//! - The repository does not revalidate field contents; see `StudyService`.

use crate::model::course::{all_ids, Course, CourseId, Unit, UnitId};
use crate::model::topic::{NewTopic, Topic, TopicId, TopicPatch};
use crate::store::{CourseStore, StoreError};
use log::info;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for course snapshot operations.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    CourseNotFound(CourseId),
    UnitNotFound {
        course_id: CourseId,
        unit_id: UnitId,
    },
    TopicNotFound {
        course_id: CourseId,
        unit_id: UnitId,
        topic_id: TopicId,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::CourseNotFound(id) => write!(f, "course not found: {id}"),
            Self::UnitNotFound { course_id, unit_id } => {
                write!(f, "unit not found: {unit_id} in course {course_id}")
            }
            Self::TopicNotFound {
                course_id,
                unit_id,
                topic_id,
            } => write!(
                f,
                "topic not found: {topic_id} in unit {unit_id} of course {course_id}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Repository interface for study-tracking CRUD operations.
pub trait CourseRepository {
    /// Lists every course in stored order.
    fn list_courses(&self) -> RepoResult<Vec<Course>>;
    /// Loads one course by id.
    fn get_course(&self, course_id: CourseId) -> RepoResult<Option<Course>>;
    /// Loads one unit; `None` when the course or unit is missing.
    fn get_unit(&self, course_id: CourseId, unit_id: UnitId) -> RepoResult<Option<Unit>>;
    /// Loads one topic; `None` when any level of the path is missing.
    fn get_topic(
        &self,
        course_id: CourseId,
        unit_id: UnitId,
        topic_id: TopicId,
    ) -> RepoResult<Option<Topic>>;
    /// Appends a course with no units.
    fn add_course(&self, name: &str) -> RepoResult<Course>;
    /// Removes a course and everything under it.
    fn delete_course(&self, course_id: CourseId) -> RepoResult<bool>;
    /// Appends a unit numbered after the course's highest unit.
    fn add_unit(&self, course_id: CourseId, name: &str) -> RepoResult<Unit>;
    /// Removes a unit and its topics.
    fn delete_unit(&self, course_id: CourseId, unit_id: UnitId) -> RepoResult<bool>;
    /// Appends a topic to a unit.
    fn add_topic(&self, course_id: CourseId, unit_id: UnitId, topic: NewTopic)
        -> RepoResult<Topic>;
    /// Shallow-merges `patch` over a stored topic and returns the result.
    fn update_topic(
        &self,
        course_id: CourseId,
        unit_id: UnitId,
        topic_id: TopicId,
        patch: &TopicPatch,
    ) -> RepoResult<Topic>;
    /// Removes one topic.
    fn delete_topic(
        &self,
        course_id: CourseId,
        unit_id: UnitId,
        topic_id: TopicId,
    ) -> RepoResult<bool>;
}

/// Repository that rewrites the whole snapshot on every mutation.
pub struct SnapshotCourseRepository<S: CourseStore> {
    store: S,
}

impl<S: CourseStore> SnapshotCourseRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrows the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn course_mut(courses: &mut [Course], course_id: CourseId) -> RepoResult<&mut Course> {
        courses
            .iter_mut()
            .find(|course| course.id == course_id)
            .ok_or(RepoError::CourseNotFound(course_id))
    }

    fn unit_mut(
        courses: &mut [Course],
        course_id: CourseId,
        unit_id: UnitId,
    ) -> RepoResult<&mut Unit> {
        Self::course_mut(courses, course_id)?
            .unit_mut(unit_id)
            .ok_or(RepoError::UnitNotFound { course_id, unit_id })
    }
}

impl<S: CourseStore> CourseRepository for SnapshotCourseRepository<S> {
    fn list_courses(&self) -> RepoResult<Vec<Course>> {
        Ok(self.store.read()?)
    }

    fn get_course(&self, course_id: CourseId) -> RepoResult<Option<Course>> {
        let courses = self.store.read()?;
        Ok(courses.into_iter().find(|course| course.id == course_id))
    }

    fn get_unit(&self, course_id: CourseId, unit_id: UnitId) -> RepoResult<Option<Unit>> {
        Ok(self
            .get_course(course_id)?
            .and_then(|course| course.units.into_iter().find(|unit| unit.id == unit_id)))
    }

    fn get_topic(
        &self,
        course_id: CourseId,
        unit_id: UnitId,
        topic_id: TopicId,
    ) -> RepoResult<Option<Topic>> {
        Ok(self
            .get_unit(course_id, unit_id)?
            .and_then(|unit| unit.topics.into_iter().find(|topic| topic.id == topic_id)))
    }

    fn add_course(&self, name: &str) -> RepoResult<Course> {
        let mut courses = self.store.read()?;
        let course = Course::with_id(fresh_id(&courses), name);
        courses.push(course.clone());
        self.store.write(&courses)?;

        info!(
            "event=course_add module=repo status=ok course_id={} course_count={}",
            course.id,
            courses.len()
        );
        Ok(course)
    }

    fn delete_course(&self, course_id: CourseId) -> RepoResult<bool> {
        let mut courses = self.store.read()?;
        let before = courses.len();
        courses.retain(|course| course.id != course_id);
        if courses.len() == before {
            return Ok(false);
        }
        self.store.write(&courses)?;

        info!("event=course_delete module=repo status=ok course_id={course_id}");
        Ok(true)
    }

    fn add_unit(&self, course_id: CourseId, name: &str) -> RepoResult<Unit> {
        let mut courses = self.store.read()?;
        let unit_id = fresh_id(&courses);
        let course = Self::course_mut(&mut courses, course_id)?;
        let unit = Unit::with_id(unit_id, name, course.next_unit_number());
        course.units.push(unit.clone());
        self.store.write(&courses)?;

        info!(
            "event=unit_add module=repo status=ok course_id={course_id} unit_id={} number={}",
            unit.id, unit.number
        );
        Ok(unit)
    }

    fn delete_unit(&self, course_id: CourseId, unit_id: UnitId) -> RepoResult<bool> {
        let mut courses = self.store.read()?;
        let Some(course) = courses.iter_mut().find(|course| course.id == course_id) else {
            return Ok(false);
        };
        let before = course.units.len();
        course.units.retain(|unit| unit.id != unit_id);
        if course.units.len() == before {
            return Ok(false);
        }
        self.store.write(&courses)?;

        info!("event=unit_delete module=repo status=ok course_id={course_id} unit_id={unit_id}");
        Ok(true)
    }

    fn add_topic(
        &self,
        course_id: CourseId,
        unit_id: UnitId,
        topic: NewTopic,
    ) -> RepoResult<Topic> {
        let mut courses = self.store.read()?;
        let topic = topic.into_topic(fresh_id(&courses));
        let unit = Self::unit_mut(&mut courses, course_id, unit_id)?;
        unit.topics.push(topic.clone());
        let topic_count = unit.topics.len();
        self.store.write(&courses)?;

        info!(
            "event=topic_add module=repo status=ok course_id={course_id} unit_id={unit_id} topic_id={} topic_count={topic_count}",
            topic.id
        );
        Ok(topic)
    }

    fn update_topic(
        &self,
        course_id: CourseId,
        unit_id: UnitId,
        topic_id: TopicId,
        patch: &TopicPatch,
    ) -> RepoResult<Topic> {
        let mut courses = self.store.read()?;
        let topic = Self::unit_mut(&mut courses, course_id, unit_id)?
            .topic_mut(topic_id)
            .ok_or(RepoError::TopicNotFound {
                course_id,
                unit_id,
                topic_id,
            })?;
        patch.apply(topic);
        let updated = topic.clone();
        self.store.write(&courses)?;

        info!(
            "event=topic_update module=repo status=ok topic_id={topic_id} knowledge_level={}",
            updated.knowledge_level
        );
        Ok(updated)
    }

    fn delete_topic(
        &self,
        course_id: CourseId,
        unit_id: UnitId,
        topic_id: TopicId,
    ) -> RepoResult<bool> {
        let mut courses = self.store.read()?;
        let Ok(unit) = Self::unit_mut(&mut courses, course_id, unit_id) else {
            return Ok(false);
        };
        let before = unit.topics.len();
        unit.topics.retain(|topic| topic.id != topic_id);
        if unit.topics.len() == before {
            return Ok(false);
        }
        self.store.write(&courses)?;

        info!("event=topic_delete module=repo status=ok unit_id={unit_id} topic_id={topic_id}");
        Ok(true)
    }
}

/// Generates a v4 UUID not already used anywhere in the snapshot.
fn fresh_id(courses: &[Course]) -> Uuid {
    let taken: HashSet<Uuid> = all_ids(courses).into_iter().collect();
    loop {
        let candidate = Uuid::new_v4();
        if !taken.contains(&candidate) {
            return candidate;
        }
    }
}
