//! Page routes and nearest-valid-parent resolution.
//!
//! # Responsibility
//! - Parse and format the page paths of the study tracker.
//! - Redirect routes naming a missing entity to the deepest existing ancestor.
//!
//! # Invariants
//! - A resolved route always names entities that exist at resolution time.
//! - Resolution never yields `Route::CourseTopic`; it maps to `Route::Topic`.

use crate::model::course::{CourseId, UnitId};
use crate::model::topic::TopicId;
use crate::repo::course_repo::CourseRepository;
use crate::service::study_service::{ServiceResult, StudyService};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// A page of the study tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    Home,
    /// `/courses/:course`
    Course { course_id: CourseId },
    /// `/courses/:course/units/:unit`
    Unit { course_id: CourseId, unit_id: UnitId },
    /// `/courses/:course/units/:unit/topics/:topic`
    Topic {
        course_id: CourseId,
        unit_id: UnitId,
        topic_id: TopicId,
    },
    /// `/courses/:course/topics/:topic`, from before topics were grouped into units.
    CourseTopic {
        course_id: CourseId,
        topic_id: TopicId,
    },
}

/// Path could not be parsed as a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    UnknownPath(String),
    InvalidId { segment: String },
}

impl Display for RouteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPath(path) => write!(f, "unknown page path `{path}`"),
            Self::InvalidId { segment } => write!(f, "`{segment}` is not a valid id"),
        }
    }
}

impl Error for RouteError {}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = path
            .trim()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Ok(Self::Home),
            ["courses", course] => Ok(Self::Course {
                course_id: parse_id(course)?,
            }),
            ["courses", course, "units", unit] => Ok(Self::Unit {
                course_id: parse_id(course)?,
                unit_id: parse_id(unit)?,
            }),
            ["courses", course, "units", unit, "topics", topic] => Ok(Self::Topic {
                course_id: parse_id(course)?,
                unit_id: parse_id(unit)?,
                topic_id: parse_id(topic)?,
            }),
            ["courses", course, "topics", topic] => Ok(Self::CourseTopic {
                course_id: parse_id(course)?,
                topic_id: parse_id(topic)?,
            }),
            _ => Err(RouteError::UnknownPath(path.to_string())),
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Home => write!(f, "/"),
            Self::Course { course_id } => write!(f, "/courses/{course_id}"),
            Self::Unit { course_id, unit_id } => {
                write!(f, "/courses/{course_id}/units/{unit_id}")
            }
            Self::Topic {
                course_id,
                unit_id,
                topic_id,
            } => write!(f, "/courses/{course_id}/units/{unit_id}/topics/{topic_id}"),
            Self::CourseTopic {
                course_id,
                topic_id,
            } => write!(f, "/courses/{course_id}/topics/{topic_id}"),
        }
    }
}

fn parse_id(segment: &str) -> Result<Uuid, RouteError> {
    Uuid::parse_str(segment).map_err(|_| RouteError::InvalidId {
        segment: segment.to_string(),
    })
}

/// Outcome of resolving a requested route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Route to render.
    pub route: Route,
    /// Whether `route` is an ancestor of the requested page.
    pub redirected: bool,
}

impl<R: CourseRepository> StudyService<R> {
    /// Resolves `requested` to the deepest route whose entities exist.
    pub fn resolve(&self, requested: Route) -> ServiceResult<Resolution> {
        let (route, redirected) = match requested {
            Route::Home => (Route::Home, false),
            Route::Course { course_id } => match self.repo().get_course(course_id)? {
                Some(_) => (requested, false),
                None => (Route::Home, true),
            },
            Route::Unit { course_id, unit_id } => match self.repo().get_course(course_id)? {
                None => (Route::Home, true),
                Some(course) if course.unit(unit_id).is_some() => (requested, false),
                Some(_) => (Route::Course { course_id }, true),
            },
            Route::Topic {
                course_id,
                unit_id,
                topic_id,
            } => match self.repo().get_course(course_id)? {
                None => (Route::Home, true),
                Some(course) => match course.unit(unit_id) {
                    None => (Route::Course { course_id }, true),
                    Some(unit) if unit.topic(topic_id).is_some() => (requested, false),
                    Some(_) => (Route::Unit { course_id, unit_id }, true),
                },
            },
            Route::CourseTopic {
                course_id,
                topic_id,
            } => match self.repo().get_course(course_id)? {
                None => (Route::Home, true),
                Some(course) => match course.find_topic(topic_id) {
                    Some((unit, _)) => (
                        Route::Topic {
                            course_id,
                            unit_id: unit.id,
                            topic_id,
                        },
                        false,
                    ),
                    None => (Route::Course { course_id }, true),
                },
            },
        };

        if redirected {
            debug!("event=route_redirect module=navigation status=ok from={requested} to={route}");
        }
        Ok(Resolution { route, redirected })
    }
}
