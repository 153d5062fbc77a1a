//! Course and unit records.
//!
//! # Responsibility
//! - Define the two container levels of the study hierarchy.
//! - Provide read-only lookup helpers used by repository and view code.
//!
//! # Invariants
//! - A course owns its units; a unit owns its topics.
//! - `Unit::number` is an ordinal, unique within one course by construction.

use crate::model::topic::{Topic, TopicId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a course.
pub type CourseId = Uuid;

/// Stable identifier of a unit.
pub type UnitId = Uuid;

/// Top-level grouping of study material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub units: Vec<Unit>,
}

/// Named subdivision of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    /// 1-based ordinal shown as "Unit n"; 0 only while decoding data that
    /// predates numbered units.
    #[serde(default)]
    pub number: u32,
    pub topics: Vec<Topic>,
}

impl Course {
    /// Creates an empty course with the given id.
    pub fn with_id(id: CourseId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            units: Vec::new(),
        }
    }

    pub fn unit(&self, unit_id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id == unit_id)
    }

    pub fn unit_mut(&mut self, unit_id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|unit| unit.id == unit_id)
    }

    /// Finds a topic in any unit, returning the owning unit alongside it.
    pub fn find_topic(&self, topic_id: TopicId) -> Option<(&Unit, &Topic)> {
        self.units
            .iter()
            .find_map(|unit| unit.topic(topic_id).map(|topic| (unit, topic)))
    }

    /// Total number of topics across all units.
    pub fn topic_count(&self) -> usize {
        self.units.iter().map(|unit| unit.topics.len()).sum()
    }

    /// Ordinal for the next unit added to this course.
    pub fn next_unit_number(&self) -> u32 {
        self.units
            .iter()
            .map(|unit| unit.number)
            .max()
            .map_or(1, |max| max.saturating_add(1))
    }
}

impl Unit {
    /// Creates an empty unit with the given id and ordinal.
    pub fn with_id(id: UnitId, name: impl Into<String>, number: u32) -> Self {
        Self {
            id,
            name: name.into(),
            number,
            topics: Vec::new(),
        }
    }

    pub fn topic(&self, topic_id: TopicId) -> Option<&Topic> {
        self.topics.iter().find(|topic| topic.id == topic_id)
    }

    pub fn topic_mut(&mut self, topic_id: TopicId) -> Option<&mut Topic> {
        self.topics.iter_mut().find(|topic| topic.id == topic_id)
    }
}

/// Collects every course, unit and topic id in a snapshot.
pub fn all_ids(courses: &[Course]) -> Vec<Uuid> {
    let mut ids = Vec::new();
    for course in courses {
        ids.push(course.id);
        for unit in &course.units {
            ids.push(unit.id);
            ids.extend(unit.topics.iter().map(|topic| topic.id));
        }
    }
    ids
}
