//! View-local topic list sorting.
//!
//! # Responsibility
//! - Track the sort key/direction selected on course and unit pages.
//! - Order an in-memory copy of topic rows without touching the store.
//!
//! # Invariants
//! - Selecting the active key toggles direction; a new key resets to `Asc`.
//! - Sorting is stable, so equal keys keep their stored order in both directions.

use crate::model::course::{Course, Unit, UnitId};
use crate::model::topic::Topic;
use std::cmp::Ordering;

/// Column a topic list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    UnitNumber,
    KnowledgeLevel,
    DueDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Current ordering of a topic list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::UnitNumber,
            direction: SortDirection::Asc,
        }
    }
}

impl SortState {
    /// Applies a header click: same key flips direction, new key sorts ascending.
    pub fn select(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.toggled();
        } else {
            self.key = key;
            self.direction = SortDirection::Asc;
        }
    }

    /// Folds a sequence of selections over the default state.
    pub fn from_selections(keys: impl IntoIterator<Item = SortKey>) -> Self {
        let mut state = Self::default();
        for key in keys {
            state.select(key);
        }
        state
    }
}

/// One topic as listed on a page, with its unit context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicRow<'a> {
    pub unit_id: UnitId,
    pub unit_number: u32,
    pub topic: &'a Topic,
}

/// Rows for every topic of a course, in unit then topic order.
pub fn course_rows(course: &Course) -> Vec<TopicRow<'_>> {
    course.units.iter().flat_map(unit_rows).collect()
}

/// Rows for the topics of one unit.
pub fn unit_rows(unit: &Unit) -> Vec<TopicRow<'_>> {
    unit.topics
        .iter()
        .map(|topic| TopicRow {
            unit_id: unit.id,
            unit_number: unit.number,
            topic,
        })
        .collect()
}

/// Returns a sorted copy of `rows`.
pub fn sort_rows<'a>(rows: &[TopicRow<'a>], state: SortState) -> Vec<TopicRow<'a>> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare(a, b, state.key);
        match state.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}

fn compare(a: &TopicRow<'_>, b: &TopicRow<'_>, key: SortKey) -> Ordering {
    match key {
        SortKey::UnitNumber => a.unit_number.cmp(&b.unit_number),
        SortKey::KnowledgeLevel => a.topic.knowledge_level.cmp(&b.topic.knowledge_level),
        // ISO dates order chronologically as strings.
        SortKey::DueDate => a.topic.due_date.cmp(&b.topic.due_date),
    }
}
