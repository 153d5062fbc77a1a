//! Topic record and its write-side shapes.
//!
//! # Responsibility
//! - Define the atomic study item tracked by due date and knowledge level.
//! - Define creation input (`NewTopic`) and shallow-merge updates (`TopicPatch`).
//!
//! # Invariants
//! - `knowledge_level` is expected within `0..=KNOWLEDGE_LEVEL_MAX`; the
//!   service layer enforces it, the store does not.
//! - `due_date` is an ISO calendar date (`YYYY-MM-DD`) when written through
//!   the service layer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a topic.
pub type TopicId = Uuid;

/// Highest self-assessed knowledge level (rendered as five stars).
pub const KNOWLEDGE_LEVEL_MAX: u8 = 5;

/// Atomic study item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: TopicId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub knowledge_level: u8,
    pub due_date: String,
}

impl Topic {
    /// Creates a topic with level 0 and no description or notes.
    pub fn with_id(id: TopicId, name: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            notes: None,
            knowledge_level: 0,
            due_date: due_date.into(),
        }
    }

    /// Whether the topic carries non-empty notes.
    pub fn has_notes(&self) -> bool {
        self.notes.as_deref().is_some_and(|notes| !notes.is_empty())
    }

    /// Mastery as a percentage of `KNOWLEDGE_LEVEL_MAX`, capped at 100.
    pub fn progress_percent(&self) -> u8 {
        let level = u32::from(self.knowledge_level.min(KNOWLEDGE_LEVEL_MAX));
        (level * 100 / u32::from(KNOWLEDGE_LEVEL_MAX)) as u8
    }
}

/// Creation payload: a topic without its id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTopic {
    pub name: String,
    pub description: Option<String>,
    pub due_date: String,
    pub knowledge_level: u8,
    pub notes: Option<String>,
}

impl NewTopic {
    pub(crate) fn into_topic(self, id: TopicId) -> Topic {
        Topic {
            id,
            name: self.name,
            description: self.description,
            notes: self.notes,
            knowledge_level: self.knowledge_level,
            due_date: self.due_date,
        }
    }
}

/// Shallow-merge update for a stored topic.
///
/// `None` leaves a field untouched. For `description` and `notes`, an
/// empty string clears the field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopicPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub knowledge_level: Option<u8>,
    pub due_date: Option<String>,
}

impl TopicPatch {
    pub fn knowledge_level(level: u8) -> Self {
        Self {
            knowledge_level: Some(level),
            ..Self::default()
        }
    }

    pub fn notes(notes: impl Into<String>) -> Self {
        Self {
            notes: Some(notes.into()),
            ..Self::default()
        }
    }

    /// Whether applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merges the provided fields over `topic`.
    pub fn apply(&self, topic: &mut Topic) {
        if let Some(name) = &self.name {
            topic.name = name.clone();
        }
        if let Some(description) = &self.description {
            topic.description = non_empty(description);
        }
        if let Some(notes) = &self.notes {
            topic.notes = non_empty(notes);
        }
        if let Some(level) = self.knowledge_level {
            topic.knowledge_level = level;
        }
        if let Some(due_date) = &self.due_date {
            topic.due_date = due_date.clone();
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
