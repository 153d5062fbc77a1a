//! JSON codec for the stored course list.
//!
//! # Responsibility
//! - Encode snapshots in the canonical nested Units-on-Course shape.
//! - Decode both the canonical shape and the legacy flat Topics-on-Course
//!   shape, migrating the latter into units grouped by unit number.
//!
//! # Invariants
//! - A course object carrying `units` is always decoded as nested.
//! - Every decoded unit has a non-zero number; unnumbered units are placed
//!   after the highest numbered one in stored order.
//! - Legacy topics keep their ids and stored order within each unit.

use crate::model::course::{Course, CourseId, Unit};
use crate::model::topic::{Topic, TopicId};
use crate::store::{StoreError, StoreResult};
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Display name of the legacy bucket for topics without a usable unit number.
pub const UNASSIGNED_UNIT_NAME: &str = "Unassigned";

#[derive(Deserialize)]
struct FlatCourse {
    id: CourseId,
    name: String,
    topics: Vec<FlatTopic>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlatTopic {
    id: TopicId,
    name: String,
    #[serde(default)]
    unit_number: Option<Value>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    knowledge_level: u8,
    due_date: String,
}

/// Serializes a snapshot to its stored JSON text.
pub fn encode_courses(courses: &[Course]) -> StoreResult<String> {
    serde_json::to_string(courses).map_err(StoreError::Encode)
}

/// Parses stored JSON text, migrating legacy flat courses.
pub fn decode_courses(raw: &str) -> StoreResult<Vec<Course>> {
    let stored: Vec<Value> = serde_json::from_str(raw)
        .map_err(|err| StoreError::InvalidData(format!("course list is not valid: {err}")))?;

    let mut migrated = 0usize;
    let mut courses = Vec::with_capacity(stored.len());
    for (index, value) in stored.into_iter().enumerate() {
        let invalid =
            |err: serde_json::Error| StoreError::InvalidData(format!("course #{index}: {err}"));
        let course = if value.get("units").is_some() {
            let mut course: Course = serde_json::from_value(value).map_err(invalid)?;
            number_units(&mut course);
            course
        } else {
            migrated += 1;
            migrate_flat_course(serde_json::from_value(value).map_err(invalid)?)
        };
        courses.push(course);
    }

    if migrated > 0 {
        info!("event=store_migrate module=store status=ok legacy_courses={migrated}");
    }
    Ok(courses)
}

fn number_units(course: &mut Course) {
    let mut last = course.units.iter().map(|unit| unit.number).max().unwrap_or(0);
    for unit in course.units.iter_mut().filter(|unit| unit.number == 0) {
        last = last.saturating_add(1);
        unit.number = last;
    }
}

/// Accepts positive integers and their decimal string form.
fn legacy_unit_number(value: Option<&Value>) -> Option<u32> {
    let number = match value? {
        Value::Number(number) => number.as_u64()?,
        Value::String(text) => text.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(number).ok().filter(|number| *number > 0)
}

fn migrate_flat_course(flat: FlatCourse) -> Course {
    let mut grouped: BTreeMap<u32, Vec<Topic>> = BTreeMap::new();
    let mut unassigned = Vec::new();
    for topic in flat.topics {
        let number = legacy_unit_number(topic.unit_number.as_ref());
        let topic = Topic {
            id: topic.id,
            name: topic.name,
            description: topic.description.filter(|value| !value.is_empty()),
            notes: topic.notes.filter(|value| !value.is_empty()),
            knowledge_level: topic.knowledge_level,
            due_date: topic.due_date,
        };
        match number {
            Some(number) => grouped.entry(number).or_default().push(topic),
            None => unassigned.push(topic),
        }
    }

    let mut units: Vec<Unit> = grouped
        .into_iter()
        .map(|(number, topics)| Unit {
            id: Uuid::new_v4(),
            name: format!("Unit {number}"),
            number,
            topics,
        })
        .collect();

    if !unassigned.is_empty() {
        warn!(
            "event=store_migrate module=store status=partial course_id={} unassigned_topics={}",
            flat.id,
            unassigned.len()
        );
        let number = units.last().map_or(1, |unit| unit.number.saturating_add(1));
        units.push(Unit {
            id: Uuid::new_v4(),
            name: UNASSIGNED_UNIT_NAME.to_string(),
            number,
            topics: unassigned,
        });
    }

    Course {
        id: flat.id,
        name: flat.name,
        units,
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_courses, encode_courses, UNASSIGNED_UNIT_NAME};
    use crate::store::StoreError;

    #[test]
    fn decodes_empty_array() {
        assert!(decode_courses("[]").unwrap().is_empty());
    }

    #[test]
    fn migrates_flat_course_into_numbered_units() {
        let raw = r#"[{
            "id": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a01",
            "name": "History",
            "topics": [
                {"id": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a02", "name": "Treaty",
                 "unitNumber": 3, "knowledgeLevel": 1, "dueDate": "2024-03-01", "notes": ""},
                {"id": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a03", "name": "Empire",
                 "unitNumber": 1, "knowledgeLevel": 4, "dueDate": "2024-02-01",
                 "description": "rise and fall"},
                {"id": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a04", "name": "Revolt",
                 "unitNumber": 3, "knowledgeLevel": 0, "dueDate": "2024-03-05"}
            ]
        }]"#;

        let courses = decode_courses(raw).unwrap();
        assert_eq!(courses.len(), 1);
        let units = &courses[0].units;
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].number, 1);
        assert_eq!(units[0].name, "Unit 1");
        assert_eq!(units[0].topics[0].description.as_deref(), Some("rise and fall"));
        assert_eq!(units[1].number, 3);
        let names: Vec<&str> = units[1].topics.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Treaty", "Revolt"]);
        assert_eq!(units[1].topics[0].notes, None);
    }

    #[test]
    fn encoded_snapshot_is_nested() {
        let raw = r#"[{"id": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a01", "name": "Art", "topics": []}]"#;
        let courses = decode_courses(raw).unwrap();
        let encoded = encode_courses(&courses).unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert!(value[0]["units"].is_array());
        assert!(value[0].get("topics").is_none());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = decode_courses("{not json").unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));

        let err = decode_courses(r#"[{"id": 7}]"#).unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }

    #[test]
    fn decodes_nested_units_without_numbers() {
        let raw = r#"[{
            "id": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a01",
            "name": "Bio",
            "units": [
                {"id": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a05", "name": "Cells",
                 "courseId": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a01", "topics": []},
                {"id": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a06", "name": "Genetics",
                 "courseId": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a01", "topics": [
                    {"id": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a07", "name": "Alleles",
                     "unitId": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a06",
                     "knowledgeLevel": 2, "dueDate": "2024-06-01"}
                 ]}
            ]
        }]"#;

        let courses = decode_courses(raw).unwrap();
        let numbers: Vec<u32> = courses[0].units.iter().map(|u| u.number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(courses[0].units[1].topics[0].name, "Alleles");
        assert_eq!(courses[0].next_unit_number(), 3);
    }

    #[test]
    fn unnumbered_units_follow_numbered_ones() {
        let raw = r#"[{"id": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a01", "name": "Bio", "units": [
            {"id": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a05", "name": "A", "topics": []},
            {"id": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a06", "name": "B", "number": 4, "topics": []}
        ]}]"#;

        let courses = decode_courses(raw).unwrap();
        assert_eq!(courses[0].units[0].number, 5);
        assert_eq!(courses[0].units[1].number, 4);
    }

    #[test]
    fn unusable_legacy_unit_numbers_go_to_unassigned() {
        let raw = r#"[{
            "id": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a01",
            "name": "Math",
            "topics": [
                {"id": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a02", "name": "Null",
                 "unitNumber": null, "knowledgeLevel": 0, "dueDate": "2024-01-01"},
                {"id": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a03", "name": "Two",
                 "unitNumber": "2", "knowledgeLevel": 0, "dueDate": "2024-01-02"},
                {"id": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a04", "name": "Negative",
                 "unitNumber": -3, "knowledgeLevel": 0, "dueDate": "2024-01-03"},
                {"id": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a05", "name": "Missing",
                 "knowledgeLevel": 0, "dueDate": "2024-01-04"}
            ]
        }]"#;

        let courses = decode_courses(raw).unwrap();
        let units = &courses[0].units;
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].number, 2);
        assert_eq!(units[0].topics[0].name, "Two");
        assert_eq!(units[1].name, UNASSIGNED_UNIT_NAME);
        assert_eq!(units[1].number, 3);
        let names: Vec<&str> = units[1].topics.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Null", "Negative", "Missing"]);
    }

    #[test]
    fn field_errors_name_the_course_and_field() {
        let raw = r#"[
            {"id": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a01", "name": "Ok", "units": []},
            {"id": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a02", "name": "Bad", "units": [
                {"id": "6f2c1a4e-2b1f-4f6b-9a51-0c7e4e6d1a03", "topics": []}
            ]}
        ]"#;

        let StoreError::InvalidData(message) = decode_courses(raw).unwrap_err() else {
            panic!("expected invalid data");
        };
        assert!(message.contains("course #1"), "{message}");
        assert!(message.contains("missing field `name`"), "{message}");
        assert!(!message.contains("untagged"), "{message}");
    }
}
