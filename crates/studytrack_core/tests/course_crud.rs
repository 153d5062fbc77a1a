use std::collections::HashSet;
use studytrack_core::model::course::all_ids;
use studytrack_core::{
    CourseRepository, MemoryStore, NewTopic, RepoError, SnapshotCourseRepository, TopicPatch,
};
use uuid::Uuid;

fn setup() -> SnapshotCourseRepository<MemoryStore> {
    SnapshotCourseRepository::new(MemoryStore::new())
}

fn new_topic(name: &str, due_date: &str, level: u8) -> NewTopic {
    NewTopic {
        name: name.to_string(),
        due_date: due_date.to_string(),
        knowledge_level: level,
        ..NewTopic::default()
    }
}

#[test]
fn empty_store_lists_no_courses() {
    let repo = setup();
    assert!(repo.list_courses().unwrap().is_empty());
    assert!(repo.get_course(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn biology_scenario_builds_nested_hierarchy() {
    let repo = setup();

    let biology = repo.add_course("Biology").unwrap();
    let cells = repo.add_unit(biology.id, "Cells").unwrap();
    repo.add_topic(biology.id, cells.id, new_topic("Mitosis", "2024-05-01", 2))
        .unwrap();

    let loaded = repo.get_course(biology.id).unwrap().unwrap();
    assert_eq!(loaded.name, "Biology");
    assert_eq!(loaded.units.len(), 1);
    assert_eq!(loaded.units[0].name, "Cells");
    assert_eq!(loaded.units[0].topics.len(), 1);
    let topic = &loaded.units[0].topics[0];
    assert_eq!(topic.name, "Mitosis");
    assert_eq!(topic.knowledge_level, 2);
    assert_eq!(topic.due_date, "2024-05-01");
}

#[test]
fn update_topic_changes_only_patched_fields() {
    let repo = setup();
    let course = repo.add_course("Biology").unwrap();
    let unit = repo.add_unit(course.id, "Cells").unwrap();
    let mut draft = new_topic("Mitosis", "2024-05-01", 2);
    draft.description = Some("cell division".to_string());
    let topic = repo.add_topic(course.id, unit.id, draft).unwrap();

    let updated = repo
        .update_topic(course.id, unit.id, topic.id, &TopicPatch::knowledge_level(5))
        .unwrap();
    assert_eq!(updated.knowledge_level, 5);

    let loaded = repo
        .get_topic(course.id, unit.id, topic.id)
        .unwrap()
        .unwrap();
    assert_eq!(loaded.knowledge_level, 5);
    assert_eq!(loaded.id, topic.id);
    assert_eq!(loaded.name, topic.name);
    assert_eq!(loaded.description, topic.description);
    assert_eq!(loaded.due_date, topic.due_date);
    assert_eq!(loaded.notes, topic.notes);
}

#[test]
fn add_topic_grows_unit_by_one_with_unique_id() {
    let repo = setup();
    let course = repo.add_course("Chemistry").unwrap();
    let unit = repo.add_unit(course.id, "Molar Mass").unwrap();
    repo.add_topic(course.id, unit.id, new_topic("Avogadro", "2024-01-10", 0))
        .unwrap();

    let before = repo.list_courses().unwrap();
    let existing: HashSet<Uuid> = all_ids(&before).into_iter().collect();
    let count_before = before[0].units[0].topics.len();

    let topic = repo
        .add_topic(course.id, unit.id, new_topic("Molarity", "2024-01-12", 1))
        .unwrap();

    let after = repo.get_unit(course.id, unit.id).unwrap().unwrap();
    assert_eq!(after.topics.len(), count_before + 1);
    assert!(!existing.contains(&topic.id));
}

#[test]
fn delete_course_cascades_to_units_and_topics() {
    let repo = setup();
    let doomed = repo.add_course("Physics").unwrap();
    let kept = repo.add_course("Art").unwrap();
    let unit = repo.add_unit(doomed.id, "Motion").unwrap();
    let topic = repo
        .add_topic(doomed.id, unit.id, new_topic("Velocity", "2024-02-01", 3))
        .unwrap();
    repo.add_unit(kept.id, "Color").unwrap();

    assert!(repo.delete_course(doomed.id).unwrap());

    let remaining = repo.list_courses().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, kept.id);
    let ids: HashSet<Uuid> = all_ids(&remaining).into_iter().collect();
    assert!(!ids.contains(&unit.id));
    assert!(!ids.contains(&topic.id));
}

#[test]
fn delete_unit_removes_its_topics_only() {
    let repo = setup();
    let course = repo.add_course("History").unwrap();
    let first = repo.add_unit(course.id, "Ancient").unwrap();
    let second = repo.add_unit(course.id, "Modern").unwrap();
    repo.add_topic(course.id, first.id, new_topic("Rome", "2024-03-01", 1))
        .unwrap();
    repo.add_topic(course.id, second.id, new_topic("WWII", "2024-04-01", 2))
        .unwrap();

    assert!(repo.delete_unit(course.id, first.id).unwrap());

    let course = repo.get_course(course.id).unwrap().unwrap();
    assert_eq!(course.units.len(), 1);
    assert_eq!(course.units[0].id, second.id);
    assert_eq!(course.topic_count(), 1);
}

#[test]
fn deleting_missing_ids_leaves_snapshot_unchanged() {
    let repo = setup();
    let course = repo.add_course("Math").unwrap();
    let unit = repo.add_unit(course.id, "Algebra").unwrap();
    let topic = repo
        .add_topic(course.id, unit.id, new_topic("Groups", "2024-06-01", 0))
        .unwrap();
    let snapshot = repo.store().raw();

    assert!(!repo.delete_course(Uuid::new_v4()).unwrap());
    assert!(!repo.delete_unit(course.id, Uuid::new_v4()).unwrap());
    assert!(!repo.delete_unit(Uuid::new_v4(), unit.id).unwrap());
    assert!(!repo.delete_topic(course.id, unit.id, Uuid::new_v4()).unwrap());
    assert!(!repo.delete_topic(course.id, Uuid::new_v4(), topic.id).unwrap());

    assert_eq!(repo.store().raw(), snapshot);
}

#[test]
fn delete_topic_twice_is_idempotent() {
    let repo = setup();
    let course = repo.add_course("Math").unwrap();
    let unit = repo.add_unit(course.id, "Algebra").unwrap();
    let topic = repo
        .add_topic(course.id, unit.id, new_topic("Rings", "2024-06-02", 0))
        .unwrap();

    assert!(repo.delete_topic(course.id, unit.id, topic.id).unwrap());
    assert!(!repo.delete_topic(course.id, unit.id, topic.id).unwrap());
    assert!(repo
        .get_topic(course.id, unit.id, topic.id)
        .unwrap()
        .is_none());
}

#[test]
fn writes_under_missing_parents_return_not_found() {
    let repo = setup();
    let course = repo.add_course("Music").unwrap();
    let missing = Uuid::new_v4();

    let err = repo.add_unit(missing, "Scales").unwrap_err();
    assert!(matches!(err, RepoError::CourseNotFound(id) if id == missing));

    let err = repo
        .add_topic(course.id, missing, new_topic("Chords", "2024-07-01", 0))
        .unwrap_err();
    assert!(matches!(err, RepoError::UnitNotFound { unit_id, .. } if unit_id == missing));

    let unit = repo.add_unit(course.id, "Theory").unwrap();
    let err = repo
        .update_topic(course.id, unit.id, missing, &TopicPatch::notes("x"))
        .unwrap_err();
    assert!(matches!(err, RepoError::TopicNotFound { topic_id, .. } if topic_id == missing));

    let course = repo.get_course(course.id).unwrap().unwrap();
    assert_eq!(course.units.len(), 1);
    assert_eq!(course.topic_count(), 0);
}

#[test]
fn repository_stores_names_as_given() {
    let repo = setup();
    let course = repo.add_course("  spaced  ").unwrap();
    assert_eq!(
        repo.get_course(course.id).unwrap().unwrap().name,
        "  spaced  "
    );
}
