//! Text rendering of study tracker pages.
//!
//! Each page reads a fresh snapshot through the repository, mirroring how the
//! browser views re-read storage on every navigation.

use anyhow::{anyhow, Result};
use std::io::Write;
use studytrack_core::{
    course_rows, sort_rows, unit_rows, Course, CourseRepository, Route, SortDirection, SortKey,
    SortState, Topic, TopicRow, Unit, KNOWLEDGE_LEVEL_MAX,
};

const PROGRESS_WIDTH: usize = 10;

/// Renders the page for an already-resolved route.
pub fn page<R: CourseRepository, O: Write>(
    repo: &R,
    route: Route,
    sort: SortState,
    out: &mut O,
) -> Result<()> {
    match route {
        Route::Home => home(repo, out),
        Route::Course { course_id } => {
            let course = repo
                .get_course(course_id)?
                .ok_or_else(|| anyhow!("course not found: {course_id}"))?;
            course_page(&course, sort, out)
        }
        Route::Unit { course_id, unit_id } => {
            let course = repo
                .get_course(course_id)?
                .ok_or_else(|| anyhow!("course not found: {course_id}"))?;
            let unit = course
                .unit(unit_id)
                .ok_or_else(|| anyhow!("unit not found: {unit_id}"))?;
            unit_page(&course, unit, sort, out)
        }
        Route::Topic {
            course_id,
            unit_id,
            topic_id,
        } => {
            let course = repo
                .get_course(course_id)?
                .ok_or_else(|| anyhow!("course not found: {course_id}"))?;
            let unit = course
                .unit(unit_id)
                .ok_or_else(|| anyhow!("unit not found: {unit_id}"))?;
            let topic = unit
                .topic(topic_id)
                .ok_or_else(|| anyhow!("topic not found: {topic_id}"))?;
            topic_page(&course, unit, topic, out)
        }
        Route::CourseTopic {
            course_id,
            topic_id,
        } => {
            let course = repo
                .get_course(course_id)?
                .ok_or_else(|| anyhow!("course not found: {course_id}"))?;
            let (unit, topic) = course
                .find_topic(topic_id)
                .ok_or_else(|| anyhow!("topic not found: {topic_id}"))?;
            topic_page(&course, unit, topic, out)
        }
    }
}

fn home<R: CourseRepository, O: Write>(repo: &R, out: &mut O) -> Result<()> {
    let courses = repo.list_courses()?;
    writeln!(out, "Your Courses")?;
    if courses.is_empty() {
        writeln!(out, "  No courses yet. Add your first course to get started.")?;
        return Ok(());
    }
    for course in &courses {
        writeln!(out)?;
        writeln!(out, "  {}", course.name)?;
        writeln!(
            out,
            "    {}, {}",
            count_label(course.units.len(), "unit", "units"),
            count_label(course.topic_count(), "topic", "topics")
        )?;
        writeln!(out, "    id: {}", course.id)?;
    }
    Ok(())
}

fn course_page<O: Write>(course: &Course, sort: SortState, out: &mut O) -> Result<()> {
    writeln!(out, "{}", course.name)?;
    writeln!(out, "  id: {}", course.id)?;
    writeln!(out)?;
    writeln!(out, "Units")?;
    if course.units.is_empty() {
        writeln!(out, "  No units yet. Add your first unit to get started.")?;
        return Ok(());
    }
    let mut units: Vec<&Unit> = course.units.iter().collect();
    units.sort_by_key(|unit| unit.number);
    for unit in units {
        writeln!(
            out,
            "  Unit {}: {} ({})  id: {}",
            unit.number,
            unit.name,
            count_label(unit.topics.len(), "topic", "topics"),
            unit.id
        )?;
    }

    writeln!(out)?;
    topic_list(&course_rows(course), sort, out)
}

fn unit_page<O: Write>(course: &Course, unit: &Unit, sort: SortState, out: &mut O) -> Result<()> {
    writeln!(out, "Unit {}: {}", unit.number, unit.name)?;
    writeln!(out, "  course: {}", course.name)?;
    writeln!(out, "  id: {}", unit.id)?;
    writeln!(out)?;
    topic_list(&unit_rows(unit), sort, out)
}

fn topic_list<O: Write>(rows: &[TopicRow<'_>], sort: SortState, out: &mut O) -> Result<()> {
    writeln!(out, "Topics (sorted by {})", sort_label(sort))?;
    if rows.is_empty() {
        writeln!(out, "  No topics yet. Add your first topic to get started.")?;
        return Ok(());
    }
    for row in sort_rows(rows, sort) {
        topic_card(row, out)?;
    }
    Ok(())
}

fn topic_card<O: Write>(row: TopicRow<'_>, out: &mut O) -> Result<()> {
    let topic = row.topic;
    writeln!(out)?;
    writeln!(
        out,
        "  Unit {}  {}  Level {}/{KNOWLEDGE_LEVEL_MAX}",
        row.unit_number, topic.name, topic.knowledge_level
    )?;
    if let Some(description) = &topic.description {
        writeln!(out, "    {description}")?;
    }
    writeln!(
        out,
        "    Due: {}  {}  {}",
        topic.due_date,
        progress_bar(topic),
        notes_label(topic)
    )?;
    writeln!(out, "    id: {}", topic.id)?;
    Ok(())
}

fn topic_page<O: Write>(course: &Course, unit: &Unit, topic: &Topic, out: &mut O) -> Result<()> {
    writeln!(out, "{}", topic.name)?;
    writeln!(out, "  course: {}", course.name)?;
    writeln!(out, "  Unit {}: {}", unit.number, unit.name)?;
    writeln!(out, "  Due: {}", topic.due_date)?;
    writeln!(out, "  Knowledge Level: {}", stars(topic.knowledge_level))?;
    writeln!(out, "  id: {}", topic.id)?;
    if let Some(description) = &topic.description {
        writeln!(out)?;
        writeln!(out, "Description")?;
        writeln!(out, "  {description}")?;
    }
    writeln!(out)?;
    writeln!(out, "Notes")?;
    match topic.notes.as_deref().filter(|notes| !notes.is_empty()) {
        Some(notes) => {
            for line in notes.lines() {
                writeln!(out, "  {line}")?;
            }
        }
        None => writeln!(out, "  No notes yet.")?,
    }
    Ok(())
}

/// `"1 topic"`, `"3 topics"`.
pub fn count_label(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

fn notes_label(topic: &Topic) -> &'static str {
    if topic.has_notes() {
        "Notes added"
    } else {
        "No notes yet"
    }
}

fn progress_bar(topic: &Topic) -> String {
    let filled = usize::from(topic.progress_percent()) * PROGRESS_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled),
        topic.progress_percent()
    )
}

/// Star rating for a knowledge level, e.g. `★★☆☆☆ (2/5)`.
pub fn stars(level: u8) -> String {
    let filled = usize::from(level.min(KNOWLEDGE_LEVEL_MAX));
    let empty = usize::from(KNOWLEDGE_LEVEL_MAX) - filled;
    format!(
        "{}{} ({level}/{KNOWLEDGE_LEVEL_MAX})",
        "★".repeat(filled),
        "☆".repeat(empty)
    )
}

fn sort_label(sort: SortState) -> String {
    let key = match sort.key {
        SortKey::UnitNumber => "unit number",
        SortKey::KnowledgeLevel => "knowledge level",
        SortKey::DueDate => "due date",
    };
    let direction = match sort.direction {
        SortDirection::Asc => "ascending",
        SortDirection::Desc => "descending",
    };
    format!("{key}, {direction}")
}

#[cfg(test)]
mod tests {
    use super::{count_label, progress_bar, stars};
    use studytrack_core::{Topic, TopicId};

    #[test]
    fn count_label_pluralizes() {
        assert_eq!(count_label(1, "topic", "topics"), "1 topic");
        assert_eq!(count_label(0, "topic", "topics"), "0 topics");
    }

    #[test]
    fn stars_fill_up_to_level() {
        assert_eq!(stars(2), "★★☆☆☆ (2/5)");
        assert_eq!(stars(0), "☆☆☆☆☆ (0/5)");
    }

    #[test]
    fn progress_bar_scales_with_level() {
        let mut topic = Topic::with_id(TopicId::nil(), "Mitosis", "2024-05-01");
        topic.knowledge_level = 3;
        assert_eq!(progress_bar(&topic), "[######----]  60%");
    }
}
