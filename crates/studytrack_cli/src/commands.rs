//! Subcommand dispatch.
//!
//! # Responsibility
//! - Map parsed CLI commands onto `StudyService` use cases.
//! - Gate destructive commands behind an explicit confirmation.
//!
//! # Invariants
//! - A declined confirmation never reaches the repository.

use crate::args::{Command, CourseCommand, SortKeyArg, TopicCommand, UnitCommand};
use crate::prompt::confirm;
use crate::render;
use anyhow::Result;
use std::io::{BufRead, Write};
use studytrack_core::{CourseRepository, Route, SortKey, SortState, StudyService, TopicDraft};

/// Executes one command against `service`.
pub fn execute<R, I, O>(
    service: &StudyService<R>,
    command: Command,
    input: &mut I,
    out: &mut O,
) -> Result<()>
where
    R: CourseRepository,
    I: BufRead,
    O: Write,
{
    match command {
        Command::Courses => show(service, Route::Home, &[], out),
        Command::Open { path, sort } => show(service, path.parse()?, &sort, out),
        Command::Course { action } => course(service, action, input, out),
        Command::Unit { action } => unit(service, action, input, out),
        Command::Topic { action } => topic(service, action, input, out),
    }
}

fn course<R: CourseRepository, I: BufRead, O: Write>(
    service: &StudyService<R>,
    action: CourseCommand,
    input: &mut I,
    out: &mut O,
) -> Result<()> {
    match action {
        CourseCommand::Add { name } => {
            let course = service.create_course(&name)?;
            writeln!(out, "Added course {} ({})", course.name, course.id)?;
        }
        CourseCommand::Show { course_id, sort } => {
            show(service, Route::Course { course_id }, &sort, out)?;
        }
        CourseCommand::Delete { course_id, yes } => {
            let Some(course) = service.repo().get_course(course_id)? else {
                writeln!(out, "Course {course_id} not found; nothing deleted.")?;
                return Ok(());
            };
            let question = format!(
                "Delete course \"{}\" with {} and {}?",
                course.name,
                render::count_label(course.units.len(), "unit", "units"),
                render::count_label(course.topic_count(), "topic", "topics")
            );
            if !confirm(input, out, &question, yes)? {
                writeln!(out, "Cancelled.")?;
                return Ok(());
            }
            service.delete_course(course_id)?;
            writeln!(out, "Deleted course {}", course.name)?;
        }
    }
    Ok(())
}

fn unit<R: CourseRepository, I: BufRead, O: Write>(
    service: &StudyService<R>,
    action: UnitCommand,
    input: &mut I,
    out: &mut O,
) -> Result<()> {
    match action {
        UnitCommand::Add { course_id, name } => {
            let unit = service.create_unit(course_id, &name)?;
            writeln!(
                out,
                "Added unit {}: {} ({})",
                unit.number, unit.name, unit.id
            )?;
        }
        UnitCommand::Show {
            course_id,
            unit_id,
            sort,
        } => show(service, Route::Unit { course_id, unit_id }, &sort, out)?,
        UnitCommand::Delete {
            course_id,
            unit_id,
            yes,
        } => {
            let Some(unit) = service.repo().get_unit(course_id, unit_id)? else {
                writeln!(out, "Unit {unit_id} not found; nothing deleted.")?;
                return Ok(());
            };
            let question = format!(
                "Delete unit \"{}\" with {}?",
                unit.name,
                render::count_label(unit.topics.len(), "topic", "topics")
            );
            if !confirm(input, out, &question, yes)? {
                writeln!(out, "Cancelled.")?;
                return Ok(());
            }
            service.delete_unit(course_id, unit_id)?;
            writeln!(out, "Deleted unit {}", unit.name)?;
        }
    }
    Ok(())
}

fn topic<R: CourseRepository, I: BufRead, O: Write>(
    service: &StudyService<R>,
    action: TopicCommand,
    input: &mut I,
    out: &mut O,
) -> Result<()> {
    match action {
        TopicCommand::Add {
            course_id,
            unit_id,
            name,
            due_date,
            description,
            level,
        } => {
            let draft = TopicDraft {
                name,
                due_date,
                description,
                knowledge_level: level,
            };
            let topic = service.create_topic(course_id, unit_id, draft)?;
            writeln!(out, "Added topic {} ({})", topic.name, topic.id)?;
        }
        TopicCommand::Show {
            course_id,
            unit_id,
            topic_id,
        } => {
            let route = Route::Topic {
                course_id,
                unit_id,
                topic_id,
            };
            show(service, route, &[], out)?;
        }
        TopicCommand::Level {
            course_id,
            unit_id,
            topic_id,
            level,
        } => {
            let topic = service.set_knowledge_level(course_id, unit_id, topic_id, level)?;
            writeln!(
                out,
                "{}: Knowledge Level {}",
                topic.name,
                render::stars(topic.knowledge_level)
            )?;
        }
        TopicCommand::Notes {
            course_id,
            unit_id,
            topic_id,
            text,
        } => {
            let topic = service.save_notes(course_id, unit_id, topic_id, &text)?;
            let status = if topic.has_notes() {
                "saved"
            } else {
                "cleared"
            };
            writeln!(out, "Notes {status} for {}", topic.name)?;
        }
        TopicCommand::Delete {
            course_id,
            unit_id,
            topic_id,
            yes,
        } => {
            let Some(topic) = service.repo().get_topic(course_id, unit_id, topic_id)? else {
                writeln!(out, "Topic {topic_id} not found; nothing deleted.")?;
                return Ok(());
            };
            let question = format!("Delete topic \"{}\"?", topic.name);
            if !confirm(input, out, &question, yes)? {
                writeln!(out, "Cancelled.")?;
                return Ok(());
            }
            service.delete_topic(course_id, unit_id, topic_id)?;
            writeln!(out, "Deleted topic {}", topic.name)?;
        }
    }
    Ok(())
}

fn show<R: CourseRepository, O: Write>(
    service: &StudyService<R>,
    requested: Route,
    sort: &[SortKeyArg],
    out: &mut O,
) -> Result<()> {
    let resolution = service.resolve(requested)?;
    if resolution.redirected {
        writeln!(
            out,
            "{requested} does not exist; showing {} instead.",
            resolution.route
        )?;
        writeln!(out)?;
    }
    let sort = SortState::from_selections(sort.iter().copied().map(SortKey::from));
    render::page(service.repo(), resolution.route, sort, out)
}
