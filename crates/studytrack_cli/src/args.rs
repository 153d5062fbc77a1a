//! CLI argument definitions for `studytrack`.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use studytrack_core::{ConfigOverrides, CourseId, SortKey, StorageBackend, TopicId, UnitId};

#[derive(Debug, Parser)]
#[command(
    name = "studytrack",
    version,
    about = "Track courses, units and topics you are studying"
)]
pub struct Cli {
    /// Directory holding the study database and logs.
    #[arg(long, global = true, env = "STUDYTRACK_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Storage backend for the course list.
    #[arg(long, global = true, env = "STUDYTRACK_BACKEND", value_enum)]
    pub backend: Option<BackendArg>,

    /// Log level written to the rolling log files.
    #[arg(long, global = true, env = "STUDYTRACK_LOG_LEVEL", value_enum)]
    pub log_level: Option<LogLevelArg>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            data_dir: self.data_dir.clone(),
            backend: self.backend.map(Into::into),
            log_level: self.log_level.map(|level| level.to_string()),
            log_dir: None,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum BackendArg {
    Sqlite,
    Json,
}

impl From<BackendArg> for StorageBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Sqlite => Self::Sqlite,
            BackendArg::Json => Self::Json,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        write!(f, "{as_str}")
    }
}

/// Topic list column; repeating a flag toggles its direction.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum SortKeyArg {
    UnitNumber,
    KnowledgeLevel,
    DueDate,
}

impl From<SortKeyArg> for SortKey {
    fn from(arg: SortKeyArg) -> Self {
        match arg {
            SortKeyArg::UnitNumber => Self::UnitNumber,
            SortKeyArg::KnowledgeLevel => Self::KnowledgeLevel,
            SortKeyArg::DueDate => Self::DueDate,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all courses.
    Courses,
    /// Add, show or delete a course.
    Course {
        #[command(subcommand)]
        action: CourseCommand,
    },
    /// Add, show or delete a unit.
    Unit {
        #[command(subcommand)]
        action: UnitCommand,
    },
    /// Add, show, edit or delete a topic.
    Topic {
        #[command(subcommand)]
        action: TopicCommand,
    },
    /// Open a page by path, e.g. `/courses/<id>/units/<id>`.
    ///
    /// Paths naming a missing course, unit or topic fall back to the
    /// nearest page that exists.
    Open {
        #[arg(value_name = "PATH")]
        path: String,
        #[arg(long, value_enum, value_name = "KEY")]
        sort: Vec<SortKeyArg>,
    },
}

#[derive(Debug, Subcommand)]
pub enum CourseCommand {
    Add {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Show a course with its units and all topics.
    Show {
        course_id: CourseId,
        /// Sort topics; give the same key twice for descending order.
        #[arg(long, value_enum, value_name = "KEY")]
        sort: Vec<SortKeyArg>,
    },
    /// Delete a course with all of its units and topics.
    Delete {
        course_id: CourseId,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum UnitCommand {
    Add {
        course_id: CourseId,
        #[arg(value_name = "NAME")]
        name: String,
    },
    Show {
        course_id: CourseId,
        unit_id: UnitId,
        #[arg(long, value_enum, value_name = "KEY")]
        sort: Vec<SortKeyArg>,
    },
    Delete {
        course_id: CourseId,
        unit_id: UnitId,
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum TopicCommand {
    Add {
        course_id: CourseId,
        unit_id: UnitId,
        #[arg(long)]
        name: String,
        /// Due date as YYYY-MM-DD.
        #[arg(long = "due", value_name = "DATE")]
        due_date: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Knowledge level from 0 to 5.
        #[arg(long, default_value_t = 0)]
        level: u8,
    },
    Show {
        course_id: CourseId,
        unit_id: UnitId,
        topic_id: TopicId,
    },
    /// Set the self-assessed knowledge level (0-5).
    Level {
        course_id: CourseId,
        unit_id: UnitId,
        topic_id: TopicId,
        level: u8,
    },
    /// Replace the topic's notes; an empty string clears them.
    Notes {
        course_id: CourseId,
        unit_id: UnitId,
        topic_id: TopicId,
        text: String,
    },
    Delete {
        course_id: CourseId,
        unit_id: UnitId,
        topic_id: TopicId,
        #[arg(long, short)]
        yes: bool,
    },
}
