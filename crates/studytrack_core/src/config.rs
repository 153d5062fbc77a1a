//! Runtime configuration for the study tracker.
//!
//! # Responsibility
//! - Resolve data directory, storage backend and logging settings from
//!   caller-provided overrides with platform defaults.
//!
//! # Invariants
//! - Resolved `data_dir` and `log_dir` are absolute paths.

use crate::logging::default_log_level;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const APP_DIR_NAME: &str = "studytrack";
const FALLBACK_DIR_NAME: &str = ".studytrack";
const SQLITE_FILE_NAME: &str = "studytrack.sqlite3";
const JSON_FILE_NAME: &str = "courses.json";

/// Persistent backend used for the course snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Json,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unsupported storage backend `{other}`; expected sqlite|json"
            )),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Optional values supplied by flags or environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub backend: Option<StorageBackend>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub backend: StorageBackend,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Resolves overrides on top of defaults.
    pub fn resolve(overrides: ConfigOverrides) -> Self {
        let data_dir = overrides
            .data_dir
            .map(|dir| absolutize(&dir))
            .unwrap_or_else(default_data_dir);
        let log_dir = overrides
            .log_dir
            .map(|dir| absolutize(&dir))
            .unwrap_or_else(|| data_dir.join("logs"));

        Self {
            backend: overrides.backend.unwrap_or_default(),
            log_level: overrides
                .log_level
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir,
            data_dir,
        }
    }

    /// Path of the file backing the selected storage backend.
    pub fn store_path(&self) -> PathBuf {
        match self.backend {
            StorageBackend::Sqlite => self.data_dir.join(SQLITE_FILE_NAME),
            StorageBackend::Json => self.data_dir.join(JSON_FILE_NAME),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| absolutize(Path::new(FALLBACK_DIR_NAME)))
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
