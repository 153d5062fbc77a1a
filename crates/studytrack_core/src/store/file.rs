//! JSON file backend.

use crate::model::course::Course;
use crate::store::codec::{decode_courses, encode_courses};
use crate::store::{CourseStore, StoreError, StoreResult};
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stores the snapshot as a single JSON document on disk.
///
/// Writes land in a sibling `.tmp` file first and are renamed over the
/// target, so a crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CourseStore for JsonFileStore {
    fn read(&self) -> StoreResult<Vec<Course>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => decode_courses(&raw),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn write(&self, courses: &[Course]) -> StoreResult<()> {
        let encoded = encode_courses(courses)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);
        fs::write(&tmp_path, encoded.as_bytes()).map_err(|err| self.io_error(err))?;
        if let Err(err) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.io_error(err));
        }

        debug!(
            "event=store_write module=store status=ok backend=json bytes={}",
            encoded.len()
        );
        Ok(())
    }
}
