//! Record store backed by one JSON array file per collection.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::Value;
use tracing::{debug, warn};

use super::{Collection, RecordStore, StoreError, StoreResult};

/// Stores each collection as `<dir>/<collection>.json`.
///
/// A missing file reads as an empty collection. A file that does not contain
/// a JSON array is also read as empty (and logged), so one corrupt collection
/// does not take the whole service down.
///
/// # Example
///
/// ```no_run
/// use attendance_engine::store::JsonFileStore;
///
/// let store = JsonFileStore::open("./data")?;
/// # Ok::<(), attendance_engine::store::StoreError>(())
/// ```
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| StoreError::Io {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Returns the directory holding the collection files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_path(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.as_str()))
    }

    fn read_file(&self, collection: Collection) -> StoreResult<Vec<Value>> {
        let path = self.file_path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).map_err(|e| StoreError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        match serde_json::from_str::<Vec<Value>>(&content) {
            Ok(values) => Ok(values),
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "Collection file is not a JSON array; treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    fn write_file(&self, collection: Collection, values: &[Value]) -> StoreResult<()> {
        let path = self.file_path(collection);
        let io_error = |e: std::io::Error| StoreError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let content = serde_json::to_string_pretty(values).map_err(|e| StoreError::Encoding {
            collection: collection.to_string(),
            message: e.to_string(),
        })?;

        // Replace via rename so readers never observe a half-written file.
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, content).map_err(io_error)?;
        fs::rename(&tmp_path, &path).map_err(io_error)?;

        debug!(collection = %collection, records = values.len(), "Collection written");
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self, collection: Collection) -> StoreResult<Vec<Value>> {
        self.read_file(collection)
    }

    fn modify<R, F>(&self, collection: Collection, f: F) -> StoreResult<R>
    where
        F: FnOnce(&mut Vec<Value>) -> StoreResult<R>,
    {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut values = self.read_file(collection)?;
        let result = f(&mut values)?;
        self.write_file(collection, &values)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Holiday;
    use chrono::NaiveDate;

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = JsonFileStore::open(dir.path()).unwrap();
            store
                .add(Holiday {
                    id: "hol_1".to_string(),
                    date: NaiveDate::from_ymd_opt(2024, 8, 15).unwrap(),
                    name: "Independence Day".to_string(),
                })
                .unwrap();
        }

        let reopened = JsonFileStore::open(dir.path()).unwrap();
        let holidays: Vec<Holiday> = reopened.get_all().unwrap();
        assert_eq!(holidays.len(), 1);
        assert_eq!(holidays[0].name, "Independence Day");
        assert!(dir.path().join("holidays.json").exists());
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert!(store.load(Collection::LeaveRequests).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("employees.json"), "{ not json").unwrap();

        let store = JsonFileStore::open(dir.path()).unwrap();
        assert!(store.load(Collection::Employees).unwrap().is_empty());
    }

    #[test]
    fn test_open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        let store = JsonFileStore::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }
}
