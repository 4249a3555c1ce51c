// collabdoc-service/src/utils/record_store.rs
use crate::models::ServiceError;
use log::{debug, error};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A record that can be persisted in a [`RecordStore`].
pub trait Record: Serialize + DeserializeOwned {
    /// File-name-safe key the record is stored under.
    fn record_key(&self) -> String;
}

/// Directory of JSON files, one `<key>.json` per record.
///
/// The directory is created lazily on the first write, so a store over a
/// missing directory behaves as an empty collection.
pub struct RecordStore<T> {
    dir: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for RecordStore<T> {
    fn clone(&self) -> Self {
        Self {
            dir: self.dir.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Record> RecordStore<T> {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            _marker: PhantomData,
        }
    }

    #[cfg(test)]
    fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn ensure_dir(&self) -> Result<(), ServiceError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            error!("Failed to create record directory {:?}: {:?}", self.dir, e);
            ServiceError::InternalServerError
        })
    }

    // Serializes the record into a uniquely named temp file next to its target
    fn write_temp(&self, record: &T) -> Result<PathBuf, ServiceError> {
        self.ensure_dir()?;

        let json = serde_json::to_string_pretty(record).map_err(|e| {
            error!("Failed to serialize record: {:?}", e);
            ServiceError::InternalServerError
        })?;

        let temp_path = self.dir.join(format!(".{}.tmp", Uuid::new_v4()));
        fs::write(&temp_path, json).map_err(|e| {
            error!("Failed to write temp record {:?}: {:?}", temp_path, e);
            ServiceError::InternalServerError
        })?;

        Ok(temp_path)
    }

    /// Writes the record, replacing any existing record with the same key.
    pub fn save(&self, record: &T) -> Result<(), ServiceError> {
        let key = record.record_key();
        let temp_path = self.write_temp(record)?;
        let path = self.record_path(&key);
        debug!("Saving record {} to {:?}", key, path);

        fs::rename(&temp_path, &path).map_err(|e| {
            error!("Failed to move record into place {:?}: {:?}", path, e);
            let _ = fs::remove_file(&temp_path);
            ServiceError::InternalServerError
        })
    }

    /// Writes the record only if no record with the same key exists.
    ///
    /// Returns `Ok(false)` when the key is taken. The check and the insert are a
    /// single filesystem operation (hard link creation fails on an existing
    /// target), so concurrent callers racing on one key see exactly one winner.
    pub fn insert_new(&self, record: &T) -> Result<bool, ServiceError> {
        let key = record.record_key();
        let temp_path = self.write_temp(record)?;
        let path = self.record_path(&key);

        let linked = fs::hard_link(&temp_path, &path);
        let _ = fs::remove_file(&temp_path);

        match linked {
            Ok(()) => {
                debug!("Inserted record {} at {:?}", key, path);
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!("Record {} already exists", key);
                Ok(false)
            }
            Err(e) => {
                error!("Failed to insert record {:?}: {:?}", path, e);
                Err(ServiceError::InternalServerError)
            }
        }
    }

    pub fn find(&self, key: &str) -> Result<Option<T>, ServiceError> {
        let path = self.record_path(key);

        match fs::read_to_string(&path) {
            Ok(content) => parse_record(&path, &content).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                error!("Failed to read record {:?}: {:?}", path, e);
                Err(ServiceError::InternalServerError)
            }
        }
    }

    pub fn list(&self) -> Result<Vec<T>, ServiceError> {
        self.list_where(|_| true)
    }

    /// Linear scan over every record, keeping those matching `predicate`.
    pub fn list_where<F>(&self, predicate: F) -> Result<Vec<T>, ServiceError>
    where
        F: Fn(&T) -> bool,
    {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                error!("Failed to read record directory {:?}: {:?}", self.dir, e);
                return Err(ServiceError::InternalServerError);
            }
        };

        let mut records = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| {
                error!("Failed to read directory entry: {:?}", e);
                ServiceError::InternalServerError
            })?;
            let path = entry.path();

            if !path.is_file() || path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                // Deleted between read_dir and read
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    error!("Failed to read record {:?}: {:?}", path, e);
                    return Err(ServiceError::InternalServerError);
                }
            };

            let record = parse_record(&path, &content)?;
            if predicate(&record) {
                records.push(record);
            }
        }

        Ok(records)
    }

    /// Removes the record with `key`. Returns whether a record was removed.
    pub fn delete(&self, key: &str) -> Result<bool, ServiceError> {
        let path = self.record_path(key);

        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Deleted record {:?}", path);
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => {
                error!("Failed to delete record {:?}: {:?}", path, e);
                Err(ServiceError::InternalServerError)
            }
        }
    }

    /// Removes the whole collection directory.
    pub fn clear(&self) -> Result<(), ServiceError> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!("Failed to remove record directory {:?}: {:?}", self.dir, e);
                Err(ServiceError::InternalServerError)
            }
        }
    }
}

fn parse_record<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T, ServiceError> {
    serde_json::from_str(content).map_err(|e| {
        error!("Failed to parse record {:?}: {:?}", path, e);
        ServiceError::InternalServerError
    })
}
