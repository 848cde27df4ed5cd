//! Record store contract and adapters.
//!
//! The engine reads and writes whole collections through [`RecordStore`].
//! Adapters only need to provide an atomic snapshot read ([`RecordStore::load`])
//! and an atomic read-modify-write ([`RecordStore::modify`]); the typed
//! operations (`get_all`, `get_by_id`, `find`, `add`, `update`, `delete`) are
//! built on top of those two and decode records into their entity types.
//!
//! # Example
//!
//! ```
//! use attendance_engine::models::Holiday;
//! use attendance_engine::store::{MemoryStore, RecordStore};
//! use chrono::NaiveDate;
//!
//! let store = MemoryStore::new();
//! let holiday = store
//!     .add(Holiday {
//!         id: String::new(),
//!         date: NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
//!         name: "Christmas".to_string(),
//!     })
//!     .unwrap();
//!
//! assert!(!holiday.id.is_empty());
//! assert_eq!(store.get_all::<Holiday>().unwrap().len(), 1);
//! ```

mod backend;
mod json_file;
mod memory;
mod record;

pub use backend::StoreBackend;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use record::{Collection, Record};

use serde_json::Value;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Errors surfaced by record store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Reading or writing the backing storage failed.
    #[error("I/O failure on '{path}': {message}")]
    Io {
        /// The file or resource involved.
        path: String,
        /// A description of the failure.
        message: String,
    },
    /// A record could not be converted to or from its stored form.
    #[error("Failed to encode record in '{collection}': {message}")]
    Encoding {
        /// The collection involved.
        collection: String,
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable keyed storage of records per collection.
pub trait RecordStore: Send + Sync {
    /// Returns a complete, consistent snapshot of a collection.
    fn load(&self, collection: Collection) -> StoreResult<Vec<Value>>;

    /// Runs `f` over the collection and persists the result as one write.
    ///
    /// Adapters hold their own lock for the whole call so concurrent
    /// modifications of the same collection never lose each other's writes.
    /// Nothing is written when `f` fails.
    fn modify<R, F>(&self, collection: Collection, f: F) -> StoreResult<R>
    where
        F: FnOnce(&mut Vec<Value>) -> StoreResult<R>;

    /// Returns every record of type `T`.
    ///
    /// Stored records that fail to decode (for example with an unparsable
    /// timestamp) are skipped with a warning.
    fn get_all<T: Record>(&self) -> StoreResult<Vec<T>> {
        let values = self.load(T::COLLECTION)?;
        let mut records = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value::<T>(value) {
                Ok(record) => records.push(record),
                Err(err) => warn!(
                    collection = %T::COLLECTION,
                    error = %err,
                    "Skipping undecodable record"
                ),
            }
        }
        Ok(records)
    }

    /// Returns the record with the given id, if present.
    fn get_by_id<T: Record>(&self, id: &str) -> StoreResult<Option<T>> {
        Ok(self.get_all::<T>()?.into_iter().find(|r| r.id() == id))
    }

    /// Returns the first record matching `predicate`.
    fn find<T: Record, P>(&self, predicate: P) -> StoreResult<Option<T>>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self.get_all::<T>()?.into_iter().find(|r| predicate(r)))
    }

    /// Appends a record, assigning a fresh UUID when its id is empty.
    fn add<T: Record>(&self, mut record: T) -> StoreResult<T> {
        if record.id().is_empty() {
            record.set_id(Uuid::new_v4().to_string());
        }
        let value = encode(&record)?;
        self.modify(T::COLLECTION, move |values| {
            values.push(value);
            Ok(())
        })?;
        Ok(record)
    }

    /// Applies `change` to the record with the given id and persists it.
    ///
    /// Returns `None` when no record has that id.
    fn update<T: Record, F>(&self, id: &str, change: F) -> StoreResult<Option<T>>
    where
        F: FnOnce(&mut T),
    {
        self.modify(T::COLLECTION, |values| {
            let Some(slot) = values.iter_mut().find(|v| value_id(v) == Some(id)) else {
                return Ok(None);
            };
            let mut record: T = decode(slot.clone())?;
            change(&mut record);
            *slot = encode(&record)?;
            Ok(Some(record))
        })
    }

    /// Removes the record with the given id. Returns whether one was removed.
    fn delete<T: Record>(&self, id: &str) -> StoreResult<bool> {
        self.modify(T::COLLECTION, |values| {
            let before = values.len();
            values.retain(|v| value_id(v) != Some(id));
            Ok(values.len() < before)
        })
    }
}

fn value_id(value: &Value) -> Option<&str> {
    value.get("id").and_then(Value::as_str)
}

fn encode<T: Record>(record: &T) -> StoreResult<Value> {
    serde_json::to_value(record).map_err(|e| StoreError::Encoding {
        collection: T::COLLECTION.to_string(),
        message: e.to_string(),
    })
}

fn decode<T: Record>(value: Value) -> StoreResult<T> {
    serde_json::from_value(value).map_err(|e| StoreError::Encoding {
        collection: T::COLLECTION.to_string(),
        message: e.to_string(),
    })
}
