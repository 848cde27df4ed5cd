//! In-process record store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde_json::Value;

use super::{Collection, RecordStore, StoreResult};

/// Keeps every collection in memory behind a single reader-writer lock.
///
/// Used by tests and by deployments that do not need durability.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Value>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn load(&self, collection: Collection) -> StoreResult<Vec<Value>> {
        let guard = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(guard.get(&collection).cloned().unwrap_or_default())
    }

    fn modify<R, F>(&self, collection: Collection, f: F) -> StoreResult<R>
    where
        F: FnOnce(&mut Vec<Value>) -> StoreResult<R>,
    {
        let mut guard = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let mut working = guard.get(&collection).cloned().unwrap_or_default();
        let result = f(&mut working)?;
        guard.insert(collection, working);
        Ok(result)
    }
}
