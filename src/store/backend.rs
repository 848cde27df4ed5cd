//! Runtime choice between the bundled store adapters.

use serde_json::Value;

use super::{Collection, JsonFileStore, MemoryStore, RecordStore, StoreResult};

/// One of the bundled adapters, selected at startup.
#[derive(Debug)]
pub enum StoreBackend {
    /// Volatile in-process storage.
    Memory(MemoryStore),
    /// JSON files on local disk.
    JsonFile(JsonFileStore),
}

impl From<MemoryStore> for StoreBackend {
    fn from(store: MemoryStore) -> Self {
        StoreBackend::Memory(store)
    }
}

impl From<JsonFileStore> for StoreBackend {
    fn from(store: JsonFileStore) -> Self {
        StoreBackend::JsonFile(store)
    }
}

impl RecordStore for StoreBackend {
    fn load(&self, collection: Collection) -> StoreResult<Vec<Value>> {
        match self {
            StoreBackend::Memory(store) => store.load(collection),
            StoreBackend::JsonFile(store) => store.load(collection),
        }
    }

    fn modify<R, F>(&self, collection: Collection, f: F) -> StoreResult<R>
    where
        F: FnOnce(&mut Vec<Value>) -> StoreResult<R>,
    {
        match self {
            StoreBackend::Memory(store) => store.modify(collection, f),
            StoreBackend::JsonFile(store) => store.modify(collection, f),
        }
    }
}
