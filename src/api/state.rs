//! Application state for the Attendance & Leave Accounting Engine API.

use std::sync::Arc;

use crate::engine::Engine;
use crate::error::{EngineError, EngineResult};
use crate::store::StoreBackend;

/// Shared application state.
///
/// Holds the engine behind an `Arc` so every handler shares one store and
/// one set of per-employee locks.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<Engine<StoreBackend>>,
}

impl AppState {
    /// Creates a new application state around `engine`.
    pub fn new(engine: Engine<StoreBackend>) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Returns the engine.
    pub fn engine(&self) -> &Engine<StoreBackend> {
        &self.engine
    }

    /// Runs a synchronous engine operation on the blocking thread pool.
    ///
    /// Engine operations take per-employee mutexes and may touch the
    /// filesystem, so they stay off the async worker threads.
    pub async fn run<T, F>(&self, operation: F) -> EngineResult<T>
    where
        F: FnOnce(&Engine<StoreBackend>) -> EngineResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let engine = Arc::clone(&self.engine);
        tokio::task::spawn_blocking(move || operation(&engine))
            .await
            .map_err(|e| EngineError::TaskFailed {
                message: format!("spawn_blocking failed: {e}"),
            })?
    }
}
