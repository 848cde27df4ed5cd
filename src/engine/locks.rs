//! Per-employee serialization of read-validate-write operations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Hands out one mutex per key, normally an employee identifier.
///
/// `punch_in` checks for an open record and then appends; `apply` checks
/// overlap and balance and then appends. Both run inside
/// [`EmployeeLocks::with_lock`] so two requests for the same employee cannot
/// both pass validation before either write lands. Different employees never
/// contend. Directory writes use `email:<address>` keys to keep emails unique.
#[derive(Debug, Default)]
pub struct EmployeeLocks {
    slots: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl EmployeeLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` while holding the lock for `key`.
    pub fn with_lock<R, F>(&self, key: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key.to_string()).or_default())
        };
        let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }
}
