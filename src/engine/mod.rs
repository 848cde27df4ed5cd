//! The Attendance & Leave Accounting Engine.
//!
//! Pure rules live in the calendar functions ([`working_days`],
//! [`ranges_overlap`]), the [`LeaveLedger`], and the dashboard fold
//! ([`summarize`]). The [`Engine`]
//! service wires those rules to a [`RecordStore`], checks the caller's role,
//! and serializes every read-validate-write per employee.

mod attendance;
mod calendar;
mod dashboard;
mod directory;
mod ledger;
mod lifecycle;
mod locks;

pub use attendance::find_open_record;
pub use calendar::{
    HolidaySet, day_bounds, holiday_set, is_weekend, month_bounds, ranges_overlap, working_days,
};
pub use dashboard::summarize;
pub use ledger::LeaveLedger;
pub use locks::EmployeeLocks;

use crate::config::ConfigLoader;
use crate::store::RecordStore;

/// Engine service bound to one record store and one policy.
///
/// Every public operation takes the authenticated [`Caller`](crate::models::Caller)
/// and, where time matters, the caller's local `now`. Operations are
/// synchronous and never hold a lock across an `.await`.
#[derive(Debug)]
pub struct Engine<S> {
    store: S,
    config: ConfigLoader,
    locks: EmployeeLocks,
}

impl<S: RecordStore> Engine<S> {
    /// Creates an engine over `store` using `config` for policy.
    pub fn new(store: S, config: ConfigLoader) -> Self {
        Self {
            store,
            config,
            locks: EmployeeLocks::new(),
        }
    }

    /// Returns the underlying record store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the loaded policy.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }
}
