//! Typed records and the collections they live in.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::models::{AttendanceRecord, Employee, Holiday, LeaveAllowance, LeaveRequest, User};

/// A named collection in the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Employee directory.
    Employees,
    /// Login accounts.
    Users,
    /// Punch-in/punch-out records.
    AttendanceRecords,
    /// Leave requests.
    LeaveRequests,
    /// Per-employee allowance overrides.
    LeaveBalances,
    /// Holiday calendar.
    Holidays,
}

impl Collection {
    /// Returns the collection's storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Employees => "employees",
            Collection::Users => "users",
            Collection::AttendanceRecords => "attendance_records",
            Collection::LeaveRequests => "leave_requests",
            Collection::LeaveBalances => "leave_balances",
            Collection::Holidays => "holidays",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity type persisted in exactly one collection.
///
/// Records are converted to and from JSON only at the store boundary.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// The collection holding records of this type.
    const COLLECTION: Collection;

    /// The record's identifier; empty until the store assigns one.
    fn id(&self) -> &str;

    /// Replaces the record's identifier.
    fn set_id(&mut self, id: String);
}

macro_rules! impl_record {
    ($ty:ty, $collection:expr) => {
        impl Record for $ty {
            const COLLECTION: Collection = $collection;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        }
    };
}

impl_record!(Employee, Collection::Employees);
impl_record!(User, Collection::Users);
impl_record!(AttendanceRecord, Collection::AttendanceRecords);
impl_record!(LeaveRequest, Collection::LeaveRequests);
impl_record!(LeaveAllowance, Collection::LeaveBalances);
impl_record!(Holiday, Collection::Holidays);
