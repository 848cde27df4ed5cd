//! Configuration types for the engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::LeaveType;

/// Default allowance per leave type, used when an employee has no override.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeaveDefaults {
    /// Casual leave days per period.
    pub casual: Decimal,
    /// Sick leave days per period.
    pub sick: Decimal,
    /// Earned leave days per period.
    pub earned: Decimal,
}

impl Default for LeaveDefaults {
    fn default() -> Self {
        Self {
            casual: Decimal::new(12, 0),
            sick: Decimal::new(8, 0),
            earned: Decimal::new(15, 0),
        }
    }
}

impl LeaveDefaults {
    /// Returns the default allowance for `leave_type`.
    pub fn for_type(&self, leave_type: LeaveType) -> Decimal {
        match leave_type {
            LeaveType::Casual => self.casual,
            LeaveType::Sick => self.sick,
            LeaveType::Earned => self.earned,
        }
    }
}

/// Leave policy section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LeavePolicy {
    /// Default allowances.
    #[serde(default)]
    pub defaults: LeaveDefaults,
}

/// Dashboard section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DashboardPolicy {
    /// Number of entries kept in the activity feed.
    pub recent_activity_limit: usize,
}

impl Default for DashboardPolicy {
    fn default() -> Self {
        Self {
            recent_activity_limit: 10,
        }
    }
}

/// Policy configuration from policy.yaml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Leave policy.
    #[serde(default)]
    pub leave: LeavePolicy,
    /// Dashboard policy.
    #[serde(default)]
    pub dashboard: DashboardPolicy,
}

/// A holiday entry in holidays.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HolidaySeed {
    /// The holiday date.
    pub date: NaiveDate,
    /// The holiday name.
    pub name: String,
}

/// Holiday calendar file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HolidayCalendar {
    /// Holidays to seed into the store.
    #[serde(default)]
    pub holidays: Vec<HolidaySeed>,
}
