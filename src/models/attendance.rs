//! Attendance record models.
//!
//! An [`AttendanceRecord`] is created on punch-in and closed once on punch-out.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EmployeeSummary;

/// Outcome recorded against a day's attendance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Employee was present.
    #[default]
    Present,
    /// Employee was absent.
    Absent,
    /// Employee worked part of the day.
    HalfDay,
    /// Employee arrived late.
    Late,
}

impl AttendanceStatus {
    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::HalfDay => "half_day",
            AttendanceStatus::Late => "late",
        }
    }
}

/// A single punch-in/punch-out pair for one employee.
///
/// # Example
///
/// ```
/// use attendance_engine::models::{AttendanceRecord, AttendanceStatus};
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let record = AttendanceRecord {
///     id: "att_1".to_string(),
///     employee_id: "emp_1".to_string(),
///     punch_in: NaiveDateTime::parse_from_str("2024-03-01 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
///     punch_out: Some(NaiveDateTime::parse_from_str("2024-03-01 17:30:00", "%Y-%m-%d %H:%M:%S").unwrap()),
///     status: AttendanceStatus::Present,
///     notes: None,
/// };
/// assert_eq!(record.worked_hours(), Some(Decimal::new(85, 1)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier for the record. Assigned by the store when empty.
    #[serde(default)]
    pub id: String,
    /// The employee who punched in.
    pub employee_id: String,
    /// Local timestamp of the punch-in.
    pub punch_in: NaiveDateTime,
    /// Local timestamp of the punch-out, unset while the record is open.
    #[serde(default)]
    pub punch_out: Option<NaiveDateTime>,
    /// Attendance outcome.
    #[serde(default)]
    pub status: AttendanceStatus,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl AttendanceRecord {
    /// Creates an open record punched in at `now`.
    pub fn open(employee_id: impl Into<String>, now: NaiveDateTime) -> Self {
        Self {
            id: String::new(),
            employee_id: employee_id.into(),
            punch_in: now,
            punch_out: None,
            status: AttendanceStatus::Present,
            notes: Some(String::new()),
        }
    }

    /// True when this record punched in on `day` and has not punched out.
    pub fn is_open_on(&self, day: NaiveDate) -> bool {
        self.punch_out.is_none() && self.punch_in.date() == day
    }

    /// Hours between punch-in and punch-out, clamped at zero and rounded to 2 dp.
    ///
    /// Returns `None` while the record is still open.
    pub fn worked_hours(&self) -> Option<Decimal> {
        let punch_out = self.punch_out?;
        let seconds = (punch_out - self.punch_in).num_seconds().max(0);
        Some((Decimal::from(seconds) / Decimal::from(3600)).round_dp(2))
    }
}

/// An attendance record enriched with the owning employee's directory summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceAdminRecord {
    /// The underlying record.
    #[serde(flatten)]
    pub record: AttendanceRecord,
    /// The employee the record belongs to.
    pub employee: EmployeeSummary,
}

/// Optional filters for admin attendance listings and reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceFilter {
    /// Month in `YYYY-MM` form.
    #[serde(default)]
    pub month: Option<String>,
    /// Restrict to one employee.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Restrict to one department.
    #[serde(default)]
    pub department: Option<String>,
}

/// One row of the monthly attendance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceReportRow {
    /// Employee identifier.
    pub employee_id: String,
    /// "First Last".
    pub employee_name: String,
    /// Contact email.
    pub email: String,
    /// Department.
    pub department: String,
    /// Job title.
    pub position: String,
    /// Calendar date of the punch-in.
    pub date: NaiveDate,
    /// Punch-in timestamp.
    pub punch_in: NaiveDateTime,
    /// Punch-out timestamp, if closed.
    pub punch_out: Option<NaiveDateTime>,
    /// Worked hours, if closed.
    pub worked_hours: Option<Decimal>,
    /// Attendance outcome.
    pub status: AttendanceStatus,
    /// Notes, empty when unset.
    pub notes: String,
}
