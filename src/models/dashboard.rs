//! Dashboard summary and activity feed models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EmployeeSummary;

/// Kind of event shown in the activity feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    /// An employee punched in.
    AttendancePunchIn,
    /// An employee punched out.
    AttendancePunchOut,
    /// A leave request was filed.
    LeaveApplied,
    /// A leave request was approved.
    LeaveApproved,
    /// A leave request was rejected.
    LeaveRejected,
}

impl ActivityType {
    /// Suffix used when building stable entry identifiers.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::AttendancePunchIn => "attendance_punch_in",
            ActivityType::AttendancePunchOut => "attendance_punch_out",
            ActivityType::LeaveApplied => "leave_applied",
            ActivityType::LeaveApproved => "leave_approved",
            ActivityType::LeaveRejected => "leave_rejected",
        }
    }
}

/// One entry in the dashboard activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardActivity {
    /// Stable identifier derived from the source record and event kind.
    pub id: String,
    /// Event kind.
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Human-readable description.
    pub message: String,
    /// When the event happened.
    pub timestamp: NaiveDateTime,
    /// The employee involved, when resolvable.
    pub employee: Option<EmployeeSummary>,
}

/// Organization-wide attendance and leave metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Every employee record.
    pub total_employees: usize,
    /// Employees with the active flag set.
    pub active_employees: usize,
    /// Distinct active employees who punched in today.
    pub present_today: usize,
    /// `present_today / active_employees * 100`, 2 dp, zero with no active employees.
    pub attendance_rate_today: Decimal,
    /// Pending leave requests across the organization.
    pub pending_leave_requests: usize,
    /// Distinct active employees covered by an approved request today.
    pub on_leave_today: usize,
    /// Most recent events, newest first.
    pub recent_activity: Vec<DashboardActivity>,
}
