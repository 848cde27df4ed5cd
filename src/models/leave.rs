//! Leave request, balance, and holiday models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The kind of paid leave being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Casual leave.
    Casual,
    /// Sick leave.
    Sick,
    /// Earned leave.
    Earned,
}

impl LeaveType {
    /// Every leave type, in the order balances are reported.
    pub const ALL: [LeaveType; 3] = [LeaveType::Casual, LeaveType::Sick, LeaveType::Earned];

    /// Returns the wire name of the leave type.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Casual => "casual",
            LeaveType::Sick => "sick",
            LeaveType::Earned => "earned",
        }
    }
}

impl std::fmt::Display for LeaveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LeaveType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "casual" => Ok(LeaveType::Casual),
            "sick" => Ok(LeaveType::Sick),
            "earned" => Ok(LeaveType::Earned),
            other => Err(EngineError::Validation {
                field: "leave_type".to_string(),
                message: format!("unknown leave type '{}'", other),
            }),
        }
    }
}

/// Lifecycle state of a leave request.
///
/// `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting review; counts against the balance.
    #[default]
    Pending,
    /// Approved; counts against the balance.
    Approved,
    /// Rejected by a reviewer.
    Rejected,
    /// Withdrawn by the requester.
    Cancelled,
}

impl LeaveStatus {
    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
            LeaveStatus::Cancelled => "cancelled",
        }
    }

    /// True for statuses whose days are reserved or consumed.
    pub fn holds_days(&self) -> bool {
        matches!(self, LeaveStatus::Pending | LeaveStatus::Approved)
    }
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A leave request and its review outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier for the request. Assigned by the store when empty.
    #[serde(default)]
    pub id: String,
    /// The employee taking leave.
    pub employee_id: String,
    /// The user who filed the request.
    pub user_id: String,
    /// Leave type.
    pub leave_type: LeaveType,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Working days in the range, fixed at application time.
    pub total_days: Decimal,
    /// Current lifecycle state.
    #[serde(default)]
    pub status: LeaveStatus,
    /// Reason given by the requester.
    #[serde(default)]
    pub reason: String,
    /// Attachment file name.
    #[serde(default)]
    pub attachment_name: Option<String>,
    /// Attachment payload, base64 encoded.
    #[serde(default)]
    pub attachment_base64: Option<String>,
    /// When the request was filed.
    pub applied_at: NaiveDateTime,
    /// Reviewer user id.
    #[serde(default)]
    pub reviewed_by: Option<String>,
    /// When the request was approved or rejected.
    #[serde(default)]
    pub reviewed_at: Option<NaiveDateTime>,
    /// Reviewer notes.
    #[serde(default)]
    pub review_notes: Option<String>,
}

impl LeaveRequest {
    /// True when `date` falls inside the closed range `[start_date, end_date]`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Input for filing a leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveApplication {
    /// Leave type.
    pub leave_type: LeaveType,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Reason for the leave.
    pub reason: String,
    /// Attachment file name.
    #[serde(default)]
    pub attachment_name: Option<String>,
    /// Attachment payload, base64 encoded.
    #[serde(default)]
    pub attachment_base64: Option<String>,
}

/// A stored per-employee allowance that replaces the policy default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveAllowance {
    /// Unique identifier. Assigned by the store when empty.
    #[serde(default)]
    pub id: String,
    /// The employee the allowance applies to.
    pub employee_id: String,
    /// Leave type.
    pub leave_type: LeaveType,
    /// Total days for the accounting period.
    pub total: Decimal,
}

/// Derived balance for one employee and leave type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// Leave type.
    pub leave_type: LeaveType,
    /// Total allowance.
    pub total: Decimal,
    /// Days held by pending or approved requests.
    pub used: Decimal,
    /// `max(0, total - used)`.
    pub remaining: Decimal,
}

/// A non-working calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// Unique identifier. Assigned by the store when empty.
    #[serde(default)]
    pub id: String,
    /// The holiday date.
    pub date: NaiveDate,
    /// Holiday name (e.g. "Independence Day").
    pub name: String,
}
