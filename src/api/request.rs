//! Request types for the Attendance & Leave Accounting Engine API.
//!
//! Query-string and JSON body structures for each endpoint, plus the
//! caller identity read from the trusted identity headers.

use axum::http::HeaderMap;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AttendanceFilter, Caller, EmployeeInput, LeaveStatus, Role};

use super::response::{ApiError, ApiErrorResponse};

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the authenticated user's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Reads the caller identity set by the upstream access-control layer.
///
/// Missing or unreadable headers yield `401`, an unknown role `403`.
pub fn caller_from_headers(headers: &HeaderMap) -> Result<Caller, ApiErrorResponse> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let user_id = header(USER_ID_HEADER).ok_or_else(|| {
        ApiErrorResponse::unauthenticated(format!("missing {} header", USER_ID_HEADER))
    })?;
    let role = header(USER_ROLE_HEADER).ok_or_else(|| {
        ApiErrorResponse::unauthenticated(format!("missing {} header", USER_ROLE_HEADER))
    })?;
    let role: Role = role.parse().map_err(|_| ApiErrorResponse {
        status: axum::http::StatusCode::FORBIDDEN,
        error: ApiError::new("FORBIDDEN", format!("unknown role '{}'", role)),
    })?;

    Ok(Caller::new(user_id, role))
}

/// Query for punch-in and punch-out; staff callers omit it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PunchQuery {
    /// Employee to punch for, required for non-staff callers.
    #[serde(default)]
    pub employee_id: Option<String>,
}

/// Query for `/attendance/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthQuery {
    /// Month in `YYYY-MM` form.
    pub month: String,
}

/// Query for `/attendance/admin`.
pub type AdminAttendanceQuery = AttendanceFilter;

/// Query for `/attendance/admin/report.csv`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportQuery {
    /// Month in `YYYY-MM` form.
    pub month: String,
    /// Restrict to one employee.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Restrict to one department.
    #[serde(default)]
    pub department: Option<String>,
}

/// Query for `/leaves`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaveListQuery {
    /// Restrict to one status.
    #[serde(default)]
    pub status: Option<LeaveStatus>,
}

/// Query for approve and reject.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewQuery {
    /// Reviewer notes stored on the request.
    #[serde(default)]
    pub review_notes: Option<String>,
}

/// Body for creating or updating an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email; unique across the directory.
    pub email: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: String,
    /// Job title.
    pub position: String,
    /// Department name.
    pub department: String,
    /// Salary.
    #[serde(default)]
    pub salary: Decimal,
    /// Joining date; defaults to today on create and is ignored on update.
    #[serde(default)]
    pub joining_date: Option<NaiveDate>,
}

impl EmployeeRequest {
    /// Splits the body into directory input and a joining date.
    pub fn into_input(self) -> (EmployeeInput, NaiveDate) {
        let joining_date = self
            .joining_date
            .unwrap_or_else(|| Local::now().date_naive());
        let input = EmployeeInput {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            position: self.position,
            department: self.department,
            salary: self.salary,
        };
        (input, joining_date)
    }
}

/// Body for creating a login linked to an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLoginRequest {
    /// Role granted to the new login.
    #[serde(default = "default_login_role")]
    pub role: Role,
}

fn default_login_role() -> Role {
    Role::Staff
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_caller_from_headers() {
        let caller = caller_from_headers(&headers(&[
            (USER_ID_HEADER, "usr_1"),
            (USER_ROLE_HEADER, "manager"),
        ]))
        .unwrap();
        assert_eq!(caller, Caller::new("usr_1", Role::Manager));
    }

    #[test]
    fn test_missing_identity_is_unauthenticated() {
        let err = caller_from_headers(&headers(&[(USER_ROLE_HEADER, "staff")])).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.error.code, "UNAUTHENTICATED");
    }

    #[test]
    fn test_unknown_role_is_forbidden() {
        let err = caller_from_headers(&headers(&[
            (USER_ID_HEADER, "usr_1"),
            (USER_ROLE_HEADER, "intern"),
        ]))
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_employee_request_defaults() {
        let body = r#"{
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "position": "Analyst",
            "department": "Research",
            "joining_date": "2024-02-01"
        }"#;
        let request: EmployeeRequest = serde_json::from_str(body).unwrap();
        let (input, joined) = request.into_input();

        assert_eq!(input.phone, "");
        assert_eq!(input.salary, Decimal::ZERO);
        assert_eq!(joined, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }

    #[test]
    fn test_create_login_defaults_to_staff() {
        let request: CreateLoginRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.role, Role::Staff);

        let request: CreateLoginRequest = serde_json::from_str(r#"{"role":"manager"}"#).unwrap();
        assert_eq!(request.role, Role::Manager);
    }
}
