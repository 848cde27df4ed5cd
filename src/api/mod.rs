//! HTTP API module for the Attendance & Leave Accounting Engine.
//!
//! Exposes attendance, leave, dashboard, and employee directory endpoints
//! over an [`Engine`](crate::engine::Engine) shared through [`AppState`].

mod handlers;
mod report;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use report::{REPORT_COLUMNS, render_report_csv, report_filename};
pub use request::{
    AdminAttendanceQuery, CreateLoginRequest, EmployeeRequest, LeaveListQuery, MonthQuery,
    PunchQuery, ReportQuery, ReviewQuery, USER_ID_HEADER, USER_ROLE_HEADER, caller_from_headers,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
