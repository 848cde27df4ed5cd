//! HTTP request handlers for the Attendance & Leave Accounting Engine API.
//!
//! Handlers read the caller from the identity headers, call one engine
//! operation with the server's local clock on the blocking pool
//! ([`AppState::run`]), and map [`EngineError`]s to JSON error bodies.
//!
//! [`EngineError`]: crate::error::EngineError

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{
    AttendanceAdminRecord, AttendanceRecord, DashboardSummary, Employee, Holiday,
    LeaveApplication, LeaveBalance, LeaveRequest, User,
};

use super::report::{render_report_csv, report_filename};
use super::request::{
    AdminAttendanceQuery, CreateLoginRequest, EmployeeRequest, LeaveListQuery, MonthQuery,
    PunchQuery, ReportQuery, ReviewQuery, caller_from_headers,
};
use super::response::ApiErrorResponse;
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/attendance", get(list_attendance_handler))
        .route("/attendance/punch-in", post(punch_in_handler))
        .route("/attendance/punch-out", post(punch_out_handler))
        .route("/attendance/me", get(my_attendance_handler))
        .route("/attendance/me/today", get(my_today_handler))
        .route("/attendance/admin", get(admin_attendance_handler))
        .route("/attendance/admin/report.csv", get(attendance_report_handler))
        .route("/leaves", get(list_leaves_handler))
        .route("/leaves/holidays", get(holidays_handler))
        .route("/leaves/balance", get(balance_handler))
        .route("/leaves/history", get(history_handler))
        .route("/leaves/apply", post(apply_handler))
        .route("/leaves/:leave_id/cancel", post(cancel_handler))
        .route("/leaves/:leave_id/approve", post(approve_handler))
        .route("/leaves/:leave_id/reject", post(reject_handler))
        .route("/dashboard/summary", get(dashboard_handler))
        .route(
            "/employees",
            get(list_employees_handler).post(create_employee_handler),
        )
        .route("/employees/me", get(my_profile_handler))
        .route(
            "/employees/:employee_id",
            get(get_employee_handler)
                .put(update_employee_handler)
                .delete(delete_employee_handler),
        )
        .route("/employees/:employee_id/create-login", post(create_login_handler))
        .with_state(state)
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Logs the outcome under `correlation_id` and wraps the value as JSON.
fn respond<T: Serialize>(
    correlation_id: Uuid,
    operation: &'static str,
    result: EngineResult<T>,
) -> ApiResult<Json<T>> {
    match result {
        Ok(value) => {
            info!(correlation_id = %correlation_id, operation, "Request completed");
            Ok(Json(value))
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, operation, error = %err, "Request failed");
            Err(err.into())
        }
    }
}

// === Attendance ===

async fn punch_in_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<PunchQuery>, QueryRejection>,
) -> ApiResult<Json<AttendanceRecord>> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let Query(query) = query?;
    info!(correlation_id = %correlation_id, user_id = %caller.user_id, "Processing punch-in");

    let result = state
        .run(move |engine| engine.punch_in(&caller, query.employee_id.as_deref(), local_now()))
        .await;
    respond(correlation_id, "punch_in", result)
}

async fn punch_out_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<PunchQuery>, QueryRejection>,
) -> ApiResult<Json<AttendanceRecord>> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let Query(query) = query?;
    info!(correlation_id = %correlation_id, user_id = %caller.user_id, "Processing punch-out");

    let result = state
        .run(move |engine| engine.punch_out(&caller, query.employee_id.as_deref(), local_now()))
        .await;
    respond(correlation_id, "punch_out", result)
}

async fn my_today_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Option<AttendanceRecord>>> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let result = state
        .run(move |engine| engine.today_record(&caller, local_now()))
        .await;
    respond(correlation_id, "today_record", result)
}

async fn my_attendance_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<AttendanceRecord>>> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let Query(query) = query?;
    let result = state
        .run(move |engine| engine.month_records(&caller, &query.month))
        .await;
    respond(correlation_id, "month_records", result)
}

async fn list_attendance_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<PunchQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<AttendanceRecord>>> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let Query(query) = query?;
    let result = state
        .run(move |engine| engine.list_attendance(&caller, query.employee_id.as_deref()))
        .await;
    respond(correlation_id, "list_attendance", result)
}

async fn admin_attendance_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<AdminAttendanceQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<AttendanceAdminRecord>>> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let Query(filter) = query?;
    let result = state
        .run(move |engine| engine.admin_attendance(&caller, &filter))
        .await;
    respond(correlation_id, "admin_attendance", result)
}

async fn attendance_report_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let Query(query) = query?;
    let filename = report_filename(&query.month);

    let result = state
        .run(move |engine| {
            engine.attendance_report(
                &caller,
                &query.month,
                query.employee_id.as_deref(),
                query.department.as_deref(),
            )
        })
        .await;
    let Json(rows) = respond(correlation_id, "attendance_report", result)?;
    info!(correlation_id = %correlation_id, rows = rows.len(), "Attendance report rendered");

    let disposition = format!("attachment; filename=\"{}\"", filename);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        render_report_csv(&rows),
    )
        .into_response())
}

// === Leave ===

async fn holidays_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Holiday>>> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let result = state.run(move |engine| engine.holidays(&caller)).await;
    respond(correlation_id, "holidays", result)
}

async fn balance_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<LeaveBalance>>> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let result = state.run(move |engine| engine.balances(&caller)).await;
    respond(correlation_id, "balances", result)
}

async fn history_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<LeaveRequest>>> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let result = state.run(move |engine| engine.history(&caller)).await;
    respond(correlation_id, "history", result)
}

async fn list_leaves_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<LeaveListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<LeaveRequest>>> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let Query(query) = query?;
    let result = state
        .run(move |engine| engine.list_requests(&caller, query.status))
        .await;
    respond(correlation_id, "list_requests", result)
}

async fn apply_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<LeaveApplication>, JsonRejection>,
) -> ApiResult<Json<LeaveRequest>> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let Json(application) = payload.inspect_err(|rejection| {
        warn!(correlation_id = %correlation_id, error = %rejection, "Rejected leave application body");
    })?;
    info!(
        correlation_id = %correlation_id,
        user_id = %caller.user_id,
        leave_type = %application.leave_type,
        "Processing leave application"
    );

    let result = state
        .run(move |engine| engine.apply(&caller, application, local_now()))
        .await;
    respond(correlation_id, "apply", result)
}

async fn cancel_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(leave_id): Path<String>,
) -> ApiResult<Json<LeaveRequest>> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let result = state
        .run(move |engine| engine.cancel(&caller, &leave_id))
        .await;
    respond(correlation_id, "cancel", result)
}

async fn approve_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(leave_id): Path<String>,
    query: Result<Query<ReviewQuery>, QueryRejection>,
) -> ApiResult<Json<LeaveRequest>> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let Query(query) = query?;
    let result = state
        .run(move |engine| engine.approve(&caller, &leave_id, query.review_notes, local_now()))
        .await;
    respond(correlation_id, "approve", result)
}

async fn reject_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(leave_id): Path<String>,
    query: Result<Query<ReviewQuery>, QueryRejection>,
) -> ApiResult<Json<LeaveRequest>> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let Query(query) = query?;
    let result = state
        .run(move |engine| engine.reject(&caller, &leave_id, query.review_notes, local_now()))
        .await;
    respond(correlation_id, "reject", result)
}

// === Dashboard ===

async fn dashboard_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<DashboardSummary>> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let result = state
        .run(move |engine| engine.dashboard_summary(&caller, local_now()))
        .await;
    respond(correlation_id, "dashboard_summary", result)
}

// === Employees ===

async fn list_employees_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Employee>>> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let result = state.run(move |engine| engine.list_employees(&caller)).await;
    respond(correlation_id, "list_employees", result)
}

async fn my_profile_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Employee>> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let result = state.run(move |engine| engine.my_profile(&caller)).await;
    respond(correlation_id, "my_profile", result)
}

async fn get_employee_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(employee_id): Path<String>,
) -> ApiResult<Json<Employee>> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let result = state
        .run(move |engine| engine.get_employee(&caller, &employee_id))
        .await;
    respond(correlation_id, "get_employee", result)
}

async fn create_employee_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let Json(request) = payload?;
    let (input, joining_date) = request.into_input();

    let result = state
        .run(move |engine| engine.create_employee(&caller, input, joining_date))
        .await;
    respond(correlation_id, "create_employee", result).map(|body| (StatusCode::CREATED, body))
}

async fn update_employee_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(employee_id): Path<String>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let Json(request) = payload?;
    let (input, _) = request.into_input();

    let result = state
        .run(move |engine| engine.update_employee(&caller, &employee_id, input))
        .await;
    respond(correlation_id, "update_employee", result)
}

async fn delete_employee_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(employee_id): Path<String>,
) -> ApiResult<StatusCode> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let result = state
        .run(move |engine| engine.delete_employee(&caller, &employee_id))
        .await;
    respond(correlation_id, "delete_employee", result).map(|_| StatusCode::NO_CONTENT)
}

async fn create_login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(employee_id): Path<String>,
    payload: Result<Json<CreateLoginRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let correlation_id = Uuid::new_v4();
    let caller = caller_from_headers(&headers)?;
    let Json(request) = payload?;
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        role = %request.role,
        "Processing login creation"
    );

    let result = state
        .run(move |engine| engine.create_login(&caller, &employee_id, request.role))
        .await;
    respond(correlation_id, "create_login", result).map(|body| (StatusCode::CREATED, body))
}
