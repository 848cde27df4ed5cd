//! End-to-end tests for the Attendance & Leave Accounting Engine HTTP API.
//!
//! This test suite drives the router over a JSON file store and covers:
//! - Punch-in / punch-out cycle
//! - Leave balance accounting
//! - Date conflicts and lifecycle transitions
//! - Admin attendance listing and CSV report
//! - Dashboard summary
//! - Holiday seeding and persistence

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tempfile::TempDir;
use tower::ServiceExt;

use attendance_engine::api::{AppState, USER_ID_HEADER, USER_ROLE_HEADER, create_router};
use attendance_engine::config::ConfigLoader;
use attendance_engine::engine::Engine;
use attendance_engine::store::{JsonFileStore, StoreBackend};

// =============================================================================
// Test Helpers
// =============================================================================

struct TestApp {
    state: AppState,
    dir: TempDir,
}

impl TestApp {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let state = create_state(&dir);
        Self { state, dir }
    }

    fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// Hires an employee and creates their staff login through the API.
    /// Returns (user id, employee id).
    async fn hire(&self, first: &str, last: &str, department: &str) -> (String, String) {
        let employee = json!({
            "first_name": first,
            "last_name": last,
            "email": format!("{}@example.com", first.to_lowercase()),
            "phone": "555-0100",
            "position": "Associate",
            "department": department,
            "salary": "4200.00",
            "joining_date": "2023-01-02"
        });
        let (status, employee) = send(self.router(), "POST", "/employees", ADMIN, Some(employee)).await;
        assert_eq!(status, StatusCode::CREATED);
        let employee_id = employee["id"].as_str().unwrap().to_string();

        let uri = format!("/employees/{}/create-login", employee_id);
        let (status, user) = send(self.router(), "POST", &uri, ADMIN, Some(json!({"role": "staff"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        (user["id"].as_str().unwrap().to_string(), employee_id)
    }
}

fn create_state(dir: &TempDir) -> AppState {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    let holidays = config.holidays().to_vec();
    let store = JsonFileStore::open(dir.path()).unwrap();
    let engine = Engine::new(StoreBackend::from(store), config);
    engine.seed_holidays(&holidays).unwrap();
    AppState::new(engine)
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn dec_field(value: &Value) -> Decimal {
    match value {
        Value::String(s) => dec(s),
        other => dec(&other.to_string()),
    }
}

async fn send(
    router: Router,
    method: &str,
    uri: &str,
    (user_id, role): (&str, &str),
    body: Option<Value>,
) -> (StatusCode, Value) {
    let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
    let response = router
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(USER_ID_HEADER, user_id)
                .header(USER_ROLE_HEADER, role)
                .header("Content-Type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };
    (status, json)
}

fn staff(user_id: &str) -> (&str, &str) {
    (user_id, "staff")
}

const ADMIN: (&str, &str) = ("usr_admin", "admin");
const MANAGER: (&str, &str) = ("usr_manager", "manager");

fn application(leave_type: &str, start: &str, end: &str) -> Value {
    json!({
        "leave_type": leave_type,
        "start_date": start,
        "end_date": end,
        "reason": "Personal"
    })
}

fn remaining_for(balances: &Value, leave_type: &str) -> Decimal {
    let row = balances
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["leave_type"] == leave_type)
        .unwrap();
    dec_field(&row["remaining"])
}

// =============================================================================
// Attendance
// =============================================================================

#[tokio::test]
async fn test_punch_cycle() {
    let app = TestApp::new();
    let (user_id, employee_id) = app.hire("Erin", "Park", "Operations").await;

    let (status, record) = send(app.router(), "POST", "/attendance/punch-in", staff(&user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["employee_id"], employee_id.as_str());
    assert_eq!(record["status"], "present");
    assert!(record["punch_out"].is_null());

    let (status, today) = send(app.router(), "GET", "/attendance/me/today", staff(&user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(today["id"], record["id"]);

    let (status, closed) = send(app.router(), "POST", "/attendance/punch-out", staff(&user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closed["id"], record["id"]);
    assert!(!closed["punch_out"].is_null());

    let (status, error) = send(app.router(), "POST", "/attendance/punch-out", staff(&user_id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "NO_OPEN_PUNCH");
}

#[tokio::test]
async fn test_admin_punches_for_employee() {
    let app = TestApp::new();
    let (_, employee_id) = app.hire("Erin", "Park", "Operations").await;

    let uri = format!("/attendance/punch-in?employee_id={}", employee_id);
    let (status, record) = send(app.router(), "POST", &uri, ADMIN, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["employee_id"], employee_id.as_str());

    let (status, error) = send(app.router(), "POST", "/attendance/punch-in?employee_id=ghost", ADMIN, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_admin_listing_and_csv_report() {
    let app = TestApp::new();
    let (erin, _) = app.hire("Erin", "Park", "Operations").await;
    let (omar, _) = app.hire("Omar", "Diaz", "Finance").await;

    send(app.router(), "POST", "/attendance/punch-in", staff(&erin), None).await;
    send(app.router(), "POST", "/attendance/punch-in", staff(&omar), None).await;

    let (status, rows) = send(app.router(), "GET", "/attendance/admin", MANAGER, None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    // Sorted by last name: Diaz before Park
    assert_eq!(rows[0]["employee"]["last_name"], "Diaz");
    assert_eq!(rows[1]["employee"]["last_name"], "Park");

    let (_, finance) = send(app.router(), "GET", "/attendance/admin?department=Finance", MANAGER, None).await;
    assert_eq!(finance.as_array().unwrap().len(), 1);

    let month = chrono::Local::now().format("%Y-%m").to_string();
    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/attendance/admin/report.csv?month={}", month))
                .header(USER_ID_HEADER, ADMIN.0)
                .header(USER_ROLE_HEADER, ADMIN.1)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let csv = String::from_utf8(body.to_vec()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(csv.contains("Erin Park,erin@example.com,Operations,Associate"));
    assert!(csv.contains("Omar Diaz,omar@example.com,Finance,Associate"));
}

#[tokio::test]
async fn test_staff_cannot_use_admin_listing() {
    let app = TestApp::new();
    let (erin, _) = app.hire("Erin", "Park", "Operations").await;

    let (status, error) = send(app.router(), "GET", "/attendance/admin", staff(&erin), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error["code"], "FORBIDDEN");
}

// =============================================================================
// Leave
// =============================================================================

#[tokio::test]
async fn test_balance_scenario() {
    let app = TestApp::new();
    let (erin, _) = app.hire("Erin", "Park", "Operations").await;

    let (status, request) = send(
        app.router(),
        "POST",
        "/leaves/apply",
        staff(&erin),
        Some(application("casual", "2030-04-01", "2030-04-05")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(request["status"], "pending");
    assert_eq!(dec_field(&request["total_days"]), dec("5"));

    let (_, balances) = send(app.router(), "GET", "/leaves/balance", staff(&erin), None).await;
    assert_eq!(remaining_for(&balances, "casual"), dec("7"));
    assert_eq!(remaining_for(&balances, "sick"), dec("8"));
    assert_eq!(remaining_for(&balances, "earned"), dec("15"));

    let (status, error) = send(
        app.router(),
        "POST",
        "/leaves/apply",
        staff(&erin),
        Some(application("casual", "2030-04-15", "2030-04-24")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INSUFFICIENT_BALANCE");
}

#[tokio::test]
async fn test_conflict_scenario() {
    let app = TestApp::new();
    let (erin, _) = app.hire("Erin", "Park", "Operations").await;

    let (status, _) = send(
        app.router(),
        "POST",
        "/leaves/apply",
        staff(&erin),
        Some(application("casual", "2030-04-10", "2030-04-12")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, error) = send(
        app.router(),
        "POST",
        "/leaves/apply",
        staff(&erin),
        Some(application("sick", "2030-04-12", "2030-04-16")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "DATE_CONFLICT");
}

#[tokio::test]
async fn test_cancel_restores_balance() {
    let app = TestApp::new();
    let (erin, _) = app.hire("Erin", "Park", "Operations").await;

    let (_, request) = send(
        app.router(),
        "POST",
        "/leaves/apply",
        staff(&erin),
        Some(application("earned", "2030-04-01", "2030-04-05")),
    )
    .await;
    let leave_id = request["id"].as_str().unwrap().to_string();

    let (status, cancelled) = send(
        app.router(),
        "POST",
        &format!("/leaves/{}/cancel", leave_id),
        staff(&erin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (_, balances) = send(app.router(), "GET", "/leaves/balance", staff(&erin), None).await;
    assert_eq!(remaining_for(&balances, "earned"), dec("15"));
}

#[tokio::test]
async fn test_review_lifecycle() {
    let app = TestApp::new();
    let (erin, _) = app.hire("Erin", "Park", "Operations").await;
    let (omar, _) = app.hire("Omar", "Diaz", "Finance").await;

    let (_, request) = send(
        app.router(),
        "POST",
        "/leaves/apply",
        staff(&erin),
        Some(application("sick", "2030-04-01", "2030-04-02")),
    )
    .await;
    let leave_id = request["id"].as_str().unwrap().to_string();

    // Another employee's request is invisible to them.
    let (status, _) = send(
        app.router(),
        "POST",
        &format!("/leaves/{}/cancel", leave_id),
        staff(&omar),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Staff cannot approve.
    let (status, _) = send(
        app.router(),
        "POST",
        &format!("/leaves/{}/approve", leave_id),
        staff(&omar),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, approved) = send(
        app.router(),
        "POST",
        &format!("/leaves/{}/approve?review_notes=Get%20well", leave_id),
        MANAGER,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "approved");
    assert_eq!(approved["reviewed_by"], "usr_manager");
    assert_eq!(approved["review_notes"], "Get well");

    let (_, balances) = send(app.router(), "GET", "/leaves/balance", staff(&erin), None).await;
    assert_eq!(remaining_for(&balances, "sick"), dec("6"));

    let (status, error) = send(
        app.router(),
        "POST",
        &format!("/leaves/{}/cancel", leave_id),
        staff(&erin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_TRANSITION");

    let (_, history) = send(app.router(), "GET", "/leaves/history", staff(&erin), None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);

    let (_, pending) = send(app.router(), "GET", "/leaves?status=pending", ADMIN, None).await;
    assert!(pending.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_weekend_only_range_rejected() {
    let app = TestApp::new();
    let (erin, _) = app.hire("Erin", "Park", "Operations").await;

    // 2030-04-06 and 2030-04-07 fall on a weekend
    let (status, error) = send(
        app.router(),
        "POST",
        "/leaves/apply",
        staff(&erin),
        Some(application("casual", "2030-04-06", "2030-04-07")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "EMPTY_RANGE");

    let (status, error) = send(
        app.router(),
        "POST",
        "/leaves/apply",
        staff(&erin),
        Some(application("casual", "2030-04-12", "2030-04-10")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_RANGE");
}

#[tokio::test]
async fn test_holidays_seeded_from_config() {
    let app = TestApp::new();
    let (erin, _) = app.hire("Erin", "Park", "Operations").await;

    let (status, holidays) = send(app.router(), "GET", "/leaves/holidays", staff(&erin), None).await;
    assert_eq!(status, StatusCode::OK);
    let holidays = holidays.as_array().unwrap();
    assert_eq!(holidays.len(), 3);
    assert_eq!(holidays[0]["date"], "2026-01-01");
    assert_eq!(holidays[2]["name"], "Christmas Day");
}

// =============================================================================
// Dashboard & Directory
// =============================================================================

#[tokio::test]
async fn test_dashboard_summary() {
    let app = TestApp::new();
    let (erin, _) = app.hire("Erin", "Park", "Operations").await;
    app.hire("Omar", "Diaz", "Finance").await;

    send(app.router(), "POST", "/attendance/punch-in", staff(&erin), None).await;
    send(
        app.router(),
        "POST",
        "/leaves/apply",
        staff(&erin),
        Some(application("casual", "2030-04-01", "2030-04-01")),
    )
    .await;

    let (status, summary) = send(app.router(), "GET", "/dashboard/summary", ADMIN, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_employees"], 2);
    assert_eq!(summary["active_employees"], 2);
    assert_eq!(summary["present_today"], 1);
    assert_eq!(dec_field(&summary["attendance_rate_today"]), dec("50.00"));
    assert_eq!(summary["pending_leave_requests"], 1);
    assert_eq!(summary["on_leave_today"], 0);

    let feed = summary["recent_activity"].as_array().unwrap();
    assert_eq!(feed.len(), 2);
    let messages: Vec<&str> = feed.iter().map(|a| a["message"].as_str().unwrap()).collect();
    assert!(messages.contains(&"Erin Park punched in"));
    assert!(messages.contains(&"Erin Park applied for casual leave (2030-04-01 to 2030-04-01)"));

    let (_, again) = send(app.router(), "GET", "/dashboard/summary", ADMIN, None).await;
    assert_eq!(again["recent_activity"], summary["recent_activity"]);
}

#[tokio::test]
async fn test_employee_directory() {
    let app = TestApp::new();
    let body = json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "position": "Analyst",
        "department": "Research",
        "salary": "5200.00",
        "joining_date": "2024-02-01"
    });

    let (status, created) = send(app.router(), "POST", "/employees", ADMIN, Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let employee_id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["is_active"], true);

    let (status, error) = send(app.router(), "POST", "/employees", ADMIN, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");

    let (status, _) = send(
        app.router(),
        "POST",
        "/employees",
        MANAGER,
        Some(json!({
            "first_name": "Grace",
            "last_name": "Hopper",
            "email": "grace@example.com",
            "position": "Engineer",
            "department": "Research"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, fetched) = send(
        app.router(),
        "GET",
        &format!("/employees/{}", employee_id),
        MANAGER,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["joining_date"], "2024-02-01");

    let (status, _) = send(
        app.router(),
        "DELETE",
        &format!("/employees/{}", employee_id),
        ADMIN,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        app.router(),
        "GET",
        &format!("/employees/{}", employee_id),
        ADMIN,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_links_new_employee() {
    let app = TestApp::new();
    let body = json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "position": "Analyst",
        "department": "Research"
    });
    let (_, created) = send(app.router(), "POST", "/employees", ADMIN, Some(body)).await;
    let employee_id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["user_id"], Value::Null);

    // Without a login no staff identity maps to the profile.
    let (status, _) = send(app.router(), "POST", "/attendance/punch-in", staff("usr_ada"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/employees/{}/create-login", employee_id);
    let (status, user) = send(app.router(), "POST", &uri, ADMIN, Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["email"], "ada@example.com");
    assert_eq!(user["role"], "staff");
    let user_id = user["id"].as_str().unwrap().to_string();

    let (status, record) = send(app.router(), "POST", "/attendance/punch-in", staff(&user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["employee_id"], employee_id.as_str());

    let (status, profile) = send(app.router(), "GET", "/employees/me", staff(&user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["user_id"], user_id.as_str());

    let (status, error) = send(app.router(), "POST", &uri, ADMIN, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");

    let (status, _) = send(
        app.router(),
        "POST",
        "/employees/ghost/create-login",
        ADMIN,
        Some(json!({"role": "staff"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_records_persist_across_restart() {
    let app = TestApp::new();
    let (erin, _) = app.hire("Erin", "Park", "Operations").await;
    send(
        app.router(),
        "POST",
        "/leaves/apply",
        staff(&erin),
        Some(application("casual", "2030-04-01", "2030-04-02")),
    )
    .await;

    // A fresh engine over the same directory sees the request and does not
    // seed holidays twice.
    let restarted = create_router(create_state(&app.dir));
    let (_, history) = send(restarted.clone(), "GET", "/leaves/history", staff(&erin), None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);

    let (_, holidays) = send(restarted, "GET", "/leaves/holidays", staff(&erin), None).await;
    assert_eq!(holidays.as_array().unwrap().len(), 3);
}
