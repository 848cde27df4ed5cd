//! Dashboard aggregator: organization metrics and the recent activity feed.
//!
//! [`summarize`] is a pure fold over snapshots of the employee, attendance,
//! and leave collections. Activity identifiers are derived from the source
//! record so repeated calls over the same data return identical summaries.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::debug;

use super::Engine;
use super::calendar::day_bounds;
use crate::error::EngineResult;
use crate::models::{
    ActivityType, AttendanceRecord, Caller, DashboardActivity, DashboardSummary, Employee,
    LeaveRequest, LeaveStatus, Role,
};
use crate::store::RecordStore;

/// Builds the dashboard summary as of `now`.
///
/// Only active, known employees count towards `present_today` and
/// `on_leave_today`. The activity feed holds at most `limit` entries,
/// newest first.
///
/// # Example
///
/// ```
/// use attendance_engine::engine::summarize;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let now = NaiveDateTime::parse_from_str("2024-03-01 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let summary = summarize(&[], &[], &[], now, 10);
///
/// assert_eq!(summary.total_employees, 0);
/// assert_eq!(summary.attendance_rate_today, Decimal::ZERO);
/// assert!(summary.recent_activity.is_empty());
/// ```
pub fn summarize(
    employees: &[Employee],
    attendance: &[AttendanceRecord],
    leaves: &[LeaveRequest],
    now: NaiveDateTime,
    limit: usize,
) -> DashboardSummary {
    let today = now.date();
    let (day_start, day_end) = day_bounds(today);
    let directory: HashMap<&str, &Employee> =
        employees.iter().map(|e| (e.id.as_str(), e)).collect();
    let is_active = |id: &str| directory.get(id).is_some_and(|e| e.is_active);

    let active_employees = employees.iter().filter(|e| e.is_active).count();

    let present_today = attendance
        .iter()
        .filter(|r| day_start <= r.punch_in && r.punch_in < day_end)
        .map(|r| r.employee_id.as_str())
        .filter(|id| is_active(id))
        .collect::<HashSet<_>>()
        .len();

    let on_leave_today = leaves
        .iter()
        .filter(|r| r.status == LeaveStatus::Approved && r.covers(today))
        .map(|r| r.employee_id.as_str())
        .filter(|id| is_active(id))
        .collect::<HashSet<_>>()
        .len();

    let mut attendance_rate_today = if active_employees == 0 {
        Decimal::ZERO
    } else {
        (Decimal::from(present_today) * Decimal::ONE_HUNDRED / Decimal::from(active_employees))
            .round_dp(2)
    };
    attendance_rate_today.rescale(2);

    let pending_leave_requests = leaves
        .iter()
        .filter(|r| r.status == LeaveStatus::Pending)
        .count();

    DashboardSummary {
        total_employees: employees.len(),
        active_employees,
        present_today,
        attendance_rate_today,
        pending_leave_requests,
        on_leave_today,
        recent_activity: recent_activity(&directory, attendance, leaves, limit),
    }
}

fn recent_activity(
    directory: &HashMap<&str, &Employee>,
    attendance: &[AttendanceRecord],
    leaves: &[LeaveRequest],
    limit: usize,
) -> Vec<DashboardActivity> {
    let entry = |record_id: &str,
                 employee_id: &str,
                 activity_type: ActivityType,
                 timestamp: NaiveDateTime,
                 describe: &dyn Fn(&str) -> String| {
        let employee = directory.get(employee_id);
        let name = employee
            .map(|e| e.full_name())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Employee".to_string());
        DashboardActivity {
            id: format!("{}:{}", record_id, activity_type.as_str()),
            activity_type,
            message: describe(&name),
            timestamp,
            employee: employee.map(|e| e.summary()),
        }
    };

    let mut feed = Vec::new();
    for record in attendance {
        feed.push(entry(
            &record.id,
            &record.employee_id,
            ActivityType::AttendancePunchIn,
            record.punch_in,
            &|name| format!("{} punched in", name),
        ));
        if let Some(punch_out) = record.punch_out {
            feed.push(entry(
                &record.id,
                &record.employee_id,
                ActivityType::AttendancePunchOut,
                punch_out,
                &|name| format!("{} punched out", name),
            ));
        }
    }

    for request in leaves {
        feed.push(entry(
            &request.id,
            &request.employee_id,
            ActivityType::LeaveApplied,
            request.applied_at,
            &|name| {
                format!(
                    "{} applied for {} leave ({} to {})",
                    name, request.leave_type, request.start_date, request.end_date
                )
            },
        ));

        let reviewed = match request.status {
            LeaveStatus::Approved => Some(ActivityType::LeaveApproved),
            LeaveStatus::Rejected => Some(ActivityType::LeaveRejected),
            _ => None,
        };
        if let Some(activity_type) = reviewed {
            feed.push(entry(
                &request.id,
                &request.employee_id,
                activity_type,
                request.reviewed_at.unwrap_or(request.applied_at),
                &|name| format!("{} leave request {}", name, request.status),
            ));
        }
    }

    feed.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
    feed.truncate(limit);
    feed
}

impl<S: RecordStore> Engine<S> {
    /// Dashboard summary for reviewers, as of `now`.
    pub fn dashboard_summary(
        &self,
        caller: &Caller,
        now: NaiveDateTime,
    ) -> EngineResult<DashboardSummary> {
        caller.require(Role::REVIEWERS, "view the dashboard")?;

        let employees: Vec<Employee> = self.store.get_all()?;
        let attendance: Vec<AttendanceRecord> = self.store.get_all()?;
        let leaves: Vec<LeaveRequest> = self.store.get_all()?;

        let summary = summarize(
            &employees,
            &attendance,
            &leaves,
            now,
            self.config.recent_activity_limit(),
        );
        debug!(
            present_today = summary.present_today,
            on_leave_today = summary.on_leave_today,
            "Dashboard summary built"
        );
        Ok(summary)
    }
}
