//! Attendance tracker: punch-in/punch-out transitions and attendance queries.
//!
//! Per employee and day the state runs `NoPunch -> Open -> Closed`. A record
//! is open when its punch-in falls on the given local day and it has no
//! punch-out yet.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use super::Engine;
use super::calendar::{day_bounds, month_bounds};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceAdminRecord, AttendanceFilter, AttendanceRecord, AttendanceReportRow, Caller,
    Employee, Role,
};
use crate::store::RecordStore;

/// Returns the employee's open record for `day`, if any.
///
/// # Example
///
/// ```
/// use attendance_engine::engine::find_open_record;
/// use attendance_engine::models::AttendanceRecord;
/// use chrono::NaiveDateTime;
///
/// let now = NaiveDateTime::parse_from_str("2024-03-01 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let records = vec![AttendanceRecord::open("emp_1", now)];
///
/// assert!(find_open_record(&records, "emp_1", now.date()).is_some());
/// assert!(find_open_record(&records, "emp_2", now.date()).is_none());
/// ```
pub fn find_open_record<'a>(
    records: &'a [AttendanceRecord],
    employee_id: &str,
    day: NaiveDate,
) -> Option<&'a AttendanceRecord> {
    records
        .iter()
        .find(|r| r.employee_id == employee_id && r.is_open_on(day))
}

/// Half-open `[start, end)` punch-in window, or everything when `None`.
type Window = Option<(NaiveDateTime, NaiveDateTime)>;

fn in_window(punch_in: NaiveDateTime, window: Window) -> bool {
    window.is_none_or(|(start, end)| start <= punch_in && punch_in < end)
}

impl<S: RecordStore> Engine<S> {
    /// Opens an attendance record for today.
    ///
    /// Staff punch themselves in; other roles must name the employee.
    ///
    /// # Errors
    ///
    /// - [`EngineError::AlreadyOpen`] if an open record exists for `now`'s day
    /// - [`EngineError::NotFound`] if the employee cannot be resolved
    pub fn punch_in(
        &self,
        caller: &Caller,
        employee_id: Option<&str>,
        now: NaiveDateTime,
    ) -> EngineResult<AttendanceRecord> {
        caller.require(Role::ALL, "punch in")?;
        let employee = self.target_employee(caller, employee_id)?;

        self.locks.with_lock(&employee.id, || -> EngineResult<_> {
            let records: Vec<AttendanceRecord> = self.store.get_all()?;
            if find_open_record(&records, &employee.id, now.date()).is_some() {
                return Err(EngineError::AlreadyOpen {
                    employee_id: employee.id.clone(),
                });
            }

            let record = self.store.add(AttendanceRecord::open(&employee.id, now))?;
            info!(employee_id = %employee.id, record_id = %record.id, "Punched in");
            Ok(record)
        })
    }

    /// Closes today's open attendance record.
    ///
    /// The punch-out is never earlier than the punch-in, so worked time is
    /// never negative.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NoOpenPunch`] if there is no open record for `now`'s day
    pub fn punch_out(
        &self,
        caller: &Caller,
        employee_id: Option<&str>,
        now: NaiveDateTime,
    ) -> EngineResult<AttendanceRecord> {
        caller.require(Role::ALL, "punch out")?;
        let employee = self.target_employee(caller, employee_id)?;

        self.locks.with_lock(&employee.id, || -> EngineResult<_> {
            let records: Vec<AttendanceRecord> = self.store.get_all()?;
            let open = find_open_record(&records, &employee.id, now.date()).ok_or_else(|| {
                EngineError::NoOpenPunch {
                    employee_id: employee.id.clone(),
                }
            })?;

            let punch_out = now.max(open.punch_in);
            let record = self
                .store
                .update::<AttendanceRecord, _>(&open.id, |r| r.punch_out = Some(punch_out))?
                .ok_or_else(|| EngineError::NotFound {
                    entity: "Attendance record",
                    id: open.id.clone(),
                })?;

            info!(
                employee_id = %employee.id,
                record_id = %record.id,
                worked_hours = ?record.worked_hours(),
                "Punched out"
            );
            Ok(record)
        })
    }

    /// Returns the caller's most recent record punched in today, if any.
    pub fn today_record(
        &self,
        caller: &Caller,
        now: NaiveDateTime,
    ) -> EngineResult<Option<AttendanceRecord>> {
        caller.require(&[Role::Staff], "view own attendance")?;
        let employee = self.employee_for_user(&caller.user_id)?;
        let today = Some(day_bounds(now.date()));

        let records: Vec<AttendanceRecord> = self.store.get_all()?;
        Ok(records
            .into_iter()
            .filter(|r| r.employee_id == employee.id && in_window(r.punch_in, today))
            .max_by_key(|r| r.punch_in))
    }

    /// Returns the caller's records punched in during `month` (`YYYY-MM`).
    pub fn month_records(
        &self,
        caller: &Caller,
        month: &str,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        caller.require(&[Role::Staff], "view own attendance")?;
        let employee = self.employee_for_user(&caller.user_id)?;
        let window = Some(month_bounds(month)?);

        let mut records: Vec<AttendanceRecord> = self
            .store
            .get_all::<AttendanceRecord>()?
            .into_iter()
            .filter(|r| r.employee_id == employee.id && in_window(r.punch_in, window))
            .collect();
        records.sort_by_key(|r| r.punch_in);
        Ok(records)
    }

    /// Lists attendance records, optionally for one employee.
    ///
    /// Staff only ever see their own records.
    pub fn list_attendance(
        &self,
        caller: &Caller,
        employee_id: Option<&str>,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        caller.require(Role::ALL, "list attendance")?;
        let scope = if caller.is_staff() {
            Some(self.employee_for_user(&caller.user_id)?.id)
        } else {
            employee_id.map(str::to_string)
        };

        Ok(self
            .store
            .get_all::<AttendanceRecord>()?
            .into_iter()
            .filter(|r| scope.as_deref().is_none_or(|id| r.employee_id == id))
            .collect())
    }

    /// Admin listing filtered by month, employee, and department.
    ///
    /// Records whose employee is no longer in the directory are skipped.
    /// Results are ordered by last name, first name, then punch-in.
    pub fn admin_attendance(
        &self,
        caller: &Caller,
        filter: &AttendanceFilter,
    ) -> EngineResult<Vec<AttendanceAdminRecord>> {
        caller.require(Role::REVIEWERS, "list all attendance")?;
        let window = filter.month.as_deref().map(month_bounds).transpose()?;

        let mut rows: Vec<AttendanceAdminRecord> = self
            .filtered_records(filter, window)?
            .into_iter()
            .map(|(record, employee)| AttendanceAdminRecord {
                record,
                employee: employee.summary(),
            })
            .collect();

        rows.sort_by(|a, b| {
            (&a.employee.last_name, &a.employee.first_name, a.record.punch_in).cmp(&(
                &b.employee.last_name,
                &b.employee.first_name,
                b.record.punch_in,
            ))
        });
        debug!(rows = rows.len(), "Admin attendance listing built");
        Ok(rows)
    }

    /// Builds the monthly attendance report rows.
    ///
    /// Rows keep store order; rendering (e.g. CSV) is left to the caller.
    pub fn attendance_report(
        &self,
        caller: &Caller,
        month: &str,
        employee_id: Option<&str>,
        department: Option<&str>,
    ) -> EngineResult<Vec<AttendanceReportRow>> {
        caller.require(Role::REVIEWERS, "download attendance reports")?;
        let filter = AttendanceFilter {
            month: Some(month.to_string()),
            employee_id: employee_id.map(str::to_string),
            department: department.map(str::to_string),
        };
        let window = Some(month_bounds(month)?);

        Ok(self
            .filtered_records(&filter, window)?
            .into_iter()
            .map(|(record, employee)| AttendanceReportRow {
                employee_id: record.employee_id.clone(),
                employee_name: employee.full_name(),
                email: employee.email.clone(),
                department: employee.department.clone(),
                position: employee.position.clone(),
                date: record.punch_in.date(),
                punch_in: record.punch_in,
                punch_out: record.punch_out,
                worked_hours: record.worked_hours(),
                status: record.status,
                notes: record.notes.clone().unwrap_or_default(),
            })
            .collect())
    }

    fn filtered_records(
        &self,
        filter: &AttendanceFilter,
        window: Window,
    ) -> EngineResult<Vec<(AttendanceRecord, Employee)>> {
        let employees: HashMap<String, Employee> = self
            .store
            .get_all::<Employee>()?
            .into_iter()
            .map(|e| (e.id.clone(), e))
            .collect();

        Ok(self
            .store
            .get_all::<AttendanceRecord>()?
            .into_iter()
            .filter(|r| {
                filter
                    .employee_id
                    .as_deref()
                    .is_none_or(|id| r.employee_id == id)
            })
            .filter(|r| in_window(r.punch_in, window))
            .filter_map(|r| {
                let employee = employees.get(&r.employee_id)?;
                let department_ok = filter
                    .department
                    .as_deref()
                    .is_none_or(|d| employee.department == d);
                department_ok.then(|| (r, employee.clone()))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{admin, engine, hire, make_datetime};
    use crate::models::AttendanceStatus;
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_punch_cycle_reports_worked_hours() {
        let engine = engine();
        let (employee, staff) = hire(&engine, "Erin", "Park");

        let record = engine
            .punch_in(&staff, None, make_datetime("2024-03-01 09:00:00"))
            .unwrap();
        assert_eq!(record.employee_id, employee.id);
        assert_eq!(record.status, AttendanceStatus::Present);
        assert!(record.punch_out.is_none());

        let second = engine.punch_in(&staff, None, make_datetime("2024-03-01 10:00:00"));
        assert!(matches!(second, Err(EngineError::AlreadyOpen { .. })));

        let closed = engine
            .punch_out(&staff, None, make_datetime("2024-03-01 17:30:00"))
            .unwrap();
        assert_eq!(closed.id, record.id);
        assert_eq!(closed.worked_hours(), Some(Decimal::new(85, 1)));
    }

    #[test]
    fn test_punch_out_without_open_record_fails() {
        let engine = engine();
        let (_, staff) = hire(&engine, "Erin", "Park");

        let result = engine.punch_out(&staff, None, make_datetime("2024-03-01 17:00:00"));
        assert!(matches!(result, Err(EngineError::NoOpenPunch { .. })));
    }

    #[test]
    fn test_second_cycle_same_day_allowed_after_close() {
        let engine = engine();
        let (_, staff) = hire(&engine, "Erin", "Park");

        engine.punch_in(&staff, None, make_datetime("2024-03-01 09:00:00")).unwrap();
        engine.punch_out(&staff, None, make_datetime("2024-03-01 12:00:00")).unwrap();
        engine.punch_in(&staff, None, make_datetime("2024-03-01 13:00:00")).unwrap();

        let today = engine
            .today_record(&staff, make_datetime("2024-03-01 14:00:00"))
            .unwrap()
            .unwrap();
        assert_eq!(today.punch_in, make_datetime("2024-03-01 13:00:00"));
    }

    #[test]
    fn test_yesterdays_open_record_does_not_block_today() {
        let engine = engine();
        let (_, staff) = hire(&engine, "Erin", "Park");

        engine.punch_in(&staff, None, make_datetime("2024-03-01 09:00:00")).unwrap();
        let result = engine.punch_in(&staff, None, make_datetime("2024-03-02 09:00:00"));
        assert!(result.is_ok());

        let stale = engine.punch_out(&staff, None, make_datetime("2024-03-03 09:00:00"));
        assert!(matches!(stale, Err(EngineError::NoOpenPunch { .. })));
    }

    #[test]
    fn test_admin_punches_named_employee() {
        let engine = engine();
        let (employee, _) = hire(&engine, "Erin", "Park");

        let record = engine
            .punch_in(&admin(), Some(&employee.id), make_datetime("2024-03-01 09:00:00"))
            .unwrap();
        assert_eq!(record.employee_id, employee.id);
    }

    #[test]
    fn test_concurrent_punch_ins_open_exactly_one_record() {
        let engine = Arc::new(engine());
        let (employee, staff) = hire(&engine, "Erin", "Park");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let engine = Arc::clone(&engine);
                let staff = staff.clone();
                thread::spawn(move || {
                    engine
                        .punch_in(&staff, None, make_datetime("2024-03-01 09:00:00"))
                        .is_ok()
                })
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);

        let records = engine.list_attendance(&admin(), Some(&employee.id)).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_month_records_filters_by_month() {
        let engine = engine();
        let (_, staff) = hire(&engine, "Erin", "Park");

        engine.punch_in(&staff, None, make_datetime("2024-02-29 09:00:00")).unwrap();
        engine.punch_in(&staff, None, make_datetime("2024-03-01 09:00:00")).unwrap();
        engine.punch_in(&staff, None, make_datetime("2024-03-31 09:00:00")).unwrap();
        engine.punch_in(&staff, None, make_datetime("2024-04-01 09:00:00")).unwrap();

        let march = engine.month_records(&staff, "2024-03").unwrap();
        assert_eq!(march.len(), 2);

        let bad = engine.month_records(&staff, "2024-3x");
        assert!(matches!(bad, Err(EngineError::InvalidRange { .. })));
    }

    #[test]
    fn test_admin_listing_sorted_and_filtered() {
        let engine = engine();
        let (zed, zed_staff) = hire(&engine, "Zed", "Young");
        let (_, amy_staff) = hire(&engine, "Amy", "Adams");
        let (_, bea_staff) = hire(&engine, "Bea", "Adams");

        engine.punch_in(&zed_staff, None, make_datetime("2024-03-01 08:00:00")).unwrap();
        engine.punch_in(&bea_staff, None, make_datetime("2024-03-02 09:00:00")).unwrap();
        engine.punch_in(&amy_staff, None, make_datetime("2024-03-03 09:00:00")).unwrap();
        engine.punch_in(&amy_staff, None, make_datetime("2024-03-01 09:00:00")).unwrap();

        let rows = engine
            .admin_attendance(&admin(), &AttendanceFilter::default())
            .unwrap();
        let order: Vec<(String, NaiveDateTime)> = rows
            .iter()
            .map(|r| (r.employee.first_name.clone(), r.record.punch_in))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Amy".to_string(), make_datetime("2024-03-01 09:00:00")),
                ("Amy".to_string(), make_datetime("2024-03-03 09:00:00")),
                ("Bea".to_string(), make_datetime("2024-03-02 09:00:00")),
                ("Zed".to_string(), make_datetime("2024-03-01 08:00:00")),
            ]
        );

        let only_zed = engine
            .admin_attendance(
                &admin(),
                &AttendanceFilter {
                    employee_id: Some(zed.id.clone()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(only_zed.len(), 1);

        let other_dept = engine
            .admin_attendance(
                &admin(),
                &AttendanceFilter {
                    department: Some("Finance".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(other_dept.is_empty());
    }

    #[test]
    fn test_admin_listing_skips_unknown_employees() {
        let engine = engine();
        engine
            .store()
            .add(AttendanceRecord::open("ghost", make_datetime("2024-03-01 09:00:00")))
            .unwrap();

        let rows = engine
            .admin_attendance(&admin(), &AttendanceFilter::default())
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_staff_cannot_list_admin_attendance() {
        let engine = engine();
        let (_, staff) = hire(&engine, "Erin", "Park");
        let result = engine.admin_attendance(&staff, &AttendanceFilter::default());
        assert!(matches!(result, Err(EngineError::Unauthorized { .. })));
    }

    #[test]
    fn test_report_rows_carry_directory_fields() {
        let engine = engine();
        let (employee, staff) = hire(&engine, "Erin", "Park");

        engine.punch_in(&staff, None, make_datetime("2024-03-01 09:00:00")).unwrap();
        engine.punch_out(&staff, None, make_datetime("2024-03-01 17:30:00")).unwrap();
        engine.punch_in(&staff, None, make_datetime("2024-03-04 09:00:00")).unwrap();

        let rows = engine.attendance_report(&admin(), "2024-03", None, None).unwrap();
        assert_eq!(rows.len(), 2);

        let closed = rows.iter().find(|r| r.punch_out.is_some()).unwrap();
        assert_eq!(closed.employee_id, employee.id);
        assert_eq!(closed.employee_name, "Erin Park");
        assert_eq!(closed.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(closed.worked_hours, Some(Decimal::new(85, 1)));

        let open = rows.iter().find(|r| r.punch_out.is_none()).unwrap();
        assert_eq!(open.worked_hours, None);
    }

    #[test]
    fn test_staff_list_is_scoped_to_self() {
        let engine = engine();
        let (_, erin) = hire(&engine, "Erin", "Park");
        let (other, other_staff) = hire(&engine, "Omar", "Diaz");

        engine.punch_in(&erin, None, make_datetime("2024-03-01 09:00:00")).unwrap();
        engine.punch_in(&other_staff, None, make_datetime("2024-03-01 09:00:00")).unwrap();

        let seen = engine.list_attendance(&erin, Some(&other.id)).unwrap();
        assert_eq!(seen.len(), 1);
        assert_ne!(seen[0].employee_id, other.id);
    }
}
