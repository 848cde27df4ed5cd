//! CSV rendering of the monthly attendance report.

use crate::models::AttendanceReportRow;

/// Report column headers, in output order.
pub const REPORT_COLUMNS: [&str; 11] = [
    "employee_id",
    "employee_name",
    "email",
    "department",
    "position",
    "date",
    "punch_in",
    "punch_out",
    "worked_hours",
    "status",
    "notes",
];

/// Renders report rows as RFC 4180 CSV with CRLF line endings.
///
/// # Example
///
/// ```
/// use attendance_engine::api::render_report_csv;
///
/// let csv = render_report_csv(&[]);
/// assert!(csv.starts_with("employee_id,employee_name,"));
/// assert!(csv.ends_with("notes\r\n"));
/// ```
pub fn render_report_csv(rows: &[AttendanceReportRow]) -> String {
    let mut out = String::new();
    push_line(&mut out, REPORT_COLUMNS.iter().map(|c| c.to_string()));

    for row in rows {
        push_line(
            &mut out,
            [
                row.employee_id.clone(),
                row.employee_name.clone(),
                row.email.clone(),
                row.department.clone(),
                row.position.clone(),
                row.date.to_string(),
                row.punch_in.to_string(),
                row.punch_out.map(|t| t.to_string()).unwrap_or_default(),
                row.worked_hours
                    .map(|h| format!("{:.2}", h))
                    .unwrap_or_default(),
                row.status.as_str().to_string(),
                row.notes.clone(),
            ],
        );
    }
    out
}

/// Suggested download name for `month`, with path separators neutralized.
pub fn report_filename(month: &str) -> String {
    format!("attendance_{}.csv", month.replace(['/', '\\', '"'], "-"))
}

fn push_line(out: &mut String, fields: impl IntoIterator<Item = String>) {
    let line: Vec<String> = fields.into_iter().map(|f| escape(&f)).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
