//! Calendar rules: weekends, holidays, working days, and date ranges.
//!
//! Everything here is a pure function of its inputs; the holiday set is
//! read from the store by the caller and passed in.

use std::collections::HashSet;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::error::{EngineError, EngineResult};
use crate::models::Holiday;

/// Dates excluded from working-day counts in addition to weekends.
pub type HolidaySet = HashSet<NaiveDate>;

/// Collects holiday records into a [`HolidaySet`].
pub fn holiday_set(holidays: &[Holiday]) -> HolidaySet {
    holidays.iter().map(|h| h.date).collect()
}

/// Returns true for Saturday and Sunday.
///
/// # Example
///
/// ```
/// use attendance_engine::engine::is_weekend;
/// use chrono::NaiveDate;
///
/// // 2024-03-02 is a Saturday
/// assert!(is_weekend(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()));
/// assert!(!is_weekend(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()));
/// ```
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Enumerates the working days in `[start, end]`, in order.
///
/// A working day is neither a weekend day nor a date in `holidays`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidRange`] when `start > end`.
///
/// # Example
///
/// ```
/// use attendance_engine::engine::{working_days, HolidaySet};
/// use chrono::NaiveDate;
///
/// let mut holidays = HolidaySet::new();
/// holidays.insert(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
///
/// // Monday 2024-03-04 through Sunday 2024-03-10 with one mid-week holiday
/// let days = working_days(
///     NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
///     &holidays,
/// )
/// .unwrap();
/// assert_eq!(days.len(), 4);
/// ```
pub fn working_days(
    start: NaiveDate,
    end: NaiveDate,
    holidays: &HolidaySet,
) -> EngineResult<Vec<NaiveDate>> {
    if start > end {
        return Err(EngineError::InvalidRange {
            message: format!("start date {} is after end date {}", start, end),
        });
    }

    Ok(start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !is_weekend(*d) && !holidays.contains(d))
        .collect())
}

/// Closed-interval overlap: shared boundary days count as overlapping.
///
/// # Example
///
/// ```
/// use attendance_engine::engine::ranges_overlap;
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 4, day).unwrap();
/// assert!(ranges_overlap(d(10), d(12), d(12), d(15)));
/// assert!(!ranges_overlap(d(10), d(12), d(13), d(15)));
/// ```
pub fn ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && b_start <= a_end
}

/// Returns `[start of day, start of next day)` for `date`.
pub fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(NaiveTime::MIN);
    let next = date
        .checked_add_days(Days::new(1))
        .map(|d| d.and_time(NaiveTime::MIN))
        .unwrap_or(NaiveDateTime::MAX);
    (start, next)
}

/// Parses a `YYYY-MM` month into `[first instant, first instant of next month)`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidRange`] when `month` is not a valid `YYYY-MM`.
///
/// # Example
///
/// ```
/// use attendance_engine::engine::month_bounds;
///
/// let (start, next) = month_bounds("2024-12").unwrap();
/// assert_eq!(start.to_string(), "2024-12-01 00:00:00");
/// assert_eq!(next.to_string(), "2025-01-01 00:00:00");
/// assert!(month_bounds("2024-13").is_err());
/// ```
pub fn month_bounds(month: &str) -> EngineResult<(NaiveDateTime, NaiveDateTime)> {
    let invalid = || EngineError::InvalidRange {
        message: format!("invalid month '{}', expected YYYY-MM", month),
    };

    let first = NaiveDate::parse_from_str(&format!("{}-01", month.trim()), "%Y-%m-%d")
        .map_err(|_| invalid())?;
    let next = first.checked_add_months(Months::new(1)).ok_or_else(invalid)?;

    Ok((first.and_time(NaiveTime::MIN), next.and_time(NaiveTime::MIN)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_saturday_and_sunday_are_weekend() {
        assert!(is_weekend(make_date("2024-03-02")));
        assert!(is_weekend(make_date("2024-03-03")));
        assert!(!is_weekend(make_date("2024-03-01")));
        assert!(!is_weekend(make_date("2024-03-04")));
    }

    #[test]
    fn test_week_with_one_holiday_has_four_working_days() {
        let holidays: HolidaySet = [make_date("2024-03-06")].into_iter().collect();
        let start = make_date("2024-03-04");
        let end = start + chrono::Duration::days(6);

        let days = working_days(start, end, &holidays).unwrap();
        assert_eq!(
            days,
            vec![
                make_date("2024-03-04"),
                make_date("2024-03-05"),
                make_date("2024-03-07"),
                make_date("2024-03-08"),
            ]
        );
    }

    #[test]
    fn test_weekend_only_range_is_empty() {
        let days =
            working_days(make_date("2024-03-02"), make_date("2024-03-03"), &HolidaySet::new())
                .unwrap();
        assert!(days.is_empty());
    }

    #[test]
    fn test_single_day_range() {
        let day = make_date("2024-03-05");
        assert_eq!(working_days(day, day, &HolidaySet::new()).unwrap(), vec![day]);
    }

    #[test]
    fn test_reversed_range_is_invalid() {
        let result = working_days(make_date("2024-03-05"), make_date("2024-03-04"), &HolidaySet::new());
        assert!(matches!(result, Err(EngineError::InvalidRange { .. })));
    }

    #[test]
    fn test_holiday_on_weekend_not_double_counted() {
        let holidays: HolidaySet = [make_date("2024-03-09")].into_iter().collect();
        let days = working_days(make_date("2024-03-04"), make_date("2024-03-10"), &holidays).unwrap();
        assert_eq!(days.len(), 5);
    }

    #[test]
    fn test_holiday_set_from_records() {
        let holidays = vec![Holiday {
            id: "h1".to_string(),
            date: make_date("2024-01-26"),
            name: "Republic Day".to_string(),
        }];
        assert!(holiday_set(&holidays).contains(&make_date("2024-01-26")));
    }

    #[test]
    fn test_day_bounds_cover_one_day() {
        let (start, next) = day_bounds(make_date("2024-02-29"));
        assert_eq!(start.to_string(), "2024-02-29 00:00:00");
        assert_eq!(next.to_string(), "2024-03-01 00:00:00");
    }

    #[test]
    fn test_month_bounds_rejects_garbage() {
        assert!(month_bounds("March").is_err());
        assert!(month_bounds("2024/03").is_err());
        assert!(month_bounds("").is_err());
    }

    #[test]
    fn test_month_bounds_february_leap_year() {
        let (start, next) = month_bounds("2024-02").unwrap();
        assert_eq!((next - start).num_days(), 29);
    }

    fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (0i64..3650).prop_map(|offset| make_date("2020-01-01") + chrono::Duration::days(offset))
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in arb_date(), b in arb_date(), c in arb_date(), d in arb_date()) {
            let (a_start, a_end) = if a <= b { (a, b) } else { (b, a) };
            let (b_start, b_end) = if c <= d { (c, d) } else { (d, c) };
            prop_assert_eq!(
                ranges_overlap(a_start, a_end, b_start, b_end),
                ranges_overlap(b_start, b_end, a_start, a_end)
            );
        }

        #[test]
        fn prop_working_days_are_ordered_weekdays_within_range(start in arb_date(), len in 0i64..60) {
            let end = start + chrono::Duration::days(len);
            let days = working_days(start, end, &HolidaySet::new()).unwrap();

            prop_assert!(days.len() as i64 <= len + 1);
            prop_assert!(days.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(days.iter().all(|d| !is_weekend(*d) && *d >= start && *d <= end));
        }

        #[test]
        fn prop_full_weeks_have_five_working_days(start in arb_date(), weeks in 1i64..10) {
            let end = start + chrono::Duration::days(weeks * 7 - 1);
            let days = working_days(start, end, &HolidaySet::new()).unwrap();
            prop_assert_eq!(days.len() as i64, weeks * 5);
        }
    }
}
