//! Calendar dates, times of day and the weekly recurrence convention.
//!
//! Timetables repeat every seven days. A stop's day-offset counts days from
//! the train's nominal weekly start, and day-offset 0 is a Sunday. Calendar
//! weekdays use the same origin: 0 = Sunday through 6 = Saturday. Both sides
//! of the weekday match go through [`day_of_week`] and [`DAYS_PER_WEEK`] so
//! they cannot drift apart.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike};

/// Length of the timetable recurrence period.
pub const DAYS_PER_WEEK: u32 = 7;

/// Error returned when parsing an invalid date or time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date or time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Parse a calendar date.
///
/// Accepted shapes:
/// - `YYYY-MM-DD`
/// - `DD/MM/YYYY`
/// - `YYYY/MM/DD` (a `/`-separated value whose first field has four digits)
///
/// Day and month fields may be one or two digits; the year is always four.
///
/// # Examples
///
/// ```
/// use booking_server::domain::parse_calendar_date;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
/// assert_eq!(parse_calendar_date("2024-03-10").unwrap(), expected);
/// assert_eq!(parse_calendar_date("10/03/2024").unwrap(), expected);
/// assert_eq!(parse_calendar_date("2024/03/10").unwrap(), expected);
///
/// assert!(parse_calendar_date("20240310").is_err());
/// assert!(parse_calendar_date("31/02/2024").is_err());
/// ```
pub fn parse_calendar_date(s: &str) -> Result<NaiveDate, TimeError> {
    let s = s.trim();

    let (year, month, day) = if s.contains('/') {
        let fields: Vec<&str> = s.split('/').collect();
        let [first, second, third] = fields.as_slice() else {
            return Err(TimeError::new("expected three date fields"));
        };
        if first.len() == 4 {
            (
                parse_digits(first, 4, 4)?,
                parse_digits(second, 1, 2)?,
                parse_digits(third, 1, 2)?,
            )
        } else {
            (
                parse_digits(third, 4, 4)?,
                parse_digits(second, 1, 2)?,
                parse_digits(first, 1, 2)?,
            )
        }
    } else if s.contains('-') {
        let fields: Vec<&str> = s.split('-').collect();
        let [year, month, day] = fields.as_slice() else {
            return Err(TimeError::new("expected three date fields"));
        };
        (
            parse_digits(year, 4, 4)?,
            parse_digits(month, 1, 2)?,
            parse_digits(day, 1, 2)?,
        )
    } else {
        return Err(TimeError::new("expected YYYY-MM-DD or DD/MM/YYYY"));
    };

    // Four digits always fit in an i32.
    NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| TimeError::new("no such calendar date"))
}

/// Parse a time of day in `HH:MM` or `HH:MM:SS` form.
///
/// # Examples
///
/// ```
/// use booking_server::domain::parse_time_of_day;
///
/// assert!(parse_time_of_day("06:15").is_ok());
/// assert!(parse_time_of_day("23:59:59").is_ok());
/// assert!(parse_time_of_day("24:00").is_err());
/// assert!(parse_time_of_day("6:15").is_err());
/// ```
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, TimeError> {
    let s = s.trim();
    let fields: Vec<&str> = s.split(':').collect();

    let (hour, minute, second) = match fields.as_slice() {
        [h, m] => (parse_digits(h, 2, 2)?, parse_digits(m, 2, 2)?, 0),
        [h, m, sec] => (
            parse_digits(h, 2, 2)?,
            parse_digits(m, 2, 2)?,
            parse_digits(sec, 2, 2)?,
        ),
        _ => return Err(TimeError::new("expected HH:MM or HH:MM:SS")),
    };

    if hour > 23 {
        return Err(TimeError::new("hour must be 0-23"));
    }
    if minute > 59 {
        return Err(TimeError::new("minute must be 0-59"));
    }
    if second > 59 {
        return Err(TimeError::new("second must be 0-59"));
    }

    NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| TimeError::new("invalid time"))
}

/// Weekday index of a calendar date, 0 = Sunday.
pub fn day_of_week(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Time elapsed since the start of a train's nominal start day.
pub fn elapsed_since_start(day_offset: u32, time: NaiveTime) -> Duration {
    Duration::days(i64::from(day_offset)) + Duration::seconds(i64::from(time.num_seconds_from_midnight()))
}

/// Render a duration as `HH:MM:SS`. Hours are not wrapped at 24.
///
/// # Examples
///
/// ```
/// use booking_server::domain::format_elapsed;
/// use chrono::Duration;
///
/// assert_eq!(format_elapsed(Duration::minutes(95)), "01:35:00");
/// assert_eq!(format_elapsed(Duration::hours(27)), "27:00:00");
/// ```
pub fn format_elapsed(duration: Duration) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    format!(
        "{sign}{:02}:{:02}:{:02}",
        total / 3600,
        (total / 60) % 60,
        total % 60
    )
}

/// Parse an ASCII digit field of bounded length.
fn parse_digits(field: &str, min_len: usize, max_len: usize) -> Result<u32, TimeError> {
    if field.len() < min_len || field.len() > max_len {
        return Err(TimeError::new("field has the wrong number of digits"));
    }
    if !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeError::new("field must contain only digits"));
    }
    field
        .parse()
        .map_err(|_| TimeError::new("field is not a number"))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_date() -> impl Strategy<Value = NaiveDate> {
        (1900i32..2200, 1u32..=12, 1u32..=31)
            .prop_filter_map("valid date", |(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
    }

    proptest! {
        /// Both accepted spellings of a date parse to the same value.
        #[test]
        fn iso_and_day_first_agree(d in any_date()) {
            let iso = d.format("%Y-%m-%d").to_string();
            let day_first = d.format("%d/%m/%Y").to_string();
            prop_assert_eq!(parse_calendar_date(&iso).unwrap(), d);
            prop_assert_eq!(parse_calendar_date(&day_first).unwrap(), d);
        }

        /// Normalised output reparses to the same date.
        #[test]
        fn normalised_output_reparses(d in any_date()) {
            let day_first = d.format("%d/%m/%Y").to_string();
            let parsed = parse_calendar_date(&day_first).unwrap();
            let normalised = parsed.format("%Y-%m-%d").to_string();
            prop_assert_eq!(parse_calendar_date(&normalised).unwrap(), d);
        }

        /// Weekday index advances by one per day and wraps after Saturday.
        #[test]
        fn weekday_wraps(d in any_date()) {
            let next = d.succ_opt().unwrap();
            prop_assert_eq!(day_of_week(next), (day_of_week(d) + 1) % DAYS_PER_WEEK);
        }

        /// Undelimited digit strings are never accepted.
        #[test]
        fn bare_digits_rejected(s in "[0-9]{1,12}") {
            prop_assert!(parse_calendar_date(&s).is_err());
        }
    }
}
