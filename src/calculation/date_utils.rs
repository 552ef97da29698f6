//! Calendar arithmetic on `YYYY-MM-DD` dates.

use chrono::{Days, Local, Months, NaiveDate};

use crate::error::{EngineError, EngineResult};

/// The only external date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` string.
///
/// Fails with `DateInvalid` for anything that is not a real calendar date,
/// including out-of-range days such as `2023-02-29`.
pub fn parse_date(input: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|e| EngineError::date_invalid(input, e.to_string()))
}

/// Renders a date as `YYYY-MM-DD`.
///
/// # Example
///
/// ```
/// use rank_engine::calculation::format_date;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// assert_eq!(format_date(date), "2024-03-01");
/// ```
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Adds `n` calendar days (negative subtracts) to a `YYYY-MM-DD` string.
///
/// # Example
///
/// ```
/// use rank_engine::calculation::add_days;
///
/// assert_eq!(add_days("2024-02-28", 1).unwrap(), "2024-02-29");
/// assert_eq!(add_days("2024-01-01", -1).unwrap(), "2023-12-31");
/// assert!(add_days("2024-02-30", 1).is_err());
/// ```
pub fn add_days(date: &str, n: i64) -> EngineResult<String> {
    let parsed = parse_date(date)?;
    add_days_to(parsed, n).map(format_date)
}

/// Adds `n` calendar days to a date.
pub fn add_days_to(date: NaiveDate, n: i64) -> EngineResult<NaiveDate> {
    let shifted = if n >= 0 {
        date.checked_add_days(Days::new(n.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(n.unsigned_abs()))
    };
    shifted.ok_or_else(|| {
        EngineError::date_invalid(
            format_date(date),
            format!("adding {} days leaves the supported calendar range", n),
        )
    })
}

/// Adds a signed number of calendar months.
///
/// Month-end dates clamp (January 31 plus one month is February 28 or 29).
pub fn add_months_to(date: NaiveDate, months: i64) -> EngineResult<NaiveDate> {
    let count = u32::try_from(months.unsigned_abs()).ok().map(Months::new);
    let shifted = count.and_then(|m| {
        if months >= 0 {
            date.checked_add_months(m)
        } else {
            date.checked_sub_months(m)
        }
    });
    shifted.ok_or_else(|| {
        EngineError::date_invalid(
            format_date(date),
            format!("adding {} months leaves the supported calendar range", months),
        )
    })
}

/// Signed number of calendar days from `start` to `end`.
pub fn diff_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// The current local wall-clock date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses an optional reference date, defaulting to today when omitted.
///
/// An empty string counts as omitted. The default is the documented
/// behavior for a missing reference date, not error recovery: a present but
/// malformed date still fails.
pub fn resolve_target_date(input: Option<&str>) -> EngineResult<NaiveDate> {
    match input.map(str::trim) {
        None | Some("") => Ok(today()),
        Some(text) => parse_date(text),
    }
}
