//! Elapsed time between two dates as years, months and days.
//!
//! Day borrows use a fixed 30-day month, the same convention the career and
//! rank calculations use for day counts.

use chrono::{Datelike, NaiveDate};

use crate::models::{DAYS_PER_MONTH, Period};

/// Calculates the elapsed years, months and days from `start` to `end`.
///
/// Components are subtracted with borrowing: when the end day is before the
/// start day a 30-day month is borrowed, and when the month then goes
/// negative a year is borrowed. The result has `0 <= months <= 11` and
/// `0 <= days <= 29`.
///
/// When `end` is before `start` the mirrored tenure is returned negated, so
/// every component is zero or negative. Callers decide what a negative
/// tenure means; it is not an error here.
///
/// # Example
///
/// ```
/// use rank_engine::calculation::calculate_tenure;
/// use rank_engine::models::Period;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2020, 1, 10).unwrap();
/// let end = NaiveDate::from_ymd_opt(2023, 3, 5).unwrap();
/// assert_eq!(calculate_tenure(start, end), Period::new(3, 1, 25));
/// ```
pub fn calculate_tenure(start: NaiveDate, end: NaiveDate) -> Period {
    if end < start {
        return -calculate_tenure(end, start);
    }

    let mut years = end.year() - start.year();
    let mut months = end.month() as i32 - start.month() as i32;
    let mut days = end.day() as i32 - start.day() as i32;

    if days < 0 {
        months -= 1;
        days += DAYS_PER_MONTH as i32;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    Period::new(years, months, days)
}

/// Tenure from `start` to `end` as a 365/30 day count.
pub fn tenure_days(start: NaiveDate, end: NaiveDate) -> i64 {
    calculate_tenure(start, end).to_days()
}

/// Renders a tenure as "N년 M개월 D일".
///
/// Zero components are omitted; an all-zero tenure renders as "0일".
/// Negative tenures are rendered as their magnitude with a leading "-".
///
/// # Example
///
/// ```
/// use rank_engine::calculation::format_tenure;
/// use rank_engine::models::Period;
///
/// assert_eq!(format_tenure(&Period::new(3, 2, 5)), "3년 2개월 5일");
/// assert_eq!(format_tenure(&Period::new(1, 0, 0)), "1년");
/// assert_eq!(format_tenure(&Period::new(0, 0, 0)), "0일");
/// ```
pub fn format_tenure(tenure: &Period) -> String {
    if tenure.has_negative_component() {
        let magnitude = Period::new(tenure.years.abs(), tenure.months.abs(), tenure.days.abs());
        return format!("-{}", format_tenure(&magnitude));
    }

    let mut parts = Vec::with_capacity(3);
    if tenure.years > 0 {
        parts.push(format!("{}년", tenure.years));
    }
    if tenure.months > 0 {
        parts.push(format!("{}개월", tenure.months));
    }
    if tenure.days > 0 {
        parts.push(format!("{}일", tenure.days));
    }

    if parts.is_empty() {
        "0일".to_string()
    } else {
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_day_is_zero() {
        let day = date(2024, 3, 1);
        assert_eq!(calculate_tenure(day, day), Period::ZERO);
    }

    #[test]
    fn test_whole_years() {
        assert_eq!(
            calculate_tenure(date(2020, 1, 10), date(2023, 1, 10)),
            Period::new(3, 0, 0)
        );
    }

    #[test]
    fn test_day_borrow_uses_thirty_day_month() {
        // March has 31 days, but the borrow is always 30.
        assert_eq!(
            calculate_tenure(date(2024, 3, 31), date(2024, 5, 1)),
            Period::new(0, 1, 0)
        );
        assert_eq!(
            calculate_tenure(date(2024, 1, 20), date(2024, 3, 10)),
            Period::new(0, 1, 20)
        );
    }

    #[test]
    fn test_month_borrow_takes_a_year() {
        assert_eq!(
            calculate_tenure(date(2020, 11, 15), date(2022, 2, 10)),
            Period::new(1, 2, 25)
        );
    }

    #[test]
    fn test_components_stay_in_range() {
        let start = date(2019, 1, 31);
        let mut end = start;
        for _ in 0..800 {
            let tenure = calculate_tenure(start, end);
            assert!((0..=11).contains(&tenure.months), "{:?}", tenure);
            assert!((0..=30).contains(&tenure.days), "{:?}", tenure);
            end = end.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_end_before_start_is_non_positive() {
        let tenure = calculate_tenure(date(2024, 3, 1), date(2024, 2, 28));
        assert!(tenure.to_days() < 0);
        assert!(tenure.years <= 0 && tenure.months <= 0 && tenure.days <= 0);
        assert_eq!(tenure, -calculate_tenure(date(2024, 2, 28), date(2024, 3, 1)));
    }

    #[test]
    fn test_tenure_days_uses_fixed_convention() {
        assert_eq!(tenure_days(date(2020, 1, 1), date(2021, 1, 1)), 365);
        // A leap year is still 365 days under the convention.
        assert_eq!(tenure_days(date(2024, 1, 1), date(2025, 1, 1)), 365);
        assert_eq!(tenure_days(date(2024, 1, 1), date(2024, 2, 15)), 44);
    }

    #[test]
    fn test_format_elides_zero_components() {
        assert_eq!(format_tenure(&Period::new(0, 3, 0)), "3개월");
        assert_eq!(format_tenure(&Period::new(2, 0, 7)), "2년 7일");
        assert_eq!(format_tenure(&Period::new(0, 0, 0)), "0일");
    }

    #[test]
    fn test_format_negative_tenure() {
        assert_eq!(format_tenure(&Period::new(-1, -2, 0)), "-1년 2개월");
    }
}
