//! Pay-step progression.
//!
//! A step position is fully described by `(start_rank, first_upgrade_date)`:
//! one step is granted on the first-upgrade date itself and one more on each
//! anniversary after it. The current step is a pure function of those two
//! values and a target date.

use chrono::NaiveDate;

use crate::config::RankRules;
use crate::error::{EngineError, EngineResult};

use super::date_utils::{add_days_to, add_months_to, format_date};
use super::tenure::calculate_tenure;

/// Computes the date of the first step increase.
///
/// The wait for the first increase is one upgrade interval minus the
/// recognized prior service, so the result is `adjusted_entry_date +
/// interval - (years, months, days)`. Prior service of a full interval or
/// more puts the date on or before entry; the result is not clamped.
///
/// # Errors
///
/// `RankCalculationError` when a prior component is negative or the result
/// leaves the calendar range.
///
/// # Example
///
/// ```
/// use rank_engine::calculation::calculate_first_upgrade_date;
/// use rank_engine::config::RankRules;
/// use chrono::NaiveDate;
///
/// let entry = NaiveDate::from_ymd_opt(2020, 1, 10).unwrap();
/// let rules = RankRules::default();
///
/// let first = calculate_first_upgrade_date(entry, 0, 0, 0, &rules).unwrap();
/// assert_eq!(first, NaiveDate::from_ymd_opt(2021, 1, 10).unwrap());
///
/// let first = calculate_first_upgrade_date(entry, 0, 3, 5, &rules).unwrap();
/// assert_eq!(first, NaiveDate::from_ymd_opt(2020, 10, 5).unwrap());
/// ```
pub fn calculate_first_upgrade_date(
    adjusted_entry_date: NaiveDate,
    prior_years: i32,
    prior_months: i32,
    prior_days: i32,
    rules: &RankRules,
) -> EngineResult<NaiveDate> {
    if prior_years < 0 || prior_months < 0 || prior_days < 0 {
        return Err(EngineError::rank(format!(
            "prior service must not be negative, got {}y {}m {}d",
            prior_years, prior_months, prior_days
        )));
    }

    let wait_months = i64::from(interval_years(rules)) * 12
        - (i64::from(prior_years) * 12 + i64::from(prior_months));

    add_months_to(adjusted_entry_date, wait_months)
        .and_then(|date| add_days_to(date, -i64::from(prior_days)))
        .map_err(|e| EngineError::rank(format!("first upgrade date out of range: {}", e)))
}

/// Upgrade interval in whole years; a zero interval counts as one.
fn interval_years(rules: &RankRules) -> u32 {
    rules.upgrade_interval_years.max(1)
}

/// The `k`-th anniversary of the first upgrade, or `None` past the calendar range.
fn anniversary(first_upgrade_date: NaiveDate, k: u32, interval: u32) -> Option<NaiveDate> {
    let months = i64::from(k) * i64::from(interval) * 12;
    add_months_to(first_upgrade_date, months).ok()
}

/// Anniversaries strictly after the first upgrade that fall on or before `target_date`.
fn completed_intervals(first_upgrade_date: NaiveDate, target_date: NaiveDate, rules: &RankRules) -> u32 {
    let interval = interval_years(rules);
    let elapsed_years = calculate_tenure(first_upgrade_date, target_date).years.max(0) as u32;
    let mut completed = elapsed_years / interval;

    // February 29 anniversaries clamp to February 28 and land one day early.
    while let Some(next) = anniversary(first_upgrade_date, completed + 1, interval) {
        if next > target_date {
            break;
        }
        completed += 1;
    }
    completed
}

/// Computes the step as of `target_date`.
///
/// - `first_upgrade_date` of `None` (flat or non-stepped): `start_rank`.
/// - `target_date` before `first_upgrade_date`: `start_rank`.
/// - otherwise `start_rank + 1 + completed intervals since the first upgrade`.
///
/// The result is not clamped to the configured step range; bounds are
/// enforced when data is entered.
///
/// # Example
///
/// ```
/// use rank_engine::calculation::calculate_current_rank;
/// use rank_engine::config::RankRules;
/// use chrono::NaiveDate;
///
/// let rules = RankRules::default();
/// let first = NaiveDate::from_ymd_opt(2024, 3, 1);
///
/// let on_anniversary = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// assert_eq!(calculate_current_rank(5, first, on_anniversary, &rules), 6);
///
/// let day_before = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
/// assert_eq!(calculate_current_rank(5, first, day_before, &rules), 5);
/// ```
pub fn calculate_current_rank(
    start_rank: u32,
    first_upgrade_date: Option<NaiveDate>,
    target_date: NaiveDate,
    rules: &RankRules,
) -> u32 {
    let Some(first_upgrade_date) = first_upgrade_date else {
        return start_rank;
    };
    if target_date < first_upgrade_date {
        return start_rank;
    }

    start_rank
        .saturating_add(1)
        .saturating_add(completed_intervals(first_upgrade_date, target_date, rules))
}

/// Computes the next step increase strictly after `target_date`.
///
/// Returns `None` when there is no first-upgrade date, and the first-upgrade
/// date itself while it is still ahead of `target_date`.
///
/// # Errors
///
/// `RankCalculationError` when the next anniversary leaves the calendar range.
pub fn calculate_next_upgrade_date(
    first_upgrade_date: Option<NaiveDate>,
    target_date: NaiveDate,
    rules: &RankRules,
) -> EngineResult<Option<NaiveDate>> {
    let Some(first_upgrade_date) = first_upgrade_date else {
        return Ok(None);
    };
    if target_date < first_upgrade_date {
        return Ok(Some(first_upgrade_date));
    }

    let k = completed_intervals(first_upgrade_date, target_date, rules) + 1;
    anniversary(first_upgrade_date, k, interval_years(rules))
        .map(Some)
        .ok_or_else(|| {
            EngineError::rank(format!(
                "anniversary {} of {} leaves the calendar range",
                k,
                format_date(first_upgrade_date)
            ))
        })
}

/// Checks that stored step data is internally consistent.
///
/// # Errors
///
/// `RankCalculationError` when `start_rank` is zero, or when the
/// first-upgrade date is earlier than `entry_date` minus `max_rank` years
/// (no amount of recognized prior service reaches that far back).
pub fn validate_rank_inputs(
    entry_date: NaiveDate,
    start_rank: u32,
    first_upgrade_date: Option<NaiveDate>,
    rules: &RankRules,
) -> EngineResult<()> {
    if start_rank == 0 {
        return Err(EngineError::rank("start rank must be at least 1"));
    }

    if let Some(first) = first_upgrade_date {
        let bound = add_months_to(entry_date, -i64::from(rules.max_rank) * 12)
            .map_err(|e| EngineError::rank(e.to_string()))?;
        if first < bound {
            return Err(EngineError::rank(format!(
                "first upgrade date {} is before {} (entry {} minus {} years)",
                format_date(first),
                format_date(bound),
                format_date(entry_date),
                rules.max_rank
            )));
        }
    }
    Ok(())
}
