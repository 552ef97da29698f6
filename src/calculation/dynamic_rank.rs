//! Per-employee rank figures as of a target date.
//!
//! Two paths produce the same [`RankInfo`] shape:
//!
//! - the **stored** path reads `(start_rank, first_upgrade_date)` from the
//!   employee and only advances them to the target date;
//! - the **dynamic** path rebuilds both from prior-career records and
//!   internal recognition rates, and runs only when some assignment started
//!   by the target date recognizes earlier service at less than 100%.
//!
//! With every rate at 100% both paths agree exactly, so the stored path is
//! a shortcut and never a different answer.
//!
//! Calculation errors are returned as values. [`UsePrevious::or_stored`]
//! turns a recoverable error into the stored figures advanced to the target.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::config::RankRules;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, BatchRankResult, Employee, RankInfo, RankOutcome, RankSource};

use super::career::sum_career_periods;
use super::date_utils::add_days_to;
use super::internal_career::{calculate_with_prior_career_rate, requires_dynamic};
use super::rank::{
    calculate_current_rank, calculate_first_upgrade_date, calculate_next_upgrade_date,
    validate_rank_inputs,
};

/// Collects audit steps with sequential numbering.
#[derive(Debug, Default)]
struct AuditTrace {
    steps: Vec<AuditStep>,
}

impl AuditTrace {
    fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: impl Into<String>,
    ) {
        self.steps.push(AuditStep {
            step_number: self.steps.len() as u32 + 1,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            input,
            output,
            reasoning: reasoning.into(),
        });
    }

    fn into_steps(self) -> Vec<AuditStep> {
        self.steps
    }
}

fn progression(
    trace: &mut AuditTrace,
    start_rank: u32,
    first_upgrade_date: Option<NaiveDate>,
    target_date: NaiveDate,
    rules: &RankRules,
) -> EngineResult<(u32, Option<NaiveDate>)> {
    let current_rank = calculate_current_rank(start_rank, first_upgrade_date, target_date, rules);
    let next_upgrade_date = calculate_next_upgrade_date(first_upgrade_date, target_date, rules)?;

    trace.record(
        "rank_progression",
        "Step Progression",
        serde_json::json!({
            "start_rank": start_rank,
            "first_upgrade_date": first_upgrade_date.map(|d| d.to_string()),
            "target_date": target_date.to_string(),
            "upgrade_interval_years": rules.upgrade_interval_years
        }),
        serde_json::json!({
            "current_rank": current_rank,
            "next_upgrade_date": next_upgrade_date.map(|d| d.to_string())
        }),
        format!(
            "Step {} as of {}, {} step(s) above the start rank",
            current_rank,
            target_date,
            current_rank - start_rank
        ),
    );

    Ok((current_rank, next_upgrade_date))
}

fn not_applicable(employee: &Employee, target_date: NaiveDate) -> RankInfo {
    let mut trace = AuditTrace::default();
    trace.record(
        "salary_track",
        "Salary Track Check",
        serde_json::json!({
            "salary_type": employee.rank.salary_type,
            "is_rank_based": employee.rank.is_rank_based
        }),
        serde_json::json!({ "applicable": false }),
        "Employee is not on the stepped salary track",
    );

    RankInfo {
        employee_id: employee.id.clone(),
        target_date,
        start_rank: employee.rank.start_rank,
        first_upgrade_date: None,
        current_rank: employee.rank.start_rank,
        next_upgrade_date: None,
        adjusted: false,
        lost_days: None,
        adjusted_entry_date: None,
        source: RankSource::NotApplicable,
        audit_trace: trace.into_steps(),
    }
}

/// Advances the stored `(start_rank, first_upgrade_date)` to `target_date`.
///
/// # Errors
///
/// `RankCalculationError` when the stored figures fail
/// [`validate_rank_inputs`] or the next anniversary is out of range.
pub fn calculate_stored_rank(
    employee: &Employee,
    target_date: NaiveDate,
    rules: &RankRules,
) -> EngineResult<RankInfo> {
    let profile = &employee.rank;
    validate_rank_inputs(
        employee.entry_date,
        profile.start_rank,
        profile.first_upgrade_date,
        rules,
    )?;

    let mut trace = AuditTrace::default();
    trace.record(
        "stored_figures",
        "Stored Figures",
        serde_json::json!({ "employee_id": employee.id }),
        serde_json::json!({
            "start_rank": profile.start_rank,
            "first_upgrade_date": profile.first_upgrade_date.map(|d| d.to_string())
        }),
        "No partial internal recognition; stored figures apply",
    );

    let (current_rank, next_upgrade_date) = progression(
        &mut trace,
        profile.start_rank,
        profile.first_upgrade_date,
        target_date,
        rules,
    )?;

    Ok(RankInfo {
        employee_id: employee.id.clone(),
        target_date,
        start_rank: profile.start_rank,
        first_upgrade_date: profile.first_upgrade_date,
        current_rank,
        next_upgrade_date,
        adjusted: false,
        lost_days: None,
        adjusted_entry_date: None,
        source: RankSource::Stored,
        audit_trace: trace.into_steps(),
    })
}

/// Rebuilds the step position from career data as of `target_date`.
///
/// 1. Internal service is recognized per assignment rates.
/// 2. The days lost push the entry date forward.
/// 3. Prior-career records are summed and carried.
/// 4. `start_rank = 1 + whole prior years`.
/// 5. The first upgrade is derived from the adjusted entry date.
/// 6. Current step and next upgrade follow from 4 and 5.
///
/// # Errors
///
/// Any calculation-layer error from the steps above.
pub fn calculate_dynamic_rank(
    employee: &Employee,
    target_date: NaiveDate,
    rules: &RankRules,
) -> EngineResult<RankInfo> {
    let mut trace = AuditTrace::default();

    let internal = calculate_with_prior_career_rate(employee, target_date)?;
    let lost_days = internal.lost_days();
    trace.record(
        "internal_career",
        "Internal Career Recognition",
        serde_json::json!({
            "entry_date": employee.entry_date.to_string(),
            "assignments": internal.details.len()
        }),
        serde_json::json!({
            "original_days": internal.original_days,
            "total_days": internal.total_days,
            "lost_days": lost_days
        }),
        format!(
            "{} of {} internal days recognized",
            internal.total_days, internal.original_days
        ),
    );

    let adjusted_entry_date = add_days_to(employee.entry_date, lost_days)?;
    trace.record(
        "adjusted_entry",
        "Adjusted Entry Date",
        serde_json::json!({
            "entry_date": employee.entry_date.to_string(),
            "lost_days": lost_days
        }),
        serde_json::json!({ "adjusted_entry_date": adjusted_entry_date.to_string() }),
        format!("Entry date moved forward by {} days", lost_days),
    );

    let past = sum_career_periods(&employee.career_details, rules)?;
    let prior_years = u32::try_from(past.years)
        .map_err(|_| EngineError::rank(format!("recognized prior service is negative: {}", past)))?;
    let start_rank = prior_years.saturating_add(1);
    trace.record(
        "prior_career",
        "Prior Career Recognition",
        serde_json::json!({ "records": employee.career_details.len() }),
        serde_json::json!({
            "years": past.years,
            "months": past.months,
            "days": past.days,
            "start_rank": start_rank
        }),
        format!("{} of recognized prior service gives start step {}", past, start_rank),
    );

    let first_upgrade_date =
        calculate_first_upgrade_date(adjusted_entry_date, past.years, past.months, past.days, rules)?;
    trace.record(
        "first_upgrade",
        "First Upgrade Date",
        serde_json::json!({
            "adjusted_entry_date": adjusted_entry_date.to_string(),
            "prior": past.to_string()
        }),
        serde_json::json!({ "first_upgrade_date": first_upgrade_date.to_string() }),
        "One interval after the adjusted entry, shortened by prior service",
    );

    let (current_rank, next_upgrade_date) = progression(
        &mut trace,
        start_rank,
        Some(first_upgrade_date),
        target_date,
        rules,
    )?;

    Ok(RankInfo {
        employee_id: employee.id.clone(),
        target_date,
        start_rank,
        first_upgrade_date: Some(first_upgrade_date),
        current_rank,
        next_upgrade_date,
        adjusted: true,
        lost_days: Some(lost_days),
        adjusted_entry_date: Some(adjusted_entry_date),
        source: RankSource::Dynamic,
        audit_trace: trace.into_steps(),
    })
}

/// Computes rank figures, choosing the stored or dynamic path.
///
/// Flat-salary employees get a [`RankSource::NotApplicable`] result.
pub fn calculate_rank_info(
    employee: &Employee,
    target_date: NaiveDate,
    rules: &RankRules,
) -> EngineResult<RankInfo> {
    if !employee.rank.is_stepped() {
        return Ok(not_applicable(employee, target_date));
    }

    if requires_dynamic(employee, target_date) {
        debug!(employee_id = %employee.id, target_date = %target_date, "Using dynamic rank path");
        calculate_dynamic_rank(employee, target_date, rules)
    } else {
        debug!(employee_id = %employee.id, target_date = %target_date, "Using stored rank path");
        calculate_stored_rank(employee, target_date, rules)
    }
}

/// The "use previous" combinator for rank results.
pub trait UsePrevious {
    /// Replaces a recoverable error with the employee's stored figures.
    ///
    /// The stored `(start_rank, first_upgrade_date)` are advanced to
    /// `target_date` first. Only when they are unusable too are the cached
    /// `current_rank` and `next_upgrade_date` returned as saved. Either way
    /// the result carries `adjusted: false` and [`RankSource::Fallback`].
    /// Non-recoverable errors, and employees with nothing usable stored,
    /// keep the original error.
    fn or_stored(
        self,
        employee: &Employee,
        target_date: NaiveDate,
        rules: &RankRules,
    ) -> EngineResult<RankInfo>;
}

impl UsePrevious for EngineResult<RankInfo> {
    fn or_stored(
        self,
        employee: &Employee,
        target_date: NaiveDate,
        rules: &RankRules,
    ) -> EngineResult<RankInfo> {
        let error = match self {
            Ok(info) => return Ok(info),
            Err(error) if !error.is_recoverable() => return Err(error),
            Err(error) => error,
        };

        let mut trace = AuditTrace::default();
        trace.record(
            "stored_fallback",
            "Stored Figures Fallback",
            serde_json::json!({ "error": error.to_string() }),
            serde_json::json!({
                "start_rank": employee.rank.start_rank,
                "first_upgrade_date": employee.rank.first_upgrade_date.map(|d| d.to_string())
            }),
            "Calculation failed; stored figures are advanced to the target date",
        );

        if let Ok(stored) = calculate_stored_rank(employee, target_date, rules) {
            warn!(
                employee_id = %employee.id,
                target_date = %target_date,
                error = %error,
                "Rank calculation failed, using stored figures"
            );
            let mut steps = trace.into_steps();
            steps.extend(stored.audit_trace.into_iter().map(|mut step| {
                step.step_number += 1;
                step
            }));
            return Ok(RankInfo {
                source: RankSource::Fallback,
                audit_trace: steps,
                ..stored
            });
        }

        let profile = &employee.rank;
        let Some(cached_rank) = profile.current_rank else {
            warn!(
                employee_id = %employee.id,
                target_date = %target_date,
                error = %error,
                "Rank calculation failed and no stored figures exist"
            );
            return Err(error);
        };

        warn!(
            employee_id = %employee.id,
            target_date = %target_date,
            error = %error,
            "Rank calculation failed, using figures from the last save"
        );
        trace.record(
            "cached_figures",
            "Cached Figures",
            serde_json::json!({ "employee_id": employee.id }),
            serde_json::json!({
                "current_rank": cached_rank,
                "next_upgrade_date": profile.next_upgrade_date.map(|d| d.to_string())
            }),
            "Stored figures are invalid; figures from the last save are returned",
        );

        Ok(RankInfo {
            employee_id: employee.id.clone(),
            target_date,
            start_rank: profile.start_rank,
            first_upgrade_date: profile.first_upgrade_date,
            current_rank: cached_rank,
            next_upgrade_date: profile.next_upgrade_date,
            adjusted: false,
            lost_days: None,
            adjusted_entry_date: None,
            source: RankSource::Fallback,
            audit_trace: trace.into_steps(),
        })
    }
}

/// [`calculate_rank_info`] degraded to stored figures on recoverable errors.
pub fn rank_info_or_stored(
    employee: &Employee,
    target_date: NaiveDate,
    rules: &RankRules,
) -> EngineResult<RankInfo> {
    calculate_rank_info(employee, target_date, rules).or_stored(employee, target_date, rules)
}

/// Computes every employee against one target date.
///
/// A failing employee becomes an error outcome; the others are unaffected.
pub fn calculate_batch(
    employees: &[Employee],
    target_date: NaiveDate,
    rules: &RankRules,
) -> BatchRankResult {
    let mut batch = BatchRankResult::new(target_date);
    for employee in employees {
        let outcome = RankOutcome::from(rank_info_or_stored(employee, target_date, rules));
        batch.record(employee.id.clone(), outcome);
    }

    debug!(
        target_date = %target_date,
        employees = employees.len(),
        failures = batch.failure_count(),
        "Calculated rank batch"
    );
    batch
}
