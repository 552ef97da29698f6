//! Recognized service across internal assignments.
//!
//! Each assignment may recognize only part of the service accrued in the
//! assignments before it. An assignment's own time always counts in full;
//! its `prior_career_rates` only discount the earlier segments. When several
//! later assignments discount the same earlier segment the rates compound.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{Assignment, Employee};

use super::tenure::tenure_days;

/// Recognition figures for one assignment segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalCareerDetail {
    /// The assignment that owns the segment.
    pub assignment_id: String,
    /// Segment start, clipped to the entry date.
    pub start_date: NaiveDate,
    /// Segment end, clipped to the target date.
    pub end_date: NaiveDate,
    /// Effective recognition percentage after every later assignment's rate.
    pub rate: Decimal,
    /// Elapsed days in the segment (365/30 convention).
    pub raw_days: i64,
    /// `floor(raw_days * rate / 100)`.
    pub recognized_days: i64,
}

impl InternalCareerDetail {
    /// Days of the segment that are not recognized.
    pub fn lost_days(&self) -> i64 {
        self.raw_days - self.recognized_days
    }
}

/// Internal service as of a target date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalCareerResult {
    /// Recognized days from entry to the target date.
    pub total_days: i64,
    /// Calendar tenure from entry to the target date (365/30 convention).
    pub original_days: i64,
    /// Per-segment figures, in start-date order.
    pub details: Vec<InternalCareerDetail>,
    /// True when every segment was recognized at 100%.
    pub all_full_rate: bool,
}

impl InternalCareerResult {
    /// Days lost to partial recognition.
    pub fn lost_days(&self) -> i64 {
        self.original_days - self.total_days
    }
}

fn invalid(assignment: &Assignment, message: impl Into<String>) -> EngineError {
    EngineError::AssignmentDataInvalid {
        assignment_id: assignment.id.clone(),
        message: message.into(),
    }
}

/// Validates assignments and returns them ordered by start date.
///
/// # Errors
///
/// `AssignmentDataInvalid` when an assignment ends before it starts, two
/// assignments share an ID or overlap, a rate is outside 0..=100, or a rate
/// names an assignment that does not start earlier.
pub fn validate_assignments(assignments: &[Assignment]) -> EngineResult<Vec<&Assignment>> {
    let mut sorted: Vec<&Assignment> = assignments.iter().collect();
    sorted.sort_by_key(|a| a.start_date);

    let mut seen: HashSet<&str> = HashSet::with_capacity(sorted.len());
    let mut previous: Option<&Assignment> = None;

    for assignment in &sorted {
        if let Some(end) = assignment.end_date {
            if end < assignment.start_date {
                return Err(invalid(
                    assignment,
                    format!("ends {} before it starts {}", end, assignment.start_date),
                ));
            }
        }

        if let Some(prev) = previous {
            let overlaps = match prev.end_date {
                Some(prev_end) => assignment.start_date < prev_end,
                None => true,
            };
            if overlaps {
                return Err(invalid(assignment, format!("overlaps {}", prev.id)));
            }
        }

        for (referenced, rate) in &assignment.prior_career_rates {
            if *rate < Decimal::ZERO || *rate > Decimal::ONE_HUNDRED {
                return Err(invalid(
                    assignment,
                    format!("rate for {} must be between 0 and 100, got {}", referenced, rate),
                ));
            }
            if !seen.contains(referenced.as_str()) {
                return Err(invalid(
                    assignment,
                    format!("rate refers to {}, which is not an earlier assignment", referenced),
                ));
            }
        }

        if !seen.insert(assignment.id.as_str()) {
            return Err(invalid(assignment, "duplicate assignment id"));
        }
        previous = Some(assignment);
    }

    Ok(sorted)
}

/// Returns true when an assignment started by `target_date` recognizes
/// earlier service at less than 100%.
pub fn requires_dynamic(employee: &Employee, target_date: NaiveDate) -> bool {
    employee
        .assignments
        .iter()
        .filter(|a| a.start_date <= target_date)
        .any(Assignment::has_partial_rate)
}

/// Computes recognized internal service from entry to `target_date`.
///
/// Each assignment started on or before `target_date` contributes one
/// segment clipped to `[entry_date, target_date]`. A segment's effective
/// rate is the product of the rates every later started assignment records
/// for it (100% when not recorded).
///
/// Time not covered by any assignment counts in full, so `total_days` is
/// the calendar tenure minus the days lost in discounted segments. With
/// every rate at 100% it equals `tenure_days(entry_date, target_date)`.
///
/// # Errors
///
/// `AssignmentDataInvalid` per [`validate_assignments`].
pub fn calculate_with_prior_career_rate(
    employee: &Employee,
    target_date: NaiveDate,
) -> EngineResult<InternalCareerResult> {
    let sorted = validate_assignments(&employee.assignments)?;
    let started: Vec<&Assignment> = sorted
        .into_iter()
        .filter(|a| a.start_date <= target_date)
        .collect();

    let mut details = Vec::with_capacity(started.len());
    for (index, assignment) in started.iter().enumerate() {
        let factor = started[index + 1..]
            .iter()
            .filter_map(|later| later.prior_career_rates.get(&assignment.id))
            .fold(Decimal::ONE, |acc, rate| acc * *rate / Decimal::ONE_HUNDRED);

        let start_date = assignment.start_date.max(employee.entry_date);
        let end_date = assignment
            .end_date
            .map_or(target_date, |end| end.min(target_date));
        let raw_days = if end_date > start_date {
            tenure_days(start_date, end_date)
        } else {
            0
        };

        let recognized = (Decimal::from(raw_days) * factor).floor();
        let recognized_days = recognized.to_i64().ok_or_else(|| {
            invalid(assignment, format!("recognized day count {} is out of range", recognized))
        })?;

        details.push(InternalCareerDetail {
            assignment_id: assignment.id.clone(),
            start_date,
            end_date,
            rate: factor * Decimal::ONE_HUNDRED,
            raw_days,
            recognized_days,
        });
    }

    let original_days = tenure_days(employee.entry_date, target_date);
    let lost: i64 = details.iter().map(InternalCareerDetail::lost_days).sum();
    let all_full_rate = details.iter().all(|d| d.rate == Decimal::ONE_HUNDRED);

    debug!(
        employee_id = %employee.id,
        target_date = %target_date,
        segments = details.len(),
        original_days,
        lost_days = lost,
        "Calculated internal career"
    );

    Ok(InternalCareerResult {
        total_days: original_days - lost,
        original_days,
        details,
        all_full_rate,
    })
}
