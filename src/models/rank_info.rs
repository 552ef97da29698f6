//! Rank calculation result models.
//!
//! This module contains [`RankInfo`], the in-process result of a dynamic
//! rank calculation, and the wire types derived from it: [`RankInfoOutput`]
//! with its `"-"` sentinel, per-employee [`RankOutcome`]s and the
//! [`BatchRankResult`] mapping.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{EngineError, ErrorKind};

/// The literal used on the wire for "not applicable".
pub const NOT_APPLICABLE: &str = "-";

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// Which path produced a [`RankInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankSource {
    /// Computed from the stored start rank and first-upgrade date.
    Stored,
    /// Recomputed from career records and assignment recognition rates.
    Dynamic,
    /// Cached figures returned after a calculation error.
    Fallback,
    /// Flat-salary employee; no step figures apply.
    NotApplicable,
}

/// Per-employee rank figures as of one target date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankInfo {
    /// The employee these figures belong to.
    pub employee_id: String,
    /// The reference date the figures are valid for.
    pub target_date: NaiveDate,
    /// Step at hire.
    pub start_rank: u32,
    /// First step increase anniversary; `None` for the "none" sentinel.
    pub first_upgrade_date: Option<NaiveDate>,
    /// Step as of `target_date`.
    pub current_rank: u32,
    /// Next increase strictly after `target_date`.
    pub next_upgrade_date: Option<NaiveDate>,
    /// True when partial internal recognition changed the figures.
    pub adjusted: bool,
    /// Days of internal service not recognized.
    pub lost_days: Option<i64>,
    /// Entry date pushed forward by `lost_days`.
    pub adjusted_entry_date: Option<NaiveDate>,
    /// Which path produced these figures.
    pub source: RankSource,
    /// Decisions taken while computing the figures.
    #[serde(default)]
    pub audit_trace: Vec<AuditStep>,
}

impl RankInfo {
    /// Renders the wire form, substituting `"-"` for flat-salary employees.
    ///
    /// # Example
    ///
    /// ```
    /// use rank_engine::models::{RankField, RankInfo, RankSource};
    /// use chrono::NaiveDate;
    ///
    /// let info = RankInfo {
    ///     employee_id: "emp_001".to_string(),
    ///     target_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
    ///     start_rank: 1,
    ///     first_upgrade_date: None,
    ///     current_rank: 1,
    ///     next_upgrade_date: None,
    ///     adjusted: false,
    ///     lost_days: None,
    ///     adjusted_entry_date: None,
    ///     source: RankSource::NotApplicable,
    ///     audit_trace: vec![],
    /// };
    /// assert_eq!(info.to_output().current_rank, RankField::NotApplicable);
    /// ```
    pub fn to_output(&self) -> RankInfoOutput {
        if self.source == RankSource::NotApplicable {
            return RankInfoOutput::not_applicable();
        }
        RankInfoOutput {
            start_rank: RankField::Value(self.start_rank),
            first_upgrade_date: self.first_upgrade_date.into(),
            current_rank: RankField::Value(self.current_rank),
            next_upgrade_date: self.next_upgrade_date.into(),
            adjusted: self.adjusted,
            lost_days: self.lost_days,
            adjusted_entry_date: self.adjusted_entry_date,
        }
    }
}

/// A value that may be "not applicable", serialized as `"-"`.
///
/// Distinct from zero and from an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankField<T> {
    /// A concrete value.
    Value(T),
    /// The `"-"` sentinel.
    NotApplicable,
}

impl<T> RankField<T> {
    /// Returns the value, or `None` for the sentinel.
    pub fn value(&self) -> Option<&T> {
        match self {
            RankField::Value(v) => Some(v),
            RankField::NotApplicable => None,
        }
    }
}

impl<T> From<Option<T>> for RankField<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(RankField::NotApplicable, RankField::Value)
    }
}

impl<T: fmt::Display> fmt::Display for RankField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankField::Value(v) => v.fmt(f),
            RankField::NotApplicable => f.write_str(NOT_APPLICABLE),
        }
    }
}

impl<T: Serialize> Serialize for RankField<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RankField::Value(v) => v.serialize(serializer),
            RankField::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for RankField<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr<T> {
            Value(T),
            Text(String),
        }

        match Repr::<T>::deserialize(deserializer)? {
            Repr::Value(v) => Ok(RankField::Value(v)),
            Repr::Text(text) if text == NOT_APPLICABLE => Ok(RankField::NotApplicable),
            Repr::Text(text) => Err(serde::de::Error::custom(format!(
                "expected a value or \"{}\", got \"{}\"",
                NOT_APPLICABLE, text
            ))),
        }
    }
}

/// Rank figures in the form exchanged with UI, report and remote callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankInfoOutput {
    /// Step at hire, or `"-"`.
    pub start_rank: RankField<u32>,
    /// First-upgrade date, or `"-"`.
    pub first_upgrade_date: RankField<NaiveDate>,
    /// Current step, or `"-"`.
    pub current_rank: RankField<u32>,
    /// Next upgrade date, or `"-"`.
    pub next_upgrade_date: RankField<NaiveDate>,
    /// True when partial internal recognition changed the figures.
    pub adjusted: bool,
    /// Days of internal service not recognized (dynamic path only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lost_days: Option<i64>,
    /// Entry date pushed forward by `lost_days` (dynamic path only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted_entry_date: Option<NaiveDate>,
}

impl RankInfoOutput {
    /// The all-sentinel output of a flat-salary employee.
    pub fn not_applicable() -> Self {
        Self {
            start_rank: RankField::NotApplicable,
            first_upgrade_date: RankField::NotApplicable,
            current_rank: RankField::NotApplicable,
            next_upgrade_date: RankField::NotApplicable,
            adjusted: false,
            lost_days: None,
            adjusted_entry_date: None,
        }
    }
}

/// A failure reported as data rather than raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// The error discriminant.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl ErrorReport {
    /// Creates a report.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Report for an employee ID that appears more than once in a batch.
    pub fn duplicate(key: &str) -> Self {
        Self::new(
            ErrorKind::InvalidEmployee,
            format!("employee id {} appears more than once in the batch", key),
        )
    }
}

impl From<&EngineError> for ErrorReport {
    fn from(error: &EngineError) -> Self {
        Self::new(error.kind(), error.to_string())
    }
}

/// The result for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RankOutcome {
    /// Figures computed (or degraded to stored values).
    Ok(RankInfoOutput),
    /// The employee could not be processed.
    Error(ErrorReport),
}

impl RankOutcome {
    /// Returns the figures when the outcome is successful.
    pub fn output(&self) -> Option<&RankInfoOutput> {
        match self {
            RankOutcome::Ok(output) => Some(output),
            RankOutcome::Error(_) => None,
        }
    }
}

impl From<Result<RankInfo, EngineError>> for RankOutcome {
    fn from(result: Result<RankInfo, EngineError>) -> Self {
        match result {
            Ok(info) => RankOutcome::Ok(info.to_output()),
            Err(error) => RankOutcome::Error(ErrorReport::from(&error)),
        }
    }
}

/// Results for many employees sharing one target date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRankResult {
    /// The shared reference date.
    pub target_date: NaiveDate,
    /// Outcome per employee ID.
    pub results: BTreeMap<String, RankOutcome>,
}

impl BatchRankResult {
    /// Creates an empty batch for the given date.
    pub fn new(target_date: NaiveDate) -> Self {
        Self {
            target_date,
            results: BTreeMap::new(),
        }
    }

    /// Adds an outcome under `key`.
    ///
    /// A key seen twice in one batch is ambiguous: whatever was recorded
    /// under it becomes an `INVALID_EMPLOYEE` error naming the duplicate.
    pub fn record(&mut self, key: String, outcome: RankOutcome) {
        match self.results.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(outcome);
            }
            Entry::Occupied(mut slot) => {
                let report = ErrorReport::duplicate(slot.key());
                slot.insert(RankOutcome::Error(report));
            }
        }
    }

    /// Number of failed employees.
    pub fn failure_count(&self) -> usize {
        self.results
            .values()
            .filter(|outcome| matches!(outcome, RankOutcome::Error(_)))
            .count()
    }
}
