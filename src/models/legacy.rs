//! Normalization of historical employee record shapes.
//!
//! Stored employee records have accumulated several field-name variants over
//! time: camelCase and snake_case keys, the hire date either at the top level
//! or under `employment`, `"-"` or an empty string for "no first-upgrade
//! date", and prior-career records carrying `period`/`rate`/`workingHours`
//! instead of `originalPeriod`/`recognitionRate`/`weeklyWorkingHours`.
//!
//! [`LegacyEmployeeRecord`] accepts all of them, and
//! [`LegacyEmployeeRecord::into_employee`] is the single step that turns one
//! into a typed [`Employee`]. Nothing downstream looks at raw field names.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::career::DEFAULT_WEEKLY_WORKING_HOURS;
use super::{Assignment, Employee, NOT_APPLICABLE, Period, PriorCareerRecord, RankProfile, SalaryType};
use crate::calculation::{calculate_tenure, parse_date};
use crate::error::{EngineError, EngineResult};

/// An identifier stored either as text or as a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum LegacyId {
    Text(String),
    Number(i64),
}

impl LegacyId {
    fn into_string(self) -> String {
        match self {
            LegacyId::Text(text) => text,
            LegacyId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyEmployment {
    #[serde(default, alias = "entry_date")]
    entry_date: Option<String>,
    #[serde(default, alias = "retirement_date")]
    retirement_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyRank {
    #[serde(default, alias = "start_rank")]
    start_rank: Option<Value>,
    #[serde(default, alias = "first_upgrade_date")]
    first_upgrade_date: Option<String>,
    #[serde(default, alias = "is_rank_based")]
    is_rank_based: Option<bool>,
    #[serde(default, alias = "current_rank")]
    current_rank: Option<Value>,
    #[serde(default, alias = "next_upgrade_date")]
    next_upgrade_date: Option<String>,
    #[serde(default, alias = "salary_type")]
    salary_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyCareerRecord {
    #[serde(default, alias = "company")]
    organization: Option<String>,
    #[serde(default, alias = "start_date")]
    start_date: Option<String>,
    #[serde(default, alias = "end_date")]
    end_date: Option<String>,
    #[serde(default, alias = "original_period")]
    original_period: Option<Period>,
    #[serde(default)]
    period: Option<Period>,
    #[serde(default, alias = "recognition_rate")]
    recognition_rate: Option<Decimal>,
    #[serde(default)]
    rate: Option<Decimal>,
    #[serde(default, alias = "weekly_working_hours")]
    weekly_working_hours: Option<u32>,
    #[serde(default, alias = "working_hours")]
    working_hours: Option<u32>,
    #[serde(default, alias = "converted_period")]
    converted_period: Option<Period>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyAssignment {
    #[serde(default)]
    id: Option<LegacyId>,
    #[serde(default, alias = "start_date")]
    start_date: Option<String>,
    #[serde(default, alias = "end_date")]
    end_date: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default, alias = "weekly_working_hours", alias = "workingHours")]
    weekly_working_hours: Option<u32>,
    #[serde(default, alias = "payment_method")]
    payment_method: Option<String>,
    #[serde(default, alias = "prior_career_rates")]
    prior_career_rates: BTreeMap<String, Decimal>,
}

/// An employee record in any historical shape.
///
/// # Example
///
/// ```
/// use rank_engine::models::LegacyEmployeeRecord;
///
/// let json = r#"{
///     "id": "emp_001",
///     "employment": {"entryDate": "2020-01-10"},
///     "rank": {"startRank": 1, "firstUpgradeDate": "-", "salaryType": "호봉제"}
/// }"#;
/// let record: LegacyEmployeeRecord = serde_json::from_str(json).unwrap();
/// let employee = record.into_employee().unwrap();
/// assert_eq!(employee.id, "emp_001");
/// assert!(employee.rank.first_upgrade_date.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyEmployeeRecord {
    #[serde(default)]
    id: Option<LegacyId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "entry_date")]
    entry_date: Option<String>,
    #[serde(default, alias = "retirement_date")]
    retirement_date: Option<String>,
    #[serde(default)]
    employment: Option<LegacyEmployment>,
    #[serde(default)]
    rank: Option<LegacyRank>,
    #[serde(default, alias = "career_details")]
    career_details: Vec<LegacyCareerRecord>,
    #[serde(default)]
    assignments: Vec<LegacyAssignment>,
}

fn invalid_employee(field: &str, message: impl Into<String>) -> EngineError {
    EngineError::InvalidEmployee {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Parses an optional date where `"-"` and the empty string mean "none".
fn optional_date(value: Option<&str>) -> EngineResult<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) if text == NOT_APPLICABLE => Ok(None),
        Some(text) => parse_date(text).map(Some),
    }
}

/// Reads a step number stored as a number, a numeric string or `"-"`.
fn optional_rank(field: &str, value: Option<&Value>) -> EngineResult<Option<u32>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| invalid_employee(field, format!("expected a step number, got {}", n))),
        Some(Value::String(text)) => {
            let text = text.trim();
            if text.is_empty() || text == NOT_APPLICABLE {
                return Ok(None);
            }
            text.parse::<u32>()
                .map(Some)
                .map_err(|_| invalid_employee(field, format!("expected a step number, got '{}'", text)))
        }
        Some(other) => Err(invalid_employee(
            field,
            format!("expected a step number, got {}", other),
        )),
    }
}

fn salary_type(value: Option<&str>) -> EngineResult<SalaryType> {
    match value.map(str::trim) {
        None | Some("") => Ok(SalaryType::Stepped),
        Some("stepped" | "hobong" | "호봉제") => Ok(SalaryType::Stepped),
        Some("flat" | "annual" | "연봉제") => Ok(SalaryType::Flat),
        Some(other) => Err(invalid_employee(
            "salaryType",
            format!("unknown salary type '{}'", other),
        )),
    }
}

impl LegacyRank {
    fn into_profile(self) -> EngineResult<RankProfile> {
        Ok(RankProfile {
            start_rank: optional_rank("startRank", self.start_rank.as_ref())?.unwrap_or(1),
            first_upgrade_date: optional_date(self.first_upgrade_date.as_deref())?,
            is_rank_based: self.is_rank_based,
            current_rank: optional_rank("currentRank", self.current_rank.as_ref())?,
            next_upgrade_date: optional_date(self.next_upgrade_date.as_deref())?,
            salary_type: salary_type(self.salary_type.as_deref())?,
        })
    }
}

impl LegacyCareerRecord {
    fn into_record(self, index: usize) -> EngineResult<PriorCareerRecord> {
        let start_date = optional_date(self.start_date.as_deref())?;
        let end_date = optional_date(self.end_date.as_deref())?;

        let original_period = match (self.original_period.or(self.period), start_date, end_date) {
            (Some(period), _, _) => period,
            (None, Some(start), Some(end)) => calculate_tenure(start, end),
            _ => {
                return Err(EngineError::CareerDataInvalid {
                    field: format!("careerDetails[{}].originalPeriod", index),
                    message: "record has neither a period nor start and end dates".to_string(),
                });
            }
        };

        Ok(PriorCareerRecord {
            organization: self.organization,
            start_date,
            end_date,
            original_period,
            recognition_rate: self
                .recognition_rate
                .or(self.rate)
                .unwrap_or(Decimal::ONE_HUNDRED),
            weekly_working_hours: self
                .weekly_working_hours
                .or(self.working_hours)
                .unwrap_or(DEFAULT_WEEKLY_WORKING_HOURS),
            converted_period: self.converted_period,
        })
    }
}

impl LegacyAssignment {
    fn into_assignment(self, index: usize) -> EngineResult<Assignment> {
        let id = self
            .id
            .map(LegacyId::into_string)
            .unwrap_or_else(|| format!("assignment_{}", index));

        let start_date = optional_date(self.start_date.as_deref())?.ok_or_else(|| {
            EngineError::AssignmentDataInvalid {
                assignment_id: id.clone(),
                message: "missing start date".to_string(),
            }
        })?;
        let end_date = optional_date(self.end_date.as_deref())?;

        Ok(Assignment {
            id,
            start_date,
            end_date,
            department: self.department.unwrap_or_default(),
            position: self.position.unwrap_or_default(),
            weekly_working_hours: self
                .weekly_working_hours
                .unwrap_or(DEFAULT_WEEKLY_WORKING_HOURS),
            payment_method: self.payment_method.unwrap_or_default(),
            prior_career_rates: self.prior_career_rates,
        })
    }
}

impl LegacyEmployeeRecord {
    /// The record's identifier, if it carries one.
    pub fn id(&self) -> Option<String> {
        self.id.clone().map(LegacyId::into_string)
    }

    /// Migrates the record into a typed [`Employee`].
    ///
    /// # Errors
    ///
    /// - `InvalidEmployee` when the ID or entry date is missing, a step
    ///   number is not a number, or the salary type is unknown.
    /// - `DateInvalid` when a present date does not parse.
    /// - `CareerDataInvalid` when a career record has no period.
    /// - `AssignmentDataInvalid` when an assignment has no start date.
    pub fn into_employee(self) -> EngineResult<Employee> {
        let id = self
            .id
            .map(LegacyId::into_string)
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| invalid_employee("id", "missing employee id"))?;

        let employment = self.employment.unwrap_or_default();
        let entry_date = optional_date(self.entry_date.or(employment.entry_date).as_deref())?
            .ok_or_else(|| invalid_employee("entryDate", "missing entry date"))?;
        let retirement_date =
            optional_date(self.retirement_date.or(employment.retirement_date).as_deref())?;

        let rank = self.rank.unwrap_or_default().into_profile()?;

        let career_details = self
            .career_details
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_record(index))
            .collect::<EngineResult<Vec<_>>>()?;

        let assignments = self
            .assignments
            .into_iter()
            .enumerate()
            .map(|(index, assignment)| assignment.into_assignment(index))
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(Employee {
            id,
            name: self.name,
            entry_date,
            retirement_date,
            rank,
            career_details,
            assignments,
        })
    }
}

impl From<&Employee> for LegacyEmployeeRecord {
    fn from(employee: &Employee) -> Self {
        let date = |d: Option<NaiveDate>| d.map(|d| d.to_string());
        LegacyEmployeeRecord {
            id: Some(LegacyId::Text(employee.id.clone())),
            name: employee.name.clone(),
            entry_date: Some(employee.entry_date.to_string()),
            retirement_date: date(employee.retirement_date),
            employment: None,
            rank: Some(LegacyRank {
                start_rank: Some(Value::from(employee.rank.start_rank)),
                first_upgrade_date: date(employee.rank.first_upgrade_date),
                is_rank_based: employee.rank.is_rank_based,
                current_rank: employee.rank.current_rank.map(Value::from),
                next_upgrade_date: date(employee.rank.next_upgrade_date),
                salary_type: Some(
                    match employee.rank.salary_type {
                        SalaryType::Stepped => "stepped",
                        SalaryType::Flat => "flat",
                    }
                    .to_string(),
                ),
            }),
            career_details: employee
                .career_details
                .iter()
                .map(|record| LegacyCareerRecord {
                    organization: record.organization.clone(),
                    start_date: date(record.start_date),
                    end_date: date(record.end_date),
                    original_period: Some(record.original_period),
                    period: None,
                    recognition_rate: Some(record.recognition_rate),
                    rate: None,
                    weekly_working_hours: Some(record.weekly_working_hours),
                    working_hours: None,
                    converted_period: record.converted_period,
                })
                .collect(),
            assignments: employee
                .assignments
                .iter()
                .map(|assignment| LegacyAssignment {
                    id: Some(LegacyId::Text(assignment.id.clone())),
                    start_date: Some(assignment.start_date.to_string()),
                    end_date: date(assignment.end_date),
                    department: Some(assignment.department.clone()),
                    position: Some(assignment.position.clone()),
                    weekly_working_hours: Some(assignment.weekly_working_hours),
                    payment_method: Some(assignment.payment_method.clone()),
                    prior_career_rates: assignment.prior_career_rates.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn normalize(json: &str) -> EngineResult<Employee> {
        serde_json::from_str::<LegacyEmployeeRecord>(json)
            .unwrap()
            .into_employee()
    }

    #[test]
    fn test_nested_employment_entry_date() {
        let employee = normalize(
            r#"{"id": "emp_001", "employment": {"entryDate": "2019-04-01"}}"#,
        )
        .unwrap();
        assert_eq!(employee.entry_date, date(2019, 4, 1));
        assert_eq!(employee.rank.start_rank, 1);
        assert!(employee.rank.is_stepped());
    }

    #[test]
    fn test_top_level_entry_date_wins() {
        let employee = normalize(
            r#"{"id": 42, "entryDate": "2020-01-10", "employment": {"entryDate": "2018-01-01"}}"#,
        )
        .unwrap();
        assert_eq!(employee.id, "42");
        assert_eq!(employee.entry_date, date(2020, 1, 10));
    }

    #[test]
    fn test_dash_and_empty_first_upgrade_are_none() {
        for value in ["-", ""] {
            let json = format!(
                r#"{{"id": "e", "entryDate": "2020-01-10", "rank": {{"startRank": 2, "firstUpgradeDate": "{}"}}}}"#,
                value
            );
            let employee = normalize(&json).unwrap();
            assert_eq!(employee.rank.first_upgrade_date, None);
            assert_eq!(employee.rank.start_rank, 2);
        }
    }

    #[test]
    fn test_korean_salary_types() {
        let flat = normalize(
            r#"{"id": "e", "entryDate": "2020-01-10", "rank": {"salaryType": "연봉제", "currentRank": "-"}}"#,
        )
        .unwrap();
        assert_eq!(flat.rank.salary_type, SalaryType::Flat);
        assert_eq!(flat.rank.current_rank, None);

        let unknown = normalize(
            r#"{"id": "e", "entryDate": "2020-01-10", "rank": {"salaryType": "hourly"}}"#,
        );
        assert!(matches!(unknown, Err(EngineError::InvalidEmployee { .. })));
    }

    #[test]
    fn test_career_field_variants() {
        let employee = normalize(
            r#"{
                "id": "e",
                "entryDate": "2020-01-10",
                "careerDetails": [
                    {"period": {"years": 2}, "rate": 50, "workingHours": 20},
                    {"originalPeriod": {"years": 1, "months": 6}, "recognitionRate": "80"},
                    {"startDate": "2015-03-01", "endDate": "2016-04-11"}
                ]
            }"#,
        )
        .unwrap();

        let records = &employee.career_details;
        assert_eq!(records[0].original_period, Period::new(2, 0, 0));
        assert_eq!(records[0].recognition_rate, Decimal::from(50));
        assert_eq!(records[0].weekly_working_hours, 20);
        assert_eq!(records[1].recognition_rate, Decimal::from(80));
        assert_eq!(records[1].weekly_working_hours, 40);
        assert_eq!(records[2].original_period, Period::new(1, 1, 10));
        assert_eq!(records[2].recognition_rate, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_career_without_period_fails() {
        let result = normalize(
            r#"{"id": "e", "entryDate": "2020-01-10", "careerDetails": [{"rate": 50}]}"#,
        );
        assert!(matches!(result, Err(EngineError::CareerDataInvalid { .. })));
    }

    #[test]
    fn test_assignment_without_id_or_start() {
        let employee = normalize(
            r#"{
                "id": "e",
                "entryDate": "2020-01-10",
                "assignments": [{"startDate": "2020-01-10", "priorCareerRates": {}}]
            }"#,
        )
        .unwrap();
        assert_eq!(employee.assignments[0].id, "assignment_0");

        let missing = normalize(
            r#"{"id": "e", "entryDate": "2020-01-10", "assignments": [{"id": "asg_001"}]}"#,
        );
        match missing {
            Err(EngineError::AssignmentDataInvalid { assignment_id, .. }) => {
                assert_eq!(assignment_id, "asg_001")
            }
            other => panic!("Expected AssignmentDataInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_id_and_entry_date() {
        assert!(matches!(
            normalize(r#"{"entryDate": "2020-01-10"}"#),
            Err(EngineError::InvalidEmployee { ref field, .. }) if field == "id"
        ));
        assert!(matches!(
            normalize(r#"{"id": "e"}"#),
            Err(EngineError::InvalidEmployee { ref field, .. }) if field == "entryDate"
        ));
        assert!(matches!(
            normalize(r#"{"id": "e", "entryDate": "2020-02-30"}"#),
            Err(EngineError::DateInvalid { .. })
        ));
    }

    #[test]
    fn test_typed_employee_round_trips_through_adapter() {
        let mut employee = Employee {
            id: "emp_009".to_string(),
            name: Some("Kim".to_string()),
            entry_date: date(2021, 3, 2),
            retirement_date: None,
            rank: RankProfile::stepped(3, Some(date(2021, 9, 2))),
            career_details: vec![
                PriorCareerRecord::new(Period::new(1, 6, 0), Decimal::from(70)).with_weekly_hours(30),
            ],
            assignments: vec![Assignment::new("asg_001", date(2021, 3, 2), None)],
        };
        employee.rank.current_rank = Some(5);

        let from_serde: LegacyEmployeeRecord =
            serde_json::from_value(serde_json::to_value(&employee).unwrap()).unwrap();
        assert_eq!(from_serde.into_employee().unwrap(), employee);

        let from_ref = LegacyEmployeeRecord::from(&employee);
        assert_eq!(from_ref.into_employee().unwrap(), employee);
    }
}
