//! Internal assignment model.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::career::DEFAULT_WEEKLY_WORKING_HOURS;

fn default_weekly_working_hours() -> u32 {
    DEFAULT_WEEKLY_WORKING_HOURS
}

/// A bounded period of service within the organization.
///
/// The interval is half-open: `[start_date, end_date)`. An assignment with
/// no end date is the active one.
///
/// `prior_career_rates` maps the IDs of earlier assignments to the
/// percentage of their service this assignment recognizes. Earlier
/// assignments not listed keep their full value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Unique identifier within the employee.
    pub id: String,
    /// First day of the assignment.
    pub start_date: NaiveDate,
    /// Day the assignment ended; `None` while active.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Department name.
    #[serde(default)]
    pub department: String,
    /// Position title.
    #[serde(default)]
    pub position: String,
    /// Contracted weekly hours.
    #[serde(default = "default_weekly_working_hours")]
    pub weekly_working_hours: u32,
    /// How the assignment is paid (e.g., "monthly", "hourly").
    #[serde(default)]
    pub payment_method: String,
    /// Recognition percentage per earlier assignment ID.
    #[serde(default)]
    pub prior_career_rates: BTreeMap<String, Decimal>,
}

impl Assignment {
    /// Creates an assignment with full-time hours and no recognition rates.
    pub fn new(id: impl Into<String>, start_date: NaiveDate, end_date: Option<NaiveDate>) -> Self {
        Self {
            id: id.into(),
            start_date,
            end_date,
            department: String::new(),
            position: String::new(),
            weekly_working_hours: DEFAULT_WEEKLY_WORKING_HOURS,
            payment_method: String::new(),
            prior_career_rates: BTreeMap::new(),
        }
    }

    /// Records the recognition rate applied to an earlier assignment.
    pub fn with_prior_rate(mut self, assignment_id: impl Into<String>, rate: Decimal) -> Self {
        self.prior_career_rates.insert(assignment_id.into(), rate);
        self
    }

    /// Returns true while the assignment has no end date.
    pub fn is_active(&self) -> bool {
        self.end_date.is_none()
    }

    /// Returns true when any recorded rate is below 100%.
    pub fn has_partial_rate(&self) -> bool {
        self.prior_career_rates
            .values()
            .any(|rate| *rate < Decimal::ONE_HUNDRED)
    }
}
