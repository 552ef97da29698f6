//! Employee model and related types.
//!
//! Only the fields the tenure and pay-step calculations read are modeled.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Assignment, PriorCareerRecord};

/// The salary track an employee is paid on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryType {
    /// Pay steps advance with seniority (hobong).
    #[default]
    Stepped,
    /// Fixed salary; step figures do not apply.
    Flat,
}

/// Pay-step data stored on an employee.
///
/// `start_rank` and `first_upgrade_date` fully describe the step position.
/// `current_rank` and `next_upgrade_date` are caches written at the last
/// save and may be stale relative to any later reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankProfile {
    /// Step assigned at hire.
    pub start_rank: u32,
    /// Anniversary of the first step increase; `None` is the "none" sentinel.
    pub first_upgrade_date: Option<NaiveDate>,
    /// Explicit stepped-track flag; `None` when never recorded.
    #[serde(default)]
    pub is_rank_based: Option<bool>,
    /// Cached step as of the last save.
    #[serde(default)]
    pub current_rank: Option<u32>,
    /// Cached next upgrade date as of the last save.
    #[serde(default)]
    pub next_upgrade_date: Option<NaiveDate>,
    /// Salary track.
    #[serde(default)]
    pub salary_type: SalaryType,
}

impl RankProfile {
    /// Creates a stepped profile with no cached figures.
    pub fn stepped(start_rank: u32, first_upgrade_date: Option<NaiveDate>) -> Self {
        Self {
            start_rank,
            first_upgrade_date,
            is_rank_based: Some(true),
            current_rank: None,
            next_upgrade_date: None,
            salary_type: SalaryType::Stepped,
        }
    }

    /// Returns true when step figures apply to this employee.
    ///
    /// An explicit `is_rank_based: false` overrides a stepped salary type.
    pub fn is_stepped(&self) -> bool {
        self.salary_type == SalaryType::Stepped && self.is_rank_based != Some(false)
    }

    /// Returns true when the last save left derived figures to fall back to.
    pub fn has_cached_figures(&self) -> bool {
        self.current_rank.is_some()
    }
}

/// An employee as seen by the rank engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Organization hire date.
    pub entry_date: NaiveDate,
    /// Set once the employee has left.
    #[serde(default)]
    pub retirement_date: Option<NaiveDate>,
    /// Stored pay-step data.
    pub rank: RankProfile,
    /// External prior-career records, in entry order.
    #[serde(default)]
    pub career_details: Vec<PriorCareerRecord>,
    /// Internal assignments, in entry order.
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

impl Employee {
    /// Returns true once a retirement date is recorded.
    pub fn is_retired(&self) -> bool {
        self.retirement_date.is_some()
    }
}
