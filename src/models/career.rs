//! Prior-career records from external organizations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Period;

/// Full-time weekly hours assumed when a record does not say otherwise.
pub const DEFAULT_WEEKLY_WORKING_HOURS: u32 = 40;

fn default_weekly_working_hours() -> u32 {
    DEFAULT_WEEKLY_WORKING_HOURS
}

/// Service at an external organization, counted toward seniority at a
/// recognition rate and a part-time hours ratio.
///
/// # Example
///
/// ```
/// use rank_engine::models::{Period, PriorCareerRecord};
/// use rust_decimal::Decimal;
///
/// let record = PriorCareerRecord::new(Period::new(2, 0, 0), Decimal::from(50));
/// assert_eq!(record.weekly_working_hours, 40);
/// assert!(record.converted_period.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorCareerRecord {
    /// Name of the external organization.
    #[serde(default)]
    pub organization: Option<String>,
    /// First day at the external organization, when recorded.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day at the external organization, when recorded.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Actual elapsed duration of the service.
    pub original_period: Period,
    /// Percentage of the service recognized, 0 to 100.
    pub recognition_rate: Decimal,
    /// Weekly working hours, 1 to 40.
    #[serde(default = "default_weekly_working_hours")]
    pub weekly_working_hours: u32,
    /// Recognized-equivalent period saved with the record, if any.
    #[serde(default)]
    pub converted_period: Option<Period>,
}

impl PriorCareerRecord {
    /// Creates a full-time record with no stored conversion.
    pub fn new(original_period: Period, recognition_rate: Decimal) -> Self {
        Self {
            organization: None,
            start_date: None,
            end_date: None,
            original_period,
            recognition_rate,
            weekly_working_hours: DEFAULT_WEEKLY_WORKING_HOURS,
            converted_period: None,
        }
    }

    /// Sets the weekly working hours.
    pub fn with_weekly_hours(mut self, hours: u32) -> Self {
        self.weekly_working_hours = hours;
        self
    }
}
