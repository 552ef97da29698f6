//! Year/month/day periods under the fixed 365/30 day-count convention.

use std::fmt;
use std::ops::Neg;

use serde::{Deserialize, Serialize};

/// Days in a year for every day-count conversion.
pub const DAYS_PER_YEAR: i64 = 365;

/// Days in a month for every day-count conversion and day borrow.
pub const DAYS_PER_MONTH: i64 = 30;

/// A duration expressed as years, months and days.
///
/// Day counts always use 365-day years and 30-day months. This is not
/// calendar-accurate; stored seniority figures depend on it.
///
/// # Example
///
/// ```
/// use rank_engine::models::Period;
///
/// let period = Period::new(1, 2, 3);
/// assert_eq!(period.to_days(), 365 + 60 + 3);
/// assert_eq!(Period::from_days(428), period);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Whole years.
    #[serde(default)]
    pub years: i32,
    /// Months, 0..=11 once normalized.
    #[serde(default)]
    pub months: i32,
    /// Days, 0..=29 once normalized (up to 34 when months are capped at 11).
    #[serde(default)]
    pub days: i32,
}

impl Period {
    /// Creates a period from its components without normalizing.
    pub const fn new(years: i32, months: i32, days: i32) -> Self {
        Self {
            years,
            months,
            days,
        }
    }

    /// The empty period.
    pub const ZERO: Period = Period::new(0, 0, 0);

    /// Converts to a day count using 365-day years and 30-day months.
    pub fn to_days(&self) -> i64 {
        i64::from(self.years) * DAYS_PER_YEAR
            + i64::from(self.months) * DAYS_PER_MONTH
            + i64::from(self.days)
    }

    /// Splits a day count back into years, months and days.
    ///
    /// Months never exceed 11: the five days a 365-day year holds beyond
    /// twelve 30-day months stay in `days`. Negative counts produce a period
    /// whose components are all non-positive.
    pub fn from_days(total: i64) -> Self {
        if total < 0 {
            return -Self::from_days(-total);
        }
        let years = total / DAYS_PER_YEAR;
        let remainder = total % DAYS_PER_YEAR;
        let months = (remainder / DAYS_PER_MONTH).min(11);
        let days = remainder - months * DAYS_PER_MONTH;
        Self::new(years as i32, months as i32, days as i32)
    }

    /// Returns true when every component is zero.
    pub fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }

    /// Returns true when any component is negative.
    pub fn has_negative_component(&self) -> bool {
        self.years < 0 || self.months < 0 || self.days < 0
    }

    /// Adds component-wise without normalizing.
    pub fn add_components(&self, other: &Period) -> Period {
        Period::new(
            self.years + other.years,
            self.months + other.months,
            self.days + other.days,
        )
    }

    /// Carries days into months and months into years.
    ///
    /// 30 or more days carry into months; 12 or more months carry into years.
    pub fn normalize_carry(&self) -> Period {
        let mut years = self.years;
        let mut months = self.months;
        let mut days = self.days;

        if days >= DAYS_PER_MONTH as i32 {
            months += days / DAYS_PER_MONTH as i32;
            days %= DAYS_PER_MONTH as i32;
        }
        if months >= 12 {
            years += months / 12;
            months %= 12;
        }
        Period::new(years, months, days)
    }
}

impl Neg for Period {
    type Output = Period;

    fn neg(self) -> Period {
        Period::new(-self.years, -self.months, -self.days)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}y {}m {}d", self.years, self.months, self.days)
    }
}
