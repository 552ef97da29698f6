//! Conversion of external prior-career records into recognized seniority.
//!
//! A record's raw period is scaled by its recognition rate first and by its
//! weekly-hours ratio second, flooring to whole days after each step. The
//! order matters: a single combined ratio rounds differently.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use crate::config::RankRules;
use crate::error::{EngineError, EngineResult};
use crate::models::{Period, PriorCareerRecord};

/// Converts a raw prior-career period into its recognized equivalent.
///
/// 1. `recognized = floor(raw_days * rate / 100)`
/// 2. `converted = floor(recognized * weekly_hours / standard_weekly_hours)`
/// 3. `converted` is split back into years, months and days (365/30).
///
/// A 100% rate at full-time hours returns `period` unchanged.
///
/// # Errors
///
/// `CareerDataInvalid` when the rate is outside 0..=100, the hours are
/// outside 1..=standard weekly hours, or the period has a negative component.
///
/// # Example
///
/// ```
/// use rank_engine::calculation::apply_conversion_rate;
/// use rank_engine::config::RankRules;
/// use rank_engine::models::Period;
/// use rust_decimal::Decimal;
///
/// let rules = RankRules::default();
/// let converted =
///     apply_conversion_rate(&Period::new(2, 0, 0), Decimal::from(50), 40, &rules).unwrap();
/// assert_eq!(converted, Period::new(1, 0, 0));
/// ```
pub fn apply_conversion_rate(
    period: &Period,
    recognition_rate: Decimal,
    weekly_hours: u32,
    rules: &RankRules,
) -> EngineResult<Period> {
    validate_conversion_inputs(period, recognition_rate, weekly_hours, rules)?;

    let standard_hours = rules.standard_weekly_hours;
    if recognition_rate == Decimal::ONE_HUNDRED && weekly_hours == standard_hours {
        return Ok(*period);
    }

    let raw_days = Decimal::from(period.to_days());
    let recognized_days = (raw_days * recognition_rate / Decimal::ONE_HUNDRED).floor();
    let converted_days =
        (recognized_days * Decimal::from(weekly_hours) / Decimal::from(standard_hours)).floor();

    let converted_days = converted_days
        .to_i64()
        .ok_or_else(|| EngineError::CareerDataInvalid {
            field: "original_period".to_string(),
            message: format!("converted day count {} is out of range", converted_days),
        })?;

    debug!(
        raw_days = %raw_days,
        recognition_rate = %recognition_rate,
        weekly_hours,
        converted_days,
        "Converted prior career period"
    );

    Ok(Period::from_days(converted_days))
}

fn validate_conversion_inputs(
    period: &Period,
    recognition_rate: Decimal,
    weekly_hours: u32,
    rules: &RankRules,
) -> EngineResult<()> {
    if rules.standard_weekly_hours == 0 {
        return Err(EngineError::CareerDataInvalid {
            field: "standard_weekly_hours".to_string(),
            message: "must be positive".to_string(),
        });
    }
    if recognition_rate < Decimal::ZERO || recognition_rate > Decimal::ONE_HUNDRED {
        return Err(EngineError::CareerDataInvalid {
            field: "recognition_rate".to_string(),
            message: format!("must be between 0 and 100, got {}", recognition_rate),
        });
    }
    if weekly_hours < 1 || weekly_hours > rules.standard_weekly_hours {
        return Err(EngineError::CareerDataInvalid {
            field: "weekly_working_hours".to_string(),
            message: format!(
                "must be between 1 and {}, got {}",
                rules.standard_weekly_hours, weekly_hours
            ),
        });
    }
    if period.has_negative_component() {
        return Err(EngineError::CareerDataInvalid {
            field: "original_period".to_string(),
            message: format!("components must not be negative, got {}", period),
        });
    }
    Ok(())
}

/// Converts a record using its own rate and hours.
pub fn convert_record(record: &PriorCareerRecord, rules: &RankRules) -> EngineResult<Period> {
    apply_conversion_rate(
        &record.original_period,
        record.recognition_rate,
        record.weekly_working_hours,
        rules,
    )
}

/// Sums the recognized periods of all records.
///
/// A record's stored `converted_period` is used as-is when present, so
/// figures saved under earlier rounding stay stable. The sum is carried:
/// 30 or more days become months and 12 or more months become years.
///
/// # Example
///
/// ```
/// use rank_engine::calculation::sum_career_periods;
/// use rank_engine::config::RankRules;
/// use rank_engine::models::{Period, PriorCareerRecord};
/// use rust_decimal::Decimal;
///
/// let records = vec![
///     PriorCareerRecord::new(Period::new(0, 8, 20), Decimal::ONE_HUNDRED),
///     PriorCareerRecord::new(Period::new(0, 5, 15), Decimal::ONE_HUNDRED),
/// ];
/// let total = sum_career_periods(&records, &RankRules::default()).unwrap();
/// assert_eq!(total, Period::new(1, 2, 5));
/// ```
pub fn sum_career_periods(
    records: &[PriorCareerRecord],
    rules: &RankRules,
) -> EngineResult<Period> {
    let mut total = Period::ZERO;
    for record in records {
        let converted = match record.converted_period {
            Some(stored) => stored,
            None => convert_record(record, rules)?,
        };
        total = total.add_components(&converted);
    }
    Ok(total.normalize_carry())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn rules() -> RankRules {
        RankRules::default()
    }

    #[test]
    fn test_full_rate_full_time_is_identity() {
        let period = Period::new(3, 7, 12);
        let converted = apply_conversion_rate(&period, dec(100), 40, &rules()).unwrap();
        assert_eq!(converted, period);
    }

    #[test]
    fn test_half_rate_two_years_is_one_year() {
        let converted = apply_conversion_rate(&Period::new(2, 0, 0), dec(50), 40, &rules()).unwrap();
        assert_eq!(converted, Period::new(1, 0, 0));
    }

    #[test]
    fn test_half_time_hours_halves_period() {
        let converted = apply_conversion_rate(&Period::new(2, 0, 0), dec(100), 20, &rules()).unwrap();
        assert_eq!(converted, Period::new(1, 0, 0));
    }

    #[test]
    fn test_rate_then_hours_floors_each_step() {
        // 37 days: floor(37 * 0.7) = 25, then floor(25 * 30 / 40) = 18.
        // A combined ratio would give floor(37 * 0.525) = 19.
        let converted = apply_conversion_rate(&Period::new(0, 1, 7), dec(70), 30, &rules()).unwrap();
        assert_eq!(converted, Period::new(0, 0, 18));
    }

    #[test]
    fn test_fractional_rate() {
        // 365 * 33.3% = 121.545 -> 121 days = 4 months 1 day.
        let rate = Decimal::new(333, 1);
        let converted = apply_conversion_rate(&Period::new(1, 0, 0), rate, 40, &rules()).unwrap();
        assert_eq!(converted, Period::new(0, 4, 1));
    }

    #[test]
    fn test_zero_rate_is_zero_period() {
        let converted = apply_conversion_rate(&Period::new(5, 0, 0), dec(0), 40, &rules()).unwrap();
        assert_eq!(converted, Period::ZERO);
    }

    #[test]
    fn test_rate_out_of_range_fails() {
        for rate in [dec(-1), dec(101)] {
            match apply_conversion_rate(&Period::new(1, 0, 0), rate, 40, &rules()) {
                Err(EngineError::CareerDataInvalid { field, .. }) => {
                    assert_eq!(field, "recognition_rate")
                }
                other => panic!("Expected CareerDataInvalid, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_hours_out_of_range_fails() {
        for hours in [0, 41] {
            match apply_conversion_rate(&Period::new(1, 0, 0), dec(100), hours, &rules()) {
                Err(EngineError::CareerDataInvalid { field, .. }) => {
                    assert_eq!(field, "weekly_working_hours")
                }
                other => panic!("Expected CareerDataInvalid, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_negative_period_fails() {
        let result = apply_conversion_rate(&Period::new(0, -1, 0), dec(100), 40, &rules());
        assert!(matches!(result, Err(EngineError::CareerDataInvalid { .. })));
    }

    #[test]
    fn test_sum_prefers_stored_conversion() {
        let mut stored = PriorCareerRecord::new(Period::new(4, 0, 0), dec(50));
        stored.converted_period = Some(Period::new(1, 11, 0));
        let fresh = PriorCareerRecord::new(Period::new(0, 2, 0), dec(100));

        let total = sum_career_periods(&[stored, fresh], &rules()).unwrap();
        assert_eq!(total, Period::new(2, 1, 0));
    }

    #[test]
    fn test_sum_propagates_invalid_record() {
        let bad = PriorCareerRecord::new(Period::new(1, 0, 0), dec(150));
        assert!(sum_career_periods(&[bad], &rules()).is_err());
    }

    #[test]
    fn test_sum_of_nothing_is_zero() {
        assert_eq!(sum_career_periods(&[], &rules()).unwrap(), Period::ZERO);
    }

    #[test]
    fn test_zero_standard_hours_fails() {
        let rules = RankRules {
            standard_weekly_hours: 0,
            ..RankRules::default()
        };
        let result = apply_conversion_rate(&Period::new(1, 0, 0), dec(100), 40, &rules);
        assert!(matches!(
            result,
            Err(EngineError::CareerDataInvalid { ref field, .. }) if field == "standard_weekly_hours"
        ));
    }

    proptest! {
        #[test]
        fn prop_full_rate_full_time_round_trips(
            years in 0i32..60,
            months in 0i32..40,
            days in 0i32..400,
        ) {
            let period = Period::new(years, months, days);
            let converted = apply_conversion_rate(&period, dec(100), 40, &rules()).unwrap();
            prop_assert_eq!(converted, period);
            prop_assert_eq!(converted.to_days(), period.to_days());
        }

        #[test]
        fn prop_conversion_never_exceeds_raw_days(
            years in 0i32..60,
            months in 0i32..12,
            days in 0i32..30,
            rate in 0i64..=100,
            hours in 1u32..=40,
        ) {
            let period = Period::new(years, months, days);
            let converted = apply_conversion_rate(&period, dec(rate), hours, &rules()).unwrap();
            prop_assert!(!converted.has_negative_component());
            prop_assert!(converted.to_days() <= period.to_days());
        }
    }
}
