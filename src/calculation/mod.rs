//! Calculation logic for the rank engine.
//!
//! This module contains the pure tenure and pay-step calculations: calendar
//! arithmetic, elapsed tenure, prior-career conversion, step progression,
//! internal assignment recognition, and the per-employee aggregator that
//! chooses between the stored and dynamic paths.

mod career;
mod date_utils;
mod dynamic_rank;
mod internal_career;
mod rank;
mod tenure;

pub use career::{apply_conversion_rate, convert_record, sum_career_periods};
pub use date_utils::{
    DATE_FORMAT, add_days, add_days_to, add_months_to, diff_days, format_date, parse_date,
    resolve_target_date, today,
};
pub use dynamic_rank::{
    UsePrevious, calculate_batch, calculate_dynamic_rank, calculate_rank_info,
    calculate_stored_rank, rank_info_or_stored,
};
pub use internal_career::{
    InternalCareerDetail, InternalCareerResult, calculate_with_prior_career_rate,
    requires_dynamic, validate_assignments,
};
pub use rank::{
    calculate_current_rank, calculate_first_upgrade_date, calculate_next_upgrade_date,
    validate_rank_inputs,
};
pub use tenure::{calculate_tenure, format_tenure, tenure_days};
