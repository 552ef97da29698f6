//! Core data models for the rank engine.
//!
//! This module contains the employee-side inputs (employee, pay-step
//! profile, prior-career records, internal assignments), the fixed
//! 365/30 [`Period`], the rank result types and their wire forms, and the
//! adapter that normalizes historical record shapes.

mod assignment;
mod career;
mod employee;
mod legacy;
mod period;
mod rank_info;

pub use assignment::Assignment;
pub use career::{DEFAULT_WEEKLY_WORKING_HOURS, PriorCareerRecord};
pub use employee::{Employee, RankProfile, SalaryType};
pub use legacy::LegacyEmployeeRecord;
pub use period::{DAYS_PER_MONTH, DAYS_PER_YEAR, Period};
pub use rank_info::{
    AuditStep, BatchRankResult, ErrorReport, NOT_APPLICABLE, RankField, RankInfo, RankInfoOutput,
    RankOutcome, RankSource,
};
