//! Tenure and pay-step (hobong) calculation engine.
//!
//! This crate converts hire dates, prior-career records, internal
//! assignment recognition rates and part-time hours ratios into a current
//! pay step, the next upgrade anniversary and accrued seniority, as of any
//! reference date. Calculations run in-process or through a remote service
//! with the same batch contract.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
