//! Configuration types for rank calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from `rank.yaml`.

use serde::Deserialize;

/// Step-progression rules.
///
/// The 365/30 day-count convention is deliberately absent: it is fixed for
/// compatibility with previously stored seniority figures.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RankRules {
    /// Years between two consecutive step increases.
    pub upgrade_interval_years: u32,
    /// Lowest step accepted at data entry.
    pub min_rank: u32,
    /// Highest step accepted at data entry.
    pub max_rank: u32,
    /// Weekly hours of a full-time position, the denominator of the hours ratio.
    pub standard_weekly_hours: u32,
}

impl Default for RankRules {
    fn default() -> Self {
        Self {
            upgrade_interval_years: 1,
            min_rank: 1,
            max_rank: 99,
            standard_weekly_hours: 40,
        }
    }
}

/// Where rank figures are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputeMode {
    /// In-process pure functions.
    #[default]
    Local,
    /// The HTTP calculation service, degrading to local on persistent failure.
    Remote,
}

/// Connection settings for the remote calculation service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteConfig {
    /// Service base URL (e.g., "http://127.0.0.1:8080").
    pub base_url: String,
    /// Bearer token sent with every request.
    #[serde(default)]
    pub token: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries after the first attempt for transient failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before retry `n` is `n * retry_backoff_ms`.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    200
}

impl RemoteConfig {
    /// Creates a remote configuration with default timeout and retry policy.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Strategy selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ComputeConfig {
    /// Local or remote computation.
    #[serde(default)]
    pub mode: ComputeMode,
    /// Required when `mode` is `remote`.
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

/// The complete configuration loaded from `rank.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RankConfig {
    /// Step-progression rules.
    #[serde(default)]
    pub rules: RankRules,
    /// Strategy selection.
    #[serde(default)]
    pub compute: ComputeConfig,
}

impl RankConfig {
    /// Returns the step-progression rules.
    pub fn rules(&self) -> &RankRules {
        &self.rules
    }

    /// Returns the strategy selection.
    pub fn compute(&self) -> &ComputeConfig {
        &self.compute
    }
}
