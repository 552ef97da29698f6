//! The seam between callers and where rank figures are computed.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::calculation::calculate_batch;
use crate::config::{ComputeMode, RankConfig, RankRules};
use crate::error::{EngineError, EngineResult};
use crate::models::{BatchRankResult, Employee};

use super::remote::RemoteStrategy;

/// Computes rank figures for many employees against one target date.
///
/// Implementations must return one outcome per employee ID and must not
/// fail the batch for a single bad record; `Err` is reserved for failures
/// of the strategy itself (for example rejected credentials).
#[async_trait]
pub trait RankStrategy: Send + Sync {
    /// A short name for logs.
    fn name(&self) -> &'static str;

    /// Computes every employee in one call.
    async fn compute_batch(
        &self,
        employees: &[Employee],
        target_date: NaiveDate,
    ) -> EngineResult<BatchRankResult>;
}

/// Runs the pure in-process calculation.
#[derive(Debug, Clone, Default)]
pub struct LocalStrategy {
    rules: RankRules,
}

impl LocalStrategy {
    /// Creates a local strategy with the given rules.
    pub fn new(rules: RankRules) -> Self {
        Self { rules }
    }

    /// The rules this strategy calculates with.
    pub fn rules(&self) -> &RankRules {
        &self.rules
    }
}

#[async_trait]
impl RankStrategy for LocalStrategy {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn compute_batch(
        &self,
        employees: &[Employee],
        target_date: NaiveDate,
    ) -> EngineResult<BatchRankResult> {
        Ok(calculate_batch(employees, target_date, &self.rules))
    }
}

/// Selects the strategy named by `compute.mode`.
///
/// # Errors
///
/// `ConfigParseError` when remote mode has no `remote` section, or the HTTP
/// client cannot be built.
pub fn build_strategy(config: &RankConfig) -> EngineResult<Arc<dyn RankStrategy>> {
    let rules = config.rules().clone();
    match config.compute().mode {
        ComputeMode::Local => Ok(Arc::new(LocalStrategy::new(rules))),
        ComputeMode::Remote => {
            let remote = config.compute().remote.clone().ok_or_else(|| {
                EngineError::ConfigParseError {
                    path: "compute.remote".to_string(),
                    message: "remote mode requires a remote section".to_string(),
                }
            })?;
            Ok(Arc::new(RemoteStrategy::new(remote, rules)?))
        }
    }
}
