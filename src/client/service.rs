//! Cached batch access to a [`RankStrategy`].

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{EngineResult, ErrorKind};
use crate::models::{BatchRankResult, Employee, ErrorReport, RankOutcome};

use super::cache::RankCache;
use super::strategy::RankStrategy;

/// Serves rank outcomes from a cache, sending only misses to the strategy.
#[derive(Clone)]
pub struct RankService {
    strategy: Arc<dyn RankStrategy>,
    cache: Arc<RankCache>,
}

impl RankService {
    /// Creates a service with a fresh cache.
    pub fn new(strategy: Arc<dyn RankStrategy>) -> Self {
        Self::with_cache(strategy, Arc::new(RankCache::new()))
    }

    /// Creates a service sharing an existing cache.
    pub fn with_cache(strategy: Arc<dyn RankStrategy>, cache: Arc<RankCache>) -> Self {
        Self { strategy, cache }
    }

    /// The cache this service fills.
    pub fn cache(&self) -> &RankCache {
        &self.cache
    }

    /// Computes every employee, reusing cached outcomes.
    ///
    /// Successful outcomes are cached; error outcomes are not, so a fixed
    /// record is recomputed on the next call. An employee ID given more than
    /// once is reported as an error and neither computed nor cached.
    ///
    /// # Errors
    ///
    /// Whatever the strategy returns for the misses (`Unauthorized` for a
    /// remote service rejecting credentials).
    pub async fn rank_batch(
        &self,
        employees: &[Employee],
        target_date: NaiveDate,
    ) -> EngineResult<BatchRankResult> {
        let mut batch = BatchRankResult::new(target_date);
        let mut misses = Vec::new();

        let mut occurrences: BTreeMap<&str, usize> = BTreeMap::new();
        for employee in employees {
            *occurrences.entry(employee.id.as_str()).or_default() += 1;
        }

        for employee in employees {
            if occurrences[employee.id.as_str()] > 1 {
                if !batch.results.contains_key(&employee.id) {
                    batch.results.insert(
                        employee.id.clone(),
                        RankOutcome::Error(ErrorReport::duplicate(&employee.id)),
                    );
                }
                continue;
            }
            match self.cache.get(&employee.id, target_date) {
                Some(outcome) => batch.record(employee.id.clone(), outcome),
                None => misses.push(employee.clone()),
            }
        }

        debug!(
            strategy = self.strategy.name(),
            target_date = %target_date,
            hits = batch.results.len(),
            misses = misses.len(),
            "Serving rank batch"
        );

        if !misses.is_empty() {
            let computed = self.strategy.compute_batch(&misses, target_date).await?;
            for (employee_id, outcome) in computed.results {
                if matches!(outcome, RankOutcome::Ok(_)) {
                    self.cache.insert(employee_id.clone(), target_date, outcome.clone());
                }
                batch.record(employee_id, outcome);
            }
        }

        Ok(batch)
    }

    /// Computes a single employee.
    ///
    /// # Errors
    ///
    /// As [`rank_batch`](Self::rank_batch).
    pub async fn rank_one(
        &self,
        employee: &Employee,
        target_date: NaiveDate,
    ) -> EngineResult<RankOutcome> {
        let mut batch = self
            .rank_batch(std::slice::from_ref(employee), target_date)
            .await?;
        Ok(batch.results.remove(&employee.id).unwrap_or_else(|| {
            RankOutcome::Error(ErrorReport::new(
                ErrorKind::RankCalculationError,
                format!("no result returned for {}", employee.id),
            ))
        }))
    }

    /// Ends the current pass.
    pub fn clear(&self) {
        self.cache.clear();
    }
}
