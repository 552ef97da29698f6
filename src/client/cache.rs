//! Per-pass result cache.

use chrono::NaiveDate;
use dashmap::DashMap;

use crate::models::RankOutcome;

/// Outcomes keyed by `(employee_id, target_date)`.
///
/// Lives for one report-generation pass: create it at the start, share it
/// with the [`RankService`](super::RankService), and drop or
/// [`clear`](RankCache::clear) it at the end. Entries are never invalidated
/// by employee edits, so a cache must not outlive the data it was filled from.
#[derive(Debug, Default)]
pub struct RankCache {
    entries: DashMap<(String, NaiveDate), RankOutcome>,
}

impl RankCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached outcome, if any.
    pub fn get(&self, employee_id: &str, target_date: NaiveDate) -> Option<RankOutcome> {
        self.entries
            .get(&(employee_id.to_string(), target_date))
            .map(|entry| entry.value().clone())
    }

    /// Stores an outcome.
    pub fn insert(&self, employee_id: impl Into<String>, target_date: NaiveDate, outcome: RankOutcome) {
        self.entries.insert((employee_id.into(), target_date), outcome);
    }

    /// Number of cached outcomes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }
}
