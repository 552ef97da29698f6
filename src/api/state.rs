//! Application state for the rank engine API.

use std::sync::Arc;

use crate::client::{RankStrategy, build_strategy};
use crate::config::ConfigLoader;
use crate::error::EngineResult;

/// Shared application state.
///
/// Holds the loaded configuration and the strategy selected from it.
/// Each request builds its own `RankService`, so cached outcomes never
/// outlive the request that produced them.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    strategy: Arc<dyn RankStrategy>,
}

impl AppState {
    /// Creates the state, selecting the strategy from `compute.mode`.
    ///
    /// # Errors
    ///
    /// Propagates [`build_strategy`] failures.
    pub fn new(config: ConfigLoader) -> EngineResult<Self> {
        let strategy = build_strategy(config.config())?;
        Ok(Self::with_strategy(config, strategy))
    }

    /// Creates the state with an explicit strategy.
    pub fn with_strategy(config: ConfigLoader, strategy: Arc<dyn RankStrategy>) -> Self {
        Self {
            config: Arc::new(config),
            strategy,
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the calculation strategy.
    pub fn strategy(&self) -> Arc<dyn RankStrategy> {
        Arc::clone(&self.strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_default_config_selects_local() {
        let state = AppState::new(ConfigLoader::default()).unwrap();
        assert_eq!(state.strategy().name(), "local");
    }
}
