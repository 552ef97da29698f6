//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading rank
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{ComputeConfig, ComputeMode, RankConfig, RankRules};

/// Name of the configuration file inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "rank.yaml";

/// Loads and provides access to rank configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// └── rank.yaml   # Step-progression rules and compute strategy
/// ```
///
/// # Example
///
/// ```no_run
/// use rank_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config")?;
/// println!("Upgrade interval: {} year(s)", loader.rules().upgrade_interval_years);
/// # Ok::<(), rank_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: RankConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - `rank.yaml` is missing (`ConfigNotFound`)
    /// - the file contains invalid YAML (`ConfigParseError`)
    /// - `compute.mode` is `remote` without a `compute.remote` section
    ///   (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let file_path = path.as_ref().join(CONFIG_FILE_NAME);
        let config = Self::load_yaml::<RankConfig>(&file_path)?;
        Self::validate(&config, &file_path)?;

        debug!(
            path = %file_path.display(),
            mode = ?config.compute.mode,
            "Loaded rank configuration"
        );

        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: RankConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate(config: &RankConfig, path: &Path) -> EngineResult<()> {
        let parse_error = |message: &str| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message: message.to_string(),
        };

        if config.compute.mode == ComputeMode::Remote && config.compute.remote.is_none() {
            return Err(parse_error("compute.mode is remote but compute.remote is missing"));
        }
        let rules = &config.rules;
        if rules.upgrade_interval_years == 0 {
            return Err(parse_error("rules.upgrade_interval_years must be at least 1"));
        }
        if rules.min_rank == 0 || rules.min_rank > rules.max_rank {
            return Err(parse_error("rules.min_rank must be in 1..=max_rank"));
        }
        if rules.standard_weekly_hours == 0 {
            return Err(parse_error("rules.standard_weekly_hours must be positive"));
        }
        Ok(())
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &RankConfig {
        &self.config
    }

    /// Returns the step-progression rules.
    pub fn rules(&self) -> &RankRules {
        self.config.rules()
    }

    /// Returns the strategy selection.
    pub fn compute(&self) -> &ComputeConfig {
        self.config.compute()
    }
}
