//! Configuration loading and management for the rank engine.
//!
//! This module loads step-progression rules and the compute strategy
//! (local or remote) from a YAML file.
//!
//! # Example
//!
//! ```no_run
//! use rank_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Max step: {}", config.rules().max_rank);
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_FILE_NAME, ConfigLoader};
pub use types::{ComputeConfig, ComputeMode, RankConfig, RankRules, RemoteConfig};
