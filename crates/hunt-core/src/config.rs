//! Configuration loading and typed config structures for the treasure hunt.
//!
//! The optional configuration file is `hunt-config.yaml` in the working
//! directory. This module defines strongly-typed structs that mirror the YAML
//! structure, a loader that reads the file, and validation of the values the
//! simulation depends on.

use std::path::Path;

use hunt_world::GridLayout;
use serde::Deserialize;

/// Environment variable that overrides `grid.seed`.
pub const SEED_ENV_VAR: &str = "HUNT_SEED";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is unusable.
    #[error("invalid config: {reason}")]
    Invalid {
        /// Description of the rejected value.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `hunt-config.yaml`. Every field has a default,
/// so an empty document is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HuntConfig {
    /// Board size, seed, and cell generation.
    #[serde(default)]
    pub grid: GridConfig,

    /// Agent cohort parameters.
    #[serde(default)]
    pub agents: AgentsConfig,

    /// Checkpoint rendezvous parameters.
    #[serde(default)]
    pub checkpoint: CheckpointConfig,
}

impl HuntConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `HUNT_SEED` environment variable overrides `grid.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, and
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides on top of file values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `HUNT_SEED` is set but is not
    /// an unsigned integer.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var(SEED_ENV_VAR) {
            let seed = val.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                reason: format!("{SEED_ENV_VAR}={val:?} is not a valid seed: {e}"),
            })?;
            self.grid.seed = Some(seed);
        }
        Ok(())
    }

    /// Check every value the simulation relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.size == 0 {
            return Err(invalid("grid.size must be at least 1"));
        }
        self.grid.cells.validate().map_err(|e| invalid(&e.to_string()))?;
        if self.agents.initial_count == 0 {
            return Err(invalid("agents.initial_count must be at least 1"));
        }
        if self.agents.max_failed_moves == 0 {
            return Err(invalid("agents.max_failed_moves must be at least 1"));
        }
        if self.checkpoint.interval == 0 {
            return Err(invalid("checkpoint.interval must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

/// Board configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GridConfig {
    /// Cells per side, used when the size is not entered interactively.
    #[serde(default = "default_grid_size")]
    pub size: u32,

    /// Seed for board generation and agent random walks. `None` draws
    /// fresh entropy for every run.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Probability bands and value ranges.
    #[serde(default)]
    pub cells: GridLayout,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: default_grid_size(),
            seed: None,
            cells: GridLayout::default(),
        }
    }
}

/// Agent cohort configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentsConfig {
    /// Initial cohort size, used when not entered interactively.
    #[serde(default = "default_initial_count")]
    pub initial_count: u32,

    /// Consecutive rejected move attempts before an agent gives up.
    #[serde(default = "default_max_failed_moves")]
    pub max_failed_moves: u32,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            initial_count: default_initial_count(),
            max_failed_moves: default_max_failed_moves(),
        }
    }
}

/// Checkpoint rendezvous configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckpointConfig {
    /// Moves between checkpoints.
    #[serde(default = "default_checkpoint_interval")]
    pub interval: u32,

    /// Agents scoring below this wait at a second barrier.
    #[serde(default = "default_low_score_threshold")]
    pub low_score_threshold: i64,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            interval: default_checkpoint_interval(),
            low_score_threshold: default_low_score_threshold(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_grid_size() -> u32 {
    10
}

const fn default_initial_count() -> u32 {
    4
}

const fn default_max_failed_moves() -> u32 {
    64
}

const fn default_checkpoint_interval() -> u32 {
    5
}

const fn default_low_score_threshold() -> i64 {
    50
}
