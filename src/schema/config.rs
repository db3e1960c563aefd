//! Configuration types for the genepool engine.

use serde::{Deserialize, Serialize};

/// Threading configuration for generation evaluation.
///
/// `step_parallel` distributes single-step evaluation across the worker pool,
/// `full_parallel` distributes full evaluation. The two are mutually
/// exclusive. `sync_steps` only applies with `full_parallel`: every worker
/// completes exactly one pass over its partition before any worker starts the
/// next one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadingConfig {
    /// Evaluate single steps on the worker pool.
    #[serde(default)]
    pub step_parallel: bool,
    /// Evaluate full generations on the worker pool.
    #[serde(default)]
    pub full_parallel: bool,
    /// Barrier between passes when evaluating full generations in parallel.
    #[serde(default)]
    pub sync_steps: bool,
}

impl ThreadingConfig {
    /// Single-threaded evaluation for both stepping and full evaluation.
    pub const SINGLE_THREADED: Self = Self {
        step_parallel: false,
        full_parallel: false,
        sync_steps: false,
    };

    /// Build and validate a threading configuration.
    pub fn new(
        step_parallel: bool,
        full_parallel: bool,
        sync_steps: bool,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            step_parallel,
            full_parallel,
            sync_steps,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate flag combinations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step_parallel && self.full_parallel {
            return Err(ConfigError::ConflictingParallelModes);
        }
        if self.sync_steps && !self.full_parallel {
            return Err(ConfigError::SyncWithoutFullParallel);
        }
        Ok(())
    }

    /// Whether an evaluation call of this kind runs on the worker pool.
    #[inline]
    pub fn uses_workers(&self, single_step: bool) -> bool {
        (self.step_parallel && single_step) || (self.full_parallel && !single_step)
    }
}

/// Parent selection method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum SelectionMethod {
    /// Roulette wheel (fitness-proportionate) selection.
    RouletteWheel,
    /// Tournament selection with configurable size.
    Tournament {
        #[serde(default = "default_tournament_size")]
        size: usize,
    },
}

impl Default for SelectionMethod {
    fn default() -> Self {
        Self::RouletteWheel
    }
}

fn default_tournament_size() -> usize {
    3
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenepoolConfig {
    /// Threading mode for evaluation.
    #[serde(default)]
    pub threading: ThreadingConfig,
    /// Parent selection method.
    #[serde(default)]
    pub selection: SelectionMethod,
    /// Worker pool size. Zero uses the number of available cores.
    #[serde(default)]
    pub worker_threads: usize,
    /// Whether `render` delegates to agents.
    #[serde(default = "default_show_visuals")]
    pub show_visuals: bool,
    /// Random seed for selection, for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

fn default_show_visuals() -> bool {
    true
}

impl Default for GenepoolConfig {
    fn default() -> Self {
        Self {
            threading: ThreadingConfig::default(),
            selection: SelectionMethod::default(),
            worker_threads: 0,
            show_visuals: default_show_visuals(),
            random_seed: None,
        }
    }
}

impl GenepoolConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.threading.validate()?;
        if let SelectionMethod::Tournament { size: 0 } = self.selection {
            return Err(ConfigError::InvalidTournamentSize);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot enable both step-parallel and full-parallel evaluation")]
    ConflictingParallelModes,
    #[error("Step synchronization requires full-parallel evaluation")]
    SyncWithoutFullParallel,
    #[error("Population size must be non-zero")]
    EmptyPopulation,
    #[error("Tournament size must be at least 1")]
    InvalidTournamentSize,
    #[error("Mutation rate {0} must be within [0, 1]")]
    InvalidMutationRate(f32),
}
