//! Experiment configuration for running bundled problems from the CLI.
//!
//! An experiment pairs an engine configuration with population settings and
//! one of the bundled problems.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ConfigError, GenepoolConfig};

/// Top-level configuration for an experiment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Engine configuration.
    #[serde(default)]
    pub engine: GenepoolConfig,
    /// Number of agents per generation.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Mutation probability passed to genome crossover (0.0-1.0).
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f32,
    /// Maximum number of generations to run.
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
    /// Stop early once a generation's best fitness reaches this value.
    #[serde(default)]
    pub target_fitness: Option<f32>,
    /// Problem to optimize.
    #[serde(default)]
    pub problem: ProblemConfig,
}

fn default_population_size() -> usize {
    100
}
fn default_mutation_rate() -> f32 {
    0.05
}
fn default_max_generations() -> usize {
    50
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            engine: GenepoolConfig::default(),
            population_size: default_population_size(),
            mutation_rate: default_mutation_rate(),
            max_generations: default_max_generations(),
            target_fitness: None,
            problem: ProblemConfig::default(),
        }
    }
}

/// Bundled problem selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProblemConfig {
    /// Neural network controller balancing a pole on a cart.
    PoleBalancer(PoleBalancerConfig),
    /// Fixed list of movement vectors steering toward a target.
    TargetSeeker(TargetSeekerConfig),
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self::PoleBalancer(PoleBalancerConfig::default())
    }
}

/// Cart-pole physical parameters and controller shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoleBalancerConfig {
    /// Cart mass in kg.
    pub cart_mass: f32,
    /// Pole mass in kg.
    pub pole_mass: f32,
    /// Pole half-length in metres.
    pub pole_length: f32,
    /// Magnitude of the force applied to the cart.
    pub force: f32,
    /// Cart position limit (either side of centre).
    pub track_limit: f32,
    /// Pole angle limit in radians.
    pub angle_limit: f32,
    /// Simulated seconds after which the agent counts as balanced.
    pub time_limit: f32,
    /// Initial pole angle in radians.
    #[serde(default = "default_initial_angle")]
    pub initial_angle: f32,
    /// Hidden layer sizes of the controller network.
    #[serde(default = "default_hidden_layers")]
    pub hidden_layers: Vec<usize>,
}

fn default_hidden_layers() -> Vec<usize> {
    vec![4]
}
fn default_initial_angle() -> f32 {
    0.05
}

impl Default for PoleBalancerConfig {
    fn default() -> Self {
        Self {
            cart_mass: 1.0,
            pole_mass: 0.1,
            pole_length: 0.5,
            force: 1.0,
            track_limit: 2.4,
            angle_limit: 0.21,
            time_limit: 5.0,
            initial_angle: default_initial_angle(),
            hidden_layers: default_hidden_layers(),
        }
    }
}

/// Target seeking parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSeekerConfig {
    /// Number of movement vectors in each genome.
    pub vector_count: usize,
    /// Starting position.
    pub start: (f32, f32),
    /// Target position.
    pub target: (f32, f32),
    /// Distance below which the target counts as reached.
    pub radius: f32,
    /// Distance travelled per step (genome vectors are unit length).
    pub speed: f32,
}

impl Default for TargetSeekerConfig {
    fn default() -> Self {
        Self {
            vector_count: 200,
            start: (0.0, 0.0),
            target: (30.0, 40.0),
            radius: 1.0,
            speed: 0.5,
        }
    }
}

/// Experiment configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ExperimentConfigError {
    #[error("Failed to read experiment file: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse experiment file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid engine configuration: {0}")]
    Engine(#[from] ConfigError),
    #[error("Invalid problem parameters: {0}")]
    InvalidProblem(String),
}

impl ExperimentConfig {
    /// Load and validate an experiment from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ExperimentConfigError> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate experiment configuration.
    pub fn validate(&self) -> Result<(), ExperimentConfigError> {
        self.engine.validate()?;

        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation.into());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::InvalidMutationRate(self.mutation_rate).into());
        }

        match &self.problem {
            ProblemConfig::PoleBalancer(pole) => {
                if pole.cart_mass <= 0.0 || pole.pole_mass <= 0.0 || pole.pole_length <= 0.0 {
                    return Err(ExperimentConfigError::InvalidProblem(
                        "masses and pole length must be positive".into(),
                    ));
                }
                if pole.time_limit <= 0.0 {
                    return Err(ExperimentConfigError::InvalidProblem(
                        "time limit must be positive".into(),
                    ));
                }
                if pole.hidden_layers.contains(&0) {
                    return Err(ExperimentConfigError::InvalidProblem(
                        "hidden layers must be non-empty".into(),
                    ));
                }
            }
            ProblemConfig::TargetSeeker(seeker) => {
                if seeker.vector_count == 0 {
                    return Err(ExperimentConfigError::InvalidProblem(
                        "vector count must be non-zero".into(),
                    ));
                }
                if seeker.speed <= 0.0 || seeker.radius < 0.0 {
                    return Err(ExperimentConfigError::InvalidProblem(format!(
                        "speed {} must be positive and radius {} non-negative",
                        seeker.speed, seeker.radius
                    )));
                }
            }
        }

        Ok(())
    }
}
