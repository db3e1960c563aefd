//! Genepool - Generational genetic algorithm engine.
//!
//! This crate drives populations of caller-supplied agents through repeated
//! generations: every agent is evaluated (optionally in single steps and
//! optionally on a worker pool), the fittest genome is carried over unchanged,
//! and the rest of the next generation is bred by crossover of parents chosen
//! with roulette-wheel or tournament selection.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: Configuration types for the engine and experiments
//! - `compute`: The engine, its selection strategies and worker pool
//! - `problems`: Bundled genomes and agents (target seeking, pole balancing)
//!
//! # Example
//!
//! ```rust,no_run
//! use genepool::{
//!     problems::build_controller,
//!     schema::ExperimentConfig,
//! };
//!
//! let config = ExperimentConfig::default();
//! let mut pool = build_controller(&config)?;
//!
//! pool.reset(config.population_size, config.mutation_rate)?;
//! for _ in 0..config.max_generations {
//!     pool.evaluate(false)?;
//!     pool.iterate()?;
//! }
//!
//! println!("Best fitness after {} generations: {}", pool.generation() - 1, pool.best_fitness());
//! # Ok::<(), genepool::compute::GenepoolError>(())
//! ```

pub mod compute;
pub mod problems;
pub mod schema;

// Re-export commonly used types
pub use compute::{Agent, EvaluationOutcome, Genepool, GenepoolError, Genome, IterationOutcome};
pub use schema::{GenepoolConfig, SelectionMethod, ThreadingConfig};
