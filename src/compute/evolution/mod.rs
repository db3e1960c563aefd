//! Generational genetic algorithm over caller-supplied genomes and agents.
//!
//! # Overview
//!
//! - **Capabilities** (`agent`): the [`Genome`] and [`Agent`] traits callers implement
//! - **Engine** (`engine`): population lifecycle and evaluation scheduling
//! - **Selection** (`selection`): roulette-wheel and tournament parent selection
//! - **Executor** (`executor`): fixed worker pool running one task per partition
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use genepool::compute::evolution::{Agent, Genepool, Genome};
//! use genepool::schema::GenepoolConfig;
//!
//! struct Bits(Vec<bool>);
//!
//! impl Genome for Bits {
//!     fn crossover(&self, other: &Self, mutation_chance: f32) -> Self {
//!         Bits(
//!             self.0
//!                 .iter()
//!                 .zip(&other.0)
//!                 .map(|(&a, &b)| {
//!                     let bit = if rand::random() { a } else { b };
//!                     bit ^ (rand::random::<f32>() < mutation_chance)
//!                 })
//!                 .collect(),
//!         )
//!     }
//! }
//!
//! struct Counter {
//!     genome: Arc<Bits>,
//!     fitness: f32,
//!     finished: bool,
//! }
//!
//! impl Agent for Counter {
//!     type Genome = Bits;
//!     fn genome(&self) -> &Arc<Bits> { &self.genome }
//!     fn step_evaluate(&mut self) -> bool {
//!         self.fitness = self.genome.0.iter().filter(|&&b| b).count() as f32;
//!         self.finished = true;
//!         true
//!     }
//!     fn is_finished(&self) -> bool { self.finished }
//!     fn fitness(&self) -> f32 { self.fitness }
//! }
//!
//! let mut pool = Genepool::new(
//!     GenepoolConfig::default(),
//!     || Bits((0..32).map(|_| rand::random()).collect()),
//!     |genome| Counter { genome, fitness: 0.0, finished: false },
//! )?;
//!
//! pool.reset(50, 0.02)?;
//! for _ in 0..20 {
//!     pool.evaluate(false)?;
//!     pool.iterate()?;
//! }
//! println!("Best fitness: {}", pool.best_fitness());
//! # Ok::<(), genepool::compute::evolution::GenepoolError>(())
//! ```

mod agent;
mod engine;
mod executor;
mod selection;

#[cfg(test)]
pub(crate) mod test_support;

pub use agent::{Agent, AgentFactory, Genome, GenomeFactory, Render};
pub use engine::{
    EvaluationOutcome, Genepool, GenepoolController, GenepoolError, GenepoolHistory,
    GenepoolPhase, IterationOutcome,
};
pub use executor::{TaskExecutor, partition_size};
pub use selection::{select_parents, select_roulette, select_tournament};
