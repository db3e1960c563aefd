//! Compute module - Evolution engine and its scheduling primitives.

pub mod evolution;

pub use evolution::{Agent, EvaluationOutcome, Genepool, GenepoolError, Genome, IterationOutcome};
