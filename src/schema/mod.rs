//! Schema module - Configuration types for the genepool engine and experiments.

mod config;
mod experiment;

pub use config::*;
pub use experiment::*;
