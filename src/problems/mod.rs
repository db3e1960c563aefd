//! Bundled problems - Example genomes and agents for the genepool engine.
//!
//! - `TargetSeeker`: a [`VectorListGenome`] of unit vectors steering an agent
//!   toward a target point
//! - `PoleBalancer`: a [`NetworkGenome`] controlling a cart to keep a pole
//!   upright

mod network;
mod pole_balancer;
mod vector_list;

use std::sync::Arc;

pub use network::NetworkGenome;
pub use pole_balancer::{POLE_BALANCER_INPUTS, PoleBalancerAgent};
pub use vector_list::{TargetSeekerAgent, VectorListGenome};

use crate::compute::evolution::{Genepool, GenepoolController, GenepoolError};
use crate::schema::{ExperimentConfig, ProblemConfig};

/// Build an uninitialized genepool for the experiment's problem.
pub fn build_controller(
    config: &ExperimentConfig,
) -> Result<Box<dyn GenepoolController>, GenepoolError> {
    let engine = config.engine.clone();

    let controller: Box<dyn GenepoolController> = match &config.problem {
        ProblemConfig::PoleBalancer(params) => {
            let params = Arc::new(params.clone());
            let sizes = PoleBalancerAgent::layer_sizes(&params.hidden_layers);
            let agent_params = Arc::clone(&params);
            Box::new(Genepool::new(
                engine,
                move || NetworkGenome::random(&sizes, &mut rand::thread_rng()),
                move |genome| PoleBalancerAgent::new(genome, Arc::clone(&agent_params)),
            )?)
        }
        ProblemConfig::TargetSeeker(params) => {
            let params = Arc::new(params.clone());
            let vector_count = params.vector_count;
            Box::new(Genepool::new(
                engine,
                move || VectorListGenome::random(vector_count, &mut rand::thread_rng()),
                move |genome| TargetSeekerAgent::new(genome, Arc::clone(&params)),
            )?)
        }
    };

    Ok(controller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::evolution::{EvaluationOutcome, GenepoolPhase, IterationOutcome};
    use crate::schema::{
        GenepoolConfig, PoleBalancerConfig, SelectionMethod, TargetSeekerConfig, ThreadingConfig,
    };

    fn experiment(problem: ProblemConfig, threading: ThreadingConfig) -> ExperimentConfig {
        ExperimentConfig {
            engine: GenepoolConfig {
                threading,
                worker_threads: 4,
                random_seed: Some(42),
                ..Default::default()
            },
            population_size: 16,
            mutation_rate: 0.1,
            max_generations: 3,
            target_fitness: None,
            problem,
        }
    }

    #[test]
    fn test_pole_balancer_generations() {
        let config = experiment(
            ProblemConfig::PoleBalancer(PoleBalancerConfig::default()),
            ThreadingConfig::new(false, true, false).unwrap(),
        );
        let mut pool = build_controller(&config).unwrap();
        assert_eq!(pool.phase(), GenepoolPhase::Uninitialized);

        pool.reset(config.population_size, config.mutation_rate).unwrap();
        for generation in 1..=3 {
            assert_eq!(pool.generation(), generation);
            assert_eq!(pool.evaluate(false).unwrap(), EvaluationOutcome::Completed);
            assert!(matches!(
                pool.iterate().unwrap(),
                IterationOutcome::Advanced { .. }
            ));
        }

        let history = pool.history();
        assert_eq!(history.best_fitness.len(), 3);
        assert!(history.best_fitness.iter().all(|f| (0.0..=5.0).contains(f)));

        let best_ever = history.best_fitness.iter().copied().fold(f32::MIN, f32::max);
        assert_eq!(pool.best_ever_fitness(), Some(best_ever));
    }

    #[test]
    fn test_target_seeker_single_steps() {
        let mut config = experiment(
            ProblemConfig::TargetSeeker(TargetSeekerConfig {
                vector_count: 20,
                ..Default::default()
            }),
            ThreadingConfig::new(true, false, false).unwrap(),
        );
        config.engine.selection = SelectionMethod::Tournament { size: 3 };

        let mut pool = build_controller(&config).unwrap();
        pool.reset(config.population_size, config.mutation_rate).unwrap();

        let mut steps = 0;
        while pool.evaluate(true).unwrap() != EvaluationOutcome::Completed {
            steps += 1;
            assert_eq!(pool.phase(), GenepoolPhase::Evaluating);
        }
        // The target is out of reach, so every agent walks its whole list.
        assert_eq!(steps + 1, 20);
        assert_eq!(pool.current_step(), 20);

        let mut text = String::new();
        pool.render_text(&mut text).unwrap();
        assert_eq!(text.lines().count(), 16);

        pool.set_show_visuals(false);
        let mut hidden = String::new();
        pool.render_text(&mut hidden).unwrap();
        assert!(hidden.is_empty());
    }

    #[test]
    fn test_controller_configure_threading() {
        let config = experiment(
            ProblemConfig::TargetSeeker(TargetSeekerConfig::default()),
            ThreadingConfig::SINGLE_THREADED,
        );
        let mut pool = build_controller(&config).unwrap();
        assert_eq!(pool.best_ever_fitness(), None);

        assert!(pool.configure_threading(true, true, false).is_err());
        assert!(pool.configure_threading(false, false, true).is_err());
        assert!(pool.configure_threading(false, true, true).is_ok());

        assert!(pool.evaluate(false).is_err());
        assert!(pool.iterate().is_err());
        assert!(pool.render_text(&mut String::new()).is_err());
    }
}
