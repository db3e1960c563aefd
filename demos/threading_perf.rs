//! Quick threading mode performance comparison

use genepool::{
    EvaluationOutcome,
    problems::build_controller,
    schema::{ExperimentConfig, GenepoolConfig, PoleBalancerConfig, ProblemConfig, ThreadingConfig},
};
use std::time::Instant;

fn main() {
    println!("=== Threading Mode Comparison ===\n");

    // (name, threading, drive evaluation one step at a time)
    let modes = [
        ("single-threaded", ThreadingConfig::SINGLE_THREADED, false),
        ("step parallel", ThreadingConfig::new(true, false, false).unwrap(), true),
        ("full parallel", ThreadingConfig::new(false, true, false).unwrap(), false),
        ("full parallel (synced)", ThreadingConfig::new(false, true, true).unwrap(), false),
    ];

    for pop_size in [50, 200, 800] {
        println!("Population: {}", pop_size);

        for (name, threading, single_step) in modes {
            let config = ExperimentConfig {
                engine: GenepoolConfig {
                    threading,
                    random_seed: Some(42),
                    ..Default::default()
                },
                population_size: pop_size,
                mutation_rate: 0.05,
                max_generations: 5,
                problem: ProblemConfig::PoleBalancer(PoleBalancerConfig {
                    hidden_layers: vec![8, 8],
                    ..Default::default()
                }),
                ..Default::default()
            };

            let mut pool = build_controller(&config).unwrap();
            pool.reset(config.population_size, config.mutation_rate)
                .unwrap();

            let start = Instant::now();
            for _ in 0..config.max_generations {
                while pool.evaluate(single_step).unwrap() != EvaluationOutcome::Completed {}
                pool.iterate().unwrap();
            }
            let elapsed = start.elapsed();

            println!(
                "  {:<24} {:>8.2}ms  best={:.3}",
                name,
                elapsed.as_secs_f64() * 1000.0,
                pool.best_fitness()
            );
        }
        println!();
    }
}
