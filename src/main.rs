//! Genepool CLI - Run bundled experiments from JSON configuration.

use std::path::PathBuf;
use std::time::Instant;

use genepool::{compute::IterationOutcome, problems::build_controller, schema::ExperimentConfig};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <experiment.json> [generations]", args[0]);
        eprintln!();
        eprintln!("Run a genepool experiment from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  experiment.json  Path to experiment configuration file");
        eprintln!("  generations      Override the configured generation budget");
        eprintln!();
        eprintln!("Example configuration is printed with the --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let mut config = ExperimentConfig::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading experiment: {}", e);
        std::process::exit(1);
    });
    if let Some(generations) = args.get(2).and_then(|s| s.parse().ok()) {
        config.max_generations = generations;
    }

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &ExperimentConfig) -> Result<(), genepool::GenepoolError> {
    let threading = config.engine.threading;

    println!("Genepool Experiment");
    println!("===================");
    println!("Problem: {:?}", config.problem);
    println!("Population: {}", config.population_size);
    println!("Mutation rate: {}", config.mutation_rate);
    println!("Selection: {:?}", config.engine.selection);
    println!(
        "Threading: step_parallel={} full_parallel={} sync_steps={}",
        threading.step_parallel, threading.full_parallel, threading.sync_steps
    );
    println!("Generations: {}", config.max_generations);
    println!();

    let mut pool = build_controller(config)?;
    pool.reset(config.population_size, config.mutation_rate)?;

    let start = Instant::now();
    for _ in 0..config.max_generations {
        pool.evaluate(false)?;
        let steps = pool.current_step();

        if let IterationOutcome::Advanced {
            generation,
            best_fitness,
        } = pool.iterate()?
        {
            let history = pool.history();
            let avg = history.avg_fitness.last().copied().unwrap_or(0.0);
            println!(
                "  Generation {}: best={:.4} avg={:.4} steps={}",
                generation - 1,
                best_fitness,
                avg,
                steps
            );

            if config.target_fitness.is_some_and(|target| best_fitness >= target) {
                println!();
                println!("Target fitness reached.");
                break;
            }
        }
    }

    let elapsed = start.elapsed();
    let history = pool.history();

    println!();
    println!("Final state:");
    println!("  Generations completed: {}", history.best_fitness.len());
    println!("  Last best fitness: {:.4}", pool.best_fitness());
    if let Some(best_ever) = pool.best_ever_fitness() {
        println!("  Best fitness overall: {:.4}", best_ever);
    }
    println!(
        "  Time: {:.2}s ({:.1} generations/s)",
        elapsed.as_secs_f32(),
        history.best_fitness.len() as f32 / elapsed.as_secs_f32()
    );

    Ok(())
}

fn print_example_config() {
    let config = ExperimentConfig::default();

    println!("Example configuration (experiment.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing example: {}", e),
    }
}
