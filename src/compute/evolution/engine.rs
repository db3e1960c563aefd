//! Generational scheduling engine.
//!
//! The engine owns a population of agents and drives it through
//! reset → evaluate → iterate cycles. Evaluation runs either on the calling
//! thread or on a fixed worker pool, one task per contiguous partition of the
//! population.

use std::sync::Arc;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::ThreadPoolBuildError;
use serde::{Deserialize, Serialize};

use crate::schema::{ConfigError, GenepoolConfig, SelectionMethod, ThreadingConfig};

use super::agent::{Agent, AgentFactory, Genome, GenomeFactory, Render};
use super::executor::{TaskExecutor, partition_size};
use super::selection::select_parents;

/// Lifecycle phase of a genepool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenepoolPhase {
    /// `reset` has never been called.
    Uninitialized,
    /// Fresh generation, no evaluation step taken yet.
    Unevaluated,
    /// Some steps taken but not every agent has finished.
    Evaluating,
    /// Every agent has finished; ready to iterate.
    Evaluated,
}

/// Result of an `evaluate` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationOutcome {
    /// The generation was already evaluated; nothing was done.
    AlreadyEvaluated,
    /// A single step ran and some agents are still unfinished.
    Stepped,
    /// Every agent has finished.
    Completed,
}

/// Result of an `iterate` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IterationOutcome {
    /// The generation is not evaluated yet; nothing was done.
    NotEvaluated,
    /// The population was replaced by the next generation.
    Advanced {
        /// The new generation number.
        generation: usize,
        /// Best fitness of the generation that was replaced.
        best_fitness: f32,
    },
}

/// Genepool errors.
#[derive(Debug, thiserror::Error)]
pub enum GenepoolError {
    #[error("Cannot {operation} because the genepool is uninitialized")]
    Uninitialized { operation: &'static str },
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
}

/// Per-generation fitness history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenepoolHistory {
    /// Best fitness per completed generation.
    pub best_fitness: Vec<f32>,
    /// Average fitness per completed generation.
    pub avg_fitness: Vec<f32>,
    /// Evaluation steps taken per completed generation.
    pub steps: Vec<usize>,
}

/// Generic genetic algorithm engine over caller-supplied agents and genomes.
pub struct Genepool<A: Agent> {
    create_genome: GenomeFactory<A::Genome>,
    create_agent: AgentFactory<A>,
    threading: ThreadingConfig,
    selection: SelectionMethod,
    show_visuals: bool,
    executor: TaskExecutor,
    rng: StdRng,

    initialized: bool,
    evaluated: bool,
    population_size: usize,
    mutation_rate: f32,
    generation: usize,
    step: usize,
    best_genome: Option<Arc<A::Genome>>,
    best_fitness: f32,
    best_ever_fitness: f32,
    history: GenepoolHistory,
    population: Vec<A>,
}

impl<A: Agent> Genepool<A> {
    /// Create an uninitialized genepool.
    pub fn new<GF, AF>(
        config: GenepoolConfig,
        create_genome: GF,
        create_agent: AF,
    ) -> Result<Self, GenepoolError>
    where
        GF: Fn() -> A::Genome + Send + Sync + 'static,
        AF: Fn(Arc<A::Genome>) -> A + Send + Sync + 'static,
    {
        config.validate()?;
        let executor = TaskExecutor::new(config.worker_threads)?;
        let seed = config.random_seed.unwrap_or_else(rand::random);

        Ok(Self {
            create_genome: Box::new(create_genome),
            create_agent: Box::new(create_agent),
            threading: config.threading,
            selection: config.selection,
            show_visuals: config.show_visuals,
            executor,
            rng: StdRng::seed_from_u64(seed),
            initialized: false,
            evaluated: false,
            population_size: 0,
            mutation_rate: 0.0,
            generation: 0,
            step: 0,
            best_genome: None,
            best_fitness: 0.0,
            best_ever_fitness: f32::NEG_INFINITY,
            history: GenepoolHistory::default(),
            population: Vec::new(),
        })
    }

    /// Set the threading mode. Rejects incompatible flags without changing
    /// the current mode.
    pub fn configure_threading(
        &mut self,
        step_parallel: bool,
        full_parallel: bool,
        sync_steps: bool,
    ) -> Result<(), GenepoolError> {
        self.threading = ThreadingConfig::new(step_parallel, full_parallel, sync_steps)?;
        Ok(())
    }

    /// Set the parent selection method used by `iterate`.
    pub fn set_selection(&mut self, selection: SelectionMethod) -> Result<(), GenepoolError> {
        if let SelectionMethod::Tournament { size: 0 } = selection {
            return Err(ConfigError::InvalidTournamentSize.into());
        }
        self.selection = selection;
        Ok(())
    }

    /// Replace the genome factory used by `reset`.
    pub fn set_genome_factory<GF>(&mut self, create_genome: GF)
    where
        GF: Fn() -> A::Genome + Send + Sync + 'static,
    {
        self.create_genome = Box::new(create_genome);
    }

    /// Replace the agent factory used by `reset` and `iterate`.
    pub fn set_agent_factory<AF>(&mut self, create_agent: AF)
    where
        AF: Fn(Arc<A::Genome>) -> A + Send + Sync + 'static,
    {
        self.create_agent = Box::new(create_agent);
    }

    /// Build a fresh population and start again from generation 1.
    pub fn reset(&mut self, population_size: usize, mutation_rate: f32) -> Result<(), GenepoolError> {
        if population_size == 0 {
            return Err(ConfigError::EmptyPopulation.into());
        }
        if !(0.0..=1.0).contains(&mutation_rate) {
            return Err(ConfigError::InvalidMutationRate(mutation_rate).into());
        }

        self.population = (0..population_size)
            .map(|_| (self.create_agent)(Arc::new((self.create_genome)())))
            .collect();

        self.initialized = true;
        self.population_size = population_size;
        self.mutation_rate = mutation_rate;
        self.generation = 1;
        self.step = 0;
        self.evaluated = false;
        self.best_genome = None;
        self.best_fitness = 0.0;
        self.best_ever_fitness = f32::NEG_INFINITY;
        self.history = GenepoolHistory::default();

        debug!(
            "Genepool reset with {} agents, mutation rate {}",
            population_size, mutation_rate
        );
        Ok(())
    }

    /// Advance evaluation of the current generation.
    ///
    /// With `single_step` exactly one pass over the population runs;
    /// otherwise passes repeat until every agent has finished.
    pub fn evaluate(&mut self, single_step: bool) -> Result<EvaluationOutcome, GenepoolError> {
        if !self.initialized {
            return Err(GenepoolError::Uninitialized {
                operation: "evaluate",
            });
        }
        if self.evaluated {
            return Ok(EvaluationOutcome::AlreadyEvaluated);
        }

        if self.threading.uses_workers(single_step) {
            self.evaluate_threaded(single_step);
        } else {
            self.evaluate_serial(single_step);
        }

        if self.evaluated {
            info!("Generation {} finished evaluating.", self.generation);
            Ok(EvaluationOutcome::Completed)
        } else {
            Ok(EvaluationOutcome::Stepped)
        }
    }

    fn evaluate_serial(&mut self, single_step: bool) {
        while !self.evaluated {
            self.evaluated = evaluate_slice(&mut self.population, true);
            self.step += 1;
            if single_step {
                break;
            }
        }
    }

    fn evaluate_threaded(&mut self, single_step: bool) {
        // Synchronized full evaluation barriers after every pass, like stepping.
        let single_pass = single_step || self.threading.sync_steps;
        let subset_size = partition_size(self.population.len(), self.executor.worker_count());

        while !self.evaluated {
            let partitions: Vec<&mut [A]> = self.population.chunks_mut(subset_size).collect();
            debug!(
                "Generation {} step {}: {} partitions of up to {} agents",
                self.generation,
                self.step,
                partitions.len(),
                subset_size
            );

            let finished = self
                .executor
                .run_partitions(partitions, |slice| evaluate_slice(slice, single_pass));

            self.evaluated = finished.into_iter().all(|done| done);
            self.step += 1;
            if single_step {
                break;
            }
        }
    }

    /// Replace the evaluated population with the next generation.
    ///
    /// The fittest genome is carried over unchanged as the first agent. The
    /// remaining agents are children of consecutive pairs of selected parents.
    pub fn iterate(&mut self) -> Result<IterationOutcome, GenepoolError> {
        if !self.initialized {
            return Err(GenepoolError::Uninitialized {
                operation: "iterate",
            });
        }
        if !self.evaluated {
            return Ok(IterationOutcome::NotEvaluated);
        }

        self.population.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));

        let best = &self.population[0];
        let best_genome = Arc::clone(best.genome());
        let best_fitness = best.fitness();
        self.record_generation(best_fitness);
        info!(
            "Generation {} iterating, best fitness: {}",
            self.generation, best_fitness
        );

        let reproduce_count = self.population_size - 1;
        let mut next_generation = Vec::with_capacity(self.population_size);
        next_generation.push((self.create_agent)(Arc::clone(&best_genome)));

        let parents = select_parents(
            self.selection,
            &self.population,
            reproduce_count * 2,
            &mut self.rng,
        );
        for pair in parents.chunks_exact(2) {
            let child = pair[0].genome().crossover(pair[1].genome(), self.mutation_rate);
            next_generation.push((self.create_agent)(Arc::new(child)));
        }

        self.population = next_generation;
        self.best_genome = Some(best_genome);
        self.best_fitness = best_fitness;
        self.generation += 1;
        self.evaluated = false;
        self.step = 0;

        Ok(IterationOutcome::Advanced {
            generation: self.generation,
            best_fitness,
        })
    }

    fn record_generation(&mut self, best_fitness: f32) {
        let avg_fitness = self.population.iter().map(|a| a.fitness()).sum::<f32>()
            / self.population.len() as f32;

        self.best_ever_fitness = self.best_ever_fitness.max(best_fitness);
        self.history.best_fitness.push(best_fitness);
        self.history.avg_fitness.push(avg_fitness);
        self.history.steps.push(self.step);
    }

    /// Forward `surface` to every agent in population order.
    pub fn render<S: ?Sized>(&self, surface: &mut S) -> Result<(), GenepoolError>
    where
        A: Render<S>,
    {
        if !self.initialized {
            return Err(GenepoolError::Uninitialized {
                operation: "render",
            });
        }
        if !self.show_visuals {
            return Ok(());
        }
        for agent in &self.population {
            agent.render(surface);
        }
        Ok(())
    }

    /// Current phase of the lifecycle.
    pub fn phase(&self) -> GenepoolPhase {
        if !self.initialized {
            GenepoolPhase::Uninitialized
        } else if self.evaluated {
            GenepoolPhase::Evaluated
        } else if self.step > 0 {
            GenepoolPhase::Evaluating
        } else {
            GenepoolPhase::Unevaluated
        }
    }

    /// Current generation number, starting at 1 after `reset`.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Evaluation steps taken in the current generation.
    pub fn current_step(&self) -> usize {
        self.step
    }

    /// Best genome of the most recently iterated generation.
    pub fn best_genome(&self) -> Option<&Arc<A::Genome>> {
        self.best_genome.as_ref()
    }

    /// Best fitness of the most recently iterated generation.
    ///
    /// This is overwritten on every `iterate`; see
    /// [`Genepool::best_ever_fitness`] for the running maximum.
    pub fn best_fitness(&self) -> f32 {
        self.best_fitness
    }

    /// Highest generation-best fitness seen since the last `reset`.
    pub fn best_ever_fitness(&self) -> Option<f32> {
        if self.history.best_fitness.is_empty() {
            None
        } else {
            Some(self.best_ever_fitness)
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    pub fn show_visuals(&self) -> bool {
        self.show_visuals
    }

    pub fn set_show_visuals(&mut self, show_visuals: bool) {
        self.show_visuals = show_visuals;
    }

    pub fn threading(&self) -> ThreadingConfig {
        self.threading
    }

    pub fn selection(&self) -> SelectionMethod {
        self.selection
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    pub fn mutation_rate(&self) -> f32 {
        self.mutation_rate
    }

    /// The current population, in evaluation order.
    pub fn population(&self) -> &[A] {
        &self.population
    }

    pub fn history(&self) -> &GenepoolHistory {
        &self.history
    }

    /// Number of workers available to threaded evaluation.
    pub fn worker_count(&self) -> usize {
        self.executor.worker_count()
    }
}

/// Step every agent in `agents` until all have finished, or once if
/// `single_pass`. Every agent is stepped on each pass.
fn evaluate_slice<A: Agent>(agents: &mut [A], single_pass: bool) -> bool {
    loop {
        let mut done = true;
        for agent in agents.iter_mut() {
            done &= agent.step_evaluate();
        }
        if done || single_pass {
            return done;
        }
    }
}

/// Type-erased control surface of a genepool, for host loops that do not
/// depend on the genome and agent types.
pub trait GenepoolController {
    fn configure_threading(
        &mut self,
        step_parallel: bool,
        full_parallel: bool,
        sync_steps: bool,
    ) -> Result<(), GenepoolError>;
    fn reset(&mut self, population_size: usize, mutation_rate: f32) -> Result<(), GenepoolError>;
    fn evaluate(&mut self, single_step: bool) -> Result<EvaluationOutcome, GenepoolError>;
    fn iterate(&mut self) -> Result<IterationOutcome, GenepoolError>;
    fn phase(&self) -> GenepoolPhase;
    fn generation(&self) -> usize;
    fn current_step(&self) -> usize;
    fn best_fitness(&self) -> f32;
    fn best_ever_fitness(&self) -> Option<f32>;
    fn is_initialized(&self) -> bool;
    fn is_evaluated(&self) -> bool;
    fn show_visuals(&self) -> bool;
    fn set_show_visuals(&mut self, show_visuals: bool);
    fn history(&self) -> &GenepoolHistory;
    /// Append one line per agent to `out` if the agents support text output.
    fn render_text(&self, out: &mut String) -> Result<(), GenepoolError>;
}

impl<A> GenepoolController for Genepool<A>
where
    A: Agent + Render<String>,
{
    fn configure_threading(
        &mut self,
        step_parallel: bool,
        full_parallel: bool,
        sync_steps: bool,
    ) -> Result<(), GenepoolError> {
        Genepool::configure_threading(self, step_parallel, full_parallel, sync_steps)
    }

    fn reset(&mut self, population_size: usize, mutation_rate: f32) -> Result<(), GenepoolError> {
        Genepool::reset(self, population_size, mutation_rate)
    }

    fn evaluate(&mut self, single_step: bool) -> Result<EvaluationOutcome, GenepoolError> {
        Genepool::evaluate(self, single_step)
    }

    fn iterate(&mut self) -> Result<IterationOutcome, GenepoolError> {
        Genepool::iterate(self)
    }

    fn phase(&self) -> GenepoolPhase {
        Genepool::phase(self)
    }

    fn generation(&self) -> usize {
        Genepool::generation(self)
    }

    fn current_step(&self) -> usize {
        Genepool::current_step(self)
    }

    fn best_fitness(&self) -> f32 {
        Genepool::best_fitness(self)
    }

    fn best_ever_fitness(&self) -> Option<f32> {
        Genepool::best_ever_fitness(self)
    }

    fn is_initialized(&self) -> bool {
        Genepool::is_initialized(self)
    }

    fn is_evaluated(&self) -> bool {
        Genepool::is_evaluated(self)
    }

    fn show_visuals(&self) -> bool {
        Genepool::show_visuals(self)
    }

    fn set_show_visuals(&mut self, show_visuals: bool) {
        Genepool::set_show_visuals(self, show_visuals)
    }

    fn history(&self) -> &GenepoolHistory {
        Genepool::history(self)
    }

    fn render_text(&self, out: &mut String) -> Result<(), GenepoolError> {
        self.render(out)
    }
}
