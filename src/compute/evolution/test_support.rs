//! Deterministic genome and agent used by the engine tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::agent::{Agent, Genome, Render};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Genome whose agent finishes after `steps` steps with fitness `value`.
#[derive(Debug)]
pub struct ScriptedGenome {
    pub id: u64,
    pub value: f32,
    pub steps: u32,
}

impl ScriptedGenome {
    pub fn new(value: f32, steps: u32) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            value,
            steps,
        }
    }
}

impl Genome for ScriptedGenome {
    fn crossover(&self, other: &Self, _mutation_chance: f32) -> Self {
        Self::new((self.value + other.value) * 0.5, self.steps.max(other.steps))
    }
}

#[derive(Debug)]
pub struct ScriptedAgent {
    genome: Arc<ScriptedGenome>,
    taken: u32,
    finished: bool,
    fitness: f32,
}

impl ScriptedAgent {
    pub fn new(genome: Arc<ScriptedGenome>) -> Self {
        Self {
            genome,
            taken: 0,
            finished: false,
            fitness: 0.0,
        }
    }

    pub fn with_fitness(value: f32) -> Self {
        let mut agent = Self::new(Arc::new(ScriptedGenome::new(value, 1)));
        agent.step_evaluate();
        agent
    }

    pub fn steps_taken(&self) -> u32 {
        self.taken
    }
}

impl Agent for ScriptedAgent {
    type Genome = ScriptedGenome;

    fn genome(&self) -> &Arc<ScriptedGenome> {
        &self.genome
    }

    fn step_evaluate(&mut self) -> bool {
        if !self.finished {
            self.taken += 1;
            if self.taken >= self.genome.steps {
                self.finished = true;
                self.fitness = self.genome.value;
            }
        }
        self.finished
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn fitness(&self) -> f32 {
        self.fitness
    }
}

impl Render<Vec<u64>> for ScriptedAgent {
    fn render(&self, surface: &mut Vec<u64>) {
        surface.push(self.genome.id);
    }
}
