//! Vector list genome and a target seeking agent that follows it.

use std::f32::consts::TAU;
use std::fmt::Write;
use std::sync::Arc;

use rand::Rng;

use crate::compute::evolution::{Agent, Genome, Render};
use crate::schema::TargetSeekerConfig;

/// Ordered list of unit-length 2D vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorListGenome {
    values: Vec<(f32, f32)>,
}

impl VectorListGenome {
    /// Random genome of `len` unit vectors.
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        Self {
            values: (0..len).map(|_| random_unit_vector(&mut *rng)).collect(),
        }
    }

    pub fn from_values(values: Vec<(f32, f32)>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[(f32, f32)] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Genome for VectorListGenome {
    /// Each gene comes from either parent with equal chance, then is replaced
    /// by a fresh random vector with probability `mutation_chance`.
    fn crossover(&self, other: &Self, mutation_chance: f32) -> Self {
        let mut rng = rand::thread_rng();
        let values = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(&a, &b)| {
                if rng.r#gen::<f32>() < mutation_chance {
                    random_unit_vector(&mut rng)
                } else if rng.gen_bool(0.5) {
                    a
                } else {
                    b
                }
            })
            .collect();
        Self { values }
    }
}

fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> (f32, f32) {
    let angle = rng.gen_range(0.0..TAU);
    (angle.cos(), angle.sin())
}

/// Agent that moves one genome vector per step and is scored on how close
/// it gets to the target.
///
/// Reaching the target scores above 1.0, more the earlier it is reached.
/// Otherwise the score is `1 / (1 + distance)` at the end of the list.
#[derive(Debug)]
pub struct TargetSeekerAgent {
    genome: Arc<VectorListGenome>,
    params: Arc<TargetSeekerConfig>,
    position: (f32, f32),
    index: usize,
    finished: bool,
    fitness: f32,
}

impl TargetSeekerAgent {
    pub fn new(genome: Arc<VectorListGenome>, params: Arc<TargetSeekerConfig>) -> Self {
        let position = params.start;
        Self {
            genome,
            params,
            position,
            index: 0,
            finished: false,
            fitness: 0.0,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        self.position
    }

    fn distance_to_target(&self) -> f32 {
        let dx = self.params.target.0 - self.position.0;
        let dy = self.params.target.1 - self.position.1;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Agent for TargetSeekerAgent {
    type Genome = VectorListGenome;

    fn genome(&self) -> &Arc<VectorListGenome> {
        &self.genome
    }

    fn step_evaluate(&mut self) -> bool {
        if self.finished {
            return true;
        }

        let len = self.genome.len();
        if let Some(&(dx, dy)) = self.genome.values().get(self.index) {
            self.position.0 += dx * self.params.speed;
            self.position.1 += dy * self.params.speed;
            self.index += 1;
        }

        let distance = self.distance_to_target();
        if distance <= self.params.radius {
            self.finished = true;
            self.fitness = 1.0 + (len - self.index) as f32 / len.max(1) as f32;
        } else if self.index >= len {
            self.finished = true;
            self.fitness = 1.0 / (1.0 + distance);
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

impl Render<String> for TargetSeekerAgent {
    fn render(&self, surface: &mut String) {
        let _ = writeln!(
            surface,
            "seeker pos=({:.2}, {:.2}) step={}/{} dist={:.2}",
            self.position.0,
            self.position.1,
            self.index,
            self.genome.len(),
            self.distance_to_target()
        );
    }
}
