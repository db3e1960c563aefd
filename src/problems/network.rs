//! Small fully connected network used as a controller genome.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::compute::evolution::Genome;

/// Standard deviation of the noise added to a mutated weight.
const MUTATION_STRENGTH: f32 = 0.5;

/// One dense layer with tanh activation.
#[derive(Debug, Clone, PartialEq)]
struct Layer {
    inputs: usize,
    outputs: usize,
    /// Row-major `outputs x inputs`.
    weights: Vec<f32>,
    biases: Vec<f32>,
}

impl Layer {
    fn random<R: Rng + ?Sized>(inputs: usize, outputs: usize, rng: &mut R) -> Self {
        let scale = (1.0 / inputs.max(1) as f32).sqrt();
        Self {
            inputs,
            outputs,
            weights: (0..inputs * outputs)
                .map(|_| rng.sample::<f32, _>(StandardNormal) * scale)
                .collect(),
            biases: (0..outputs)
                .map(|_| rng.sample::<f32, _>(StandardNormal) * scale)
                .collect(),
        }
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        self.weights
            .chunks_exact(self.inputs)
            .zip(&self.biases)
            .map(|(row, bias)| {
                let sum: f32 = row.iter().zip(input).map(|(w, x)| w * x).sum();
                (sum + bias).tanh()
            })
            .collect()
    }
}

/// Feed-forward network genome.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkGenome {
    layers: Vec<Layer>,
}

impl NetworkGenome {
    /// Random network with the given layer sizes, input layer first.
    pub fn random<R: Rng + ?Sized>(layer_sizes: &[usize], rng: &mut R) -> Self {
        Self {
            layers: layer_sizes
                .windows(2)
                .map(|w| Layer::random(w[0], w[1], &mut *rng))
                .collect(),
        }
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |l| l.inputs)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.outputs)
    }

    /// Total number of weights and biases.
    pub fn parameter_count(&self) -> usize {
        self.parameters().count()
    }

    /// Run the network on `input`. Every output is in `[-1, 1]`.
    pub fn propagate(&self, input: &[f32]) -> Vec<f32> {
        self.layers
            .iter()
            .fold(input.to_vec(), |activations, layer| layer.forward(&activations))
    }

    fn parameters(&self) -> impl Iterator<Item = &f32> {
        self.layers
            .iter()
            .flat_map(|l| l.weights.iter().chain(l.biases.iter()))
    }
}

impl Genome for NetworkGenome {
    /// Each parameter comes from either parent with equal chance. With
    /// probability `mutation_chance` it additionally gets Gaussian noise.
    ///
    /// Both parents must share a layer layout.
    fn crossover(&self, other: &Self, mutation_chance: f32) -> Self {
        debug_assert_eq!(self.parameter_count(), other.parameter_count());

        let mut rng = rand::thread_rng();
        let mut pick = |a: f32, b: f32| {
            let value = if rng.gen_bool(0.5) { a } else { b };
            if rng.r#gen::<f32>() < mutation_chance {
                value + rng.sample::<f32, _>(StandardNormal) * MUTATION_STRENGTH
            } else {
                value
            }
        };

        let layers = self
            .layers
            .iter()
            .zip(&other.layers)
            .map(|(a, b)| Layer {
                inputs: a.inputs,
                outputs: a.outputs,
                weights: a
                    .weights
                    .iter()
                    .zip(&b.weights)
                    .map(|(&x, &y)| pick(x, y))
                    .collect(),
                biases: a
                    .biases
                    .iter()
                    .zip(&b.biases)
                    .map(|(&x, &y)| pick(x, y))
                    .collect(),
            })
            .collect();

        Self { layers }
    }
}
