//! Cart-pole balancing controlled by a [`NetworkGenome`].
//!
//! Dynamics follow the classic cart-pole formulation with Euler integration:
//!
//! ```text
//! temp      = (F + m_p * l * w^2 * sin(a)) / (m_c + m_p)
//! alpha     = (g * sin(a) - cos(a) * temp) / (l * (4/3 - m_p * cos(a)^2 / (m_c + m_p)))
//! x_accel   = temp - m_p * l * alpha * cos(a) / (m_c + m_p)
//! ```

use std::fmt::Write;
use std::sync::Arc;

use crate::compute::evolution::{Agent, Render};
use crate::schema::PoleBalancerConfig;

use super::network::NetworkGenome;

const G: f32 = 9.81;
const TIME_STEP: f32 = 0.02;

/// Network inputs: cart position, cart velocity, pole angle, pole velocity.
pub const POLE_BALANCER_INPUTS: usize = 4;

/// Agent balancing a pole. Fitness is the simulated time balanced.
#[derive(Debug)]
pub struct PoleBalancerAgent {
    genome: Arc<NetworkGenome>,
    params: Arc<PoleBalancerConfig>,
    cart_position: f32,
    cart_velocity: f32,
    pole_angle: f32,
    pole_velocity: f32,
    time: f32,
    finished: bool,
    fitness: f32,
}

impl PoleBalancerAgent {
    pub fn new(genome: Arc<NetworkGenome>, params: Arc<PoleBalancerConfig>) -> Self {
        let pole_angle = params.initial_angle;
        Self {
            genome,
            params,
            cart_position: 0.0,
            cart_velocity: 0.0,
            pole_angle,
            pole_velocity: 0.0,
            time: 0.0,
            finished: false,
            fitness: 0.0,
        }
    }

    /// Layer sizes for a controller with the given hidden layers.
    pub fn layer_sizes(hidden_layers: &[usize]) -> Vec<usize> {
        std::iter::once(POLE_BALANCER_INPUTS)
            .chain(hidden_layers.iter().copied())
            .chain(std::iter::once(1))
            .collect()
    }

    pub fn pole_angle(&self) -> f32 {
        self.pole_angle
    }

    pub fn cart_position(&self) -> f32 {
        self.cart_position
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    fn apply_force(&mut self, force: f32) {
        let p = &self.params;
        let total_mass = p.cart_mass + p.pole_mass;
        let (sin, cos) = self.pole_angle.sin_cos();

        let temp =
            (force + p.pole_mass * p.pole_length * self.pole_velocity.powi(2) * sin) / total_mass;
        let pole_acceleration = (G * sin - cos * temp)
            / (p.pole_length * (4.0 / 3.0 - p.pole_mass * cos * cos / total_mass));
        let cart_acceleration =
            temp - p.pole_mass * p.pole_length * pole_acceleration * cos / total_mass;

        self.cart_position += TIME_STEP * self.cart_velocity;
        self.cart_velocity += TIME_STEP * cart_acceleration;
        self.pole_angle += TIME_STEP * self.pole_velocity;
        self.pole_velocity += TIME_STEP * pole_acceleration;
        self.time += TIME_STEP;
    }
}

impl Agent for PoleBalancerAgent {
    type Genome = NetworkGenome;

    fn genome(&self) -> &Arc<NetworkGenome> {
        &self.genome
    }

    fn step_evaluate(&mut self) -> bool {
        if self.finished {
            return true;
        }

        let input = [
            self.cart_position,
            self.cart_velocity,
            self.pole_angle,
            self.pole_velocity,
        ];
        let output = self.genome.propagate(&input).first().copied().unwrap_or(0.0);
        self.apply_force(output * self.params.force);

        let p = &self.params;
        if self.cart_position.abs() > p.track_limit
            || self.pole_angle.abs() > p.angle_limit
            || self.time >= p.time_limit
        {
            self.finished = true;
            self.fitness = self.time.min(p.time_limit);
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

impl Render<String> for PoleBalancerAgent {
    fn render(&self, surface: &mut String) {
        let _ = writeln!(
            surface,
            "cart x={:+.3} v={:+.3} pole a={:+.3} w={:+.3} t={:.2}{}",
            self.cart_position,
            self.cart_velocity,
            self.pole_angle,
            self.pole_velocity,
            self.time,
            if self.finished { " done" } else { "" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn agent(seed: u64, params: PoleBalancerConfig) -> PoleBalancerAgent {
        let mut rng = StdRng::seed_from_u64(seed);
        let sizes = PoleBalancerAgent::layer_sizes(&params.hidden_layers);
        let genome = Arc::new(NetworkGenome::random(&sizes, &mut rng));
        PoleBalancerAgent::new(genome, Arc::new(params))
    }

    #[test]
    fn test_layer_sizes() {
        assert_eq!(PoleBalancerAgent::layer_sizes(&[4]), vec![4, 4, 1]);
        assert_eq!(PoleBalancerAgent::layer_sizes(&[]), vec![4, 1]);
    }

    #[test]
    fn test_finishes_within_time_limit() {
        let params = PoleBalancerConfig::default();
        let max_steps = (params.time_limit / TIME_STEP).ceil() as usize + 1;
        let mut agent = agent(7, params);

        let mut steps = 0;
        while !agent.step_evaluate() {
            steps += 1;
            assert!(steps <= max_steps, "agent never finished");
        }
        assert!(agent.fitness() > 0.0);
        assert!(agent.fitness() <= 5.0);

        let fitness = agent.fitness();
        assert!(agent.step_evaluate());
        assert_eq!(agent.fitness(), fitness);
    }

    #[test]
    fn test_unbalanced_pole_falls() {
        // No force: the pole falls from its initial tilt.
        let params = PoleBalancerConfig {
            force: 0.0,
            initial_angle: 0.1,
            ..Default::default()
        };
        let mut agent = agent(3, params);

        while !agent.step_evaluate() {}
        assert!(agent.pole_angle().abs() > 0.21);
        assert!(agent.fitness() < 5.0);
        assert!(agent.cart_position().abs() < 2.4);
    }

    #[test]
    fn test_upright_without_force_survives() {
        let params = PoleBalancerConfig {
            force: 0.0,
            initial_angle: 0.0,
            time_limit: 1.0,
            ..Default::default()
        };
        let mut agent = agent(5, params);

        while !agent.step_evaluate() {}
        assert!((agent.fitness() - 1.0).abs() < TIME_STEP);
        assert_eq!(agent.pole_angle(), 0.0);
    }

    #[test]
    fn test_render_marks_done() {
        let params = PoleBalancerConfig {
            time_limit: TIME_STEP,
            ..Default::default()
        };
        let mut agent = agent(1, params);

        let mut before = String::new();
        agent.render(&mut before);
        assert!(!before.contains("done"));

        agent.step_evaluate();
        let mut after = String::new();
        agent.render(&mut after);
        assert!(after.trim_end().ends_with("done"));
    }
}
