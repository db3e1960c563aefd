//! Capability traits implemented by caller-supplied genomes and agents.

use std::sync::Arc;

/// An immutable candidate solution encoding.
///
/// Genomes are shared between agents and across generations through `Arc`,
/// so they are never mutated after construction. `crossover` must return a
/// new genome and leave both parents untouched.
pub trait Genome: Send + Sync + 'static {
    /// Produce a child from `self` and `other`, mutating each gene with
    /// probability `mutation_chance`.
    fn crossover(&self, other: &Self, mutation_chance: f32) -> Self;
}

/// A mutable evaluation wrapper around one genome.
pub trait Agent: Send {
    /// Genome type this agent wraps.
    type Genome: Genome;

    /// The genome this agent was built from.
    fn genome(&self) -> &Arc<Self::Genome>;

    /// Advance evaluation by one step.
    ///
    /// Returns `true` once the agent has finished. Calling it again after
    /// that must keep returning `true` without changing the fitness.
    fn step_evaluate(&mut self) -> bool;

    /// Whether evaluation has finished.
    fn is_finished(&self) -> bool;

    /// Fitness score. Only meaningful once [`Agent::is_finished`] is `true`.
    fn fitness(&self) -> f32;
}

/// Drawing onto a caller-chosen surface type.
///
/// The engine never inspects the surface; it only forwards it to each agent.
pub trait Render<S: ?Sized> {
    fn render(&self, surface: &mut S);
}

/// Creates genomes for a fresh population.
pub type GenomeFactory<G> = Box<dyn Fn() -> G + Send + Sync>;

/// Wraps a shared genome into a new agent.
pub type AgentFactory<A> = Box<dyn Fn(Arc<<A as Agent>::Genome>) -> A + Send + Sync>;
