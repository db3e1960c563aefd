//! Parent selection strategies.
//!
//! Both strategies sample with replacement across draws and return agent
//! references in draw order. Selected agents stay in the source population.

use log::warn;
use rand::Rng;
use rand::seq::index;

use crate::schema::SelectionMethod;

use super::agent::Agent;

/// Select `select_amount` parents using `method`.
pub fn select_parents<'a, A, R>(
    method: SelectionMethod,
    population: &'a [A],
    select_amount: usize,
    rng: &mut R,
) -> Vec<&'a A>
where
    A: Agent,
    R: Rng + ?Sized,
{
    match method {
        SelectionMethod::RouletteWheel => select_roulette(population, select_amount, rng),
        SelectionMethod::Tournament { size } => {
            select_tournament(population, select_amount, size, rng)
        }
    }
}

/// Fitness-proportionate selection.
///
/// Negative fitness carries no weight. If no agent carries weight the draw
/// falls back to a uniform pick over the whole population.
pub fn select_roulette<'a, A, R>(
    population: &'a [A],
    select_amount: usize,
    rng: &mut R,
) -> Vec<&'a A>
where
    A: Agent,
    R: Rng + ?Sized,
{
    if population.is_empty() {
        return Vec::new();
    }

    let weights: Vec<f32> = population.iter().map(|a| a.fitness().max(0.0)).collect();
    let total_fitness: f32 = weights.iter().sum();

    if !(total_fitness > 0.0 && total_fitness.is_finite()) {
        warn!(
            "Roulette selection over degenerate total fitness {}, selecting uniformly",
            total_fitness
        );
        return (0..select_amount)
            .map(|_| &population[rng.gen_range(0..population.len())])
            .collect();
    }

    // Rounding can leave the walk just short of the draw.
    let last_weighted = weights.iter().rposition(|&w| w > 0.0).unwrap_or(0);

    (0..select_amount)
        .map(|_| {
            let target = rng.gen_range(0.0..total_fitness);
            let mut cumulative = 0.0;
            let index = weights
                .iter()
                .position(|&w| {
                    cumulative += w;
                    w > 0.0 && cumulative >= target
                })
                .unwrap_or(last_weighted);
            &population[index]
        })
        .collect()
}

/// Tournament selection: best of `tournament_size` agents sampled uniformly.
///
/// Agents within one tournament are distinct, so a tournament as large as the
/// population always picks the fittest agent. Sizes above the population size
/// are capped. The first sampled agent wins ties.
pub fn select_tournament<'a, A, R>(
    population: &'a [A],
    select_amount: usize,
    tournament_size: usize,
    rng: &mut R,
) -> Vec<&'a A>
where
    A: Agent,
    R: Rng + ?Sized,
{
    if population.is_empty() {
        return Vec::new();
    }

    let size = tournament_size.clamp(1, population.len());
    (0..select_amount)
        .map(|_| {
            let mut entrants = index::sample(&mut *rng, population.len(), size).into_iter();
            // `size` is at least 1, so the first entrant always exists.
            let mut best = &population[entrants.next().unwrap_or(0)];
            for i in entrants {
                if population[i].fitness() > best.fitness() {
                    best = &population[i];
                }
            }
            best
        })
        .collect()
}
