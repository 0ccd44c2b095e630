//! Mating pool selection.
//!
//! A selector reduces a population of `N` tours to a mating pool of at most
//! `floor(N / selection_part)` copies. Both strategies rank by the
//! population-relative fitness from [`FitnessEvaluator::scores`], so higher
//! fitness (shorter tour) is better.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::config::GaConfig;
use super::fitness::{FitnessEvaluator, Scores};
use crate::error::Result;
use crate::tour::Tour;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Strategy for building the mating pool.
///
/// # Examples
///
/// ```
/// use u_tsp::ga::Selection;
///
/// let sel = Selection::default();
/// assert_eq!(sel, Selection::Tournament);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Selection {
    /// Binary tournament: draw two distinct tours uniformly at random and
    /// keep the fitter one. Draws are independent across tournaments, so a
    /// tour may enter the pool more than once.
    #[default]
    Tournament,

    /// Fitness-proportional acceptance with elitism.
    ///
    /// The top `elite` tours enter unconditionally. Every later tour, in
    /// rank order, is accepted when its min-max normalized fitness exceeds
    /// a uniform threshold in `(0, 1]`. Scanning stops once the pool is
    /// full, so the pool may come out smaller than the target.
    ///
    /// When every tour has the same fitness, normalization is undefined and
    /// no non-elite tour is accepted.
    Proportional,
}

impl Selection {
    /// Builds a mating pool from `population`.
    ///
    /// The pool target is [`GaConfig::pool_size`]. Proportional selection
    /// ranks the population itself, so `population` need not be sorted.
    ///
    /// # Errors
    /// Propagates fitness errors (empty population, zero total length).
    pub fn select_pool<R: Rng>(
        &self,
        population: &[Tour],
        evaluator: &FitnessEvaluator<'_>,
        config: &GaConfig,
        rng: &mut R,
    ) -> Result<Vec<Tour>> {
        let target = config.pool_size(population.len());
        if target == 0 {
            return Ok(Vec::new());
        }

        let scores = evaluator.scores(population)?;
        let pool = match self {
            Selection::Tournament => tournament(population, &scores.fitness, target, rng),
            Selection::Proportional => proportional(population, &scores, target, config.elite, rng),
        };
        Ok(pool)
    }
}

fn tournament<R: Rng>(
    population: &[Tour],
    fitness: &[f64],
    target: usize,
    rng: &mut R,
) -> Vec<Tour> {
    let n = population.len();
    let mut pool = Vec::with_capacity(target);

    for _ in 0..target {
        if n == 1 {
            pool.push(population[0].clone());
            continue;
        }
        let a = rng.random_range(0..n);
        let mut b = rng.random_range(0..n - 1);
        if b >= a {
            b += 1;
        }
        let winner = if fitness[a] > fitness[b] { a } else { b };
        pool.push(population[winner].clone());
    }

    pool
}

fn proportional<R: Rng>(
    population: &[Tour],
    scores: &Scores,
    target: usize,
    elite: usize,
    rng: &mut R,
) -> Vec<Tour> {
    let fitness = &scores.fitness;
    let order = scores.ranking();
    let max_fitness = fitness[order[0]];
    let min_fitness = fitness[order[order.len() - 1]];
    let spread = max_fitness - min_fitness;

    let mut pool = Vec::with_capacity(target);
    for (rank, &idx) in order.iter().enumerate() {
        if pool.len() == target {
            break;
        }
        if rank < elite {
            pool.push(population[idx].clone());
            continue;
        }
        if spread <= 0.0 {
            continue;
        }

        // uniform in (0, 1]
        let threshold = 1.0 - rng.random::<f64>();
        let normalized = (fitness[idx] - min_fitness) / spread;
        if normalized > threshold {
            pool.push(population[idx].clone());
        }
    }

    pool
}
