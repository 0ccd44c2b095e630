//! Tour length and population-relative fitness.
//!
//! Fitness is `1 - length / total_length`, where `total_length` sums the
//! lengths of every tour in the current population. A fitness value is
//! only meaningful against the population it was computed for, so
//! [`FitnessEvaluator::scores`] computes the total once per population
//! and is what the selector and the engine use.

use crate::error::{Result, TspError};
use crate::instance::Instance;
use crate::tour::Tour;

/// Evaluates tours against an [`Instance`].
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator<'a> {
    instance: &'a Instance,
}

impl<'a> FitnessEvaluator<'a> {
    /// Creates an evaluator for `instance`.
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    /// Length of the closed cycle described by `tour`, including the edge
    /// from the last node back to the first.
    ///
    /// # Panics
    /// If `tour` visits a node outside the instance. The `Result`-returning
    /// methods check tour sizes first.
    pub fn length(&self, tour: &Tour) -> f64 {
        let nodes = tour.as_slice();
        let Some((&first, _)) = nodes.split_first() else {
            return 0.0;
        };
        let open: f64 = nodes
            .windows(2)
            .map(|w| self.instance.distance(w[0], w[1]))
            .sum();
        let last = nodes[nodes.len() - 1];
        open + self.instance.distance(last, first)
    }

    fn check_size(&self, tour: &Tour) -> Result<()> {
        if tour.len() != self.instance.size() {
            return Err(TspError::InvalidPopulation(format!(
                "tour has {} nodes, instance has {}",
                tour.len(),
                self.instance.size()
            )));
        }
        Ok(())
    }

    fn check_population(&self, population: &[Tour]) -> Result<()> {
        if population.is_empty() {
            return Err(TspError::InvalidPopulation(
                "fitness needs a non-empty population".into(),
            ));
        }
        population.iter().try_for_each(|t| self.check_size(t))
    }

    /// Sum of tour lengths over `population`.
    ///
    /// # Errors
    /// [`TspError::InvalidPopulation`] for an empty population or a tour
    /// sized for another instance, [`TspError::DegenerateFitness`] when the
    /// total is zero.
    pub fn total_length(&self, population: &[Tour]) -> Result<f64> {
        self.check_population(population)?;
        let total: f64 = population.iter().map(|t| self.length(t)).sum();
        if total == 0.0 {
            return Err(TspError::DegenerateFitness(
                "population total length is zero".into(),
            ));
        }
        Ok(total)
    }

    /// Fitness of `tour` relative to `population`.
    ///
    /// Recomputes the population total on every call; prefer
    /// [`scores`](Self::scores) when ranking a whole population.
    pub fn fitness(&self, tour: &Tour, population: &[Tour]) -> Result<f64> {
        self.check_size(tour)?;
        let total = self.total_length(population)?;
        Ok(1.0 - self.length(tour) / total)
    }

    /// Lengths and fitness values for every tour of `population`, in order.
    pub fn scores(&self, population: &[Tour]) -> Result<Scores> {
        self.check_population(population)?;
        let lengths: Vec<f64> = population.iter().map(|t| self.length(t)).collect();
        let total: f64 = lengths.iter().sum();
        if total == 0.0 {
            return Err(TspError::DegenerateFitness(
                "population total length is zero".into(),
            ));
        }
        let fitness = lengths.iter().map(|&l| 1.0 - l / total).collect();
        Ok(Scores { lengths, fitness })
    }
}

/// Per-population memoized lengths and fitness values.
#[derive(Debug, Clone)]
pub struct Scores {
    /// Length of each tour, same order as the population.
    pub lengths: Vec<f64>,
    /// Fitness of each tour, same order as the population.
    pub fitness: Vec<f64>,
}

impl Scores {
    /// Indices of the population ordered by descending fitness.
    ///
    /// The sort is stable: tours with equal fitness keep their prior
    /// relative order.
    pub fn ranking(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.fitness.len()).collect();
        order.sort_by(|&a, &b| {
            self.fitness[b]
                .partial_cmp(&self.fitness[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        order
    }
}
