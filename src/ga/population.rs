//! Population container with rank-and-truncate support.

use super::fitness::FitnessEvaluator;
use crate::error::Result;
use crate::tour::{validate_population, Tour};

/// The evolving set of tours.
///
/// The base size `N` is fixed at construction. Children are appended
/// during a generation and [`truncate`](Self::truncate) shrinks the
/// population back to `N`. Order is meaningful only right after
/// [`rank`](Self::rank): descending fitness, best first.
#[derive(Debug, Clone)]
pub struct Population {
    tours: Vec<Tour>,
    base_size: usize,
}

impl Population {
    /// Creates a population from initial tours of length `size`.
    ///
    /// # Errors
    /// [`TspError::InvalidPopulation`](crate::TspError::InvalidPopulation)
    /// if `tours` is empty or a tour has the wrong length.
    pub fn new(tours: Vec<Tour>, size: usize) -> Result<Self> {
        validate_population(&tours, size)?;
        let base_size = tours.len();
        Ok(Self { tours, base_size })
    }

    /// Current tours.
    pub fn tours(&self) -> &[Tour] {
        &self.tours
    }

    /// Current number of tours.
    pub fn len(&self) -> usize {
        self.tours.len()
    }

    /// Whether the population holds no tours.
    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }

    /// Target size `N` restored by truncation.
    pub fn base_size(&self) -> usize {
        self.base_size
    }

    /// First tour; the best one after [`rank`](Self::rank).
    pub fn best(&self) -> &Tour {
        &self.tours[0]
    }

    /// Appends offspring.
    pub fn extend(&mut self, children: impl IntoIterator<Item = Tour>) {
        self.tours.extend(children);
    }

    /// Sorts by descending fitness and returns the tour lengths in the new
    /// order. The sort is stable, so equal-fitness tours keep their order.
    pub fn rank(&mut self, evaluator: &FitnessEvaluator<'_>) -> Result<Vec<f64>> {
        let scores = evaluator.scores(&self.tours)?;
        let mut keyed: Vec<(f64, f64, Tour)> = scores
            .fitness
            .into_iter()
            .zip(scores.lengths)
            .zip(self.tours.drain(..))
            .map(|((f, l), t)| (f, l, t))
            .collect();
        keyed.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut lengths = Vec::with_capacity(keyed.len());
        for (_, length, tour) in keyed {
            lengths.push(length);
            self.tours.push(tour);
        }
        Ok(lengths)
    }

    /// Drops the lowest-ranked tours until `N` remain.
    pub fn truncate(&mut self) {
        self.tours.truncate(self.base_size);
    }

    /// Consumes the population, returning its tours.
    pub fn into_tours(self) -> Vec<Tour> {
        self.tours
    }
}
