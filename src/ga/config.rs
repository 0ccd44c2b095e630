//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use super::selection::Selection;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the evolutionary TSP search.
///
/// # Defaults
///
/// ```
/// use u_tsp::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.iterations, 500);
/// assert_eq!(config.selection_part, 2);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_tsp::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_iterations(200)
///     .with_selection(Selection::Proportional)
///     .with_elite(4)
///     .with_mutation_probability(0.1)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GaConfig {
    /// Number of generations to run.
    pub iterations: usize,

    /// Divisor controlling the mating pool size: `floor(N / selection_part)`
    /// for a population of `N` tours.
    pub selection_part: usize,

    /// Number of top-ranked tours copied into the mating pool
    /// unconditionally by [`Selection::Proportional`].
    pub elite: usize,

    /// Swap trials attempted per mutation call.
    pub mutation_size: usize,

    /// Probability that a single swap trial fires (0.0–1.0).
    pub mutation_probability: f64,

    /// Strategy used to build the mating pool.
    pub selection: Selection,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked between generations, so a run may overshoot by up to one
    /// generation's worth of work.
    pub time_limit_ms: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            iterations: 500,
            selection_part: 2,
            elite: 2,
            mutation_size: 3,
            mutation_probability: 0.2,
            selection: Selection::default(),
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl GaConfig {
    /// Sets the number of generations.
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    /// Sets the mating pool divisor.
    pub fn with_selection_part(mut self, part: usize) -> Self {
        self.selection_part = part;
        self
    }

    /// Sets the elite count for proportional selection.
    pub fn with_elite(mut self, elite: usize) -> Self {
        self.elite = elite;
        self
    }

    /// Sets the number of swap trials per mutation.
    pub fn with_mutation_size(mut self, trials: usize) -> Self {
        self.mutation_size = trials;
        self
    }

    /// Sets the per-trial swap probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Mating pool size for a population of `population_size` tours.
    pub fn pool_size(&self, population_size: usize) -> usize {
        population_size / self.selection_part.max(1)
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.iterations == 0 {
            return Err("iterations must be at least 1".into());
        }
        if self.selection_part == 0 {
            return Err("selection_part must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err("mutation_probability must be within [0, 1]".into());
        }
        if self.time_limit_ms == Some(0) {
            return Err("time_limit_ms must be positive or None".into());
        }
        Ok(())
    }
}
