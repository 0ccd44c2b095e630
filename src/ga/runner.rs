//! Evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates one generation as
//! rank → record → select → crossover → mutate → merge → re-rank → truncate,
//! and repeats it for `iterations` generations.

use super::config::GaConfig;
use super::fitness::FitnessEvaluator;
use super::operators::{crossover_pool, mutate};
use super::population::Population;
use crate::error::{Result, TspError};
use crate::instance::Instance;
use crate::random::rng_from_seed;
use crate::tour::Tour;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// Shortest tour observed during the entire run.
    pub best: Tour,

    /// Length of [`best`](Self::best).
    pub best_length: f64,

    /// Number of generations executed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Whether the run stopped on `time_limit_ms`.
    pub timed_out: bool,

    /// Record length after initialization and after each generation.
    ///
    /// Non-increasing; has `generations + 1` entries.
    pub length_history: Vec<f64>,
}

/// Executes the evolutionary TSP search.
///
/// # Usage
///
/// ```
/// use u_tsp::ga::{GaConfig, GaRunner};
/// use u_tsp::{Instance, Tour};
///
/// let instance = Instance::new(vec![
///     vec![0.0, 1.0, 2.0, 3.0],
///     vec![1.0, 0.0, 4.0, 5.0],
///     vec![2.0, 4.0, 0.0, 6.0],
///     vec![3.0, 5.0, 6.0, 0.0],
/// ]).unwrap();
/// let initial = vec![
///     Tour::new(vec![0, 1, 2, 3], 4).unwrap(),
///     Tour::new(vec![0, 2, 1, 3], 4).unwrap(),
/// ];
/// let config = GaConfig::default().with_iterations(10).with_seed(42);
///
/// let result = GaRunner::run(&instance, initial, &config).unwrap();
/// assert_eq!(result.best_length, 14.0);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the search with a generator seeded from [`GaConfig::seed`].
    pub fn run(instance: &Instance, initial: Vec<Tour>, config: &GaConfig) -> Result<GaResult> {
        Self::run_with_cancel(instance, initial, config, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the search stops
    /// before the next generation and returns the record so far.
    pub fn run_with_cancel(
        instance: &Instance,
        initial: Vec<Tour>,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult> {
        let mut rng = rng_from_seed(config.seed);
        Self::run_with_rng(instance, initial, config, &mut rng, cancel)
    }

    /// Runs the search drawing all randomness from `rng`.
    ///
    /// [`GaConfig::seed`] is ignored here; the caller owns the generator.
    ///
    /// # Errors
    /// - [`TspError::InvalidConfig`] if `config` fails validation
    /// - [`TspError::InvalidPopulation`] if `initial` is empty or has a
    ///   tour of the wrong size
    /// - [`TspError::DegenerateFitness`] if the population's total length
    ///   is zero
    /// - [`TspError::CrossoverResolutionFailure`] if PMX cannot place a gene
    #[instrument(skip_all, fields(size = instance.size(), population = initial.len()))]
    pub fn run_with_rng<R: Rng>(
        instance: &Instance,
        initial: Vec<Tour>,
        config: &GaConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult> {
        config.validate().map_err(TspError::InvalidConfig)?;

        let started = Instant::now();
        let evaluator = FitnessEvaluator::new(instance);
        let mut population = Population::new(initial, instance.size())?;

        // Rank and record the initial population
        let lengths = population.rank(&evaluator)?;
        let mut best = population.best().clone();
        let mut best_length = lengths[0];
        let mut length_history = Vec::with_capacity(config.iterations + 1);
        length_history.push(best_length);

        info!(
            selection = ?config.selection,
            iterations = config.iterations,
            initial_best = best_length,
            "starting evolutionary search"
        );

        let mut generations = 0;
        let mut cancelled = false;
        let mut timed_out = false;

        for gen in 0..config.iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    warn!(generation = gen, "search cancelled");
                    cancelled = true;
                    break;
                }
            }
            if let Some(limit) = config.time_limit_ms {
                if started.elapsed().as_millis() >= u128::from(limit) {
                    warn!(generation = gen, limit_ms = limit, "time limit reached");
                    timed_out = true;
                    break;
                }
            }

            // Population is ranked here: the previous truncation kept rank order.
            let pool =
                config
                    .selection
                    .select_pool(population.tours(), &evaluator, config, rng)?;

            let children: Vec<Tour> = crossover_pool(&pool, rng)?
                .iter()
                .map(|child| {
                    mutate(
                        child,
                        config.mutation_size,
                        config.mutation_probability,
                        rng,
                    )
                })
                .collect();
            let offspring = children.len();
            population.extend(children);

            let lengths = population.rank(&evaluator)?;
            population.truncate();

            if lengths[0] < best_length {
                best = population.best().clone();
                best_length = lengths[0];
            }
            length_history.push(best_length);
            generations = gen + 1;

            debug!(
                generation = generations,
                pool = pool.len(),
                offspring,
                generation_best = lengths[0],
                best_length,
                "generation complete"
            );
        }

        info!(
            best_length,
            generations,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "evolutionary search finished"
        );

        Ok(GaResult {
            best,
            best_length,
            generations,
            cancelled,
            timed_out,
            length_history,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::Selection;
    use crate::random::create_rng;
    use rand::seq::SliceRandom;

    fn four_city() -> Instance {
        Instance::new(vec![
            vec![0.0, 1.0, 2.0, 3.0],
            vec![1.0, 0.0, 4.0, 5.0],
            vec![2.0, 4.0, 0.0, 6.0],
            vec![3.0, 5.0, 6.0, 0.0],
        ])
        .unwrap()
    }

    fn rotations(n: usize) -> Vec<Tour> {
        (0..n)
            .map(|s| {
                let mut nodes: Vec<usize> = (0..n).collect();
                nodes.rotate_left(s);
                Tour::new(nodes, n).unwrap()
            })
            .collect()
    }

    /// Points on a circle; the optimal tour visits them in angular order.
    fn circle(n: usize) -> Instance {
        let coords: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let a = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
                (100.0 * a.cos(), 100.0 * a.sin())
            })
            .collect();
        Instance::from_coordinates(&coords, crate::instance::CoordinateMetric::Euclidean).unwrap()
    }

    fn random_population(n: usize, count: usize, seed: u64) -> Vec<Tour> {
        let mut rng = create_rng(seed);
        (0..count)
            .map(|_| {
                let mut nodes: Vec<usize> = (0..n).collect();
                nodes.shuffle(&mut rng);
                Tour::new(nodes, n).unwrap()
            })
            .collect()
    }

    fn initial_best(instance: &Instance, tours: &[Tour]) -> f64 {
        let eval = FitnessEvaluator::new(instance);
        tours
            .iter()
            .map(|t| eval.length(t))
            .fold(f64::INFINITY, f64::min)
    }

    // ---- Scenarios ----

    #[test]
    fn test_four_city_never_exceeds_initial_best() {
        let inst = four_city();
        let initial = rotations(4);
        let start = initial_best(&inst, &initial);

        for selection in [Selection::Tournament, Selection::Proportional] {
            for iterations in [1, 5, 50] {
                let config = GaConfig::default()
                    .with_iterations(iterations)
                    .with_selection(selection)
                    .with_seed(42);
                let result = GaRunner::run(&inst, initial.clone(), &config).unwrap();
                assert!(result.best_length <= start);
                assert_eq!(result.generations, iterations);
            }
        }
    }

    #[test]
    fn test_single_tour_population_unchanged() {
        let inst = four_city();
        let only = Tour::new(vec![2, 0, 3, 1], 4).unwrap();
        let config = GaConfig::default().with_iterations(25).with_seed(42);

        let result = GaRunner::run(&inst, vec![only.clone()], &config).unwrap();

        assert_eq!(result.best, only);
        assert_eq!(result.generations, 25);
        assert_eq!(result.length_history, vec![14.0; 26]);
    }

    #[test]
    fn test_improves_on_circle() {
        let inst = circle(12);
        let initial = random_population(12, 40, 5);
        let start = initial_best(&inst, &initial);

        for selection in [Selection::Tournament, Selection::Proportional] {
            let config = GaConfig::default()
                .with_iterations(300)
                .with_selection(selection)
                .with_seed(42);
            let result = GaRunner::run(&inst, initial.clone(), &config).unwrap();

            assert!(
                result.best_length < start,
                "{selection:?} did not improve: {} >= {start}",
                result.best_length
            );
            let eval = FitnessEvaluator::new(&inst);
            assert!((eval.length(&result.best) - result.best_length).abs() < 1e-9);
        }
    }

    #[test]
    fn test_history_monotone() {
        let inst = circle(10);
        let initial = random_population(10, 20, 9);
        let config = GaConfig::default().with_iterations(100).with_seed(1);

        let result = GaRunner::run(&inst, initial, &config).unwrap();

        assert_eq!(result.length_history.len(), result.generations + 1);
        for window in result.length_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "record regressed: {} > {}",
                window[1],
                window[0]
            );
        }
        assert_eq!(*result.length_history.last().unwrap(), result.best_length);
    }

    #[test]
    fn test_same_seed_same_result() {
        let inst = circle(9);
        let initial = random_population(9, 16, 3);
        let config = GaConfig::default().with_iterations(60).with_seed(77);

        let a = GaRunner::run(&inst, initial.clone(), &config).unwrap();
        let b = GaRunner::run(&inst, initial, &config).unwrap();

        assert_eq!(a.best, b.best);
        assert_eq!(a.length_history, b.length_history);
    }

    #[test]
    fn test_injected_rng() {
        let inst = circle(8);
        let initial = random_population(8, 10, 2);
        let config = GaConfig::default().with_iterations(20);

        let a = GaRunner::run_with_rng(&inst, initial.clone(), &config, &mut create_rng(5), None)
            .unwrap();
        let b = GaRunner::run_with_rng(&inst, initial, &config, &mut create_rng(5), None).unwrap();
        assert_eq!(a.best, b.best);
    }

    #[test]
    fn test_two_node_instance() {
        let inst = Instance::new(vec![vec![0.0, 3.0], vec![3.0, 0.0]]).unwrap();
        let initial = vec![Tour::identity(2), Tour::new(vec![1, 0], 2).unwrap()];
        let config = GaConfig::default().with_iterations(5).with_selection_part(1);

        let result = GaRunner::run(&inst, initial, &config).unwrap();
        assert_eq!(result.best_length, 6.0);
    }

    // ---- Errors ----

    #[test]
    fn test_empty_population_fails_fast() {
        let result = GaRunner::run(&four_city(), vec![], &GaConfig::default());
        assert!(matches!(result, Err(TspError::InvalidPopulation(_))));
    }

    #[test]
    fn test_wrong_tour_size_fails_fast() {
        let result = GaRunner::run(&four_city(), vec![Tour::identity(3)], &GaConfig::default());
        assert!(matches!(result, Err(TspError::InvalidPopulation(_))));
    }

    #[test]
    fn test_invalid_config() {
        let config = GaConfig::default().with_iterations(0);
        let result = GaRunner::run(&four_city(), rotations(4), &config);
        assert!(matches!(result, Err(TspError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_length_population() {
        let inst = Instance::new(vec![vec![0.0; 3]; 3]).unwrap();
        let result = GaRunner::run(&inst, rotations(3), &GaConfig::default());
        assert!(matches!(result, Err(TspError::DegenerateFitness(_))));
    }

    // ---- Early termination ----

    #[test]
    fn test_cancellation() {
        let cancel = Arc::new(AtomicBool::new(true));
        let config = GaConfig::default().with_iterations(1000).with_seed(42);

        let result =
            GaRunner::run_with_cancel(&circle(8), random_population(8, 10, 1), &config, Some(cancel))
                .unwrap();

        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert_eq!(result.length_history.len(), 1);
    }

    #[test]
    fn test_time_limit() {
        let config = GaConfig::default()
            .with_iterations(100_000_000)
            .with_time_limit_ms(20)
            .with_seed(42);

        let result = GaRunner::run(&circle(30), random_population(30, 60, 4), &config).unwrap();

        assert!(result.timed_out);
        assert!(result.generations < 100_000_000);
    }
}
