//! Genetic Algorithm for the Traveling Salesman Problem.
//!
//! Tours are permutations; fitness is relative to the population the tour
//! belongs to; offspring come from PMX crossover over consecutive mating
//! pool pairs followed by bounded swap mutation; survivors are chosen by
//! elitist truncation.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (iterations, pool divisor, mutation)
//! - [`Selection`]: Tournament or proportional-with-elitism mating pools
//! - [`FitnessEvaluator`]: Tour length and population-relative fitness
//! - [`Population`]: Rank and truncate
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Best tour, its length, and the per-generation trace
//!
//! # Submodules
//!
//! - [`operators`]: PMX crossover and swap mutation
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"

mod config;
mod fitness;
pub mod operators;
mod population;
mod runner;
mod selection;

pub use config::GaConfig;
pub use fitness::{FitnessEvaluator, Scores};
pub use population::Population;
pub use runner::{GaResult, GaRunner};
pub use selection::Selection;
