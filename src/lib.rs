//! Evolutionary search for short Traveling Salesman tours.
//!
//! - **Instance**: tour size plus a dense, possibly asymmetric distance
//!   matrix, built directly or derived from coordinates.
//! - **Genetic Algorithm**: population-relative fitness, tournament or
//!   proportional-with-elitism selection, PMX crossover, swap mutation,
//!   and elitist truncation.
//! - **TSPLIB input**: readers for instance files (`EXPLICIT` full
//!   matrices, `EUC_2D` and `ATT` coordinates) and initial population
//!   files.
//!
//! All randomness flows through an explicit generator; see [`random`].
//!
//! # Example
//!
//! ```
//! use u_tsp::ga::{GaConfig, GaRunner, Selection};
//! use u_tsp::tsplib;
//!
//! let instance = tsplib::parse_instance(
//!     "NAME : square\nTYPE : TSP\nDIMENSION : 4\nEDGE_WEIGHT_TYPE : EUC_2D\n\
//!      NODE_COORD_SECTION\n1 0 0\n2 0 10\n3 10 10\n4 10 0\nEOF\n",
//! ).unwrap();
//! let initial = tsplib::parse_population("0 2 1 3\n1 3 0 2\n", instance.size()).unwrap();
//!
//! let config = GaConfig::default()
//!     .with_iterations(50)
//!     .with_selection_part(1)
//!     .with_selection(Selection::Tournament)
//!     .with_seed(42);
//! let result = GaRunner::run(&instance, initial, &config).unwrap();
//! assert!(result.best_length <= 48.3);
//! ```

pub mod error;
pub mod ga;
pub mod instance;
pub mod random;
pub mod tour;
pub mod tsplib;

pub use error::{Result, TspError};
pub use instance::{CoordinateMetric, Instance};
pub use tour::Tour;
