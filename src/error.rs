//! Error types for u-tsp.
//!
//! Every failure is unrecoverable for the current run and is surfaced to
//! the caller as a [`TspError`]. Nothing is retried internally.

use thiserror::Error;

/// Result type alias for u-tsp operations.
pub type Result<T> = std::result::Result<T, TspError>;

/// Unified error type for instance construction, parsing, and search.
#[derive(Debug, Error)]
pub enum TspError {
    /// Instance is malformed (too small, non-square, bad distance) or a
    /// distance lookup fell outside `[0, size)`.
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// Population is empty or holds a tour that is not a permutation of
    /// `[0, size)`.
    #[error("invalid population: {0}")]
    InvalidPopulation(String),

    /// Fitness is undefined because the population's total length is zero.
    #[error("degenerate fitness: {0}")]
    DegenerateFitness(String),

    /// The PMX mapping-chain walk could not place a gene.
    #[error("crossover resolution failure: {0}")]
    CrossoverResolutionFailure(String),

    /// Configuration rejected by [`GaConfig::validate`](crate::ga::GaConfig::validate).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed TSPLIB or population text.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number (0 when the input ended early).
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TspError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
