//! Tour representation.
//!
//! A [`Tour`] is a permutation of `[0, size)` describing a closed visiting
//! order. The permutation invariant is checked at construction; operators
//! inside the crate build tours only from inputs that preserve it.

use crate::error::{Result, TspError};
use std::fmt;

/// A permutation of node identifiers.
///
/// Tours are owned by their population and cloned, never shared, when
/// selected for reproduction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tour(Vec<usize>);

impl Tour {
    /// Builds a tour, checking that `nodes` is a permutation of `[0, size)`.
    ///
    /// # Errors
    /// [`TspError::InvalidPopulation`] on a wrong length, an out-of-range
    /// node, or a repeated node.
    pub fn new(nodes: Vec<usize>, size: usize) -> Result<Self> {
        if nodes.len() != size {
            return Err(TspError::InvalidPopulation(format!(
                "tour has {} nodes, expected {size}",
                nodes.len()
            )));
        }
        if !is_permutation(&nodes) {
            return Err(TspError::InvalidPopulation(format!(
                "tour {nodes:?} is not a permutation of 0..{size}"
            )));
        }
        Ok(Self(nodes))
    }

    /// The identity tour `0, 1, …, size - 1`.
    pub fn identity(size: usize) -> Self {
        Self((0..size).collect())
    }

    /// Wraps a vector already known to be a permutation.
    pub(crate) fn from_permutation(nodes: Vec<usize>) -> Self {
        debug_assert!(is_permutation(&nodes));
        Self(nodes)
    }

    /// Number of nodes in the tour.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the tour has no nodes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Node order as a slice.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Consumes the tour, returning the node order.
    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [usize] {
        &mut self.0
    }
}

impl AsRef<[usize]> for Tour {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for node in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{node}")?;
            first = false;
        }
        Ok(())
    }
}

/// Whether `perm` holds every value of `0..perm.len()` exactly once.
pub fn is_permutation(perm: &[usize]) -> bool {
    let n = perm.len();
    let mut seen = vec![false; n];
    for &v in perm {
        if v >= n || seen[v] {
            return false;
        }
        seen[v] = true;
    }
    true
}

/// Validates an initial population against `size`.
///
/// # Errors
/// [`TspError::InvalidPopulation`] if `tours` is empty or any tour has the
/// wrong length.
pub fn validate_population(tours: &[Tour], size: usize) -> Result<()> {
    if tours.is_empty() {
        return Err(TspError::InvalidPopulation(
            "initial population must not be empty".into(),
        ));
    }
    for (i, tour) in tours.iter().enumerate() {
        if tour.len() != size {
            return Err(TspError::InvalidPopulation(format!(
                "tour {i} has {} nodes, expected {size}",
                tour.len()
            )));
        }
    }
    Ok(())
}
