//! Problem instance: tour size and distance matrix.
//!
//! An [`Instance`] is built once from external input and never mutated.
//! Distances may be asymmetric. The diagonal is never traversed by a tour
//! and is not validated (coordinate-derived instances store `+∞` there).

use crate::error::{Result, TspError};

/// Metric used to derive distances from node coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateMetric {
    /// Plain Euclidean distance, unrounded.
    Euclidean,

    /// Pseudo-Euclidean "ATT" distance: `r = sqrt((dx² + dy²) / 10)`,
    /// rounded up to the next integer whenever `round(r) < r`.
    Att,
}

impl CoordinateMetric {
    /// Distance between two points under this metric.
    pub fn distance(self, a: (f64, f64), b: (f64, f64)) -> f64 {
        let dx = b.0 - a.0;
        let dy = b.1 - a.1;
        match self {
            CoordinateMetric::Euclidean => (dx * dx + dy * dy).sqrt(),
            CoordinateMetric::Att => {
                let r = ((dx * dx + dy * dy) / 10.0).sqrt();
                let t = r.round();
                if t < r {
                    t + 1.0
                } else {
                    t
                }
            }
        }
    }
}

/// A TSP instance backed by a dense `size × size` matrix.
///
/// # Examples
///
/// ```
/// use u_tsp::Instance;
///
/// let inst = Instance::new(vec![
///     vec![0.0, 1.0, 2.0],
///     vec![1.0, 0.0, 3.0],
///     vec![2.0, 3.0, 0.0],
/// ]).unwrap();
/// assert_eq!(inst.size(), 3);
/// assert_eq!(inst.distance(1, 2), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    size: usize,
    matrix: Vec<f64>,
}

impl Instance {
    /// Builds an instance from a full square matrix.
    ///
    /// # Errors
    /// [`TspError::InvalidInstance`] if the matrix has fewer than two rows,
    /// is not square, or holds a negative or non-finite off-diagonal entry.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        if size < 2 {
            return Err(TspError::InvalidInstance(format!(
                "size must be at least 2, got {size}"
            )));
        }

        let mut matrix = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(TspError::InvalidInstance(format!(
                    "row {i} has {} entries, expected {size}",
                    row.len()
                )));
            }
            for (j, &d) in row.iter().enumerate() {
                if i != j && !(d.is_finite() && d >= 0.0) {
                    return Err(TspError::InvalidInstance(format!(
                        "distance({i}, {j}) = {d} is not a finite non-negative value"
                    )));
                }
            }
            matrix.extend(row);
        }

        Ok(Self { size, matrix })
    }

    /// Builds an instance by computing pairwise distances between
    /// coordinates. The diagonal is set to `+∞`.
    pub fn from_coordinates(coords: &[(f64, f64)], metric: CoordinateMetric) -> Result<Self> {
        let rows = coords
            .iter()
            .enumerate()
            .map(|(i, &a)| {
                coords
                    .iter()
                    .enumerate()
                    .map(|(j, &b)| if i == j { f64::INFINITY } else { metric.distance(a, b) })
                    .collect()
            })
            .collect();
        Self::new(rows)
    }

    /// Number of nodes; every tour has exactly this length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cost of travelling from `i` to `j`.
    ///
    /// # Panics
    /// Panics if `i` or `j` is not below [`size`](Self::size). Use
    /// [`try_distance`](Self::try_distance) for checked access.
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.size && j < self.size, "node out of range");
        self.matrix[i * self.size + j]
    }

    /// Checked variant of [`distance`](Self::distance).
    pub fn try_distance(&self, i: usize, j: usize) -> Result<f64> {
        if i >= self.size || j >= self.size {
            return Err(TspError::InvalidInstance(format!(
                "distance({i}, {j}) out of range for size {}",
                self.size
            )));
        }
        Ok(self.matrix[i * self.size + j])
    }
}
