//! TSPLIB instance and initial population readers.
//!
//! Supported instance subset:
//!
//! | Key                  | Values                          |
//! |----------------------|---------------------------------|
//! | `TYPE`               | `TSP`, `ATSP`                   |
//! | `EDGE_WEIGHT_TYPE`   | `EXPLICIT`, `EUC_2D`, `ATT`     |
//! | `EDGE_WEIGHT_FORMAT` | `FULL_MATRIX`                   |
//!
//! with `EDGE_WEIGHT_SECTION` (full matrix) or `NODE_COORD_SECTION`
//! (`id x y` per node). Other header keys are ignored. A coordinate
//! section with no `EDGE_WEIGHT_TYPE` uses Euclidean distances; a weight
//! section with none is read as `EXPLICIT`.
//!
//! Population files are whitespace-separated node ids read in groups of
//! the instance size. A trailing incomplete group is dropped.

use crate::error::{Result, TspError};
use crate::instance::{CoordinateMetric, Instance};
use crate::tour::Tour;
use std::path::Path;
use tracing::debug;

/// Problem kind declared by `TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProblemType {
    /// Symmetric TSP.
    #[default]
    Tsp,
    /// Asymmetric TSP.
    Atsp,
}

/// How edge weights are given, from `EDGE_WEIGHT_TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeWeightType {
    /// Weights listed in `EDGE_WEIGHT_SECTION`.
    Explicit,
    /// Euclidean distances from `NODE_COORD_SECTION`.
    Euc2d,
    /// Pseudo-Euclidean distances from `NODE_COORD_SECTION`.
    Att,
}

impl EdgeWeightType {
    fn metric(self) -> Option<CoordinateMetric> {
        match self {
            EdgeWeightType::Explicit => None,
            EdgeWeightType::Euc2d => Some(CoordinateMetric::Euclidean),
            EdgeWeightType::Att => Some(CoordinateMetric::Att),
        }
    }
}

/// A parsed TSPLIB problem.
#[derive(Debug, Clone)]
pub struct TsplibProblem {
    /// `NAME`, if present.
    pub name: Option<String>,
    /// `COMMENT`, if present.
    pub comment: Option<String>,
    /// `TYPE`; defaults to [`ProblemType::Tsp`].
    pub problem_type: ProblemType,
    /// The distance model.
    pub instance: Instance,
}

/// Parses a TSPLIB problem description.
pub fn parse(text: &str) -> Result<TsplibProblem> {
    let mut name = None;
    let mut comment = None;
    let mut problem_type = ProblemType::default();
    let mut dimension: Option<usize> = None;
    let mut weight_type: Option<EdgeWeightType> = None;
    let mut instance: Option<Instance> = None;

    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));

    while let Some((line_no, raw)) = lines.next() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line == "EOF" {
            break;
        }

        let section = line.trim_end_matches(':').trim();
        if section == "EDGE_WEIGHT_SECTION" || section == "NODE_COORD_SECTION" {
            let n = dimension
                .ok_or_else(|| TspError::parse(line_no, "section appears before DIMENSION"))?;
            if n < 2 {
                return Err(TspError::InvalidInstance(format!(
                    "DIMENSION must be at least 2, got {n}"
                )));
            }
            debug!(section, dimension = n, "reading section");

            let built = if section == "EDGE_WEIGHT_SECTION" {
                if weight_type.is_some_and(|kind| kind != EdgeWeightType::Explicit) {
                    return Err(TspError::parse(
                        line_no,
                        "EDGE_WEIGHT_SECTION requires EDGE_WEIGHT_TYPE EXPLICIT",
                    ));
                }
                let count = n
                    .checked_mul(n)
                    .ok_or_else(|| TspError::parse(line_no, "DIMENSION too large"))?;
                let values = read_numbers(&mut lines, count)?;
                Instance::new(values.chunks(n).map(<[f64]>::to_vec).collect())?
            } else {
                // Coordinates without EDGE_WEIGHT_TYPE are Euclidean.
                let metric = weight_type
                    .unwrap_or(EdgeWeightType::Euc2d)
                    .metric()
                    .ok_or_else(|| {
                        TspError::parse(line_no, "NODE_COORD_SECTION requires EUC_2D or ATT")
                    })?;
                let count = n
                    .checked_mul(3)
                    .ok_or_else(|| TspError::parse(line_no, "DIMENSION too large"))?;
                let values = read_numbers(&mut lines, count)?;
                let coords: Vec<(f64, f64)> =
                    values.chunks(3).map(|c| (c[1], c[2])).collect();
                Instance::from_coordinates(&coords, metric)?
            };
            instance = Some(built);
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            return Err(TspError::parse(line_no, format!("unrecognized line '{line}'")));
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "NAME" => name = Some(value.to_string()),
            "COMMENT" => comment = Some(value.to_string()),
            "TYPE" => {
                problem_type = match value {
                    "TSP" => ProblemType::Tsp,
                    "ATSP" => ProblemType::Atsp,
                    other => {
                        return Err(TspError::parse(
                            line_no,
                            format!("unsupported TYPE '{other}'"),
                        ))
                    }
                }
            }
            "DIMENSION" => {
                let n = value.parse::<usize>().map_err(|_| {
                    TspError::parse(line_no, format!("invalid DIMENSION '{value}'"))
                })?;
                dimension = Some(n);
            }
            "EDGE_WEIGHT_TYPE" => {
                weight_type = Some(match value {
                    "EXPLICIT" => EdgeWeightType::Explicit,
                    "EUC_2D" => EdgeWeightType::Euc2d,
                    "ATT" => EdgeWeightType::Att,
                    other => {
                        return Err(TspError::parse(
                            line_no,
                            format!("unsupported EDGE_WEIGHT_TYPE '{other}'"),
                        ))
                    }
                })
            }
            "EDGE_WEIGHT_FORMAT" => {
                if value != "FULL_MATRIX" {
                    return Err(TspError::parse(
                        line_no,
                        format!("unsupported EDGE_WEIGHT_FORMAT '{value}'"),
                    ));
                }
            }
            other => debug!(key = other, "ignoring TSPLIB header key"),
        }
    }

    let instance = instance.ok_or_else(|| {
        TspError::parse(0, "missing EDGE_WEIGHT_SECTION or NODE_COORD_SECTION")
    })?;

    Ok(TsplibProblem {
        name,
        comment,
        problem_type,
        instance,
    })
}

/// Parses a TSPLIB problem description, keeping only the instance.
pub fn parse_instance(text: &str) -> Result<Instance> {
    parse(text).map(|p| p.instance)
}

/// Reads and parses a TSPLIB file.
pub fn read_problem(path: impl AsRef<Path>) -> Result<TsplibProblem> {
    let text = std::fs::read_to_string(path)?;
    parse(&text)
}

/// Parses an initial population of tours of length `size`.
///
/// # Errors
/// [`TspError::Parse`] on a token that is not a node id,
/// [`TspError::InvalidPopulation`] when no complete tour is present or a
/// tour is not a permutation.
pub fn parse_population(text: &str, size: usize) -> Result<Vec<Tour>> {
    if size == 0 {
        return Err(TspError::InvalidPopulation("tour size must be positive".into()));
    }

    let mut ids = Vec::new();
    for (i, line) in text.lines().enumerate() {
        for token in line.split_whitespace() {
            let id = token.parse::<usize>().map_err(|_| {
                TspError::parse(i + 1, format!("invalid node id '{token}'"))
            })?;
            ids.push(id);
        }
    }

    let leftover = ids.len() % size;
    if leftover != 0 {
        debug!(leftover, "dropping incomplete trailing tour");
    }

    let tours = ids
        .chunks_exact(size)
        .map(|chunk| Tour::new(chunk.to_vec(), size))
        .collect::<Result<Vec<_>>>()?;

    if tours.is_empty() {
        return Err(TspError::InvalidPopulation(
            "population file holds no complete tour".into(),
        ));
    }
    Ok(tours)
}

/// Reads and parses an initial population file.
pub fn read_population(path: impl AsRef<Path>, size: usize) -> Result<Vec<Tour>> {
    let text = std::fs::read_to_string(path)?;
    parse_population(&text, size)
}

fn read_numbers<'a, I>(lines: &mut I, count: usize) -> Result<Vec<f64>>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    // Grows with the input, not the declared DIMENSION.
    let mut values = Vec::with_capacity(count.min(1 << 16));
    while values.len() < count {
        let Some((line_no, line)) = lines.next() else {
            return Err(TspError::parse(
                0,
                format!("expected {count} values, found {}", values.len()),
            ));
        };
        for token in line.split_whitespace() {
            if values.len() == count {
                return Err(TspError::parse(line_no, format!("unexpected value '{token}'")));
            }
            let v = token
                .parse::<f64>()
                .map_err(|_| TspError::parse(line_no, format!("invalid number '{token}'")))?;
            values.push(v);
        }
    }
    Ok(values)
}
