//! Initial conditions for a row.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{AutomatonError, AutomatonResult};

/// How the row is populated before the first generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Seed {
    /// All cells dead.
    Empty,
    /// A single live cell at `size / 2`.
    #[default]
    Center,
    /// Live cells at the listed indices.
    Cells { indices: Vec<usize> },
    /// Pseudo-random row from a fixed seed, so runs stay reproducible.
    Random { seed: u64, density: f64 },
}

impl Seed {
    /// Produce the initial row for `size` cells.
    pub fn row(&self, size: usize) -> AutomatonResult<Vec<u8>> {
        let mut cells = vec![0u8; size];
        match self {
            Seed::Empty => {}
            Seed::Center => {
                if size > 0 {
                    cells[size / 2] = 1;
                }
            }
            Seed::Cells { indices } => {
                for &index in indices {
                    let slot = cells.get_mut(index).ok_or(AutomatonError::OutOfRange {
                        index: index as i64,
                        size,
                    })?;
                    *slot = 1;
                }
            }
            Seed::Random { seed, density } => {
                let density = if density.is_nan() {
                    0.5
                } else {
                    density.clamp(0.0, 1.0)
                };
                let mut rng = StdRng::seed_from_u64(*seed);
                for cell in &mut cells {
                    *cell = u8::from(rng.random_bool(density));
                }
            }
        }
        Ok(cells)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seed::Empty => write!(f, "empty"),
            Seed::Center => write!(f, "center"),
            Seed::Cells { indices } => {
                let list: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
                write!(f, "cells:{}", list.join(","))
            }
            Seed::Random { seed, density } => write!(f, "random:{seed}:{density}"),
        }
    }
}

/// Parses `empty`, `center`, `cells:1,5,9`, `random:<seed>` or
/// `random:<seed>:<density>`.
impl FromStr for Seed {
    type Err = AutomatonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AutomatonError::Config {
            message: format!("unrecognized seed: {s}"),
        };
        let (kind, rest) = match s.split_once(':') {
            Some((kind, rest)) => (kind, Some(rest)),
            None => (s, None),
        };
        match (kind.trim(), rest) {
            ("empty", None) => Ok(Seed::Empty),
            ("center", None) => Ok(Seed::Center),
            ("cells", Some(list)) => {
                let indices = list
                    .split(',')
                    .map(str::trim)
                    .filter(|entry| !entry.is_empty())
                    .map(|entry| entry.parse::<usize>().map_err(|_| invalid()))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Seed::Cells { indices })
            }
            ("random", Some(params)) => {
                let (seed, density) = match params.split_once(':') {
                    Some((seed, density)) => {
                        (seed, density.trim().parse::<f64>().map_err(|_| invalid())?)
                    }
                    None => (params, 0.5),
                };
                let seed = seed.trim().parse::<u64>().map_err(|_| invalid())?;
                Ok(Seed::Random { seed, density })
            }
            _ => Err(invalid()),
        }
    }
}
