//! CLI command implementations.

pub mod compare;
pub mod config;
pub mod rule;
pub mod run;

use anyhow::{Context, Result};
use eca_automaton::{AutomatonConfig, Seed};

use crate::config::Config;

/// Resolve the automaton settings shared by `run` and `compare`.
///
/// Precedence: command-line flags, then the run file, then CLI config.
pub(crate) fn automaton_config(
    config: &Config,
    file: Option<&std::path::Path>,
    rule: Option<u32>,
    size: Option<usize>,
    steps: Option<usize>,
    seed: Option<&str>,
) -> Result<AutomatonConfig> {
    let mut automaton = match file {
        Some(path) => AutomatonConfig::load(path)
            .with_context(|| format!("Failed to load run config {}", path.display()))?,
        None => AutomatonConfig::new(config.size, config.rule).with_steps(config.steps),
    };

    if let Some(rule) = rule {
        automaton.rule = rule;
    }
    if let Some(size) = size {
        automaton.size = size;
    }
    if let Some(steps) = steps {
        automaton.steps = steps;
    }
    if let Some(seed) = seed {
        automaton.seed = seed.parse::<Seed>()?;
    }

    automaton.validate()?;
    Ok(automaton)
}
