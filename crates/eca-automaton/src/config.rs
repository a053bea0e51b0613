//! Configuration schema for automaton runs.
//!
//! A run is described by its row size, rule number, seed and step count, and
//! can be loaded from TOML or JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::automaton::{CellGeometry, ElementaryAutomaton};
use crate::error::{AutomatonError, AutomatonResult};
use crate::history::GenerationHistory;
use crate::rule::RuleTable;
use crate::seed::Seed;

/// Root configuration for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomatonConfig {
    /// Number of cells in the row.
    #[serde(default = "default_size")]
    pub size: usize,
    /// Wolfram rule number (0..=255).
    #[serde(default = "default_rule")]
    pub rule: u32,
    /// Number of generations to produce.
    #[serde(default = "default_steps")]
    pub steps: usize,
    /// Initial condition.
    #[serde(default)]
    pub seed: Seed,
    /// Keep only this many generations in memory (all when unset).
    #[serde(default)]
    pub history_window: Option<usize>,
    /// Cell width in pixels on the drawing surface.
    #[serde(default = "default_cell_width")]
    pub cell_width: usize,
}

fn default_size() -> usize {
    64
}

fn default_rule() -> u32 {
    30
}

fn default_steps() -> usize {
    32
}

fn default_cell_width() -> usize {
    16
}

impl Default for AutomatonConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            rule: default_rule(),
            steps: default_steps(),
            seed: Seed::default(),
            history_window: None,
            cell_width: default_cell_width(),
        }
    }
}

impl AutomatonConfig {
    /// Config for `size` cells under `rule` with the other fields defaulted.
    pub fn new(size: usize, rule: u32) -> Self {
        Self {
            size,
            rule,
            ..Default::default()
        }
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = seed;
        self
    }

    /// Set the step count.
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// Bound the generation history.
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = Some(window);
        self
    }

    /// Check the rule number, size and seed without building anything.
    pub fn validate(&self) -> AutomatonResult<()> {
        RuleTable::from_number(self.rule)?;
        if self.size == 0 {
            return Err(AutomatonError::InvalidSize { size: self.size });
        }
        self.seed.row(self.size)?;
        Ok(())
    }

    /// Build a seeded engine.
    pub fn build(&self) -> AutomatonResult<ElementaryAutomaton> {
        let mut automaton = ElementaryAutomaton::new(self.size, self.rule)?;
        automaton.seed(&self.seed)?;
        Ok(automaton)
    }

    /// Empty history honoring `history_window`.
    pub fn history(&self) -> GenerationHistory {
        match self.history_window {
            Some(window) => GenerationHistory::with_window(window),
            None => GenerationHistory::unbounded(),
        }
    }

    /// Surface geometry for the configured cell width.
    pub fn geometry(&self) -> CellGeometry {
        CellGeometry::new(self.cell_width as f64)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> AutomatonResult<String> {
        toml::to_string_pretty(self).map_err(|e| AutomatonError::Config {
            message: e.to_string(),
        })
    }

    /// Deserialize from TOML.
    pub fn from_toml(raw: &str) -> AutomatonResult<Self> {
        toml::from_str(raw).map_err(|e| AutomatonError::Config {
            message: e.to_string(),
        })
    }

    /// Deserialize from JSON.
    pub fn from_json(raw: &str) -> AutomatonResult<Self> {
        serde_json::from_str(raw).map_err(|e| AutomatonError::Config {
            message: e.to_string(),
        })
    }

    /// Load from a file, choosing the format by extension (`.json` or TOML).
    pub fn load<P: AsRef<Path>>(path: P) -> AutomatonResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| AutomatonError::Config {
            message: format!("unable to read {}: {e}", path.display()),
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&raw),
            _ => Self::from_toml(&raw),
        }
    }
}
