//! The elementary automaton engine.
//!
//! `ElementaryAutomaton` owns a fixed-length row of binary cells and a rule
//! table, and advances the row one generation at a time on a ring.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AutomatonError, AutomatonResult};
use crate::history::{Generation, GenerationHistory};
use crate::rule::{check_state, Neighborhood, RuleTable};
use crate::seed::Seed;

/// Result of a single step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    /// Generation number reached by this step.
    pub generation: u64,

    /// Number of cells whose value changed.
    pub changed: usize,

    /// Live cells after the step.
    pub live: usize,

    /// Duration of the step.
    pub duration: Duration,
}

impl StepResult {
    /// Check if any cells changed.
    pub fn had_changes(&self) -> bool {
        self.changed > 0
    }
}

/// Map a horizontal surface coordinate to a cell index.
///
/// The result is not bounds-checked and may be negative or past the row.
pub fn cell_index(x: f64, cell_width: f64) -> i64 {
    (x / cell_width).floor() as i64
}

/// Pixel geometry of a row laid out across a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellGeometry {
    /// Width of one cell in pixels.
    pub cell_width: f64,
}

impl CellGeometry {
    /// Geometry for a fixed cell width.
    pub fn new(cell_width: f64) -> Self {
        Self { cell_width }
    }

    /// Stretch `size` cells across a surface `surface_width` pixels wide.
    pub fn fit(surface_width: f64, size: usize) -> Self {
        Self {
            cell_width: surface_width / size.max(1) as f64,
        }
    }

    /// Cell under the horizontal coordinate `x`.
    pub fn cell_index(&self, x: f64) -> i64 {
        cell_index(x, self.cell_width)
    }
}

/// One-dimensional binary cellular automaton with periodic boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementaryAutomaton {
    cells: Vec<u8>,
    rules: RuleTable,
    generation: u64,
}

impl ElementaryAutomaton {
    /// Create an all-dead row of `size` cells under `rule`.
    pub fn new(size: usize, rule: u32) -> AutomatonResult<Self> {
        let rules = RuleTable::from_number(rule)?;
        Self::with_table(size, rules)
    }

    /// Create an all-dead row of `size` cells under an existing table.
    pub fn with_table(size: usize, rules: RuleTable) -> AutomatonResult<Self> {
        if size == 0 {
            return Err(AutomatonError::InvalidSize { size });
        }
        Ok(Self {
            cells: vec![0; size],
            rules,
            generation: 0,
        })
    }

    /// Number of cells in the row.
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Current row.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// The rule table in use.
    pub fn rule_table(&self) -> &RuleTable {
        &self.rules
    }

    /// The rule number the table encodes.
    pub fn rule_number(&self) -> u8 {
        self.rules.number()
    }

    /// Generations advanced since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Live cells in the current row.
    pub fn live_cells(&self) -> usize {
        self.cells.iter().filter(|c| **c == 1).count()
    }

    /// Overwrite one cell.
    ///
    /// Fails with `OutOfRange` for indices outside the row and `InvalidState`
    /// for values other than 0/1. The row is untouched on failure.
    pub fn set_cell_state(&mut self, index: i64, state: u8) -> AutomatonResult<()> {
        let size = self.cells.len();
        let slot = usize::try_from(index)
            .ok()
            .and_then(|i| self.cells.get_mut(i))
            .ok_or(AutomatonError::OutOfRange { index, size })?;
        *slot = check_state(state)?;
        Ok(())
    }

    /// Replace the row with a seeded initial condition.
    pub fn seed(&mut self, seed: &Seed) -> AutomatonResult<()> {
        self.cells = seed.row(self.cells.len())?;
        Ok(())
    }

    /// Kill every cell.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Next value of a cell given its neighborhood. Only the lowest bit of each
    /// input is read.
    pub fn compute_next_state(&self, left: u8, center: u8, right: u8) -> u8 {
        self.rules.output_for(Neighborhood::from_low_bits(left, center, right))
    }

    /// Neighborhood of `index` in the current row, wrapping at both ends.
    pub fn neighborhood(&self, index: usize) -> Neighborhood {
        Neighborhood::of(&self.cells, index)
    }

    /// Row that the next call to [`advance`](Self::advance) would produce.
    pub fn next_row(&self) -> Vec<u8> {
        (0..self.cells.len())
            .map(|i| self.rules.output_for(self.neighborhood(i)))
            .collect()
    }

    /// Advance one generation.
    ///
    /// The whole old row is read into a separate buffer before the swap, so
    /// no cell ever sees a partially updated row.
    pub fn advance(&mut self) -> StepResult {
        let started = Instant::now();
        let next = self.next_row();
        let changed = self
            .cells
            .iter()
            .zip(&next)
            .filter(|(old, new)| old != new)
            .count();

        self.cells = next;
        self.generation += 1;

        let result = StepResult {
            generation: self.generation,
            changed,
            live: self.live_cells(),
            duration: started.elapsed(),
        };
        debug!(
            generation = result.generation,
            changed = result.changed,
            live = result.live,
            "eca_step_complete"
        );
        result
    }

    /// Copy the current row out.
    pub fn snapshot(&self) -> Generation {
        Generation {
            index: self.generation,
            cells: self.cells.clone(),
        }
    }

    /// Record the current row, then advance, `steps` times.
    ///
    /// The history receives `steps` rows starting with the current one, the
    /// same order a renderer draws them top to bottom.
    pub fn run(&mut self, steps: usize, history: &mut GenerationHistory) -> Vec<StepResult> {
        info!(
            rule = self.rule_number(),
            size = self.size(),
            steps,
            "eca_run_start"
        );
        let mut results = Vec::with_capacity(steps);
        for _ in 0..steps {
            history.push(self.snapshot());
            results.push(self.advance());
        }
        results
    }
}
