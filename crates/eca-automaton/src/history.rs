//! Caller-owned generation history.
//!
//! The engine only exposes its current row. Anything that wants to draw a
//! space-time diagram copies the row after each step into a
//! [`GenerationHistory`].

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// A snapshot of the row at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    /// Generation number (0 = initial row).
    pub index: u64,
    /// Copy of the row.
    pub cells: Vec<u8>,
}

impl Generation {
    /// Number of live cells in this snapshot.
    pub fn live_cells(&self) -> usize {
        self.cells.iter().filter(|c| **c == 1).count()
    }
}

/// Ordered list of generations, optionally bounded to a sliding window.
#[derive(Debug, Clone, Default)]
pub struct GenerationHistory {
    generations: VecDeque<Generation>,
    window: Option<usize>,
}

impl GenerationHistory {
    /// History that keeps every generation.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// History that keeps only the most recent `window` generations.
    pub fn with_window(window: usize) -> Self {
        Self {
            generations: VecDeque::new(),
            window: Some(window.max(1)),
        }
    }

    /// Configured window, if any.
    pub fn window(&self) -> Option<usize> {
        self.window
    }

    /// Append a snapshot, evicting the oldest when over the window.
    pub fn push(&mut self, generation: Generation) {
        self.generations.push_back(generation);
        if let Some(window) = self.window {
            while self.generations.len() > window {
                self.generations.pop_front();
            }
        }
    }

    /// Most recent snapshot.
    pub fn latest(&self) -> Option<&Generation> {
        self.generations.back()
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Generation> {
        self.generations.iter()
    }

    pub fn len(&self) -> usize {
        self.generations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    /// Row width of the stored generations (0 when empty).
    pub fn width(&self) -> usize {
        self.generations.front().map(|g| g.cells.len()).unwrap_or(0)
    }
}
