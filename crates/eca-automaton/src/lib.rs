//! Elementary cellular automaton engine.
//!
//! This crate implements Wolfram's one-dimensional, two-state, radius-one
//! cellular automata. A row of binary cells evolves on a ring: every cell looks
//! at its left neighbor, itself and its right neighbor, and the rule table maps
//! that 3-bit neighborhood to the cell's next value.
//!
//! ## Core Concepts
//!
//! - **RuleTable**: the 8-bit expansion of a rule number, most significant bit first
//! - **Neighborhood**: `(left, center, right)` with value `4*left + 2*center + right`
//! - **ElementaryAutomaton**: owns the row and the table, advances generations
//! - **GenerationHistory**: caller-owned snapshots used for rendering
//!
//! ## Lookup Convention
//!
//! ```text
//! neighborhood: 111 110 101 100 011 010 001 000
//! rule 30:        0   0   0   1   1   1   1   0
//! next = table[7 - (4*left + 2*center + right)]
//! ```
//!
//! ## Example
//!
//! ```
//! use eca_automaton::ElementaryAutomaton;
//!
//! let mut ca = ElementaryAutomaton::new(5, 30).unwrap();
//! ca.set_cell_state(2, 1).unwrap();
//! ca.advance();
//! assert_eq!(ca.cells(), &[0, 1, 1, 1, 0]);
//! ```

mod automaton;
pub mod config;
mod error;
mod history;
pub mod render;
mod rule;
mod seed;

pub use automaton::{cell_index, CellGeometry, ElementaryAutomaton, StepResult};
pub use config::AutomatonConfig;
pub use error::{AutomatonError, AutomatonResult};
pub use history::{Generation, GenerationHistory};
pub use render::{render_pbm, render_text, TextPalette};
pub use rule::{rules, Neighborhood, RuleTable, NEIGHBORHOOD_COUNT};
pub use seed::Seed;
