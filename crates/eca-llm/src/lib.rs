//! Language-model predictors for elementary cellular automata.
//!
//! The experiment: show a model the rule as a lookup table and a cell's
//! neighborhood, and see whether it answers with the same next state as the
//! deterministic engine in `eca-automaton`.
//!
//! - [`NextStatePredictor`] is the blocking seam between the engine side and
//!   any model transport.
//! - [`ChatCompletionPredictor`] talks to OpenAI-compatible endpoints.
//! - [`TableLookupPredictor`] answers from the rule table itself.
//! - [`Comparison`] scores a predictor against the engine generation by
//!   generation.

mod chat;
mod comparison;
mod error;
mod predictor;
mod prompt;
mod resolver;

pub use chat::{ChatCompletionPredictor, GenerationOptions};
pub use comparison::{Comparison, ComparisonReport, QueryMode, StepComparison};
pub use error::{PredictionError, PredictionResult};
pub use predictor::{NextStatePredictor, TableLookupPredictor};
pub use prompt::{
    parse_cell_response, parse_row_response, CellStateReply, PromptTemplate, RowStateReply,
};
pub use resolver::LlmResolver;
