//! Prompt construction and response parsing.
//!
//! The model is shown the rule as a dictionary from neighborhood to output and
//! asked to look the neighborhood up. Replies are read leniently: structured
//! JSON first, then the first bare binary digit in free text.

use std::fmt::Write as _;

use eca_automaton::{Neighborhood, RuleTable};
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::error::{PredictionError, PredictionResult};

/// Structured reply for a single-cell query.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CellStateReply {
    /// Next state of the center cell, 0 or 1.
    pub state: u8,
}

/// Structured reply for a whole-row query.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RowStateReply {
    /// Next state of every cell, in order, each 0 or 1.
    pub cells: Vec<u8>,
}

/// System prompts for both query shapes, overridable by callers.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub cell_system_prompt: String,
    pub row_system_prompt: String,
}

impl PromptTemplate {
    pub fn new(cell_system_prompt: impl Into<String>, row_system_prompt: impl Into<String>) -> Self {
        Self {
            cell_system_prompt: cell_system_prompt.into(),
            row_system_prompt: row_system_prompt.into(),
        }
    }

    /// User message for a single-cell lookup.
    pub fn cell_prompt(&self, neighborhood: Neighborhood, rules: &RuleTable) -> String {
        let mut out = dictionary(rules);
        let _ = write!(out, "\nNeighborhood: {neighborhood}\nNext state:");
        out
    }

    /// User message for a whole-row update on a ring.
    pub fn row_prompt(&self, row: &[u8], rules: &RuleTable) -> String {
        let mut out = dictionary(rules);
        let cells: String = row.iter().map(|c| if *c == 1 { '1' } else { '0' }).collect();
        let _ = write!(
            out,
            "\nThe row wraps around: the first cell's left neighbor is the last cell.\n\
             Row ({} cells): {cells}\nNext row:",
            row.len()
        );
        out
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        let cell_schema = serde_json::to_string_pretty(&schema_for!(CellStateReply))
            .unwrap_or_else(|_| "{}".into());
        let row_schema = serde_json::to_string_pretty(&schema_for!(RowStateReply))
            .unwrap_or_else(|_| "{}".into());

        let cell = [
            "You are one cell of an elementary cellular automaton.",
            "You receive a lookup table mapping each three-cell neighborhood (left, center, right) to the next state, followed by your current neighborhood.",
            "Find your neighborhood in the table and answer with its next state as JSON matching this schema:",
            &format!("```json\n{cell_schema}\n```"),
            "Answer with the JSON only.",
        ]
        .join("\n\n");

        let row = [
            "You evolve a row of an elementary cellular automaton by one generation.",
            "You receive a lookup table mapping each three-cell neighborhood (left, center, right) to the next state, followed by the current row.",
            "For every cell, look up its neighborhood and answer with the full next row as JSON matching this schema:",
            &format!("```json\n{row_schema}\n```"),
            "Answer with the JSON only.",
        ]
        .join("\n\n");

        Self::new(cell, row)
    }
}

fn dictionary(rules: &RuleTable) -> String {
    let mut out = format!("Rule {} lookup table:\n", rules.number());
    for (neighborhood, output) in rules.entries() {
        let _ = writeln!(out, "{neighborhood} -> {output}");
    }
    out
}

/// Strip markdown fences and a leading `json` language tag.
pub(crate) fn scrub_response(raw: &str) -> &str {
    raw.trim()
        .trim_matches('`')
        .trim_start_matches("json")
        .trim_matches(['`', ' ', '\n'])
}

fn binary_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty() && token.chars().all(|c| c == '0' || c == '1'))
}

/// Read a single 0/1 from a model reply.
pub fn parse_cell_response(raw: &str) -> PredictionResult<u8> {
    let cleaned = scrub_response(raw);

    if let Ok(reply) = serde_json::from_str::<CellStateReply>(cleaned) {
        return match reply.state {
            0 | 1 => Ok(reply.state),
            other => Err(PredictionError::malformed(
                format!("state {other} is not binary"),
                raw,
            )),
        };
    }

    binary_tokens(cleaned)
        .find(|token| token.len() == 1)
        .map(|token| if token == "1" { 1 } else { 0 })
        .ok_or_else(|| PredictionError::malformed("no binary digit in reply", raw))
}

/// Read a row of `expected_len` 0/1 values from a model reply.
pub fn parse_row_response(raw: &str, expected_len: usize) -> PredictionResult<Vec<u8>> {
    let cleaned = scrub_response(raw);

    if let Ok(reply) = serde_json::from_str::<RowStateReply>(cleaned) {
        if reply.cells.len() != expected_len {
            return Err(PredictionError::malformed(
                format!("expected {expected_len} cells, got {}", reply.cells.len()),
                raw,
            ));
        }
        if let Some(bad) = reply.cells.iter().find(|c| **c > 1) {
            return Err(PredictionError::malformed(
                format!("state {bad} is not binary"),
                raw,
            ));
        }
        return Ok(reply.cells);
    }

    let to_cells = |token: &str| -> Vec<u8> {
        token.chars().map(|c| if c == '1' { 1 } else { 0 }).collect()
    };

    if let Some(token) = binary_tokens(cleaned).find(|token| token.len() == expected_len) {
        return Ok(to_cells(token));
    }

    // Digits separated by spaces or commas.
    let digits: Vec<&str> = binary_tokens(cleaned).filter(|t| t.len() == 1).collect();
    if digits.len() == expected_len {
        return Ok(digits.into_iter().flat_map(to_cells).collect());
    }

    Err(PredictionError::malformed(
        format!("no row of {expected_len} binary cells in reply"),
        raw,
    ))
}
