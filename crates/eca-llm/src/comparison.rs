//! Measuring a predictor against the deterministic engine.
//!
//! At every generation the predictor is shown the current row and asked for
//! the next one; its answer is scored against what the engine computes. The
//! engine then advances on its own row, so one bad prediction never leaks into
//! later generations.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use eca_automaton::ElementaryAutomaton;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::predictor::NextStatePredictor;

/// Whether a row is predicted cell by cell or in a single request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// One request per cell, issued in index order.
    #[default]
    Cell,
    /// One request for the whole row.
    Row,
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryMode::Cell => write!(f, "cell"),
            QueryMode::Row => write!(f, "row"),
        }
    }
}

impl FromStr for QueryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cell" => Ok(QueryMode::Cell),
            "row" => Ok(QueryMode::Row),
            other => Err(format!("unknown query mode: {other} (expected cell or row)")),
        }
    }
}

/// Outcome of predicting one generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepComparison {
    /// Generation the prediction starts from.
    pub generation: u64,
    /// Row shown to the predictor.
    pub row: Vec<u8>,
    /// Row computed by the engine.
    pub expected: Vec<u8>,
    /// Predictor's answer per cell; `None` where it failed.
    pub predicted: Vec<Option<u8>>,
    pub matches: usize,
    pub mismatches: usize,
    pub failures: usize,
}

impl StepComparison {
    fn score(generation: u64, row: Vec<u8>, expected: Vec<u8>, predicted: Vec<Option<u8>>) -> Self {
        let mut matches = 0;
        let mut mismatches = 0;
        let mut failures = 0;
        for (want, got) in expected.iter().zip(&predicted) {
            match got {
                Some(got) if got == want => matches += 1,
                Some(_) => mismatches += 1,
                None => failures += 1,
            }
        }
        Self {
            generation,
            row,
            expected,
            predicted,
            matches,
            mismatches,
            failures,
        }
    }

    /// Fraction of cells predicted correctly (failures count as wrong).
    pub fn accuracy(&self) -> f64 {
        let total = self.expected.len();
        if total == 0 {
            0.0
        } else {
            self.matches as f64 / total as f64
        }
    }

    /// Every cell answered and correct.
    pub fn is_exact(&self) -> bool {
        self.matches == self.expected.len()
    }
}

/// Summary over a whole comparison run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub rule: u8,
    pub predictor: String,
    pub mode: QueryMode,
    pub steps: Vec<StepComparison>,
}

impl ComparisonReport {
    pub fn total_matches(&self) -> usize {
        self.steps.iter().map(|s| s.matches).sum()
    }

    pub fn total_mismatches(&self) -> usize {
        self.steps.iter().map(|s| s.mismatches).sum()
    }

    pub fn total_failures(&self) -> usize {
        self.steps.iter().map(|s| s.failures).sum()
    }

    /// Fraction of all predicted cells that were correct.
    pub fn accuracy(&self) -> f64 {
        let total: usize = self.steps.iter().map(|s| s.expected.len()).sum();
        if total == 0 {
            0.0
        } else {
            self.total_matches() as f64 / total as f64
        }
    }

    /// Generations the predictor got exactly right.
    pub fn exact_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.is_exact()).count()
    }
}

/// Drives an engine and a predictor side by side.
pub struct Comparison<'a> {
    predictor: &'a dyn NextStatePredictor,
    mode: QueryMode,
}

impl<'a> Comparison<'a> {
    pub fn new(predictor: &'a dyn NextStatePredictor) -> Self {
        Self {
            predictor,
            mode: QueryMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: QueryMode) -> Self {
        self.mode = mode;
        self
    }

    /// Predict the engine's next row without advancing it.
    ///
    /// Failed predictions are logged and recorded as `None`; they never abort
    /// the comparison.
    pub fn compare_step(&self, automaton: &ElementaryAutomaton) -> StepComparison {
        let row = automaton.cells().to_vec();
        let rules = automaton.rule_table();
        let expected = automaton.next_row();

        let predicted: Vec<Option<u8>> = match self.mode {
            QueryMode::Cell => (0..row.len())
                .map(|i| {
                    let neighborhood = automaton.neighborhood(i);
                    match self.predictor.predict(neighborhood, rules) {
                        Ok(state) => Some(state),
                        Err(err) => {
                            warn!(
                                target: "eca::compare",
                                predictor = self.predictor.name(),
                                cell = i,
                                neighborhood = %neighborhood,
                                "prediction failed: {err}"
                            );
                            None
                        }
                    }
                })
                .collect(),
            QueryMode::Row => match self.predictor.predict_row(&row, rules) {
                Ok(cells) if cells.len() == row.len() => cells.into_iter().map(Some).collect(),
                Ok(cells) => {
                    warn!(
                        target: "eca::compare",
                        predictor = self.predictor.name(),
                        expected = row.len(),
                        got = cells.len(),
                        "predicted row has the wrong length"
                    );
                    vec![None; row.len()]
                }
                Err(err) => {
                    warn!(
                        target: "eca::compare",
                        predictor = self.predictor.name(),
                        generation = automaton.generation(),
                        "row prediction failed: {err}"
                    );
                    vec![None; row.len()]
                }
            },
        };

        StepComparison::score(automaton.generation(), row, expected, predicted)
    }

    /// Compare for `steps` generations, advancing the engine after each one.
    pub fn run(&self, automaton: &mut ElementaryAutomaton, steps: usize) -> ComparisonReport {
        let started = Instant::now();
        let mut results = Vec::with_capacity(steps);

        for _ in 0..steps {
            let step = self.compare_step(automaton);
            debug!(
                target: "eca::compare",
                generation = step.generation,
                matches = step.matches,
                mismatches = step.mismatches,
                failures = step.failures,
                "comparison_step"
            );
            results.push(step);
            automaton.advance();
        }

        let report = ComparisonReport {
            rule: automaton.rule_number(),
            predictor: self.predictor.name().to_string(),
            mode: self.mode,
            steps: results,
        };
        info!(
            target: "eca::compare",
            rule = report.rule,
            predictor = %report.predictor,
            mode = %report.mode,
            accuracy = report.accuracy(),
            failures = report.total_failures(),
            duration_ms = started.elapsed().as_millis() as u64,
            "comparison_complete"
        );
        report
    }
}
