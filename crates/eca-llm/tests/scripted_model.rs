//! End-to-end comparison runs against a scripted stand-in for a model.
//!
//! The stand-in produces raw text replies the way a chat model would, so the
//! parsing path is exercised together with the comparison loop.

use std::sync::Mutex;

use eca_automaton::{ElementaryAutomaton, Neighborhood, RuleTable, Seed};
use eca_llm::{
    parse_cell_response, parse_row_response, Comparison, NextStatePredictor, PredictionResult,
    PromptTemplate, QueryMode,
};

/// Replies in free text, and garbles every `garble_every`-th answer.
struct ScriptedModel {
    calls: Mutex<usize>,
    garble_every: usize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn new(garble_every: usize) -> Self {
        Self {
            calls: Mutex::new(0),
            garble_every,
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn next_call(&self) -> usize {
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        *calls
    }
}

impl NextStatePredictor for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    fn predict(&self, neighborhood: Neighborhood, rules: &RuleTable) -> PredictionResult<u8> {
        let prompt = PromptTemplate::default().cell_prompt(neighborhood, rules);
        self.prompts.lock().unwrap().push(prompt);

        let call = self.next_call();
        let raw = if self.garble_every > 0 && call % self.garble_every == 0 {
            "Hmm, hard to say.".to_string()
        } else {
            format!(
                "Looking up {neighborhood}: the answer is {}",
                rules.output_for(neighborhood)
            )
        };
        parse_cell_response(&raw)
    }

    fn predict_row(&self, row: &[u8], rules: &RuleTable) -> PredictionResult<Vec<u8>> {
        let cells: Vec<String> = (0..row.len())
            .map(|i| rules.output_for(Neighborhood::of(row, i)).to_string())
            .collect();
        let raw = format!("```json\n{{\"cells\": [{}]}}\n```", cells.join(", "));
        parse_row_response(&raw, row.len())
    }
}

fn seeded(size: usize, rule: u32) -> ElementaryAutomaton {
    let mut ca = ElementaryAutomaton::new(size, rule).unwrap();
    ca.seed(&Seed::Center).unwrap();
    ca
}

#[test]
fn free_text_replies_score_perfectly() {
    let model = ScriptedModel::new(0);
    let mut ca = seeded(15, 30);
    let report = Comparison::new(&model).run(&mut ca, 6);

    assert_eq!(report.predictor, "scripted");
    assert_eq!(report.accuracy(), 1.0);
    assert_eq!(model.prompts.lock().unwrap().len(), 15 * 6);
}

#[test]
fn garbled_replies_are_counted_not_fatal() {
    let model = ScriptedModel::new(4);
    let mut ca = seeded(8, 90);
    let report = Comparison::new(&model).run(&mut ca, 2);

    // 16 calls, every 4th garbled.
    assert_eq!(report.total_failures(), 4);
    assert_eq!(report.total_mismatches(), 0);
    assert_eq!(report.total_matches(), 12);
    assert_eq!(ca.generation(), 2);
}

#[test]
fn fenced_json_rows_are_accepted() {
    let model = ScriptedModel::new(0);
    let mut ca = seeded(11, 110);
    let report = Comparison::new(&model)
        .with_mode(QueryMode::Row)
        .run(&mut ca, 4);

    assert_eq!(report.exact_steps(), 4);
    assert!(model.prompts.lock().unwrap().is_empty());
}

#[test]
fn prompts_carry_the_full_dictionary() {
    let model = ScriptedModel::new(0);
    let ca = seeded(3, 184);
    Comparison::new(&model).compare_step(&ca);

    let prompts = model.prompts.lock().unwrap();
    for prompt in prompts.iter() {
        assert!(prompt.starts_with("Rule 184 lookup table:"));
        assert_eq!(prompt.matches(" -> ").count(), 8);
    }
}
