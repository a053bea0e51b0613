//! Compare command implementation.
//!
//! Scores a predictor against the engine one generation at a time.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use eca_llm::{
    ChatCompletionPredictor, Comparison, ComparisonReport, LlmResolver, NextStatePredictor,
    QueryMode, StepComparison, TableLookupPredictor,
};

use crate::config::Config;

/// Arguments for `eca compare`.
#[derive(Debug)]
pub struct CompareArgs {
    pub rule: Option<u32>,
    pub size: Option<usize>,
    pub steps: Option<usize>,
    pub seed: Option<String>,
    pub mode: Option<QueryMode>,
    pub resolvers: Option<PathBuf>,
    pub baseline: bool,
    pub json: bool,
}

/// Execute the compare command.
pub fn execute(config: &Config, args: CompareArgs) -> Result<()> {
    let run_config = super::automaton_config(
        config,
        None,
        args.rule,
        args.size,
        args.steps,
        args.seed.as_deref(),
    )?;
    let mode = args.mode.unwrap_or(config.mode);

    let predictor = build_predictor(config, args.resolvers.as_ref(), args.baseline)?;

    let mut automaton = run_config.build()?;
    if !args.json {
        println!(
            "🧪 Comparing {} against rule {} ({} cells, {} generations, {} mode)",
            predictor.name(),
            automaton.rule_number(),
            automaton.size(),
            run_config.steps,
            mode
        );
        println!("{:─<60}", "");
    }

    let report = Comparison::new(predictor.as_ref())
        .with_mode(mode)
        .run(&mut automaton, run_config.steps);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

/// The predictor is built once here and lent to the comparison for its whole run.
fn build_predictor(
    config: &Config,
    resolvers_file: Option<&PathBuf>,
    baseline: bool,
) -> Result<Box<dyn NextStatePredictor>> {
    if baseline {
        return Ok(Box::new(TableLookupPredictor));
    }

    let resolvers = match resolvers_file.or(config.resolvers_file.as_ref()) {
        Some(path) => LlmResolver::load_from_toml(path)
            .with_context(|| format!("Failed to load resolvers from {}", path.display()))?,
        None => LlmResolver::load_from_env()?,
    };

    let predictor = ChatCompletionPredictor::with_timeout(
        resolvers,
        Duration::from_secs(config.timeout_secs),
    )?;
    Ok(Box::new(predictor))
}

fn step_line(step: &StepComparison) -> String {
    let predicted: String = step
        .predicted
        .iter()
        .map(|cell| match cell {
            Some(1) => '█',
            Some(_) => ' ',
            None => '?',
        })
        .collect();
    let mark = if step.is_exact() { "✓" } else { "✗" };
    format!(
        "{:>4} │{}│ {} {:>5.1}%",
        step.generation,
        predicted,
        mark,
        step.accuracy() * 100.0
    )
}

fn print_report(report: &ComparisonReport) {
    for step in &report.steps {
        println!("{}", step_line(step));
    }

    println!();
    println!("📈 Results:");
    println!("   Accuracy:    {:.1}%", report.accuracy() * 100.0);
    println!(
        "   Exact rows:  {}/{}",
        report.exact_steps(),
        report.steps.len()
    );
    println!("   Matches:     {}", report.total_matches());
    println!("   Mismatches:  {}", report.total_mismatches());
    println!("   Failures:    {}", report.total_failures());
}
