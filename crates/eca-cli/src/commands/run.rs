//! Run command implementation.
//!
//! Evolves an automaton and draws the generations top to bottom.

use std::path::PathBuf;

use anyhow::{Context, Result};
use eca_automaton::{render_pbm, render_text, TextPalette};
use tracing::info;

use crate::config::Config;
use crate::OutputFormat;

/// Arguments for `eca run`.
#[derive(Debug)]
pub struct RunArgs {
    pub rule: Option<u32>,
    pub size: Option<usize>,
    pub steps: Option<usize>,
    pub seed: Option<String>,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
    pub cell_px: Option<usize>,
    pub output: Option<PathBuf>,
}

/// Execute the run command.
pub fn execute(config: &Config, args: RunArgs) -> Result<()> {
    let run_config = super::automaton_config(
        config,
        args.config.as_deref(),
        args.rule,
        args.size,
        args.steps,
        args.seed.as_deref(),
    )?;

    let mut automaton = run_config.build()?;
    let mut history = run_config.history();
    let results = automaton.run(run_config.steps, &mut history);

    let changed: usize = results.iter().map(|r| r.changed).sum();
    info!(
        rule = automaton.rule_number(),
        generations = history.len(),
        changed,
        "run complete"
    );

    let drawing = match args.format {
        OutputFormat::Text => render_text(&history, TextPalette::default()),
        OutputFormat::Pbm => {
            render_pbm(&history, args.cell_px.unwrap_or(run_config.cell_width))
        }
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, &drawing)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "✅ Rule {}: {} generations of {} cells",
                automaton.rule_number(),
                history.len(),
                automaton.size()
            );
            println!("💾 Saved to: {}", path.display());
        }
        None => print!("{drawing}"),
    }

    Ok(())
}
