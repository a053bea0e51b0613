//! Rule 30 drawn one generation at a time in the terminal.
//!
//! Run with:
//! ```bash
//! cargo run --example rule_30 -p eca-automaton
//! ```

use std::thread;
use std::time::Duration;

use eca_automaton::{rules, ElementaryAutomaton, Seed};

// =============================================================================
// Visualization
// =============================================================================

fn print_row(cells: &[u8], generation: u64) {
    let line: String = cells
        .iter()
        .map(|cell| if *cell == 1 { "\x1B[92m█\x1B[0m" } else { " " })
        .collect();
    println!("  │{line}│ {generation:>4}");
}

// =============================================================================
// Main
// =============================================================================

fn main() -> anyhow::Result<()> {
    let width = 79;
    let max_generations = 40;
    let delay_ms = 50;

    let mut automaton = ElementaryAutomaton::new(width, rules::RULE_30 as u32)?;
    automaton.seed(&Seed::Center)?;

    println!("═══════════════════════════════════════════════════════════════");
    println!("  Elementary Cellular Automaton - Rule {}", automaton.rule_number());
    println!("  {}", automaton.rule_table());
    println!("═══════════════════════════════════════════════════════════════");
    println!();

    for _ in 0..max_generations {
        print_row(automaton.cells(), automaton.generation());
        let result = automaton.advance();
        if !result.had_changes() {
            println!("\n  ✓ Stabilized at generation {}", result.generation);
            break;
        }
        thread::sleep(Duration::from_millis(delay_ms));
    }

    println!();
    println!("  Live cells: {}", automaton.live_cells());
    Ok(())
}
