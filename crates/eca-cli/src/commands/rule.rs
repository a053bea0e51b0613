//! Rule command implementation.

use anyhow::Result;
use eca_automaton::RuleTable;

/// Print a rule as its neighborhood dictionary.
pub fn execute(rule: u32) -> Result<()> {
    let table = RuleTable::from_number(rule)?;

    println!("Rule {} ({:08b})", table.number(), table.number());
    println!("{:-<20}", "");
    for (neighborhood, output) in table.entries() {
        println!("  {neighborhood} -> {output}");
    }

    Ok(())
}
