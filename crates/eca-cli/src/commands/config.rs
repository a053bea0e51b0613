//! Config command implementation.
//!
//! Manages CLI configuration.

use std::path::PathBuf;

use anyhow::Result;
use eca_automaton::RuleTable;

use crate::config::Config;

/// Show current configuration.
pub fn show(config: &Config) -> Result<()> {
    println!("eca CLI Configuration");
    println!("{:-<40}", "");

    println!("Rule:            {}", config.rule);
    println!("Size:            {}", config.size);
    println!("Steps:           {}", config.steps);
    println!("Compare Mode:    {}", config.mode);
    println!(
        "Resolvers File:  {}",
        config
            .resolvers_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(environment)".to_string())
    );
    println!("Timeout:         {}s", config.timeout_secs);

    if let Some(config_path) = Config::config_file_path() {
        println!("\nConfig file: {}", config_path.display());
    }

    Ok(())
}

/// Set a configuration value.
pub fn set(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "rule" => {
            let rule: u32 = value.parse()?;
            RuleTable::from_number(rule)?;
            config.rule = rule;
        }
        "size" => {
            let size: usize = value.parse()?;
            if size == 0 {
                anyhow::bail!("size must be at least 1");
            }
            config.size = size;
        }
        "steps" => {
            config.steps = value.parse()?;
        }
        "mode" => {
            config.mode = value.parse().map_err(anyhow::Error::msg)?;
        }
        "resolvers-file" | "resolvers" => {
            config.resolvers_file = Some(PathBuf::from(value));
        }
        "timeout" => {
            config.timeout_secs = value.parse()?;
        }
        _ => {
            anyhow::bail!(
                "Unknown config key: {}. Valid keys: rule, size, steps, mode, resolvers-file, timeout",
                key
            );
        }
    }

    println!("Set {} to: {}", key, value);
    config.save()?;
    Ok(())
}

/// Get a configuration value.
pub fn get(config: &Config, key: &str) -> Result<()> {
    let value = match key {
        "rule" => config.rule.to_string(),
        "size" => config.size.to_string(),
        "steps" => config.steps.to_string(),
        "mode" => config.mode.to_string(),
        "resolvers-file" | "resolvers" => config
            .resolvers_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
        "timeout" => config.timeout_secs.to_string(),
        _ => {
            anyhow::bail!("Unknown config key: {}", key);
        }
    };

    println!("{}", value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn reset() -> Result<()> {
    let config = Config::default();
    config.save()?;
    println!("Configuration reset to defaults");
    Ok(())
}
