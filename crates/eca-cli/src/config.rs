//! CLI configuration management.
//!
//! Supports loading configuration from environment variables, config files,
//! and CLI arguments with proper precedence.

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use eca_llm::QueryMode;
use serde::{Deserialize, Serialize};

/// Application-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rule used when `--rule` is not given.
    pub rule: u32,

    /// Row size used when `--size` is not given.
    pub size: usize,

    /// Generations produced when `--steps` is not given.
    pub steps: usize,

    /// Query mode for `compare` when `--mode` is not given.
    pub mode: QueryMode,

    /// TOML file listing model resolvers; environment resolvers are used when unset.
    pub resolvers_file: Option<PathBuf>,

    /// Request timeout for model calls, in seconds.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rule: 30,
            size: 64,
            steps: 32,
            mode: QueryMode::Cell,
            resolvers_file: None,
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from the config file, then environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path).with_context(|| {
                    format!("Failed to read config from {}", config_path.display())
                })?;
                config = serde_json::from_str(&contents)
                    .with_context(|| "Failed to parse config file")?;
            }
        }

        // Environment variables take precedence over the file
        if let Ok(rule) = std::env::var("ECA_RULE") {
            config.rule = rule.parse().with_context(|| format!("Invalid ECA_RULE: {rule}"))?;
        }
        if let Ok(size) = std::env::var("ECA_SIZE") {
            config.size = size.parse().with_context(|| format!("Invalid ECA_SIZE: {size}"))?;
        }
        if let Ok(steps) = std::env::var("ECA_STEPS") {
            config.steps = steps
                .parse()
                .with_context(|| format!("Invalid ECA_STEPS: {steps}"))?;
        }
        if let Ok(mode) = std::env::var("ECA_MODE") {
            config.mode = mode.parse().map_err(anyhow::Error::msg)?;
        }
        if let Ok(path) = std::env::var("ECA_RESOLVERS_FILE") {
            config.resolvers_file = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    /// Save current configuration to the config file.
    pub fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_file_path() {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
            let contents = serde_json::to_string_pretty(self)?;
            std::fs::write(&config_path, contents)
                .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
        }
        Ok(())
    }

    /// Get the path to the config file.
    ///
    /// `ECA_CONFIG_DIR` overrides the platform config directory.
    pub fn config_file_path() -> Option<PathBuf> {
        if let Ok(dir) = std::env::var("ECA_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.json"));
        }
        ProjectDirs::from("dev", "eca", "eca").map(|dirs| dirs.config_dir().join("config.json"))
    }
}
