//! eca CLI - run elementary cellular automata and score language models on them.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

mod commands;
mod config;

use commands::config as config_cmd;
use config::Config;

/// eca - elementary cellular automata, with and without a language model.
#[derive(Parser, Debug)]
#[command(
    name = "eca",
    author,
    version,
    about = "Run Wolfram elementary cellular automata and compare model predictions",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for `run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line of block characters per generation.
    Text,
    /// Plain portable bitmap (P1).
    Pbm,
}

/// Query mode for `compare`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// One model request per cell.
    Cell,
    /// One model request per row.
    Row,
}

impl From<ModeArg> for eca_llm::QueryMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Cell => eca_llm::QueryMode::Cell,
            ModeArg::Row => eca_llm::QueryMode::Row,
        }
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evolve an automaton and draw its generations.
    Run {
        /// Wolfram rule number (0-255).
        #[arg(short, long)]
        rule: Option<u32>,

        /// Number of cells in the row.
        #[arg(short, long)]
        size: Option<usize>,

        /// Number of generations to draw.
        #[arg(short = 'n', long)]
        steps: Option<usize>,

        /// Initial row: empty, center, cells:1,5,9, random:SEED[:DENSITY].
        #[arg(long)]
        seed: Option<String>,

        /// Load the run from a TOML or JSON file; flags override its values.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format.
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Pixels per cell for bitmap output.
        #[arg(long)]
        cell_px: Option<usize>,

        /// Write the drawing to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a rule's lookup table.
    Rule {
        /// Wolfram rule number (0-255).
        rule: u32,
    },

    /// Ask a model to predict each generation and score it against the engine.
    Compare {
        /// Wolfram rule number (0-255).
        #[arg(short, long)]
        rule: Option<u32>,

        /// Number of cells in the row.
        #[arg(short, long)]
        size: Option<usize>,

        /// Number of generations to compare.
        #[arg(short = 'n', long)]
        steps: Option<usize>,

        /// Initial row: empty, center, cells:1,5,9, random:SEED[:DENSITY].
        #[arg(long)]
        seed: Option<String>,

        /// Per-cell or whole-row queries.
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,

        /// TOML file with [[resolvers]] entries.
        #[arg(long)]
        resolvers: Option<PathBuf>,

        /// Use the rule table itself instead of a model.
        #[arg(long)]
        baseline: bool,

        /// Print the full report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Get a configuration value.
    Get {
        /// Configuration key.
        key: String,
    },

    /// Reset configuration to defaults.
    Reset,

    /// Show path to config file.
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN // Default to less noise
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            rule,
            size,
            steps,
            seed,
            config: run_config,
            format,
            cell_px,
            output,
        } => {
            let args = commands::run::RunArgs {
                rule,
                size,
                steps,
                seed,
                config: run_config,
                format,
                cell_px,
                output,
            };
            commands::run::execute(&Config::load()?, args)?;
        }

        Commands::Rule { rule } => {
            commands::rule::execute(rule)?;
        }

        Commands::Compare {
            rule,
            size,
            steps,
            seed,
            mode,
            resolvers,
            baseline,
            json,
        } => {
            let args = commands::compare::CompareArgs {
                rule,
                size,
                steps,
                seed,
                mode: mode.map(Into::into),
                resolvers,
                baseline,
                json,
            };
            commands::compare::execute(&Config::load()?, args)?;
        }

        // Reset and Path do not read the config file.
        Commands::Config(config_cmd_inner) => match config_cmd_inner {
            ConfigCommands::Show => {
                config_cmd::show(&Config::load()?)?;
            }
            ConfigCommands::Set { key, value } => {
                let mut config = Config::load()?;
                config_cmd::set(&mut config, &key, &value)?;
            }
            ConfigCommands::Get { key } => {
                config_cmd::get(&Config::load()?, &key)?;
            }
            ConfigCommands::Reset => {
                config_cmd::reset()?;
            }
            ConfigCommands::Path => {
                if let Some(path) = Config::config_file_path() {
                    println!("{}", path.display());
                } else {
                    println!("(no config file path available)");
                }
            }
        },
    }

    Ok(())
}
