//! Command-line argument parsing
//!
//! Supports:
//! - Replaying a script of edit events and printing the consolidated saves
//! - Printing the effective configuration

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::CoordinatorConfig;
use crate::replay::ReplayOptions;

/// Coordinates inline cell edits into one save per row
#[derive(Parser, Debug)]
#[command(name = "cellsync", version, about = "Coordinates inline cell edits into one save per row")]
pub struct CliArgs {
    /// Increase console log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Use this config file instead of the one in the config directory
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Replay a YAML/JSON script of edit events, printing each save as a JSON line
    Replay {
        /// Script to replay
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Override the debounce window
        #[arg(long, value_name = "MS")]
        debounce_ms: Option<u64>,

        /// Override the row property holding the entry id
        #[arg(long, value_name = "PROPERTY")]
        id_property: Option<String>,

        /// Write saves to FILE instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Stop at the first rejected event
        #[arg(long)]
        strict: bool,
    },
    /// Print the effective configuration as YAML
    Config,
}

impl CliArgs {
    /// Console log level implied by `-v` flags
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Load the config file named on the command line, or the default one
    pub fn load_config(&self) -> anyhow::Result<CoordinatorConfig> {
        match &self.config {
            Some(path) => CoordinatorConfig::load_from(path),
            None => Ok(CoordinatorConfig::load()),
        }
    }
}

impl CliCommand {
    /// Replay options from config with command-line overrides applied
    pub fn replay_options(&self, config: &CoordinatorConfig) -> Option<ReplayOptions> {
        match self {
            CliCommand::Replay {
                debounce_ms,
                id_property,
                strict,
                ..
            } => {
                let mut config = config.clone();
                if let Some(ms) = debounce_ms {
                    config.debounce_ms = *ms;
                }
                if let Some(property) = id_property {
                    config.id_property = property.clone();
                }
                let mut options = ReplayOptions::from(&config);
                options.strict = *strict;
                Some(options)
            }
            CliCommand::Config => None,
        }
    }
}
