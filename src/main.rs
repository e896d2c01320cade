use std::fs::File;
use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use clap::Parser;

use cellsync::cli::{CliArgs, CliCommand};
use cellsync::replay::{run_replay, ReplayReport, Script};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    cellsync::tracing::init(args.log_level());

    let config = args.load_config()?;

    match &args.command {
        CliCommand::Replay { script, output, .. } => {
            let options = args
                .command
                .replay_options(&config)
                .context("No replay options for command")?;
            let script = Script::load(script)?;

            let report = match output {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    run_replay(&script, &options, BufWriter::new(file))?
                }
                None => run_replay(&script, &options, io::stdout().lock())?,
            };
            print_summary(&report);
        }
        CliCommand::Config => {
            print!("{}", serde_yaml::to_string(&config)?);
        }
    }

    Ok(())
}

fn print_summary(report: &ReplayReport) {
    eprintln!(
        "{} events, {} saves, {} rejected",
        report.events, report.flushes, report.rejected
    );
    if !report.pending_entries.is_empty() {
        let ids: Vec<&str> = report.pending_entries.iter().map(|id| id.as_str()).collect();
        eprintln!("Entries still being edited: {}", ids.join(", "));
    }
}
