//! hits CLI
//!
//! Exports the files and directories flagged by interesting-file rule-sets
//! into per-set folders, one manifest per set.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;
use hits_core::ExportOutcome;

use cli::{Cli, Commands};
use error::Result;

/// Exit status when some items could not be exported
const EXIT_PARTIAL_FAILURE: i32 = 2;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: cannot initialize logging: {}", "warning".yellow().bold(), e);
    }
    if cli.verbose {
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Export(args) => match commands::run_export(&args)? {
            ExportOutcome::Success => Ok(0),
            ExportOutcome::PartialFailure => Ok(EXIT_PARTIAL_FAILURE),
        },
        Commands::Sets { catalog, json } => {
            commands::run_sets(&catalog, json)?;
            Ok(0)
        }
        Commands::Completions { shell } => {
            commands::run_completions(shell);
            Ok(0)
        }
    }
}
