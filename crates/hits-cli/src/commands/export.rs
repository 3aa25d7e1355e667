//! The `hits export` command

use colored::Colorize;
use hits_case::CatalogCase;
use hits_core::{ExportConfig, ExportOutcome, ExportReport, Orchestrator};
use hits_fs::NormalizedPath;

use super::load_case;
use crate::cli::ExportArgs;
use crate::error::Result;

/// Run the export command and return the outcome for the exit status.
pub fn run_export(args: &ExportArgs) -> Result<ExportOutcome> {
    let config = build_config(args)?;
    let case = load_case(&args.catalog, args.source_root.as_deref())?;
    let report = export(&case, config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(report.outcome)
}

/// Settings file first, then command-line overrides.
fn build_config(args: &ExportArgs) -> Result<ExportConfig> {
    let mut config = match &args.config {
        Some(path) => ExportConfig::load(&NormalizedPath::new(path))?,
        None => ExportConfig::default(),
    };
    if let Some(output) = &args.output {
        config.output_root = Some(output.clone());
    }
    if let Some(out_dir) = &args.out_dir {
        config.out_dir = Some(out_dir.clone());
    }
    if let Some(jobs) = args.jobs {
        config.jobs = jobs;
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    tracing::debug!(?config, "resolved export settings");
    Ok(config)
}

fn export(case: &CatalogCase, config: ExportConfig) -> Result<ExportReport> {
    let orchestrator = Orchestrator::new(case, case, config)?;
    tracing::debug!(
        output_root = %orchestrator.output_root(),
        jobs = orchestrator.config().jobs,
        max_depth = orchestrator.config().max_depth,
        "starting export"
    );
    let report = orchestrator.export()?;
    Ok(report)
}

fn print_report(report: &ExportReport) {
    if report.sets.is_empty() && report.failures.is_empty() {
        println!("{} No flagged items to export.", "OK".green().bold());
        return;
    }

    println!("{} {}", "Output:".bold(), report.output_root);
    for set in &report.sets {
        let counts = format!("{}/{} hits, {} entries", set.exported, set.hits, set.entries);
        let counts = if set.exported == set.hits {
            counts.green()
        } else {
            counts.yellow()
        };
        println!("  {:<24} {}", set.name.cyan(), counts);
    }

    if !report.skipped_records.is_empty() {
        println!(
            "{} {} hit record(s) without a set name were skipped",
            "warning:".yellow().bold(),
            report.skipped_records.len()
        );
    }

    if !report.failures.is_empty() {
        println!();
        println!("{}", "Failures:".red().bold());
        for failure in &report.failures {
            match failure.file_id {
                Some(id) => println!("  {} [{}] {}", failure.set, id, failure.error),
                None => println!("  {} {}", failure.set, failure.error),
            }
        }
    }

    println!();
    match report.outcome {
        ExportOutcome::Success => println!(
            "{} Exported {} item(s) in {} set(s).",
            "OK".green().bold(),
            report.total_entries(),
            report.sets.len()
        ),
        ExportOutcome::PartialFailure => println!(
            "{} {} failure(s); see above.",
            "PARTIAL".yellow().bold(),
            report.failures.len()
        ),
    }
}
