//! Merge command implementation.
//!
//! Resolves the series from the config file, scrapes its episode guide,
//! runs the merge workflow and prints the final report.

use crate::cli::args::Cli;
use crate::cli::interactive::TerminalInteraction;
use crate::core::executor::ExecutionReport;
use crate::core::merger::{MergeOptions, MergeOutcome, Merger};
use crate::core::planner::PlannerConfig;
use crate::models::config::{self, SeriesRegistry};
use crate::models::plan::{Operation, OperationStatus};
use crate::services::tvdb::TvdbScraper;
use crate::utils::cancel::CancelToken;
use crate::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// JSON shape of a dry run.
#[derive(Serialize)]
struct DryRunReport<'a> {
    dry_run: bool,
    operations: &'a [Operation],
    skipped: &'a [PathBuf],
}

/// Write the config template.
pub fn create_config(path: &Path) -> Result<()> {
    config::create_config(path)?;
    println!(
        "{} {}",
        "[OK] Config file created:".bold().green(),
        path.display()
    );
    println!("  Add one line per series: <series name>, <target directory>, <episode guide URL>");
    Ok(())
}

/// Run a merge for the series named on the command line.
pub async fn merge(cli: &Cli, cancel: &CancelToken) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let registry = SeriesRegistry::load(&config_path)?;
    let series = registry.find(&cli.series_name)?.clone();

    println!("{}", format!("[MERGE] {}", series.name).bold().cyan());
    println!("  {} {}", "Source:".bold(), cli.source_pattern);
    println!("  {} {}", "Target:".bold(), series.target_dir.display());
    println!("  {} {}", "Guide:".bold(), series.url);
    if cli.dry_run {
        println!("  {}", "DRY RUN - no files will be changed".bold().yellow());
    }
    println!();

    cancel.checkpoint()?;
    let scraper = TvdbScraper::new()?;
    let episodes = tokio::select! {
        result = scraper.scrape_episodes(&series.url) => result?,
        _ = cancel.cancelled() => return Err(crate::Error::Cancelled),
    };

    let options = MergeOptions {
        dry_run: cli.dry_run,
        planner: PlannerConfig {
            collision_policy: cli.on_collision.into(),
        },
        ..Default::default()
    };

    let merger = Merger::new(series, options);
    let mut interaction = TerminalInteraction::new();
    let outcome = merger.run(episodes, &cli.source_pattern, &mut interaction, cancel)?;

    match outcome {
        MergeOutcome::DryRun {
            operations,
            preview,
            skipped,
        } => {
            if cli.json {
                let report = DryRunReport {
                    dry_run: true,
                    operations: &operations,
                    skipped: &skipped,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", "[DRY RUN] Planned operations:".bold().yellow());
                print!("{}", preview);
                print_skipped(&skipped);
                println!();
                println!("{}", "[OK] Dry run complete - no changes were made".green());
            }
            Ok(())
        }
        MergeOutcome::NothingToDo { skipped } => {
            print_skipped(&skipped);
            println!("{}", "[OK] Nothing to do".green());
            Ok(())
        }
        MergeOutcome::Executed { report, skipped } => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
                print_skipped(&skipped);
            }
            if report.cancelled {
                return Err(crate::Error::Cancelled);
            }
            if report.failed() > 0 {
                return Err(crate::Error::OperationFailed {
                    failed: report.failed(),
                    total: report.operations.len(),
                });
            }
            Ok(())
        }
    }
}

fn print_skipped(skipped: &[PathBuf]) {
    if skipped.is_empty() {
        return;
    }
    println!("{}", "[Skipped Files]".bold().yellow());
    for path in skipped {
        println!("  - {}", path.display());
    }
}

/// Print every operation grouped by outcome, then the totals.
fn print_report(report: &ExecutionReport) {
    println!();
    println!("{}", "[Execution Summary]".bold().green());

    for op in &report.operations {
        let name = op
            .destination
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        match op.status {
            OperationStatus::Executed => println!("  {} {}", "[OK]".green(), name),
            OperationStatus::Failed => println!(
                "  {} {}: {}",
                "[FAILED]".red(),
                op.source.display(),
                op.reason.as_deref().unwrap_or("unknown error")
            ),
            OperationStatus::Skipped => println!(
                "  {} {}: {}",
                "[SKIPPED]".yellow(),
                op.source.display(),
                op.reason.as_deref().unwrap_or("")
            ),
            OperationStatus::Pending => {
                println!("  {} {}", "[NOT RUN]".dimmed(), op.source.display())
            }
        }
    }

    println!();
    println!("  {} {}", "Executed:".bold(), report.executed());
    println!("  {} {}", "Failed:".bold(), report.failed());
    println!("  {} {}", "Skipped:".bold(), report.skipped());
    if report.cancelled {
        println!(
            "  {} {}",
            "Aborted (cancelled):".bold().red(),
            report.not_attempted()
        );
    }
}
