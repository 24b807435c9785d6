//! Merge workflow.
//!
//! Coordinates one run for one series:
//! 1. Build the episode catalog (abort if the guide was empty)
//! 2. Scan the source pattern (abort if no videos)
//! 3. Match files to episodes
//! 4. Commit automatic matches, ask about the rest
//! 5. Plan operations
//! 6. Preview (dry run) or confirm and execute

use crate::core::executor::{ExecutionReport, Runner, RunnerConfig};
use crate::core::interaction::Interaction;
use crate::core::matcher::{Matcher, MatcherConfig};
use crate::core::planner::{Planner, PlannerConfig};
use crate::core::scanner::scan_source;
use crate::core::session::ResolutionSession;
use crate::models::catalog::EpisodeCatalog;
use crate::models::config::SeriesConfig;
use crate::models::media::Episode;
use crate::models::plan::Operation;
use crate::utils::cancel::CancelToken;
use crate::Result;
use std::path::PathBuf;

/// Options for one run.
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Only preview the plan.
    pub dry_run: bool,
    pub matcher: MatcherConfig,
    pub planner: PlannerConfig,
    pub runner: RunnerConfig,
}

/// What a run produced.
#[derive(Debug)]
pub enum MergeOutcome {
    /// Dry run: the plan and its preview. Nothing was touched.
    DryRun {
        operations: Vec<Operation>,
        preview: String,
        skipped: Vec<PathBuf>,
    },
    /// Nothing to do after resolution.
    NothingToDo { skipped: Vec<PathBuf> },
    /// Operations were executed (possibly partially).
    Executed {
        report: ExecutionReport,
        skipped: Vec<PathBuf>,
    },
}

/// Runs the merge workflow for one configured series.
pub struct Merger {
    series: SeriesConfig,
    options: MergeOptions,
}

impl Merger {
    pub fn new(series: SeriesConfig, options: MergeOptions) -> Self {
        Self { series, options }
    }

    /// Run the workflow.
    ///
    /// `episodes` come from the episode guide; if none are usable the run aborts with
    /// `NoEpisodesFound` before anything else happens. Declining the
    /// final confirmation is reported as `Cancelled`.
    pub fn run(
        &self,
        episodes: Vec<Episode>,
        source_pattern: &str,
        interaction: &mut dyn Interaction,
        cancel: &CancelToken,
    ) -> Result<MergeOutcome> {
        let catalog = EpisodeCatalog::new(self.series.name.clone(), episodes);
        if catalog.is_empty() {
            return Err(crate::Error::NoEpisodesFound(self.series.name.clone()));
        }
        tracing::info!("{} episodes in guide for {}", catalog.len(), catalog.series());

        let inventory = scan_source(source_pattern, &self.series.name)?;
        if inventory.is_empty() {
            return Err(crate::Error::NoVideoFilesFound(source_pattern.to_string()));
        }

        cancel.checkpoint()?;
        let matcher = Matcher::with_config(self.options.matcher.clone());
        let matches = matcher.match_files(&catalog, &inventory.files);

        let mut session = ResolutionSession::new(&catalog);
        session.apply_auto_matches(&matches)?;
        session.request_manual_resolution(interaction, cancel)?;
        let confirmed = session.finalize()?;
        let skipped = session.skipped();

        let planner = Planner::with_config(self.options.planner.clone());
        let operations = planner.plan(&confirmed, &catalog, &self.series.target_dir)?;
        let runner = Runner::with_config(self.options.runner.clone());

        if self.options.dry_run {
            let preview = runner.dry_run(&operations)?;
            return Ok(MergeOutcome::DryRun {
                operations,
                preview,
                skipped,
            });
        }

        interaction.review(&operations);
        if !operations.iter().any(Operation::is_pending) {
            return Ok(MergeOutcome::NothingToDo { skipped });
        }

        runner.validate(&operations)?;
        cancel.checkpoint()?;
        if !interaction.confirm(&operations)? {
            return Err(crate::Error::Cancelled);
        }

        let report = runner.execute(operations, cancel);
        Ok(MergeOutcome::Executed { report, skipped })
    }
}
