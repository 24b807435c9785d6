//! Plan runner module.
//!
//! Previews (dry run) or applies planned operations:
//! - rename: new name in the same directory
//! - move: into the series target directory (created on demand)
//!
//! A failing operation is marked failed and the batch carries on.

use crate::core::planner;
use crate::models::plan::{ActionType, Operation, OperationStatus};
use crate::utils::cancel::CancelToken;
use crate::utils::fs as fs_utils;
use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs;

/// Runner configuration.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Whether to verify checksums after cross-filesystem moves.
    pub verify_checksum: bool,
    /// Whether to draw a progress bar.
    pub show_progress: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            verify_checksum: true,
            show_progress: true,
        }
    }
}

/// Outcome of an execution.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecutionReport {
    /// Every operation with its final status.
    pub operations: Vec<Operation>,
    /// Whether the user interrupted the batch.
    pub cancelled: bool,
}

impl ExecutionReport {
    fn count(&self, status: OperationStatus) -> usize {
        self.operations.iter().filter(|o| o.status == status).count()
    }

    pub fn executed(&self) -> usize {
        self.count(OperationStatus::Executed)
    }

    pub fn failed(&self) -> usize {
        self.count(OperationStatus::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(OperationStatus::Skipped)
    }

    /// Operations never attempted because of cancellation.
    pub fn not_attempted(&self) -> usize {
        self.count(OperationStatus::Pending)
    }

    pub fn is_success(&self) -> bool {
        !self.cancelled && self.failed() == 0 && self.not_attempted() == 0
    }
}

/// Plan runner.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: RunnerConfig,
}

impl Runner {
    /// Create a new runner with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new runner with custom configuration.
    pub fn with_config(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Validate an operation list before previewing or running it.
    pub fn validate(&self, operations: &[Operation]) -> Result<()> {
        for op in operations {
            if op.source.as_os_str().is_empty() || op.destination.as_os_str().is_empty() {
                return Err(crate::Error::conflict(format!(
                    "operation for {} has an empty path",
                    op.episode
                )));
            }
        }
        planner::validate_no_duplicate_destinations(operations)
    }

    /// Render a preview of every operation without touching the disk.
    pub fn dry_run(&self, operations: &[Operation]) -> Result<String> {
        self.validate(operations)?;

        let mut out = String::new();
        for op in operations {
            let source = op
                .source
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let line = match op.status {
                OperationStatus::Pending => match op.action {
                    ActionType::Rename => format!(
                        "[{}] rename {} -> {}",
                        op.episode,
                        source,
                        op.destination
                            .file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_default()
                    ),
                    ActionType::Move => format!(
                        "[{}] move {} -> {}",
                        op.episode,
                        op.source.display(),
                        op.destination.display()
                    ),
                },
                _ => format!(
                    "[{}] {:?} {} ({})",
                    op.episode,
                    op.status,
                    source,
                    op.reason.as_deref().unwrap_or("no reason given")
                ),
            };
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }

    /// Apply pending operations in order.
    ///
    /// Non-pending operations pass through unchanged. Cancellation is
    /// checked between operations; once seen, the rest stay `Pending`
    /// and the report is marked cancelled. Nothing already done is undone.
    pub fn execute(&self, operations: Vec<Operation>, cancel: &CancelToken) -> ExecutionReport {
        self.execute_with(operations, cancel, |_| {})
    }

    /// Like [`execute`](Runner::execute), calling `on_finished` after each
    /// attempted operation with its final status.
    pub fn execute_with(
        &self,
        operations: Vec<Operation>,
        cancel: &CancelToken,
        mut on_finished: impl FnMut(&Operation),
    ) -> ExecutionReport {
        let mut report = ExecutionReport {
            operations,
            cancelled: false,
        };

        let total = report.operations.iter().filter(|o| o.is_pending()).count();
        tracing::info!("Executing {} operations", total);

        let pb = if self.config.show_progress {
            ProgressBar::new(total as u64)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("=>-"));
        }

        for op in report.operations.iter_mut().filter(|o| o.is_pending()) {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            pb.set_message(
                op.destination
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
            );

            match self.apply(op) {
                Ok(()) => {
                    op.status = OperationStatus::Executed;
                    tracing::debug!("{} {} -> {}", op.action, op.source.display(), op.destination.display());
                }
                Err(e) => {
                    tracing::error!("Operation failed: {} - {}", op.source.display(), e);
                    op.fail(e.to_string());
                }
            }
            on_finished(op);
            pb.inc(1);
        }

        pb.finish_and_clear();

        if report.cancelled {
            tracing::warn!(
                "Cancelled: {} applied, {} not attempted",
                report.executed(),
                report.not_attempted()
            );
        } else {
            tracing::info!("{} executed, {} failed", report.executed(), report.failed());
        }

        report
    }

    fn apply(&self, op: &Operation) -> Result<()> {
        if !op.source.exists() {
            return Err(crate::Error::PathNotFound(op.source.display().to_string()));
        }

        if op.action == ActionType::Move {
            if let Some(parent) = op.destination.parent() {
                if !parent.exists() {
                    fs::create_dir_all(parent)?;
                }
            }
        }

        fs_utils::move_file(&op.source, &op.destination, self.config.verify_checksum)
    }
}
