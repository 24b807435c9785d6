//! Operation plan data model.

use super::media::EpisodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A planned filesystem action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Episode this operation files the source under.
    pub episode: EpisodeId,
    /// Current location of the file.
    pub source: PathBuf,
    /// Location after the operation.
    pub destination: PathBuf,
    /// Operation type.
    pub action: ActionType,
    /// Operation status.
    pub status: OperationStatus,
    /// Why the operation was skipped or failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Operation {
    pub fn is_pending(&self) -> bool {
        self.status == OperationStatus::Pending
    }

    /// Mark as failed with a reason.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.status = OperationStatus::Failed;
        self.reason = Some(reason.into());
    }

    /// Mark as skipped with a reason.
    pub fn skip(&mut self, reason: impl Into<String>) {
        self.status = OperationStatus::Skipped;
        self.reason = Some(reason.into());
    }
}

/// Operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    /// Same directory, new name.
    Rename,
    /// Into the series target directory.
    Move,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::Rename => write!(f, "rename"),
            ActionType::Move => write!(f, "move"),
        }
    }
}

/// Operation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    Pending,
    Executed,
    Skipped,
    Failed,
}

/// What the planner does when a destination is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Append a numeric suffix, allocated in catalog order.
    #[default]
    Suffix,
    /// Mark the operation failed.
    Fail,
}
