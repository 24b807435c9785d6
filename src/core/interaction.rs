//! Human-in-the-loop collaborator interface.
//!
//! The core never talks to a terminal. Everything that needs a person
//! goes through [`Interaction`]; the CLI implements it with prompts and
//! tests implement it with scripted answers.

use crate::models::matching::Match;
use crate::models::media::{Episode, EpisodeId};
use crate::models::plan::Operation;
use crate::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Decision for one unmatched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// File the video under this episode.
    Assign(EpisodeId),
    /// Leave the file where it is.
    Skip,
}

/// Decisions keyed by file path. Files left out stay unresolved.
pub type ManualResolution = BTreeMap<PathBuf, Resolution>;

/// Collaborator that asks a person.
pub trait Interaction {
    /// Choose episodes for files the matcher could not place.
    ///
    /// `unmatched` carries the matcher's suggestion and confidence for each
    /// file; `remaining` lists the episodes not yet taken, in catalog
    /// order. Returning `Err(Error::Cancelled)` aborts the run.
    fn resolve(&mut self, unmatched: &[Match], remaining: &[Episode]) -> Result<ManualResolution>;

    /// Show the finalized plan.
    fn review(&mut self, operations: &[Operation]);

    /// Final yes/no gate before anything is executed.
    fn confirm(&mut self, operations: &[Operation]) -> Result<bool>;
}
