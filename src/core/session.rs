//! Resolution session.
//!
//! Owns the confirmed file-to-episode assignments for one run. Automatic
//! matches are committed first; manual answers from the [`Interaction`]
//! collaborator fill in the rest. Auto matches are final once committed.

use crate::core::interaction::{Interaction, Resolution};
use crate::models::catalog::EpisodeCatalog;
use crate::models::matching::Match;
use crate::models::media::{Episode, EpisodeId};
use crate::utils::cancel::CancelToken;
use crate::Result;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Where a file stands in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Pending,
    Auto(EpisodeId),
    Manual(EpisodeId),
    Skipped,
}

#[derive(Debug, Clone)]
struct Entry {
    matched: Match,
    decision: Decision,
}

/// Mutable set of confirmed matches for one run.
#[derive(Debug)]
pub struct ResolutionSession<'a> {
    catalog: &'a EpisodeCatalog,
    /// Files in inventory order.
    entries: Vec<Entry>,
    index: HashMap<PathBuf, usize>,
}

impl<'a> ResolutionSession<'a> {
    pub fn new(catalog: &'a EpisodeCatalog) -> Self {
        Self {
            catalog,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register the matcher output and commit its `Auto` matches.
    ///
    /// Two auto matches claiming the same file or episode mean the
    /// matcher is broken; that is a conflict, not something to recover.
    pub fn apply_auto_matches(&mut self, matches: &[Match]) -> Result<usize> {
        let mut taken: HashMap<EpisodeId, PathBuf> = self
            .entries
            .iter()
            .filter_map(|e| match e.decision {
                Decision::Auto(id) | Decision::Manual(id) => Some((id, e.matched.file.path.clone())),
                _ => None,
            })
            .collect();

        let mut committed = 0;
        for m in matches {
            let path = &m.file.path;
            let auto_id = if m.is_confirmed() {
                m.episode_id()
            } else {
                None
            };

            if let Some(&idx) = self.index.get(path) {
                if auto_id.is_some() || self.entries[idx].decision != Decision::Pending {
                    return Err(crate::Error::conflict(format!(
                        "file {} was matched twice",
                        path.display()
                    )));
                }
                continue;
            }

            let decision = match auto_id {
                Some(id) => {
                    if let Some(other) = taken.get(&id) {
                        return Err(crate::Error::conflict(format!(
                            "episode {} auto-matched to both {} and {}",
                            id,
                            other.display(),
                            path.display()
                        )));
                    }
                    taken.insert(id, path.clone());
                    committed += 1;
                    Decision::Auto(id)
                }
                None => Decision::Pending,
            };

            self.index.insert(path.clone(), self.entries.len());
            self.entries.push(Entry {
                matched: m.clone(),
                decision,
            });
        }

        tracing::info!(
            "Committed {} automatic matches, {} files need review",
            committed,
            self.unmatched().len()
        );
        Ok(committed)
    }

    /// Files still waiting for a decision, with the matcher's suggestion.
    pub fn unmatched(&self) -> Vec<Match> {
        self.entries
            .iter()
            .filter(|e| e.decision == Decision::Pending)
            .map(|e| e.matched.clone())
            .collect()
    }

    /// Episodes not yet assigned to any file, in catalog order.
    pub fn remaining_episodes(&self) -> Vec<Episode> {
        let used = self.used_episodes();
        self.catalog
            .iter()
            .filter(|e| !used.contains(&e.id()))
            .cloned()
            .collect()
    }

    /// Files explicitly skipped.
    pub fn skipped(&self) -> Vec<PathBuf> {
        self.entries
            .iter()
            .filter(|e| e.decision == Decision::Skipped)
            .map(|e| e.matched.file.path.clone())
            .collect()
    }

    /// Ask the collaborator about every unresolved file.
    ///
    /// This is the only place the run waits on a person. Cancellation is
    /// checked before and after the wait.
    pub fn request_manual_resolution(
        &mut self,
        interaction: &mut dyn Interaction,
        cancel: &CancelToken,
    ) -> Result<()> {
        let unmatched = self.unmatched();
        if unmatched.is_empty() {
            return Ok(());
        }
        let remaining = self.remaining_episodes();

        cancel.checkpoint()?;
        let answers = interaction.resolve(&unmatched, &remaining)?;
        cancel.checkpoint()?;

        for (path, resolution) in answers {
            match resolution {
                Resolution::Assign(id) => self.assign_manual(&path, id)?,
                Resolution::Skip => self.skip(&path)?,
            }
        }
        Ok(())
    }

    /// Record a manual assignment, replacing an earlier manual or skip
    /// decision for the file. Committed auto matches cannot be changed.
    /// Duplicate episode use is reported by [`finalize`].
    ///
    /// [`finalize`]: ResolutionSession::finalize
    pub fn assign_manual(&mut self, path: &Path, id: EpisodeId) -> Result<()> {
        if self.catalog.get(id).is_none() {
            return Err(crate::Error::conflict(format!(
                "episode {} is not in the catalog for {}",
                id,
                self.catalog.series()
            )));
        }
        let entry = self.tentative_entry_mut(path)?;
        tracing::debug!("Manual match: {} -> {}", entry.matched.file.filename, id);
        entry.decision = Decision::Manual(id);
        Ok(())
    }

    /// Mark a file to be left alone. Committed auto matches cannot be skipped.
    pub fn skip(&mut self, path: &Path) -> Result<()> {
        let entry = self.tentative_entry_mut(path)?;
        tracing::debug!("Skipping {}", entry.matched.file.filename);
        entry.decision = Decision::Skipped;
        Ok(())
    }

    /// Confirmed matches in inventory order.
    ///
    /// Skipped and unresolved files are left out. Fails if an episode is
    /// assigned to more than one file.
    pub fn finalize(&self) -> Result<Vec<Match>> {
        let mut owners: HashMap<EpisodeId, &Path> = HashMap::new();
        let mut confirmed = Vec::new();

        for entry in &self.entries {
            let (id, manual) = match entry.decision {
                Decision::Auto(id) => (id, false),
                Decision::Manual(id) => (id, true),
                Decision::Pending => {
                    tracing::warn!("Unresolved, leaving in place: {}", entry.matched.file.filename);
                    continue;
                }
                Decision::Skipped => continue,
            };

            let file = &entry.matched.file;
            if let Some(other) = owners.insert(id, &file.path) {
                return Err(crate::Error::conflict(format!(
                    "episode {} assigned to both {} and {}",
                    id,
                    other.display(),
                    file.path.display()
                )));
            }

            let episode = self
                .catalog
                .get(id)
                .cloned()
                .ok_or_else(|| crate::Error::conflict(format!("unknown episode {}", id)))?;

            confirmed.push(if manual {
                Match::manual(file.clone(), episode, 1.0)
            } else {
                Match::auto(file.clone(), episode, entry.matched.confidence)
            });
        }

        Ok(confirmed)
    }

    fn used_episodes(&self) -> HashSet<EpisodeId> {
        self.entries
            .iter()
            .filter_map(|e| match e.decision {
                Decision::Auto(id) | Decision::Manual(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn entry_mut(&mut self, path: &Path) -> Result<&mut Entry> {
        let idx = *self.index.get(path).ok_or_else(|| {
            crate::Error::conflict(format!("{} is not part of this session", path.display()))
        })?;
        Ok(&mut self.entries[idx])
    }

    /// Entry whose decision may still change.
    fn tentative_entry_mut(&mut self, path: &Path) -> Result<&mut Entry> {
        let entry = self.entry_mut(path)?;
        if let Decision::Auto(id) = entry.decision {
            return Err(crate::Error::conflict(format!(
                "{} is already matched to {}",
                path.display(),
                id
            )));
        }
        Ok(entry)
    }
}
