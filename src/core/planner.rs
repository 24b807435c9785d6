//! Operation planning module.
//!
//! Turns confirmed matches into rename/move operations:
//! 1. Compute the canonical destination for each match
//! 2. Decide between rename (already in the target directory) and move
//! 3. Resolve destination collisions per [`CollisionPolicy`]
//! 4. Verify no two pending operations share a destination

use crate::generators::filename as gen_filename;
use crate::models::catalog::EpisodeCatalog;
use crate::models::matching::Match;
use crate::models::media::{Episode, VideoFile};
use crate::models::plan::{ActionType, CollisionPolicy, Operation, OperationStatus};
use crate::utils::fs::same_path;
use crate::Result;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Planner configuration.
#[derive(Debug, Clone, Default)]
pub struct PlannerConfig {
    /// What to do when a destination is taken.
    pub collision_policy: CollisionPolicy,
}

/// Operation planner.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    /// Create a new planner with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new planner with custom configuration.
    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Plan operations for confirmed matches.
    ///
    /// Operations come back in the order of `matches`. Collision suffixes
    /// are handed out in catalog order so the earliest episode keeps the
    /// plain name.
    pub fn plan(
        &self,
        matches: &[Match],
        catalog: &EpisodeCatalog,
        target_dir: &Path,
    ) -> Result<Vec<Operation>> {
        let mut order: Vec<(usize, &VideoFile, &Episode)> = Vec::new();
        for (idx, m) in matches.iter().enumerate() {
            match (&m.episode, m.is_confirmed()) {
                (Some(episode), true) => order.push((idx, &m.file, episode)),
                _ => tracing::warn!("Not planning unconfirmed match for {}", m.file.filename),
            }
        }
        order.sort_by_key(|(idx, _, episode)| {
            (catalog.position(episode.id()).unwrap_or(usize::MAX), *idx)
        });

        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let mut planned: HashMap<usize, Operation> = HashMap::new();

        for (idx, file, episode) in order {
            let op = self.plan_one(catalog.series(), file, episode, target_dir, &claimed);
            if op.is_pending() {
                claimed.insert(op.destination.clone());
            }
            tracing::debug!(
                "Planned {:?} {} -> {}",
                op.status,
                op.source.display(),
                op.destination.display()
            );
            planned.insert(idx, op);
        }

        let operations: Vec<Operation> = (0..matches.len())
            .filter_map(|idx| planned.remove(&idx))
            .collect();

        validate_no_duplicate_destinations(&operations)?;

        tracing::info!(
            "Planned {} operations ({} pending)",
            operations.len(),
            operations.iter().filter(|o| o.is_pending()).count()
        );
        Ok(operations)
    }

    fn plan_one(
        &self,
        series: &str,
        file: &VideoFile,
        episode: &Episode,
        target_dir: &Path,
        claimed: &HashSet<PathBuf>,
    ) -> Operation {
        let extension = file
            .path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        let stem = gen_filename::episode_stem(series, episode);
        let base = target_dir.join(gen_filename::with_extension(&stem, &extension));

        let action = if same_path(&file.parent_dir, target_dir) {
            ActionType::Rename
        } else {
            ActionType::Move
        };

        let mut op = Operation {
            episode: episode.id(),
            source: file.path.clone(),
            destination: base.clone(),
            action,
            status: OperationStatus::Pending,
            reason: None,
        };

        if same_path(&base, &file.path) {
            op.skip("already in place");
            return op;
        }

        let occupied = |candidate: &Path| -> Option<&'static str> {
            if claimed.contains(candidate) {
                Some("collides with another planned operation")
            } else if candidate.exists() && !same_path(candidate, &file.path) {
                Some("destination already exists")
            } else {
                None
            }
        };

        let Some(reason) = occupied(&base) else {
            return op;
        };

        match self.config.collision_policy {
            CollisionPolicy::Fail => {
                tracing::warn!("{}: {}", reason, base.display());
                op.fail(format!("{}: {}", reason, base.display()));
            }
            CollisionPolicy::Suffix => {
                let mut n = 2;
                loop {
                    let candidate = target_dir.join(gen_filename::with_extension(
                        &gen_filename::with_suffix(&stem, n),
                        &extension,
                    ));
                    if occupied(&candidate).is_none() {
                        tracing::info!(
                            "{} ({}), using {}",
                            reason,
                            base.display(),
                            candidate.display()
                        );
                        op.destination = candidate;
                        break;
                    }
                    n += 1;
                }
            }
        }

        op
    }
}

/// SAFETY CHECK: no two pending operations may share a destination.
pub fn validate_no_duplicate_destinations(operations: &[Operation]) -> Result<()> {
    let mut destination_to_sources: HashMap<&Path, Vec<&Path>> = HashMap::new();

    for op in operations.iter().filter(|o| o.is_pending()) {
        destination_to_sources
            .entry(op.destination.as_path())
            .or_default()
            .push(op.source.as_path());
    }

    let mut duplicates: Vec<_> = destination_to_sources
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .collect();

    if duplicates.is_empty() {
        return Ok(());
    }
    duplicates.sort();

    let mut msg = String::from("duplicate destination paths in plan:");
    for (destination, sources) in duplicates {
        msg.push_str(&format!("\n  {}", destination.display()));
        for source in sources {
            msg.push_str(&format!("\n    <- {}", source.display()));
        }
    }
    tracing::error!("{}", msg);
    Err(crate::Error::Conflict(msg))
}
