//! Episode catalog for one series.

use super::media::{Episode, EpisodeId};
use std::collections::HashSet;

/// Ordered collection of episodes for one series.
///
/// Episodes are kept in catalog order (season, then episode number).
/// The catalog is read-only once built.
#[derive(Debug, Clone, Default)]
pub struct EpisodeCatalog {
    series: String,
    episodes: Vec<Episode>,
}

impl EpisodeCatalog {
    /// Build a catalog, sorting episodes and dropping duplicate identities
    /// and records numbered season 0 or episode 0.
    pub fn new(series: impl Into<String>, episodes: Vec<Episode>) -> Self {
        let series = series.into();
        let mut episodes = episodes;
        // Stable sort keeps the scraper's first record for a duplicate id first.
        episodes.sort_by_key(|e| e.id());

        let mut seen = HashSet::new();
        episodes.retain(|e| {
            if e.season == 0 || e.episode == 0 {
                tracing::warn!("Invalid episode number {} in guide for {}, ignoring", e.id(), series);
                false
            } else if seen.insert(e.id()) {
                true
            } else {
                tracing::warn!("Duplicate episode {} in guide for {}, ignoring", e.id(), series);
                false
            }
        });

        Self { series, episodes }
    }

    pub fn series(&self) -> &str {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Episode> {
        self.episodes.iter()
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    /// Look up an episode by identity.
    pub fn get(&self, id: EpisodeId) -> Option<&Episode> {
        self.position(id).map(|i| &self.episodes[i])
    }

    /// Catalog position of an episode (earliest season/episode first).
    pub fn position(&self, id: EpisodeId) -> Option<usize> {
        self.episodes.binary_search_by_key(&id, |e| e.id()).ok()
    }
}
