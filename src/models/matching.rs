//! File-to-episode match model.

use super::media::{Episode, EpisodeId, VideoFile};
use serde::{Deserialize, Serialize};

/// How a match was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// Accepted by the matcher without user input.
    Auto,
    /// Confirmed by the user.
    Manual,
    /// Needs manual resolution.
    Unmatched,
}

/// Association between one video file and at most one episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    /// The local file.
    pub file: VideoFile,
    /// Confirmed episode (auto or manual matches only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<Episode>,
    /// Best tentative episode for an unmatched file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<EpisodeId>,
    /// Similarity score (0.0 - 1.0).
    pub confidence: f64,
    /// Match status.
    pub status: MatchStatus,
}

impl Match {
    pub fn auto(file: VideoFile, episode: Episode, confidence: f64) -> Self {
        Self {
            file,
            episode: Some(episode),
            suggestion: None,
            confidence,
            status: MatchStatus::Auto,
        }
    }

    pub fn manual(file: VideoFile, episode: Episode, confidence: f64) -> Self {
        Self {
            file,
            episode: Some(episode),
            suggestion: None,
            confidence,
            status: MatchStatus::Manual,
        }
    }

    pub fn unmatched(file: VideoFile, suggestion: Option<EpisodeId>, confidence: f64) -> Self {
        Self {
            file,
            episode: None,
            suggestion,
            confidence,
            status: MatchStatus::Unmatched,
        }
    }

    /// Whether this match pairs the file with an episode.
    pub fn is_confirmed(&self) -> bool {
        self.status != MatchStatus::Unmatched && self.episode.is_some()
    }

    pub fn episode_id(&self) -> Option<EpisodeId> {
        self.episode.as_ref().map(Episode::id)
    }
}
