//! Media-related data models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Identity of an episode within a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EpisodeId {
    /// Season number (1-based).
    pub season: u32,
    /// Episode number within the season (1-based).
    pub episode: u32,
}

impl EpisodeId {
    pub fn new(season: u32, episode: u32) -> Self {
        Self { season, episode }
    }
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{:02}E{:02}", self.season, self.episode)
    }
}

/// Episode record from the episode guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Season number.
    pub season: u32,
    /// Episode number.
    pub episode: u32,
    /// Episode title.
    pub title: String,
    /// First air date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_date: Option<NaiveDate>,
}

impl Episode {
    pub fn new(season: u32, episode: u32, title: impl Into<String>) -> Self {
        Self {
            season,
            episode,
            title: title.into(),
            air_date: None,
        }
    }

    pub fn id(&self) -> EpisodeId {
        EpisodeId::new(self.season, self.episode)
    }

    /// Normalized tokens of the episode title.
    pub fn title_tokens(&self) -> Vec<String> {
        crate::core::tokenizer::normalize(&self.title)
    }
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.id(), self.title)?;
        if let Some(date) = self.air_date {
            write!(f, " ({})", date)?;
        }
        Ok(())
    }
}

/// Video file found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFile {
    /// Full path to the file.
    pub path: PathBuf,
    /// File name without path.
    pub filename: String,
    /// Lower-cased extension without the dot.
    pub extension: String,
    /// Parent directory.
    pub parent_dir: PathBuf,
    /// Normalized title tokens derived from the filename.
    pub tokens: Vec<String>,
}
