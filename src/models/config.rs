//! Series configuration model.
//!
//! The configuration file is line oriented, one series per line:
//!
//! ```text
//! # <series name>, <target directory>, <episode guide URL>
//! Storyville, ~/TV/Storyville, https://thetvdb.com/series/storyville/allseasons/official
//! ```

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Template written by `--create-config`.
const CONFIG_TEMPLATE: &str = "\
# merge-into-series configuration
#
# One series per line:
#   <series name>, <target directory>, <episode guide URL>
#
# Example:
# Storyville, ~/TV/Storyville, https://thetvdb.com/series/storyville/allseasons/official
";

/// One configured series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// Series name as used in canonical filenames.
    pub name: String,
    /// Directory the organized episodes live in.
    pub target_dir: PathBuf,
    /// Episode guide URL.
    pub url: String,
}

/// All configured series, in file order.
#[derive(Debug, Clone, Default)]
pub struct SeriesRegistry {
    series: Vec<SeriesConfig>,
}

impl SeriesRegistry {
    /// Parse configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        let mut series = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.splitn(3, ',').map(str::trim).collect();
            if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
                return Err(crate::Error::InvalidConfig {
                    line: idx + 1,
                    reason: "expected '<series name>, <target directory>, <URL>'".to_string(),
                });
            }

            series.push(SeriesConfig {
                name: parts[0].to_string(),
                target_dir: expand_home(parts[1]),
                url: parts[2].to_string(),
            });
        }

        Ok(Self { series })
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(crate::Error::PathNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        let registry = Self::parse(&content)?;
        tracing::debug!("Loaded {} series from {:?}", registry.len(), path);
        Ok(registry)
    }

    /// Find a series by name (case-insensitive).
    pub fn find(&self, name: &str) -> Result<&SeriesConfig> {
        let wanted = name.trim().to_lowercase();
        self.series
            .iter()
            .find(|s| s.name.to_lowercase() == wanted)
            .ok_or_else(|| crate::Error::SeriesNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesConfig> {
        self.series.iter()
    }
}

/// Get the default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("merge-into-series")
        .join("series.conf")
}

/// Write a commented configuration template.
///
/// Refuses to replace an existing file.
pub fn create_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(crate::Error::ConfigExists(path.display().to_string()));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, CONFIG_TEMPLATE)?;
    tracing::info!("Config template written to {:?}", path);
    Ok(())
}

/// Expand a leading `~` to the home directory.
fn expand_home(raw: &str) -> PathBuf {
    if raw == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(raw));
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}
