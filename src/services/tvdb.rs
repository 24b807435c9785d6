//! TheTVDB episode guide scraper.
//!
//! Reads the public "all seasons" listing of a series, e.g.
//! `https://thetvdb.com/series/storyville/allseasons/official`.

use crate::models::media::Episode;
use crate::Result;
use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

const USER_AGENT: &str = concat!("merge-into-series/", env!("CARGO_PKG_VERSION"));

/// Scraper configuration.
#[derive(Debug, Clone)]
pub struct TvdbConfig {
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for TvdbConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Episode guide scraper.
pub struct TvdbScraper {
    config: TvdbConfig,
    client: reqwest::Client,
}

impl TvdbScraper {
    /// Create a new scraper with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(TvdbConfig::default())
    }

    /// Create a new scraper with custom configuration.
    pub fn with_config(config: TvdbConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { config, client })
    }

    /// Fetch and parse every episode listed at `url`.
    ///
    /// An empty result is not an error here; the caller decides.
    pub async fn scrape_episodes(&self, url: &str) -> Result<Vec<Episode>> {
        tracing::info!("Fetching episode guide: {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(crate::Error::Scrape(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        let html = response.text().await?;
        let mut episodes = parse_episode_page(&html)?;
        // Specials (season 0) have no place in the SxxEyy layout.
        episodes.retain(|e| e.season > 0);

        tracing::info!("Found {} episodes", episodes.len());
        Ok(episodes)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| crate::Error::Scrape(format!("bad selector {}: {}", css, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse an "all seasons" page into episode records.
///
/// Each episode is a `li.list-group-item` holding an `S01E02` label, a
/// title link in the heading and an air date as the first entry of the
/// inline details list. Items without a label or title are ignored.
pub fn parse_episode_page(html: &str) -> Result<Vec<Episode>> {
    let document = Html::parse_document(html);
    let item_sel = selector("li.list-group-item")?;
    let label_sel = selector(".episode-label")?;
    let title_sel = selector(".list-group-item-heading a")?;
    let date_sel = selector("ul.list-inline li")?;
    let label_re = Regex::new(r"(?i)S(\d+)\s*E(\d+)")
        .map_err(|e| crate::Error::Scrape(e.to_string()))?;

    let mut episodes = Vec::new();

    for item in document.select(&item_sel) {
        let Some(label) = item.select(&label_sel).next().map(element_text) else {
            continue;
        };
        let Some(caps) = label_re.captures(&label) else {
            tracing::debug!("Unrecognized episode label: {}", label);
            continue;
        };
        let (Ok(season), Ok(number)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
            continue;
        };
        if number == 0 {
            continue;
        }

        let title = item
            .select(&title_sel)
            .next()
            .map(element_text)
            .unwrap_or_default();
        if title.is_empty() {
            tracing::debug!("Episode {} has no title, ignoring", label);
            continue;
        }

        let air_date = item
            .select(&date_sel)
            .next()
            .map(element_text)
            .and_then(|d| NaiveDate::parse_from_str(&d, "%B %d, %Y").ok());

        episodes.push(Episode {
            season,
            episode: number,
            title,
            air_date,
        });
    }

    Ok(episodes)
}
