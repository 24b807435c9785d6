//! Episode matcher.
//!
//! Scores every (file, episode) pair by token overlap, assigns each file
//! its best episode greedily (highest score first), and auto-accepts only
//! confident, unambiguous pairs. Everything else is returned as
//! `Unmatched` for manual resolution.

use crate::models::catalog::EpisodeCatalog;
use crate::models::matching::Match;
use crate::models::media::VideoFile;
use std::collections::HashSet;

/// Score a pair must exceed to be auto-accepted.
pub const AUTO_ACCEPT_THRESHOLD: f64 = 0.85;

/// Rival scores closer than this make a pair ambiguous.
pub const AMBIGUITY_MARGIN: f64 = 0.10;

/// Matcher configuration.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Minimum score (exclusive) for auto-acceptance.
    pub auto_accept_threshold: f64,
    /// Minimum lead over the runner-up for auto-acceptance.
    pub ambiguity_margin: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            auto_accept_threshold: AUTO_ACCEPT_THRESHOLD,
            ambiguity_margin: AMBIGUITY_MARGIN,
        }
    }
}

/// Similarity between a file's tokens and an episode title's tokens.
///
/// * `0.0` when either side is empty or nothing overlaps.
/// * `(0.90, 1.00]` when every title token appears in the file; a
///   contiguous run and a tighter fit score higher.
/// * below `0.80` for partial overlap (scaled Jaccard index).
pub fn similarity(file_tokens: &[String], title_tokens: &[String]) -> f64 {
    if file_tokens.is_empty() || title_tokens.is_empty() {
        return 0.0;
    }

    let file_set: HashSet<&str> = file_tokens.iter().map(String::as_str).collect();
    let title_set: HashSet<&str> = title_tokens.iter().map(String::as_str).collect();

    let common = file_set.intersection(&title_set).count();
    if common == 0 {
        return 0.0;
    }

    if common == title_set.len() {
        let fit = title_set.len() as f64 / file_set.len() as f64;
        let contiguous = file_tokens
            .windows(title_tokens.len())
            .any(|w| w == title_tokens);
        let bonus = if contiguous { 0.05 } else { 0.0 };
        return (0.90 + 0.05 * fit + bonus).min(1.0);
    }

    let union = file_set.union(&title_set).count();
    0.80 * common as f64 / union as f64
}

/// A scored (file, episode) candidate.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    file: usize,
    episode: usize,
    score: f64,
}

/// Episode matcher.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatcherConfig,
}

impl Matcher {
    /// Create a new matcher with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new matcher with custom configuration.
    pub fn with_config(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Match files against the catalog.
    ///
    /// Returns exactly one `Match` per file, in the order of `files`.
    pub fn match_files(&self, catalog: &EpisodeCatalog, files: &[VideoFile]) -> Vec<Match> {
        let episodes = catalog.episodes();
        let titles: Vec<Vec<String>> = episodes.iter().map(|e| e.title_tokens()).collect();

        // scores[file][episode]
        let scores: Vec<Vec<f64>> = files
            .iter()
            .map(|f| titles.iter().map(|t| similarity(&f.tokens, t)).collect())
            .collect();

        let margin = self.config.ambiguity_margin;
        let mut candidates = Vec::new();
        for (fi, row) in scores.iter().enumerate() {
            for (ei, &score) in row.iter().enumerate() {
                if score > 0.0 {
                    candidates.push(Candidate {
                        file: fi,
                        episode: ei,
                        score,
                    });
                }
            }
        }

        let mut file_taken = vec![false; files.len()];
        let mut episode_taken = vec![false; episodes.len()];
        let mut selected: Vec<Option<(usize, f64, bool)>> = vec![None; files.len()];

        // Unconsumed episodes scoring within the margin of a pair, for the
        // same file.
        let rivals = |cand: &Candidate, episode_taken: &[bool]| -> usize {
            scores[cand.file]
                .iter()
                .enumerate()
                .filter(|&(ei, &s)| {
                    ei != cand.episode && !episode_taken[ei] && s > 0.0 && s >= cand.score - margin
                })
                .count()
        };

        // Highest score first; ties go to the pair with fewer remaining
        // rivals, then catalog order, then inventory order.
        loop {
            let next = candidates
                .iter()
                .filter(|c| !file_taken[c.file] && !episode_taken[c.episode])
                .map(|c| (c, rivals(c, &episode_taken)))
                .min_by(|(a, ra), (b, rb)| {
                    b.score
                        .total_cmp(&a.score)
                        .then(ra.cmp(rb))
                        .then(a.episode.cmp(&b.episode))
                        .then(a.file.cmp(&b.file))
                });
            let Some((&cand, _)) = next else {
                break;
            };

            // Best rival among episodes still unconsumed at this point.
            let runner_up = scores[cand.file]
                .iter()
                .enumerate()
                .filter(|&(ei, _)| ei != cand.episode && !episode_taken[ei])
                .map(|(_, &s)| s)
                .fold(0.0_f64, f64::max);

            let confident = cand.score > self.config.auto_accept_threshold;
            let clear_lead = cand.score - runner_up >= margin;
            let auto = confident && clear_lead;

            if confident && !clear_lead {
                tracing::debug!(
                    "Ambiguous: {} -> {} ({:.2}, runner-up {:.2})",
                    files[cand.file].filename,
                    episodes[cand.episode].id(),
                    cand.score,
                    runner_up
                );
            }

            file_taken[cand.file] = true;
            episode_taken[cand.episode] = true;
            selected[cand.file] = Some((cand.episode, cand.score, auto));
        }

        let matches: Vec<Match> = files
            .iter()
            .zip(selected)
            .map(|(file, sel)| match sel {
                Some((ei, score, true)) => {
                    tracing::debug!(
                        "Auto-matched {} -> {} ({:.2})",
                        file.filename,
                        episodes[ei].id(),
                        score
                    );
                    Match::auto(file.clone(), episodes[ei].clone(), score)
                }
                Some((ei, score, false)) => {
                    Match::unmatched(file.clone(), Some(episodes[ei].id()), score)
                }
                None => Match::unmatched(file.clone(), None, 0.0),
            })
            .collect();

        let auto_count = matches.iter().filter(|m| m.is_confirmed()).count();
        tracing::info!(
            "Matched {} of {} files automatically against {} episodes",
            auto_count,
            files.len(),
            episodes.len()
        );

        matches
    }
}
