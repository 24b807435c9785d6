//! Integration tests for the matcher.
//!
//! Tests cover:
//! - Disjoint titles never match
//! - Unambiguous containment auto-matches
//! - Ambiguity and greedy assignment
//! - Determinism

use merge_into_series::core::matcher::{Matcher, MatcherConfig};
use merge_into_series::core::tokenizer::filename_tokens;
use merge_into_series::models::catalog::EpisodeCatalog;
use merge_into_series::models::matching::MatchStatus;
use merge_into_series::models::media::{Episode, EpisodeId, VideoFile};
use std::path::PathBuf;

fn video(series: &str, filename: &str) -> VideoFile {
    let path = PathBuf::from("/downloads").join(filename);
    let stem = path.file_stem().unwrap().to_string_lossy().to_string();
    VideoFile {
        extension: path.extension().unwrap().to_string_lossy().to_lowercase(),
        filename: filename.to_string(),
        parent_dir: PathBuf::from("/downloads"),
        tokens: filename_tokens(&stem, series),
        path,
    }
}

fn storyville() -> EpisodeCatalog {
    EpisodeCatalog::new(
        "Storyville",
        vec![
            Episode::new(1, 1, "Praying for Armageddon"),
            Episode::new(1, 2, "The Contestant"),
        ],
    )
}

#[test]
fn test_storyville_files_auto_match() {
    let files = vec![
        video("Storyville", "Storyville - Praying for Armageddon.mkv"),
        video("Storyville", "Storyville - The Contestant.mp4"),
    ];

    let matches = Matcher::new().match_files(&storyville(), &files);

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].status, MatchStatus::Auto);
    assert_eq!(matches[0].episode_id(), Some(EpisodeId::new(1, 1)));
    assert_eq!(matches[1].status, MatchStatus::Auto);
    assert_eq!(matches[1].episode_id(), Some(EpisodeId::new(1, 2)));
    assert!(matches.iter().all(|m| m.confidence > 0.85));
}

#[test]
fn test_disjoint_tokens_are_unmatched_with_zero_confidence() {
    let files = vec![
        video("Storyville", "holiday footage.mkv"),
        video("Storyville", "birthday party 2019.mp4"),
    ];

    let matches = Matcher::new().match_files(&storyville(), &files);

    assert_eq!(matches.len(), 2);
    for m in &matches {
        assert_eq!(m.status, MatchStatus::Unmatched);
        assert_eq!(m.confidence, 0.0);
        assert!(m.episode.is_none());
        assert!(m.suggestion.is_none());
    }
}

#[test]
fn test_superset_tokens_auto_match() {
    let catalog = EpisodeCatalog::new(
        "Nova",
        vec![
            Episode::new(3, 4, "Black Holes"),
            Episode::new(3, 5, "Deep Ocean"),
        ],
    );
    let files = vec![video("Nova", "Nova.S03E04.Black.Holes.Of.The.Universe.1080p.WEB.mkv")];

    let matches = Matcher::new().match_files(&catalog, &files);

    assert_eq!(matches[0].status, MatchStatus::Auto);
    assert_eq!(matches[0].episode_id(), Some(EpisodeId::new(3, 4)));
}

#[test]
fn test_close_rival_prevents_auto_match() {
    // Both titles are fully contained in the filename.
    let catalog = EpisodeCatalog::new(
        "Show",
        vec![
            Episode::new(1, 1, "The Reunion"),
            Episode::new(1, 2, "The Reunion Part 2"),
        ],
    );
    let files = vec![video("Show", "Show - The Reunion Part 2.mkv")];

    let matches = Matcher::new().match_files(&catalog, &files);

    assert_eq!(matches[0].status, MatchStatus::Unmatched);
    assert_eq!(matches[0].suggestion, Some(EpisodeId::new(1, 2)));
    assert!(matches[0].confidence > 0.9);
}

#[test]
fn test_partial_overlap_is_not_auto() {
    let files = vec![video("Storyville", "Storyville - The Contest Winner.mkv")];

    let matches = Matcher::new().match_files(&storyville(), &files);

    assert_eq!(matches[0].status, MatchStatus::Unmatched);
    assert_eq!(matches[0].suggestion, Some(EpisodeId::new(1, 2)));
    assert!(matches[0].confidence > 0.0 && matches[0].confidence < 0.8);
}

#[test]
fn test_episode_is_consumed_by_higher_scoring_file() {
    let catalog = EpisodeCatalog::new("Show", vec![Episode::new(1, 1, "Pilot")]);
    let files = vec![
        video("Show", "Show - Pilot extended version.mkv"),
        video("Show", "Show - Pilot.mkv"),
    ];

    let matches = Matcher::new().match_files(&catalog, &files);

    // The exact file wins the only episode; the other gets nothing.
    assert_eq!(matches[1].status, MatchStatus::Auto);
    assert_eq!(matches[1].episode_id(), Some(EpisodeId::new(1, 1)));
    assert_eq!(matches[0].status, MatchStatus::Unmatched);
    assert_eq!(matches[0].confidence, 0.0);
}

#[test]
fn test_no_episode_auto_matched_twice() {
    let catalog = EpisodeCatalog::new(
        "Show",
        vec![Episode::new(1, 1, "Pilot"), Episode::new(1, 2, "Homecoming")],
    );
    let files = vec![
        video("Show", "Show - Pilot.mkv"),
        video("Show", "Show - Pilot (copy).mkv"),
        video("Show", "Show - Homecoming.mkv"),
    ];

    let matches = Matcher::new().match_files(&catalog, &files);

    let mut ids: Vec<_> = matches.iter().filter_map(|m| m.episode_id()).collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
}

#[test]
fn test_tie_broken_by_catalog_order() {
    let catalog = EpisodeCatalog::new(
        "Show",
        vec![Episode::new(2, 1, "Finale"), Episode::new(1, 9, "Finale")],
    );
    let files = vec![video("Show", "Show - Finale.mkv")];

    let matches = Matcher::new().match_files(&catalog, &files);

    // Identical titles are ambiguous, but the suggestion is the earliest.
    assert_eq!(matches[0].status, MatchStatus::Unmatched);
    assert_eq!(matches[0].suggestion, Some(EpisodeId::new(1, 9)));
}

#[test]
fn test_matching_is_deterministic() {
    let catalog = EpisodeCatalog::new(
        "Show",
        vec![
            Episode::new(1, 1, "A New Day"),
            Episode::new(1, 2, "A New Night"),
            Episode::new(1, 3, "Day and Night"),
        ],
    );
    let files = vec![
        video("Show", "Show - new day.mkv"),
        video("Show", "Show - night day.mkv"),
        video("Show", "Show - a new night.mkv"),
    ];

    let matcher = Matcher::new();
    let first = matcher.match_files(&catalog, &files);
    for _ in 0..10 {
        let again = matcher.match_files(&catalog, &files);
        for (a, b) in first.iter().zip(&again) {
            assert_eq!(a.status, b.status);
            assert_eq!(a.episode_id(), b.episode_id());
            assert_eq!(a.suggestion, b.suggestion);
            assert_eq!(a.confidence, b.confidence);
        }
    }
}

#[test]
fn test_custom_threshold() {
    let matcher = Matcher::with_config(MatcherConfig {
        auto_accept_threshold: 0.99,
        ..Default::default()
    });
    let files = vec![video("Storyville", "Storyville - The Contestant uncut.mp4")];

    let matches = matcher.match_files(&storyville(), &files);
    assert_eq!(matches[0].status, MatchStatus::Unmatched);
}

#[test]
fn test_rivals_counted_among_remaining_episodes() {
    let catalog = EpisodeCatalog::new(
        "Show",
        vec![Episode::new(1, 1, "Alpha Beta"), Episode::new(1, 2, "Gamma")],
    );
    let files = vec![
        // Also scores close on "Gamma", which the last file takes first.
        video("Show", "Show - Alpha Beta Gamma Extra.mkv"),
        video("Show", "Show - Alpha Beta Director Cut.mkv"),
        video("Show", "Show - Gamma.mkv"),
    ];

    let matches = Matcher::new().match_files(&catalog, &files);

    assert_eq!(matches[2].status, MatchStatus::Auto);
    assert_eq!(matches[2].episode_id(), Some(EpisodeId::new(1, 2)));
    // Equal scores and no remaining rivals: inventory order decides.
    assert_eq!(matches[0].status, MatchStatus::Auto);
    assert_eq!(matches[0].episode_id(), Some(EpisodeId::new(1, 1)));
    assert_eq!(matches[1].status, MatchStatus::Unmatched);
    assert!(matches[1].suggestion.is_none());
}
