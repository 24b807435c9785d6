//! Filename generator.

use crate::models::media::Episode;

/// Generate the canonical episode filename.
///
/// Format: `${series} - S${season2}E${episode2} - ${title}.${ext}`
pub fn generate_episode_filename(series: &str, episode: &Episode, extension: &str) -> String {
    let stem = episode_stem(series, episode);
    with_extension(&stem, extension)
}

/// Canonical filename without extension.
pub fn episode_stem(series: &str, episode: &Episode) -> String {
    let stem = format!(
        "{} - S{:02}E{:02} - {}",
        sanitize_filename(series),
        episode.season,
        episode.episode,
        sanitize_filename(&episode.title)
    );
    // Windows rejects names ending in a dot or space.
    stem.trim_end_matches(['.', ' ']).to_string()
}

/// Add a ` (n)` disambiguation suffix to a stem.
pub fn with_suffix(stem: &str, n: usize) -> String {
    format!("{} ({})", stem, n)
}

/// Join stem and extension.
pub fn with_extension(stem: &str, extension: &str) -> String {
    if extension.is_empty() {
        stem.to_string()
    } else {
        format!("{}.{}", stem, extension)
    }
}

/// Sanitize a string for use in filenames.
fn sanitize_filename(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_episode_filename() {
        let episode = Episode::new(1, 1, "Praying for Armageddon");
        assert_eq!(
            generate_episode_filename("Storyville", &episode, "mkv"),
            "Storyville - S01E01 - Praying for Armageddon.mkv"
        );
    }

    #[test]
    fn test_sanitizes_title() {
        let episode = Episode::new(12, 104, "What? A/B: Test...");
        assert_eq!(
            generate_episode_filename("Show", &episode, "mp4"),
            "Show - S12E104 - What_ A_B_ Test.mp4"
        );
    }

    #[test]
    fn test_with_suffix() {
        assert_eq!(
            with_extension(&with_suffix("Show - S01E01 - Pilot", 2), "mkv"),
            "Show - S01E01 - Pilot (2).mkv"
        );
    }
}
