//! Filename and title tokenization.
//!
//! Both filenames and episode titles are reduced to lower-cased,
//! punctuation-free word sequences so they can be compared as token sets.
//! Filenames additionally lose everything that does not help identify the
//! episode: the series name, bracketed release-group tags, and technical
//! markers like resolution, codec, source or `S01E02`.

use regex::Regex;
use std::sync::OnceLock;

/// Bracketed release-group tags: `[GROUP]`, `{GROUP}`.
fn bracket_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[[^\]]*\]|\{[^}]*\}").expect("valid bracket regex"))
}

/// Tokens that describe the release rather than the episode.
fn noise_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?x)^(
                \d{3,4}[pi] | [248]k | uhd | fhd
              | x26[45] | h26[45] | hevc | avc | xvid | divx | av1 | vp9 | \d{1,2}bit
              | hdr | hdr10 | dv | sdr
              | aac\d* | ac3 | eac3 | dts | ddp\d* | dd\d* | truehd | atmos | flac | mp3 | opus
              | web | webrip | webdl | dl | bluray | bdrip | brrip | hdtv | hdrip | dvdrip | remux
              | proper | repack | internal
              | s\d{1,2}e\d{1,3} | \d{1,2}x\d{2,3}
            )$",
        )
        .expect("valid noise regex")
    })
}

/// Normalize free text into tokens.
///
/// Lower-cases, drops apostrophes (`Don't` becomes `dont`), treats every
/// other non-alphanumeric character as a separator.
pub fn normalize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| *c != '\'' && *c != '\u{2019}')
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    cleaned.split_whitespace().map(str::to_string).collect()
}

/// Tokens identifying the episode in a filename stem.
pub fn filename_tokens(stem: &str, series_name: &str) -> Vec<String> {
    let without_tags = bracket_regex().replace_all(stem, " ");
    let mut tokens = normalize(&without_tags);

    let series = normalize(series_name);
    remove_sequence(&mut tokens, &series);

    let noise = noise_regex();
    tokens.retain(|t| !noise.is_match(t));
    tokens
}

/// Remove the first contiguous occurrence of `needle` from `tokens`.
fn remove_sequence(tokens: &mut Vec<String>, needle: &[String]) {
    if needle.is_empty() || needle.len() > tokens.len() {
        return;
    }
    if let Some(start) = tokens.windows(needle.len()).position(|w| w == needle) {
        tokens.drain(start..start + needle.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize("The Contestant: Part 2!"),
            owned(&["the", "contestant", "part", "2"])
        );
        assert_eq!(normalize("Don't   Look—Back"), owned(&["dont", "look", "back"]));
        assert!(normalize(" -- ").is_empty());
    }

    #[test]
    fn test_filename_tokens_strips_series() {
        assert_eq!(
            filename_tokens("Storyville - Praying for Armageddon", "Storyville"),
            owned(&["praying", "for", "armageddon"])
        );
    }

    #[test]
    fn test_filename_tokens_strips_noise() {
        let tokens = filename_tokens(
            "[RARBG] Storyville.S01E02.The.Contestant.1080p.WEB-DL.x264-GRP",
            "Storyville",
        );
        assert_eq!(tokens, owned(&["the", "contestant", "grp"]));
    }

    #[test]
    fn test_series_removed_only_once() {
        let tokens = filename_tokens("Doctor Who - The Doctor Who Experience", "Doctor Who");
        assert_eq!(tokens, owned(&["the", "doctor", "who", "experience"]));
    }
}
