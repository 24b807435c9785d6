//! Source scanner module.
//!
//! Enumerates candidate video files from a directory, a single file, or a
//! glob-style pattern, and derives the normalized title tokens of each.

use crate::core::tokenizer;
use crate::models::media::VideoFile;
use crate::Result;
use regex::Regex;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Supported video file extensions.
const VIDEO_EXTENSIONS: &[&str] = &[
    // Common formats
    "mkv", "mp4", "avi", "mov", "wmv", // Additional formats
    "m4v", "ts", "m2ts", "flv", "webm", // Less common but supported
    "mpg", "mpeg", "vob", "ogv", "ogm", "divx", "xvid", "3gp", "mts", "rmvb", "asf",
];

/// Result of scanning a source.
#[derive(Debug, Default)]
pub struct Inventory {
    /// Video files, ordered by filename.
    pub files: Vec<VideoFile>,
    /// Sample/extras files left out.
    pub samples_skipped: usize,
    /// Total files looked at.
    pub total_files_scanned: usize,
}

impl Inventory {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}

/// Check if a file extension is a video format.
fn is_video_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    VIDEO_EXTENSIONS.contains(&ext_lower.as_str())
}

/// Check if a path is sample or bonus material rather than an episode.
///
/// Only directories below `root` (the literal base of the source pattern)
/// count, so a source that itself lives under "Extras" is still scanned.
/// Matches "Sample"/"Extras"/"Featurettes" directories (case-insensitive)
/// and sample filenames like `sample.mkv` or `show-sample.mkv`.
fn is_sample_or_extra(path: &Path, root: &Path) -> bool {
    const EXTRAS_DIRS: &[&str] = &[
        "sample",
        "samples",
        "extras",
        "extra",
        "featurettes",
        "featurette",
        "behind the scenes",
        "deleted scenes",
    ];

    let relative = path.strip_prefix(root).unwrap_or(path);
    let in_extras_dir = relative
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .any(|c| match c {
            Component::Normal(name) => {
                let name = name.to_string_lossy().to_lowercase();
                EXTRAS_DIRS.contains(&name.as_str())
            }
            _ => false,
        });

    let stem = path
        .file_stem()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    in_extras_dir || is_sample_stem(&stem)
}

/// `sample`, or `sample` joined to the name by `.`, `-` or `_`.
fn is_sample_stem(stem: &str) -> bool {
    const SEPARATORS: &[char] = &['.', '-', '_'];

    stem == "sample"
        || stem
            .strip_suffix("sample")
            .is_some_and(|rest| rest.ends_with(SEPARATORS))
        || stem
            .strip_prefix("sample")
            .is_some_and(|rest| rest.starts_with(SEPARATORS))
}

/// Create a VideoFile from a path.
fn create_video_file(path: &Path, series_name: &str) -> Result<VideoFile> {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let parent_dir = path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));

    let tokens = tokenizer::filename_tokens(&stem, series_name);

    Ok(VideoFile {
        path,
        filename,
        extension,
        parent_dir,
        tokens,
    })
}

/// Whether a path component carries glob syntax.
fn has_glob_meta(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

/// Translate a glob (`*`, `?`, `[...]`, `**`) into an anchored regex
/// over `/`-separated relative paths.
fn glob_to_regex(glob: &str) -> Result<Regex> {
    let mut out = String::from("^");
    let mut chars = glob.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                // "**/" also matches zero directories.
                if chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("(?:.*/)?");
                } else {
                    out.push_str(".*");
                }
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '[' => {
                out.push('[');
                if chars.peek() == Some(&'!') {
                    chars.next();
                    out.push('^');
                }
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == ']' {
                        closed = true;
                        break;
                    }
                    if inner == '\\' || inner == '[' {
                        out.push('\\');
                    }
                    out.push(inner);
                }
                if !closed {
                    return Err(crate::Error::InvalidPattern {
                        pattern: glob.to_string(),
                        reason: "unclosed '['".to_string(),
                    });
                }
                out.push(']');
            }
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }
    out.push('$');

    Regex::new(&out).map_err(|e| crate::Error::InvalidPattern {
        pattern: glob.to_string(),
        reason: e.to_string(),
    })
}

/// Split a pattern into its literal base directory and the glob remainder.
fn split_pattern(pattern: &Path) -> (PathBuf, Option<String>) {
    let mut base = PathBuf::new();
    let mut rest: Vec<String> = Vec::new();

    for component in pattern.components() {
        let text = component.as_os_str().to_string_lossy().to_string();
        if rest.is_empty() && !has_glob_meta(&text) {
            base.push(component);
        } else {
            rest.push(text);
        }
    }

    if base.as_os_str().is_empty() {
        base.push(".");
    }
    if rest.is_empty() {
        (base, None)
    } else {
        (base, Some(rest.join("/")))
    }
}

/// Scan a source pattern for video files.
///
/// `pattern` may be a directory (scanned recursively), a single video
/// file, or a glob such as `~/Downloads/Storyville*` or
/// `/downloads/**/*.mkv`. An existing literal path that is missing is an
/// error; a glob that matches nothing yields an empty inventory.
pub fn scan_source(pattern: &str, series_name: &str) -> Result<Inventory> {
    let (base, glob) = split_pattern(Path::new(pattern));
    let mut result = Inventory::default();

    let candidates: Vec<PathBuf> = match glob {
        None => {
            if !base.exists() {
                return Err(crate::Error::PathNotFound(base.display().to_string()));
            }
            if base.is_file() {
                vec![base.clone()]
            } else {
                WalkDir::new(&base)
                    .follow_links(false)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                    .map(|e| e.into_path())
                    .collect()
            }
        }
        Some(glob) => {
            if !base.is_dir() {
                tracing::debug!("Pattern base {:?} is not a directory", base);
                Vec::new()
            } else {
                let re = glob_to_regex(&glob)?;
                let mut walker = WalkDir::new(&base).min_depth(1).follow_links(false);
                if !glob.contains("**") {
                    walker = walker.max_depth(glob.split('/').count());
                }
                walker
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                    .filter(|e| {
                        let relative = e.path().strip_prefix(&base).unwrap_or(e.path());
                        let relative = relative
                            .components()
                            .map(|c| c.as_os_str().to_string_lossy())
                            .collect::<Vec<_>>()
                            .join("/");
                        re.is_match(&relative)
                    })
                    .map(|e| e.into_path())
                    .collect()
            }
        }
    };

    for path in candidates {
        result.total_files_scanned += 1;

        let is_video = path
            .extension()
            .map(|ext| is_video_extension(&ext.to_string_lossy()))
            .unwrap_or(false);
        if !is_video {
            continue;
        }

        if is_sample_or_extra(&path, &base) {
            tracing::debug!("Skipping sample/extra: {}", path.display());
            result.samples_skipped += 1;
            continue;
        }

        match create_video_file(&path, series_name) {
            Ok(video) => {
                tracing::debug!("Found {} -> tokens {:?}", video.filename, video.tokens);
                result.files.push(video);
            }
            Err(e) => {
                tracing::warn!("Failed to read video file {:?}: {}", path, e);
            }
        }
    }

    // Sort results for consistent output
    result
        .files
        .sort_by(|a, b| a.filename.cmp(&b.filename).then_with(|| a.path.cmp(&b.path)));

    tracing::info!(
        "Scanned {} files: {} videos, {} samples/extras skipped",
        result.total_files_scanned,
        result.files.len(),
        result.samples_skipped
    );

    Ok(result)
}
