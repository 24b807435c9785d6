//! Command line argument definitions.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::models::plan::CollisionPolicy;

/// merge-into-series - File loose episodes into a series directory
#[derive(Parser, Debug)]
#[command(name = "merge-into-series")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Series name as listed in the config file
    #[arg(value_name = "SERIES_NAME")]
    pub series_name: String,

    /// Directory, file, or glob pattern of videos to merge
    #[arg(value_name = "SOURCE_PATTERN")]
    pub source_pattern: String,

    /// Config file (default: <config dir>/merge-into-series/series.conf)
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Show what would be done without touching any file
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Write a config file template and exit
    #[arg(long)]
    pub create_config: bool,

    /// What to do when a destination file already exists
    #[arg(long, value_enum, default_value = "suffix")]
    pub on_collision: CollisionArg,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Collision policy as accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionArg {
    /// Append " (2)", " (3)", ... to the new name
    Suffix,
    /// Leave the file and report the collision
    Fail,
}

impl From<CollisionArg> for CollisionPolicy {
    fn from(arg: CollisionArg) -> Self {
        match arg {
            CollisionArg::Suffix => CollisionPolicy::Suffix,
            CollisionArg::Fail => CollisionPolicy::Fail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["merge-into-series", "storyville", "/tmp/in"]).unwrap();
        assert_eq!(cli.series_name, "storyville");
        assert_eq!(cli.source_pattern, "/tmp/in");
        assert!(!cli.dry_run);
        assert_eq!(cli.on_collision, CollisionArg::Suffix);
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "merge-into-series",
            "--config",
            "/tmp/series.conf",
            "--dry-run",
            "--on-collision",
            "fail",
            "storyville",
            "/tmp/in/*.mkv",
        ])
        .unwrap();
        assert!(cli.dry_run);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/series.conf")));
        assert_eq!(CollisionPolicy::from(cli.on_collision), CollisionPolicy::Fail);
    }

    #[test]
    fn test_requires_positionals() {
        assert!(Cli::try_parse_from(["merge-into-series", "storyville"]).is_err());
    }
}
