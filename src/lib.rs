//! merge-into-series library
//!
//! Matches loose video files to episodes from an online episode guide and
//! renames or moves them into a canonical per-series layout.

pub mod cli;
pub mod core;
pub mod error;
pub mod generators;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
