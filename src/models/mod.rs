//! Data models.

pub mod catalog;
pub mod config;
pub mod matching;
pub mod media;
pub mod plan;
