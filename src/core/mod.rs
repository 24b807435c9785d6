//! Core business logic modules.

pub mod executor;
pub mod interaction;
pub mod matcher;
pub mod merger;
pub mod planner;
pub mod scanner;
pub mod session;
pub mod tokenizer;
