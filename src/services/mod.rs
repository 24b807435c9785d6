//! External service clients.

pub mod tvdb;
