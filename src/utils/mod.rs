//! Utility modules.

pub mod cancel;
pub mod fs;
pub mod hash;
