//! Core domain models shared across Arcade crates.
//!
//! These are the "truth" types: what the datastore stores and what published
//! bundles carry alongside their files.

pub mod manifest;
pub mod project;
pub mod version;

/// Re-export all model types for convenience.
pub use manifest::*;
pub use project::*;
pub use version::*;
