//! # arcade-common
//!
//! Shared types, configuration, error handling, and utilities used across all Arcade crates.
//! This is the foundation layer: no resolution logic, just primitives and contracts.

pub mod artifact;
pub mod config;
pub mod error;
pub mod models;
