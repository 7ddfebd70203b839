//! Core building blocks for the release pipeline
//!
//! - **config**: immutable crane.toml configuration, loaded once at startup
//! - **error**: unified error taxonomy with exit-status mapping
//! - **exec**: the subprocess seam every external tool goes through
//! - **vcs**: read-only git queries for metadata derivation

pub mod config;
pub mod error;
pub mod exec;
pub mod vcs;
