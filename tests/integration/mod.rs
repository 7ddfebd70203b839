//! Integration tests for the crane CLI
//!
//! These exercise the real binary against a throwaway git repository and
//! fake toolchain shims; see helpers.rs.

#![cfg(unix)]

mod helpers;
mod test_pipeline;
