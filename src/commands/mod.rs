//! CLI commands for crane
//!
//! Each command is a thin wrapper over the release pipeline:
//!
//! - **version**: print the resolved build metadata
//! - **checks**: fmt/vet/lint passthroughs and the generate hook
//! - **build**: compile matrix entries into dist/
//! - **push**: checksum and upload built artifacts
//! - **registry**: advance the "latest version" pointer
//! - **install**: build into the local toolchain's bin path
//!
//! All commands take the immutable `&Config` and the `&dyn ToolRunner` built
//! once in main.rs.

pub mod build;
pub mod checks;
pub mod install;
pub mod push;
pub mod registry;
pub mod version;

pub use build::run_build;
pub use checks::{run_fmt, run_gen, run_lint, run_vet};
pub use install::{run_default, run_install};
pub use push::run_push;
pub use registry::run_update_registry;
pub use version::run_version;
