//! `crane install` - build into the local toolchain's bin path
//!
//! Also hosts the bare-invocation default sequence: generate, format, install.

use crate::commands::checks::{run_fmt, run_gen};
use crate::core::config::Config;
use crate::core::error::{CraneError, CraneResult, ToolError};
use crate::core::exec::{Invocation, ToolRunner, forward_output};

pub fn run_install(config: &Config, runner: &dyn ToolRunner) -> CraneResult<()> {
  let inv = Invocation::new("go", &["install", config.main_pkg.as_str()]).cwd(&config.repo_root);
  let out = runner.run(&inv)?;
  forward_output(&out);

  if !out.success() {
    return Err(CraneError::Tool(ToolError {
      program: "go install".to_string(),
      status: out.status,
    }));
  }
  Ok(())
}

/// Bare invocation: generate → format → local install
pub fn run_default(config: &Config, runner: &dyn ToolRunner) -> CraneResult<()> {
  run_gen(config)?;
  run_fmt(config, runner)?;
  run_install(config, runner)
}
