//! Source hygiene passthroughs: fmt, vet, lint, and the generate hook
//!
//! These delegate wholesale to the Go tooling over the configured package
//! directories. The import rewriter's exit status is fatal; the simplifying
//! formatter, vet, and lint report through their pass-through output only,
//! matching how the release flow has always treated them.

use crate::core::config::Config;
use crate::core::error::{CraneError, CraneResult, ToolError};
use crate::core::exec::{Invocation, ToolRunner, forward_output};

pub fn run_fmt(config: &Config, runner: &dyn ToolRunner) -> CraneResult<()> {
  let status = passthrough(config, runner, "goimports", &["-w"])?;
  if status != 0 {
    return Err(CraneError::Tool(ToolError {
      program: "goimports".to_string(),
      status,
    }));
  }

  passthrough(config, runner, "gofmt", &["-s", "-w"])?;
  Ok(())
}

pub fn run_vet(config: &Config, runner: &dyn ToolRunner) -> CraneResult<()> {
  passthrough(config, runner, "go", &["vet"])?;
  Ok(())
}

pub fn run_lint(config: &Config, runner: &dyn ToolRunner) -> CraneResult<()> {
  passthrough(config, runner, "golint", &[])?;
  Ok(())
}

/// Code generation hook; nothing generates anything yet
pub fn run_gen(_config: &Config) -> CraneResult<()> {
  Ok(())
}

/// Run a tool over the configured packages, forwarding its output
fn passthrough(config: &Config, runner: &dyn ToolRunner, program: &str, flags: &[&str]) -> CraneResult<i32> {
  let mut args: Vec<&str> = flags.to_vec();
  for pkg in &config.packages {
    args.push(pkg);
  }

  let inv = Invocation::new(program, &args).cwd(&config.repo_root);
  let out = runner.run(&inv)?;
  forward_output(&out);
  Ok(out.status)
}
