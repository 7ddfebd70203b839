//! External tool invocation seam
//!
//! Every external tool crane touches (git, the Go compiler, gofmt/goimports,
//! go vet, golint, gsutil) goes through the [`ToolRunner`] trait: one blocking
//! call per invocation, returning the exit status and captured output. The
//! pipeline stays testable with scripted fakes instead of real subprocesses.
//!
//! The real [`SystemRunner`] echoes each command line to stdout before
//! executing it, so every run leaves an auditable trail of exactly what was
//! invoked.

use crate::core::error::{CraneError, CraneResult};
use std::path::{Path, PathBuf};
use std::process::Command;

/// A single external tool invocation
#[derive(Debug, Clone)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: Option<PathBuf>,
  pub env: Vec<(String, String)>,
}

impl Invocation {
  pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
    Self {
      program: program.into(),
      args: args.iter().map(|a| a.to_string()).collect(),
      cwd: None,
      env: Vec::new(),
    }
  }

  pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
    self.cwd = Some(dir.into());
    self
  }

  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.push((key.into(), value.into()));
    self
  }

  /// Render the invocation the way a shell user would type it
  pub fn command_line(&self) -> String {
    let mut parts = Vec::with_capacity(self.env.len() + self.args.len() + 1);
    for (key, value) in &self.env {
      parts.push(format!("{}={}", key, value));
    }
    parts.push(self.program.clone());
    for arg in &self.args {
      if arg.contains(' ') {
        parts.push(format!("'{}'", arg));
      } else {
        parts.push(arg.clone());
      }
    }
    parts.join(" ")
  }
}

/// Outcome of a completed tool invocation
#[derive(Debug, Clone)]
pub struct ToolOutput {
  pub status: i32,
  pub stdout: String,
  pub stderr: String,
}

impl ToolOutput {
  pub fn success(&self) -> bool {
    self.status == 0
  }
}

/// Narrow interface over subprocess execution
///
/// A failed spawn (program not found) is an error; a non-zero exit is a
/// successful call whose [`ToolOutput::status`] reports the failure. Callers
/// decide what a non-zero status means for their operation.
pub trait ToolRunner {
  fn run(&self, inv: &Invocation) -> CraneResult<ToolOutput>;
}

/// Runs tools as real subprocesses, echoing each command line first
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
  fn run(&self, inv: &Invocation) -> CraneResult<ToolOutput> {
    println!("{}", inv.command_line());

    let mut cmd = Command::new(&inv.program);
    cmd.args(&inv.args);
    if let Some(dir) = &inv.cwd {
      cmd.current_dir(dir);
    }
    for (key, value) in &inv.env {
      cmd.env(key, value);
    }

    let output = cmd
      .output()
      .map_err(|e| CraneError::message(format!("Failed to execute {}: {}", inv.program, e)))?;

    Ok(ToolOutput {
      status: output.status.code().unwrap_or(-1),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
  }
}

/// Pass a delegated tool's captured output through to our own streams
pub fn forward_output(out: &ToolOutput) {
  if !out.stdout.is_empty() {
    print!("{}", out.stdout);
  }
  if !out.stderr.is_empty() {
    eprint!("{}", out.stderr);
  }
}
