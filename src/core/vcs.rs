//! Repository state introspection via system git
//!
//! All queries are read-only and go through the [`ToolRunner`] seam so
//! metadata derivation can be exercised with a fake git in tests.

use crate::core::error::{CraneError, CraneResult, MetadataError};
use crate::core::exec::{Invocation, ToolRunner};
use std::path::{Path, PathBuf};

/// Read-only probe of a git checkout
pub struct GitProbe<'a> {
  runner: &'a dyn ToolRunner,
  repo_root: PathBuf,
}

impl<'a> GitProbe<'a> {
  pub fn new(runner: &'a dyn ToolRunner, repo_root: &Path) -> Self {
    Self {
      runner,
      repo_root: repo_root.to_path_buf(),
    }
  }

  /// HEAD commit SHA
  pub fn head_commit(&self) -> CraneResult<String> {
    self.query(&["rev-parse", "HEAD"])
  }

  /// Nearest tag description, falling back to the abbreviated commit
  pub fn describe(&self) -> CraneResult<String> {
    self.query(&["describe", "--tags", "--always"])
  }

  /// Whether the worktree has uncommitted changes
  pub fn is_dirty(&self) -> CraneResult<bool> {
    let status = self.query(&["status", "--porcelain"])?;
    Ok(!status.is_empty())
  }

  fn query(&self, args: &[&str]) -> CraneResult<String> {
    let inv = Invocation::new("git", args).cwd(&self.repo_root);
    let out = self.runner.run(&inv)?;

    if !out.success() {
      if out.stderr.contains("not a git repository") {
        return Err(CraneError::Metadata(MetadataError::RepoNotFound {
          path: self.repo_root.clone(),
        }));
      }
      return Err(CraneError::Metadata(MetadataError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: out.stderr,
      }));
    }

    Ok(out.stdout.trim().to_string())
  }
}
