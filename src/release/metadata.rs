//! Build metadata derivation from repository state
//!
//! Maintains the invariant: every stamped build has a version, commit, and
//! build date, resolved all-or-nothing at the start of each pipeline run.
//! For a fixed repository state two resolutions differ only in `build_date`.

use crate::core::error::CraneResult;
use crate::core::exec::ToolRunner;
use crate::core::vcs::GitProbe;
use chrono::Utc;
use serde::Serialize;
use std::path::Path;

/// Immutable build-metadata record
///
/// Never persisted beyond the process; the builder embeds the fields into the
/// compiled binary via link-time variables instead.
#[derive(Debug, Clone, Serialize)]
pub struct BuildMetadata {
  pub version: String,
  pub commit: String,
  pub build_date: String,
}

impl BuildMetadata {
  /// Derive metadata from the repository at `repo_root`
  pub fn resolve(runner: &dyn ToolRunner, repo_root: &Path) -> CraneResult<Self> {
    let git = GitProbe::new(runner, repo_root);

    let commit = git.head_commit()?;
    let described = git.describe()?;
    let dirty = git.is_dirty()?;

    let mut version = normalize_version(&described);
    if dirty {
      version.push_str("-dirty");
    }

    Ok(Self {
      version,
      commit,
      build_date: Utc::now().to_rfc3339(),
    })
  }

  /// Field pairs sorted by key, for the plain `version` printout
  pub fn fields(&self) -> Vec<(&'static str, &str)> {
    vec![
      ("build_date", self.build_date.as_str()),
      ("commit", self.commit.as_str()),
      ("version", self.version.as_str()),
    ]
  }
}

/// Normalize `git describe` output into a version string
///
/// Tags of the form vX.Y.Z lose the prefix; anything else (bare commits,
/// describe suffixes like v1.2.0-3-gabc123) passes through untouched.
fn normalize_version(described: &str) -> String {
  let trimmed = described.strip_prefix('v').unwrap_or(described);
  match semver::Version::parse(trimmed) {
    // Exact release tag only; describe suffixes parse as semver pre-release
    // identifiers and must not be mistaken for one.
    Ok(v) if v.pre.is_empty() && v.build.is_empty() => trimmed.to_string(),
    _ => described.to_string(),
  }
}
