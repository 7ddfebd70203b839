//! `crane push` - checksum and upload built artifacts
//!
//! Pushes `dist/<name>` for a named entry, or every artifact directory under
//! `dist/` when no name is given. Only release-eligible matrix entries are
//! pushed; directories with no matching matrix entry are skipped.

use crate::core::config::Config;
use crate::core::error::{CraneError, CraneResult, PushError};
use crate::core::exec::ToolRunner;
use crate::release::{ArtifactPusher, BuildMetadata, PushReport};
use crate::storage::{BucketTarget, GsUtil};
use std::fs;
use std::path::Path;

pub fn run_push(
  config: &Config,
  runner: &dyn ToolRunner,
  name: Option<String>,
  channel: &str,
  json: bool,
) -> CraneResult<()> {
  let meta = BuildMetadata::resolve(runner, &config.repo_root)?;
  let bucket = config.bucket(channel)?;
  let store = GsUtil::new(runner);
  let pusher = ArtifactPusher::new(&store);

  let mut reports = Vec::new();
  match name {
    Some(name) => {
      let spec = config.matrix.lookup(&name)?;
      if !spec.release {
        return Err(CraneError::with_help(
          format!("'{}' is not a release target", name),
          "Set `release = true` on its [[bins]] entry to push it.",
        ));
      }
      reports.push(push_one(config, &pusher, &name, &meta, &bucket, json)?);
    }
    None => {
      // A failing directory must not stop the remaining ones; failures are
      // collected and surfaced as one aggregate error after the loop.
      let mut failed = Vec::new();
      for name in artifact_dirs(&config.dist_dir())? {
        match config.matrix.lookup(&name) {
          Ok(spec) if spec.release => match push_one(config, &pusher, &name, &meta, &bucket, json) {
            Ok(report) => reports.push(report),
            Err(CraneError::Push(e)) => {
              eprintln!("Push incomplete for {}", name);
              failed.extend(e.failed);
            }
            Err(other) => return Err(other),
          },
          Ok(_) => println!("Skipping {} (not a release target)", name),
          Err(_) => println!("Skipping {} (not in the build matrix)", name),
        }
      }
      if !failed.is_empty() {
        return Err(CraneError::Push(PushError { failed }));
      }
    }
  }

  if json {
    println!("{}", serde_json::to_string_pretty(&reports)?);
  }
  Ok(())
}

fn push_one(
  config: &Config,
  pusher: &ArtifactPusher<'_>,
  name: &str,
  meta: &BuildMetadata,
  bucket: &BucketTarget,
  json: bool,
) -> CraneResult<PushReport> {
  let dir = config.dist_dir().join(name);
  if !dir.is_dir() {
    return Err(CraneError::with_help(
      format!("No artifacts found at {}", dir.display()),
      format!("Run `crane build {}` first.", name),
    ));
  }

  let report = pusher.push(&dir, name, &meta.version, bucket)?;
  if !json {
    println!("✅ Pushed {} object(s) for {} at version {}", report.uploaded.len(), name, meta.version);
  }
  Ok(report)
}

/// Sorted subdirectory names under dist/
fn artifact_dirs(dist: &Path) -> CraneResult<Vec<String>> {
  if !dist.is_dir() {
    return Err(CraneError::with_help(
      format!("No dist directory at {}", dist.display()),
      "Run `crane build` first.",
    ));
  }

  let mut names = Vec::new();
  for entry in fs::read_dir(dist)? {
    let entry = entry?;
    if entry.file_type()?.is_dir() {
      names.push(entry.file_name().to_string_lossy().into_owned());
    }
  }
  names.sort_unstable();
  Ok(names)
}
