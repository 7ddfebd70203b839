//! Checksum manifests and versioned artifact upload
//!
//! Push order is fixed: stale manifests are deleted first, checksums for the
//! whole directory are computed before any upload starts (the manifest always
//! describes the exact set being pushed), then each data file goes up followed
//! by its manifests. Upload failures are tolerated per file but surface as one
//! aggregate error; re-invoking the push overwrites versioned paths with
//! identical bytes.

use crate::core::error::{CraneError, CraneResult, PushError};
use crate::storage::{BucketTarget, ObjectStore};
use crate::utils::path_to_key_format;
use md5::Md5;
use serde::Serialize;
use sha1::{Digest, Sha1};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Sidecar extensions, one per digest algorithm
pub const MANIFEST_EXTENSIONS: [&str; 2] = ["md5", "sha1"];

/// Per-file digest record
#[derive(Debug, Clone)]
pub struct ManifestEntry {
  /// Path relative to the pushed directory, forward slashes
  pub rel: String,
  pub md5: String,
  pub sha1: String,
}

/// Outcome of one push call
#[derive(Debug, Default, Serialize)]
pub struct PushReport {
  /// Destination URIs written, in upload order
  pub uploaded: Vec<String>,
  /// Local files whose upload failed
  pub failed: Vec<PathBuf>,
}

pub struct ArtifactPusher<'a> {
  store: &'a dyn ObjectStore,
}

impl<'a> ArtifactPusher<'a> {
  pub fn new(store: &'a dyn ObjectStore) -> Self {
    Self { store }
  }

  /// Push every regular file under `dir` to the bucket, version-qualified
  pub fn push(&self, dir: &Path, name: &str, version: &str, bucket: &BucketTarget) -> CraneResult<PushReport> {
    remove_stale_manifests(dir)?;

    let files = collect_files(dir)?;

    // All checksums are computed before the first upload.
    let mut entries = Vec::with_capacity(files.len());
    for file in &files {
      entries.push(digest_file(dir, file)?);
    }
    for (file, entry) in files.iter().zip(&entries) {
      write_manifests(file, entry)?;
    }

    let mut report = PushReport::default();
    for (file, entry) in files.iter().zip(&entries) {
      self.upload(file, &entry.rel, name, version, bucket, &mut report);
      for ext in MANIFEST_EXTENSIONS {
        let sidecar = sidecar_path(file, ext);
        let rel = format!("{}.{}", entry.rel, ext);
        self.upload(&sidecar, &rel, name, version, bucket, &mut report);
      }
    }

    if report.failed.is_empty() {
      Ok(report)
    } else {
      Err(CraneError::Push(PushError { failed: report.failed }))
    }
  }

  fn upload(
    &self,
    local: &Path,
    rel: &str,
    name: &str,
    version: &str,
    bucket: &BucketTarget,
    report: &mut PushReport,
  ) {
    let uri = bucket.object_uri(name, version, rel);
    match self.store.put(local, &uri) {
      Ok(()) => report.uploaded.push(uri),
      Err(e) => {
        // Keep going; one bad call must not abort the artifact set.
        eprintln!("Upload failed for {}: {}", local.display(), e);
        report.failed.push(local.to_path_buf());
      }
    }
  }
}

/// Delete manifest files left over from a prior push
///
/// Stale manifests must never be uploaded alongside freshly built files.
fn remove_stale_manifests(dir: &Path) -> CraneResult<()> {
  for entry in WalkDir::new(dir).sort_by_file_name() {
    let entry = entry?;
    if !entry.file_type().is_file() {
      continue;
    }
    let is_manifest = entry
      .path()
      .extension()
      .and_then(|e| e.to_str())
      .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext));
    if is_manifest {
      fs::remove_file(entry.path())?;
    }
  }
  Ok(())
}

/// Every regular file under `dir`, in deterministic (sorted) order
fn collect_files(dir: &Path) -> CraneResult<Vec<PathBuf>> {
  let mut files = Vec::new();
  for entry in WalkDir::new(dir).sort_by_file_name() {
    let entry = entry?;
    if entry.file_type().is_file() {
      files.push(entry.path().to_path_buf());
    }
  }
  Ok(files)
}

fn digest_file(dir: &Path, file: &Path) -> CraneResult<ManifestEntry> {
  let bytes = fs::read(file)?;
  let rel = path_to_key_format(file.strip_prefix(dir)?);

  let md5 = format!("{:x}", Md5::digest(&bytes));
  let sha1 = format!("{:x}", Sha1::digest(&bytes));

  Ok(ManifestEntry { rel, md5, sha1 })
}

/// Write the two sidecar manifests next to the file, checksum-tool format
fn write_manifests(file: &Path, entry: &ManifestEntry) -> CraneResult<()> {
  let filename = file
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default();

  fs::write(sidecar_path(file, "md5"), format!("{}  {}\n", entry.md5, filename))?;
  fs::write(sidecar_path(file, "sha1"), format!("{}  {}\n", entry.sha1, filename))?;
  Ok(())
}

fn sidecar_path(file: &Path, ext: &str) -> PathBuf {
  let mut name = file.as_os_str().to_os_string();
  name.push(".");
  name.push(ext);
  PathBuf::from(name)
}
