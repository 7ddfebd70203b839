//! Cloud object storage seam
//!
//! Uploads go through the narrow [`ObjectStore`] trait so the push and
//! registry logic can be exercised against an in-memory store in tests. The
//! real backend shells out to gsutil (see [`gsutil`]).

pub mod gsutil;

pub use gsutil::GsUtil;

use crate::core::error::CraneResult;
use std::path::Path;

/// A named release channel resolved to a concrete storage location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketTarget {
  pub channel: String,
  pub uri: String,
}

impl BucketTarget {
  pub fn new(channel: impl Into<String>, uri: impl Into<String>) -> Self {
    Self {
      channel: channel.into(),
      uri: uri.into(),
    }
  }

  /// Destination for one artifact file: <bucket>/<name>/<version>/<relative path>
  pub fn object_uri(&self, name: &str, version: &str, rel: &str) -> String {
    format!("{}/{}/{}/{}", self.uri.trim_end_matches('/'), name, version, rel)
  }

  /// Well-known registry pointer object for a binary on this channel
  pub fn registry_uri(&self, name: &str) -> String {
    format!("{}/{}/latest.txt", self.uri.trim_end_matches('/'), name)
  }
}

/// Narrow upload interface; one blocking call per object
///
/// Writing the same bytes to the same URI twice is an overwrite with identical
/// content, so callers may re-invoke after a partial failure.
pub trait ObjectStore {
  fn put(&self, local: &Path, uri: &str) -> CraneResult<()>;
}
