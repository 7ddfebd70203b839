//! "Latest version" registry pointer updates
//!
//! One small object per release channel, containing only the currently
//! published version string. Deliberately a separate step from pushing so an
//! operator can verify a freshly pushed artifact set before advertising it.

use crate::core::error::{CraneError, CraneResult, RegistryError};
use crate::storage::{BucketTarget, ObjectStore};
use std::fs;
use std::path::PathBuf;

pub struct RegistryUpdater<'a> {
  store: &'a dyn ObjectStore,
}

impl<'a> RegistryUpdater<'a> {
  pub fn new(store: &'a dyn ObjectStore) -> Self {
    Self { store }
  }

  /// Point the channel's registry for `name` at `version`
  pub fn update(&self, name: &str, version: &str, bucket: &BucketTarget) -> CraneResult<()> {
    let uri = bucket.registry_uri(name);
    let scratch = scratch_path(name);

    fs::write(&scratch, version)?;
    let result = self.store.put(&scratch, &uri);
    let _ = fs::remove_file(&scratch);

    result.map_err(|e| {
      CraneError::Registry(RegistryError {
        uri,
        reason: e.to_string(),
      })
    })
  }
}

fn scratch_path(name: &str) -> PathBuf {
  std::env::temp_dir().join(format!("crane-latest-{}-{}.txt", name, std::process::id()))
}
