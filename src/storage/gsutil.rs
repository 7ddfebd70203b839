//! gsutil-backed object store
//!
//! One `gsutil cp` subprocess per object. No retries; a failed copy surfaces
//! as an error and the caller decides whether to re-invoke.

use crate::core::error::{CraneError, CraneResult};
use crate::core::exec::{Invocation, ToolRunner};
use crate::storage::ObjectStore;
use std::path::Path;

pub struct GsUtil<'a> {
  runner: &'a dyn ToolRunner,
}

impl<'a> GsUtil<'a> {
  pub fn new(runner: &'a dyn ToolRunner) -> Self {
    Self { runner }
  }
}

impl ObjectStore for GsUtil<'_> {
  fn put(&self, local: &Path, uri: &str) -> CraneResult<()> {
    let local = local.to_string_lossy();
    let inv = Invocation::new("gsutil", &["cp", local.as_ref(), uri]);
    let out = self.runner.run(&inv)?;

    if !out.success() {
      return Err(CraneError::message(format!(
        "gsutil cp exited with status {}: {}",
        out.status,
        out.stderr.trim()
      )));
    }
    Ok(())
  }
}
