//! `crane update_registry` - advance the "latest version" pointer
//!
//! Writes the current version to the channel's registry pointer for every
//! release-eligible matrix entry. Deliberately decoupled from `push` so a
//! fresh artifact set can be verified before being advertised.

use crate::core::config::Config;
use crate::core::error::{CraneError, CraneResult};
use crate::core::exec::ToolRunner;
use crate::release::{BuildMetadata, RegistryUpdater};
use crate::storage::GsUtil;

pub fn run_update_registry(config: &Config, runner: &dyn ToolRunner, channel: &str) -> CraneResult<()> {
  let meta = BuildMetadata::resolve(runner, &config.repo_root)?;
  let bucket = config.bucket(channel)?;
  let store = GsUtil::new(runner);
  let updater = RegistryUpdater::new(&store);

  let eligible: Vec<_> = config.matrix.specs().iter().filter(|s| s.release).collect();
  if eligible.is_empty() {
    // A silent exit here would look like a successful release advertisement.
    return Err(CraneError::with_help(
      "No release-eligible entries in the build matrix; no registry pointer was moved",
      "Set `release = true` on a [[bins]] entry to publish its registry pointer.",
    ));
  }

  for spec in eligible {
    updater.update(&spec.name, &meta.version, &bucket)?;
    println!("📌 {} on '{}' now points at {}", spec.name, bucket.channel, meta.version);
  }
  Ok(())
}
