//! `crane version` - print the resolved build metadata

use crate::core::config::Config;
use crate::core::error::CraneResult;
use crate::core::exec::ToolRunner;
use crate::release::BuildMetadata;

pub fn run_version(config: &Config, runner: &dyn ToolRunner, json: bool) -> CraneResult<()> {
  let meta = BuildMetadata::resolve(runner, &config.repo_root)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&meta)?);
  } else {
    for (key, value) in meta.fields() {
      println!("{}={}", key, value);
    }
  }
  Ok(())
}
