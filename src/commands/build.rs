//! `crane build` - compile matrix entries into dist/

use crate::commands::checks::run_gen;
use crate::core::config::Config;
use crate::core::error::CraneResult;
use crate::core::exec::ToolRunner;
use crate::matrix::BinSpec;
use crate::release::{BuildMetadata, Builder};

/// Build one named matrix entry, or every entry when `name` is None
pub fn run_build(config: &Config, runner: &dyn ToolRunner, name: Option<String>) -> CraneResult<()> {
  let meta = BuildMetadata::resolve(runner, &config.repo_root)?;
  run_gen(config)?;

  let builder = Builder::new(runner, config);
  match name {
    Some(name) => {
      let spec = config.matrix.lookup(&name)?;
      build_one(&builder, spec, &meta)
    }
    None => {
      for spec in config.matrix.specs() {
        build_one(&builder, spec, &meta)?;
      }
      Ok(())
    }
  }
}

fn build_one(builder: &Builder<'_>, spec: &BinSpec, meta: &BuildMetadata) -> CraneResult<()> {
  let artifacts = builder.build(spec, meta)?;
  println!("✅ Built {} artifact(s) for {} at version {}", artifacts.len(), spec.name, meta.version);
  Ok(())
}
