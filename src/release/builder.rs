//! Matrix-entry compilation into dist/ artifacts
//!
//! One compiler invocation per expanded job, strictly sequential and in the
//! matrix's declared order. A job's artifact is fully written (compiler exited
//! zero) before the next job starts. The first non-zero exit aborts the
//! remaining jobs for the entry; a partially built matrix is not released.
//! Compiler failures are deterministic for unchanged source, so nothing is
//! retried.

use crate::core::config::Config;
use crate::core::error::{BuildError, CraneError, CraneResult};
use crate::core::exec::{Invocation, ToolRunner, forward_output};
use crate::matrix::{BinSpec, Platform};
use crate::release::metadata::BuildMetadata;
use std::fs;
use std::path::PathBuf;

/// A compiled binary under dist/
#[derive(Debug, Clone)]
pub struct Artifact {
  pub path: PathBuf,
  pub platform: Platform,
}

pub struct Builder<'a> {
  runner: &'a dyn ToolRunner,
  config: &'a Config,
}

impl<'a> Builder<'a> {
  pub fn new(runner: &'a dyn ToolRunner, config: &'a Config) -> Self {
    Self { runner, config }
  }

  /// Compile every expanded job for `spec`, fail-fast
  pub fn build(&self, spec: &BinSpec, meta: &BuildMetadata) -> CraneResult<Vec<Artifact>> {
    let mut artifacts = Vec::new();

    for platform in spec.expand() {
      let out_path = spec.output_path(&self.config.repo_root, &platform);
      if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
      }

      let inv = self.compile_invocation(spec, &platform, &out_path, meta);
      let out = self.runner.run(&inv)?;
      forward_output(&out);

      if !out.success() {
        return Err(CraneError::Build(BuildError {
          target: platform,
          status: out.status,
        }));
      }

      artifacts.push(Artifact {
        path: out_path,
        platform,
      });
    }

    Ok(artifacts)
  }

  fn compile_invocation(
    &self,
    spec: &BinSpec,
    platform: &Platform,
    out_path: &std::path::Path,
    meta: &BuildMetadata,
  ) -> Invocation {
    // Link-time variables so the binary self-reports its build without
    // reading external files.
    let ldflags = format!(
      "-X main.Version={} -X main.CommitHash={} -X main.BuildTimestamp={}",
      meta.version, meta.commit, meta.build_date
    );
    let out = out_path.to_string_lossy();

    Invocation::new(
      "go",
      &["build", "-o", out.as_ref(), "-ldflags", ldflags.as_str(), self.config.main_pkg.as_str()],
    )
    .cwd(&self.config.repo_root)
    .env("GOOS", &platform.os)
    .env("GOARCH", &platform.arch)
    .env("CGO_ENABLED", if spec.cgo { "1" } else { "0" })
  }
}
