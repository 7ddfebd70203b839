//! Test helpers for integration tests
//!
//! Builds a throwaway git repository with a crane.toml plus fake `go`,
//! `gsutil`, and formatter executables on PATH, so the full pipeline runs
//! without the real toolchain. The fake gsutil copies objects into a local
//! directory keyed by the gs:// URI.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const DEFAULT_CONFIG: &str = r#"
[workspace]
packages = ["."]

[[bins]]
name = "kloader"
release = true
targets = ["linux/amd64"]

[buckets]
dev = "gs://fake-dev"
prod = "gs://fake-prod"
"#;

/// A tagged git repository with fake tools and a fake bucket root
pub struct TestRepo {
  _root: TempDir,
  pub path: PathBuf,
  pub tools: PathBuf,
  pub bucket_root: PathBuf,
}

impl TestRepo {
  pub fn new() -> Result<Self> {
    Self::with_config(DEFAULT_CONFIG)
  }

  pub fn with_config(config: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("repo");
    let tools = root.path().join("tools");
    let bucket_root = root.path().join("bucket");
    std::fs::create_dir_all(&path)?;
    std::fs::create_dir_all(&tools)?;
    std::fs::create_dir_all(&bucket_root)?;

    // Repository with one tagged commit; dist/ is ignored so builds
    // do not dirty the worktree.
    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    std::fs::write(path.join("main.go"), "package main\n\nfunc main() {}\n")?;
    std::fs::write(path.join(".gitignore"), "dist/\n")?;
    std::fs::write(path.join("crane.toml"), config)?;
    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial commit"])?;
    git(&path, &["tag", "v0.5.0"])?;

    write_fake_tools(&tools)?;

    Ok(Self {
      _root: root,
      path,
      tools,
      bucket_root,
    })
  }

  /// Path of an object inside the fake bucket, from its gs:// URI
  pub fn object(&self, uri: &str) -> PathBuf {
    self.bucket_root.join(uri.trim_start_matches("gs://"))
  }
}

/// Run the crane binary inside the test repo with fake tools on PATH
pub fn run_crane(repo: &TestRepo, args: &[&str]) -> Result<Output> {
  run_crane_with_env(repo, args, &[])
}

pub fn run_crane_with_env(repo: &TestRepo, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
  let path_var = format!(
    "{}:{}",
    repo.tools.display(),
    std::env::var("PATH").unwrap_or_default()
  );

  let mut cmd = Command::new(env!("CARGO_BIN_EXE_crane"));
  cmd
    .args(args)
    .current_dir(&repo.path)
    .env("PATH", path_var)
    .env("FAKE_GCS_ROOT", &repo.bucket_root)
    .env_remove("GOPATH");
  for (key, value) in envs {
    cmd.env(key, value);
  }

  cmd.output().context("Failed to run crane")
}

pub fn git(dir: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git").args(args).current_dir(dir).output()?;
  if !output.status.success() {
    anyhow::bail!(
      "git {:?} failed: {}",
      args,
      String::from_utf8_lossy(&output.stderr)
    );
  }
  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_fake_tools(tools: &Path) -> Result<()> {
  // `go build` writes a small deterministic file to the -o path and can be
  // told to fail for one GOARCH; `go install`/`go vet` succeed silently.
  write_script(
    tools,
    "go",
    r#"#!/bin/sh
if [ "$1" = "build" ]; then
  if [ -n "$CRANE_TEST_FAIL_GOARCH" ] && [ "$GOARCH" = "$CRANE_TEST_FAIL_GOARCH" ]; then
    echo "fake compile error for $GOOS/$GOARCH" >&2
    exit 7
  fi
  out=""
  prev=""
  for a in "$@"; do
    if [ "$prev" = "-o" ]; then out="$a"; fi
    prev="$a"
  done
  printf 'fake binary %s %s\n' "$GOOS" "$GOARCH" > "$out"
fi
exit 0
"#,
  )?;

  // `gsutil cp <local> gs://...` copies into $FAKE_GCS_ROOT; it can be told
  // to reject URIs containing a substring.
  write_script(
    tools,
    "gsutil",
    r#"#!/bin/sh
if [ "$1" != "cp" ]; then exit 1; fi
if [ -n "$CRANE_TEST_FAIL_UPLOAD" ]; then
  case "$3" in
    *"$CRANE_TEST_FAIL_UPLOAD"*)
      echo "fake upload error for $3" >&2
      exit 1
      ;;
  esac
fi
rel="${3#gs://}"
mkdir -p "$FAKE_GCS_ROOT/$(dirname "$rel")"
cp "$2" "$FAKE_GCS_ROOT/$rel"
"#,
  )?;

  for tool in ["goimports", "gofmt", "golint"] {
    write_script(tools, tool, "#!/bin/sh\nexit 0\n")?;
  }
  Ok(())
}

fn write_script(dir: &Path, name: &str, body: &str) -> Result<()> {
  let path = dir.join(name);
  std::fs::write(&path, body)?;
  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
  }
  Ok(())
}
