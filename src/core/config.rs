//! crane.toml configuration
//!
//! All configuration is loaded once at startup into an immutable [`Config`]
//! that is passed by reference into every component; nothing reads ambient
//! global state after this point.
//!
//! ```toml
//! [workspace]
//! import_path = "github.com/appscode/kloader"
//! packages = ["."]
//!
//! [[bins]]
//! name = "kloader"
//! release = true
//! targets = ["linux/amd64"]
//!
//! [buckets]
//! prod = "gs://appscode-cdn"
//! dev = "gs://appscode-dev"
//! ```

use crate::core::error::{ConfigError, CraneError, CraneResult};
use crate::matrix::{BinMatrix, BinSection};
use crate::storage::BucketTarget;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "crane.toml";

/// Raw crane.toml shape
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
  #[serde(default)]
  workspace: WorkspaceSection,
  #[serde(default)]
  bins: Vec<BinSection>,
  #[serde(default)]
  buckets: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct WorkspaceSection {
  /// Go import path; joined with $GOPATH/src to locate the repository root
  #[serde(default)]
  import_path: Option<String>,

  /// Package directories handed to the formatting and checking tools
  #[serde(default)]
  packages: Vec<String>,

  /// Main package passed to the compiler
  #[serde(default)]
  main: Option<String>,
}

/// Resolved, immutable configuration
#[derive(Debug, Clone)]
pub struct Config {
  /// Absolute repository root; all tool invocations run here
  pub repo_root: PathBuf,

  /// Package directories for fmt/vet/lint
  pub packages: Vec<String>,

  /// Main package argument for the compiler
  pub main_pkg: String,

  /// The build matrix
  pub matrix: BinMatrix,

  /// Release channel name → storage URI
  buckets: BTreeMap<String, String>,
}

impl Config {
  /// Load and validate crane.toml from `start_dir`
  pub fn load(start_dir: &Path) -> CraneResult<Self> {
    let path = start_dir.join(CONFIG_FILE);
    if !path.exists() {
      return Err(CraneError::Config(ConfigError::NotFound {
        workspace_root: start_dir.to_path_buf(),
      }));
    }

    let raw = fs::read_to_string(&path)?;
    let file: ConfigFile = toml_edit::de::from_str(&raw)?;
    Self::resolve(start_dir, file)
  }

  fn resolve(start_dir: &Path, file: ConfigFile) -> CraneResult<Self> {
    let repo_root = resolve_repo_root(start_dir, file.workspace.import_path.as_deref());

    let packages = if file.workspace.packages.is_empty() {
      vec![".".to_string()]
    } else {
      file.workspace.packages
    };

    let matrix = BinMatrix::from_sections(file.bins)?;

    Ok(Self {
      repo_root,
      packages,
      main_pkg: file.workspace.main.unwrap_or_else(|| ".".to_string()),
      matrix,
      buckets: file.buckets,
    })
  }

  /// Resolve a channel name to its bucket target
  pub fn bucket(&self, channel: &str) -> CraneResult<BucketTarget> {
    match self.buckets.get(channel) {
      Some(uri) => Ok(BucketTarget::new(channel, uri.clone())),
      None => Err(CraneError::Config(ConfigError::BucketNotFound {
        channel: channel.to_string(),
        known: self.buckets.keys().cloned().collect(),
      })),
    }
  }

  /// dist/ output directory under the repository root
  pub fn dist_dir(&self) -> PathBuf {
    self.repo_root.join("dist")
  }
}

/// Locate the repository root
///
/// With an import path and $GOPATH set, the root is $GOPATH/src/<import path>,
/// matching the Go workspace layout. Otherwise the invocation directory is the
/// root. A wrong $GOPATH shows up later as ordinary path failures.
fn resolve_repo_root(start_dir: &Path, import_path: Option<&str>) -> PathBuf {
  if let Some(import_path) = import_path
    && let Ok(gopath) = std::env::var("GOPATH")
    && !gopath.is_empty()
  {
    return PathBuf::from(gopath).join("src").join(import_path);
  }
  start_dir.to_path_buf()
}
