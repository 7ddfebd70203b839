//! Declarative build matrix: binary name → build configuration
//!
//! The matrix is static configuration loaded once from crane.toml and
//! validated up front. Expansion of one entry into per-platform build jobs is
//! pure: host-only entries yield exactly one job for the invoking machine,
//! explicit entries yield their declared target list in declared order.

use crate::core::error::{ConfigError, CraneError, CraneResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Target pairs the Go toolchain can cross-compile for
const SUPPORTED_PLATFORMS: &[(&str, &str)] = &[
  ("linux", "amd64"),
  ("linux", "arm64"),
  ("linux", "arm"),
  ("linux", "386"),
  ("darwin", "amd64"),
  ("darwin", "arm64"),
  ("windows", "amd64"),
  ("windows", "386"),
  ("freebsd", "amd64"),
];

/// An (operating system, architecture) pair in Go toolchain notation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
  pub os: String,
  pub arch: String,
}

impl Platform {
  pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
    Self {
      os: os.into(),
      arch: arch.into(),
    }
  }

  /// The platform of the machine running crane
  pub fn host() -> Self {
    let os = match std::env::consts::OS {
      "macos" => "darwin",
      other => other,
    };
    let arch = match std::env::consts::ARCH {
      "x86_64" => "amd64",
      "aarch64" => "arm64",
      "x86" => "386",
      other => other,
    };
    Self::new(os, arch)
  }

  /// Parse "os/arch" notation as written in crane.toml
  pub fn parse(s: &str) -> CraneResult<Self> {
    match s.split_once('/') {
      Some((os, arch)) if !os.is_empty() && !arch.is_empty() => Ok(Self::new(os, arch)),
      _ => Err(CraneError::Config(ConfigError::Invalid {
        reason: format!("Malformed target '{}', expected os/arch (e.g. linux/amd64)", s),
      })),
    }
  }

  pub fn is_supported(&self) -> bool {
    SUPPORTED_PLATFORMS
      .iter()
      .any(|(os, arch)| *os == self.os && *arch == self.arch)
  }

  /// Per-platform artifact directory name under dist/<name>/
  pub fn dir_name(&self) -> String {
    format!("{}-{}", self.os, self.arch)
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.os, self.arch)
  }
}

/// Which platforms a matrix entry is built for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSet {
  /// Build only for the machine running crane
  HostOnly,
  /// Build for every declared platform, in declared order
  Explicit(Vec<Platform>),
}

/// Build method for a matrix entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinKind {
  Go,
}

/// One validated matrix entry
#[derive(Debug, Clone)]
pub struct BinSpec {
  /// Artifact identifier, also the output filename
  pub name: String,
  pub kind: BinKind,
  /// Whether this entry participates in public releases
  pub release: bool,
  /// Whether compilation needs the foreign-function bridge; cross-compilation
  /// is only safe with it disabled
  pub cgo: bool,
  pub targets: TargetSet,
}

impl BinSpec {
  /// Expand into per-platform build jobs
  pub fn expand(&self) -> Vec<Platform> {
    match &self.targets {
      TargetSet::HostOnly => vec![Platform::host()],
      TargetSet::Explicit(platforms) => platforms.clone(),
    }
  }

  /// Output path for one job: dist/<name>/<os>-<arch>/<name>[.exe]
  pub fn output_path(&self, repo_root: &Path, platform: &Platform) -> PathBuf {
    let mut file = self.name.clone();
    if platform.os == "windows" {
      file.push_str(".exe");
    }
    repo_root
      .join("dist")
      .join(&self.name)
      .join(platform.dir_name())
      .join(file)
  }
}

/// Raw [[bins]] section as written in crane.toml
#[derive(Debug, Clone, Deserialize)]
pub struct BinSection {
  pub name: String,
  #[serde(default = "default_kind")]
  pub kind: BinKind,
  #[serde(default)]
  pub release: bool,
  #[serde(default)]
  pub cgo: bool,
  /// "os/arch" strings; omit the key entirely for a host-only entry
  #[serde(default)]
  pub targets: Option<Vec<String>>,
}

fn default_kind() -> BinKind {
  BinKind::Go
}

/// The validated table of matrix entries, keyed by name
#[derive(Debug, Clone)]
pub struct BinMatrix {
  specs: Vec<BinSpec>,
}

impl BinMatrix {
  /// Validate raw config sections into a matrix
  ///
  /// Rejects duplicate names, empty explicit target lists, duplicate targets
  /// within an entry, and platforms the toolchain cannot compile for.
  pub fn from_sections(sections: Vec<BinSection>) -> CraneResult<Self> {
    let mut specs: Vec<BinSpec> = Vec::with_capacity(sections.len());

    for section in sections {
      if specs.iter().any(|s| s.name == section.name) {
        return Err(invalid(format!("Duplicate [[bins]] entry '{}'", section.name)));
      }
      if section.name.is_empty() {
        return Err(invalid("A [[bins]] entry is missing its name".to_string()));
      }

      let targets = match section.targets {
        None => TargetSet::HostOnly,
        Some(raw) => {
          if raw.is_empty() {
            return Err(invalid(format!(
              "'{}' declares an empty target list; omit `targets` for a host-only build",
              section.name
            )));
          }
          let mut platforms = Vec::with_capacity(raw.len());
          for s in &raw {
            let platform = Platform::parse(s)?;
            if !platform.is_supported() {
              return Err(invalid(format!(
                "'{}' targets {}, which the toolchain does not support",
                section.name, platform
              )));
            }
            if platforms.contains(&platform) {
              return Err(invalid(format!("'{}' declares {} twice", section.name, platform)));
            }
            platforms.push(platform);
          }
          TargetSet::Explicit(platforms)
        }
      };

      specs.push(BinSpec {
        name: section.name,
        kind: section.kind,
        release: section.release,
        cgo: section.cgo,
        targets,
      });
    }

    Ok(Self { specs })
  }

  pub fn lookup(&self, name: &str) -> CraneResult<&BinSpec> {
    self
      .specs
      .iter()
      .find(|s| s.name == name)
      .ok_or_else(|| CraneError::UnknownTarget { name: name.to_string() })
  }

  /// All entries, in declaration order
  pub fn specs(&self) -> &[BinSpec] {
    &self.specs
  }
}

fn invalid(reason: String) -> CraneError {
  CraneError::Config(ConfigError::Invalid { reason })
}
