//! Error types for crane with contextual messages and exit codes
//!
//! This module provides a unified error type that categorizes pipeline failures
//! and maps each onto a process exit status. Compiler failures propagate the
//! compiler's own exit status so CI systems see the original code.

use crate::matrix::Platform;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Fixed exit codes for failures that carry no tool status of their own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, unknown command/target, invalid args)
  User = 1,
  /// System error (git, compiler crash, storage, I/O)
  System = 2,
}

impl ExitCode {
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for crane
#[derive(Debug)]
pub enum CraneError {
  /// crane.toml missing or invalid
  Config(ConfigError),

  /// Repository state could not be inspected
  Metadata(MetadataError),

  /// Requested binary is not in the build matrix
  UnknownTarget { name: String },

  /// Command token does not name any crane command
  UnknownCommand { token: String },

  /// Compiler exited non-zero for one matrix job
  Build(BuildError),

  /// One or more artifact uploads failed
  Push(PushError),

  /// Registry pointer write failed
  Registry(RegistryError),

  /// A delegated tool (formatter, linter, installer) exited non-zero
  Tool(ToolError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional help text
  Message { message: String, help: Option<String> },
}

impl CraneError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    CraneError::Message {
      message: msg.into(),
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    CraneError::Message {
      message: msg.into(),
      help: Some(help.into()),
    }
  }

  /// Process exit status for this error
  ///
  /// Failures produced by an external tool propagate that tool's exit status;
  /// everything else uses the fixed [`ExitCode`] for its category.
  pub fn exit_status(&self) -> i32 {
    match self {
      CraneError::Build(e) if e.status > 0 => e.status,
      CraneError::Tool(e) if e.status > 0 => e.status,
      CraneError::Config(_)
      | CraneError::UnknownTarget { .. }
      | CraneError::UnknownCommand { .. }
      | CraneError::Message { .. } => ExitCode::User.as_i32(),
      _ => ExitCode::System.as_i32(),
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      CraneError::Config(e) => e.help_message(),
      CraneError::Metadata(_) => Some("crane derives build metadata from git. Run inside a git checkout with git on PATH.".to_string()),
      CraneError::UnknownTarget { name } => Some(format!(
        "Add a [[bins]] entry named '{}' to crane.toml, or pick one that exists.",
        name
      )),
      CraneError::UnknownCommand { .. } => Some("Run `crane --help` to list the available commands.".to_string()),
      CraneError::Push(_) => Some("No upload is retried automatically. Re-run the push; versioned paths overwrite in place.".to_string()),
      CraneError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for CraneError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CraneError::Config(e) => write!(f, "{}", e),
      CraneError::Metadata(e) => write!(f, "{}", e),
      CraneError::UnknownTarget { name } => write!(f, "'{}' is not in the build matrix", name),
      CraneError::UnknownCommand { token } => write!(f, "Unknown command '{}'", token),
      CraneError::Build(e) => write!(f, "{}", e),
      CraneError::Push(e) => write!(f, "{}", e),
      CraneError::Registry(e) => write!(f, "{}", e),
      CraneError::Tool(e) => write!(f, "{}", e),
      CraneError::Io(e) => write!(f, "I/O error: {}", e),
      CraneError::Message { message, .. } => write!(f, "{}", message),
    }
  }
}

impl std::error::Error for CraneError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      CraneError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for CraneError {
  fn from(err: io::Error) -> Self {
    CraneError::Io(err)
  }
}

impl From<toml_edit::de::Error> for CraneError {
  fn from(err: toml_edit::de::Error) -> Self {
    CraneError::Config(ConfigError::Invalid {
      reason: format!("TOML deserialization error: {}", err),
    })
  }
}

impl From<serde_json::Error> for CraneError {
  fn from(err: serde_json::Error) -> Self {
    CraneError::message(format!("JSON error: {}", err))
  }
}

impl From<std::path::StripPrefixError> for CraneError {
  fn from(err: std::path::StripPrefixError) -> Self {
    CraneError::message(format!("Path strip prefix error: {}", err))
  }
}

impl From<walkdir::Error> for CraneError {
  fn from(err: walkdir::Error) -> Self {
    CraneError::message(format!("Directory walk error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// crane.toml not found
  NotFound { workspace_root: PathBuf },

  /// crane.toml could not be interpreted
  Invalid { reason: String },

  /// Bucket channel not configured
  BucketNotFound { channel: String, known: Vec<String> },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some(
        "Create a crane.toml with a [workspace] section, [[bins]] entries, and a [buckets] table.".to_string(),
      ),
      ConfigError::BucketNotFound { known, .. } => {
        Some(format!("Configured channels: {}", known.join(", ")))
      }
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { workspace_root } => {
        write!(
          f,
          "No crane configuration found.\nExpected file: {}/crane.toml",
          workspace_root.display()
        )
      }
      ConfigError::Invalid { reason } => {
        write!(f, "Invalid crane.toml: {}", reason)
      }
      ConfigError::BucketNotFound { channel, .. } => {
        write!(f, "Bucket channel '{}' is not configured", channel)
      }
    }
  }
}

/// Repository-inspection errors
///
/// Metadata resolution is all-or-nothing: any failing git query surfaces here
/// and no partial metadata record is produced.
#[derive(Debug)]
pub enum MetadataError {
  /// Not inside a git repository
  RepoNotFound { path: PathBuf },

  /// A git query failed or git itself is unavailable
  CommandFailed { command: String, stderr: String },
}

impl fmt::Display for MetadataError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MetadataError::RepoNotFound { path } => {
        write!(f, "Not a git repository: {}", path.display())
      }
      MetadataError::CommandFailed { command, stderr } => {
        write!(f, "Repository state unreadable: {} failed\n{}", command, stderr.trim())
      }
    }
  }
}

/// Compiler failure for one matrix job
#[derive(Debug)]
pub struct BuildError {
  pub target: Platform,
  pub status: i32,
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Compile failed for {} (exit status {})", self.target, self.status)
  }
}

/// Aggregate upload failure, listing every file whose upload failed
#[derive(Debug)]
pub struct PushError {
  pub failed: Vec<PathBuf>,
}

impl fmt::Display for PushError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{} upload(s) failed:", self.failed.len())?;
    for path in &self.failed {
      writeln!(f, "  {}", path.display())?;
    }
    Ok(())
  }
}

/// Registry pointer write failure
#[derive(Debug)]
pub struct RegistryError {
  pub uri: String,
  pub reason: String,
}

impl fmt::Display for RegistryError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Registry update failed for {}: {}", self.uri, self.reason)
  }
}

/// Delegated tool exited non-zero
#[derive(Debug)]
pub struct ToolError {
  pub program: String,
  pub status: i32,
}

impl fmt::Display for ToolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} exited with status {}", self.program, self.status)
  }
}

/// Result type alias for crane
pub type CraneResult<T> = Result<T, CraneError>;

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &CraneError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
