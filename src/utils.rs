//! Utility functions for cross-platform path handling

use std::path::Path;

/// Convert a relative path to object-key format (always forward slashes)
///
/// Storage keys use forward slashes even when the local path came from
/// Windows. On Unix this is a no-op.
pub fn path_to_key_format(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}
