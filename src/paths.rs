use std::path::PathBuf;

use directories::ProjectDirs;

/// Returns the root RouteWise directory path.
///
/// Resolution order:
/// 1. `ROUTEWISE_ROOT` environment variable (if set and non-empty)
/// 2. The platform data directory (e.g. `~/.local/share/routewise`)
/// 3. `.routewise` in the current working directory
pub fn routewise_root() -> PathBuf {
    if let Ok(root) = std::env::var("ROUTEWISE_ROOT")
        && !root.is_empty()
    {
        return PathBuf::from(root);
    }

    ProjectDirs::from("", "", "routewise")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".routewise"))
}

/// Returns the directory holding persisted key-value entries.
pub fn storage_dir() -> PathBuf {
    routewise_root().join("storage")
}
