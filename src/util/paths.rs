use std::fs;
use std::path::{Component, Path};

use tracing::info;

use crate::error::{Result, RollbackError};
use crate::types::RunMode;

pub fn path_has_parent_dir(path: &Path) -> bool {
    path.components().any(|c| matches!(c, Component::ParentDir))
}

/// Recursively creates a directory if it does not exist yet. Idempotent;
/// in dry-run mode the mkdir is only printed.
pub fn ensure_dir(path: &Path, run_mode: RunMode) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    if run_mode.dry_run {
        info!("mkdir -p '{}'", path.display());
        return Ok(());
    }
    fs::create_dir_all(path)
        .map_err(|e| RollbackError::message(format!("create dir '{}': {}", path.display(), e)))
}

/// Directory entry names in the order the filesystem returns them. The order
/// is deliberately not sorted; the snapshot id allocator depends on it.
pub fn list_entries(path: &Path) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(path)
        .map_err(|e| RollbackError::message(format!("read {}: {}", path.display(), e)))?
    {
        let entry =
            entry.map_err(|e| RollbackError::message(format!("read {}: {}", path.display(), e)))?;
        out.push(entry.file_name().to_string_lossy().to_string());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn ensure_dir_is_idempotent() {
        let dir = TempDir::new().expect("tempdir");
        let target = dir.path().join("a/b/c");
        let run_mode = RunMode::default();
        ensure_dir(&target, run_mode).expect("first");
        ensure_dir(&target, run_mode).expect("second");
        assert!(target.is_dir());
    }

    #[test]
    fn ensure_dir_dry_run_creates_nothing() {
        let dir = TempDir::new().expect("tempdir");
        let target = dir.path().join("missing");
        let run_mode = RunMode {
            dry_run: true,
            ..Default::default()
        };
        ensure_dir(&target, run_mode).expect("dry run");
        assert!(!target.exists());
    }

    #[test]
    fn list_entries_returns_names() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::create_dir(dir.path().join("3")).expect("mkdir");
        std::fs::create_dir(dir.path().join("7")).expect("mkdir");
        let mut names = list_entries(dir.path()).expect("list");
        names.sort();
        assert_eq!(names, vec!["3".to_string(), "7".to_string()]);
    }
}
