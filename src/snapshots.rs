use std::path::{Path, PathBuf};

use tracing::warn;

use crate::descriptor::INFO_XML;
use crate::types::SnapshotId;

pub fn snapshot_dir(snapshots_dir: &Path, id: SnapshotId) -> PathBuf {
    snapshots_dir.join(id.to_string())
}

/// Path of the subvolume nested inside a numbered snapshot directory.
pub fn snapshot_subvol(snapshots_dir: &Path, id: SnapshotId) -> PathBuf {
    snapshot_dir(snapshots_dir, id).join("snapshot")
}

pub fn descriptor_path(snapshots_dir: &Path, id: SnapshotId) -> PathBuf {
    snapshot_dir(snapshots_dir, id).join(INFO_XML)
}

/// Next free snapshot number, derived from the raw directory listing.
///
/// Scans from the end of the listing backward and returns value+1 of the
/// first name that parses as an integer; names that do not parse are
/// skipped. This is a heuristic carried over from the original tool, not a
/// full-scan maximum: with an unsorted listing a non-numeric or smaller
/// entry after the true maximum can win. Directory listings on btrfs come
/// back in insertion order, which makes the trailing entry the newest
/// snapshot in practice.
pub fn next_snapshot_id(entries: &[String]) -> SnapshotId {
    for name in entries.iter().rev() {
        // An entry named u64::MAX has no successor; skip it like any other
        // unusable name.
        if let Some(next) = name.parse::<u64>().ok().and_then(|v| v.checked_add(1)) {
            return SnapshotId::new(next);
        }
    }
    warn!("no numbered snapshot found, using 1 as the snapshot number");
    SnapshotId::new(1)
}
