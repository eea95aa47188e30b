use std::path::Path;
use std::process::Command;

use nix::mount::MsFlags;
use tracing::{debug, info};

use crate::error::{Result, RollbackError};
use crate::mount::inspect::mountpoint_is_mounted;
use crate::types::RunMode;
use crate::util::command::run_command;
use crate::util::paths::ensure_dir;

/// Mount option selecting the filesystem's top-level subvolume, independent
/// of whatever is currently set as the default subvolume. A stale default
/// left behind by a previous rollback must not change what we see.
const SUBVOLID5: &str = "subvolid=5";

/// Ensures the top-level view of the btrfs volume is mounted at `mountpoint`.
/// Idempotent: already-mounted is a no-op, the mountpoint directory is
/// created as needed. With a configured device the mount(2) syscall is used
/// directly; without one we go through the mount binary so fstab resolution
/// applies.
pub fn ensure_mounted(mountpoint: &Path, dev: Option<&Path>, run_mode: RunMode) -> Result<()> {
    ensure_dir(mountpoint, run_mode).map_err(|e| RollbackError::Mount {
        mountpoint: mountpoint.to_path_buf(),
        reason: e.to_string(),
    })?;
    if mountpoint_is_mounted(mountpoint)? {
        debug!("{} already mounted", mountpoint.display());
        return Ok(());
    }

    if run_mode.dry_run {
        let source = dev.map(|d| d.display().to_string()).unwrap_or_default();
        info!("mount -o {} {} {}", SUBVOLID5, source, mountpoint.display());
        return Ok(());
    }

    match dev {
        Some(dev) => {
            nix::mount::mount(
                Some(dev),
                mountpoint,
                Some("btrfs"),
                MsFlags::empty(),
                Some(SUBVOLID5),
            )
            .map_err(|errno| RollbackError::Mount {
                mountpoint: mountpoint.to_path_buf(),
                reason: format!("mount {}: {}", dev.display(), errno),
            })?;
        }
        None => {
            let mut cmd = Command::new("mount");
            cmd.arg("-o").arg(SUBVOLID5).arg(mountpoint);
            let rc = run_command(&mut cmd, run_mode)?;
            if rc != 0 {
                return Err(RollbackError::Mount {
                    mountpoint: mountpoint.to_path_buf(),
                    reason: format!("mount exited with code {}", rc),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn dry_run_never_mounts() {
        let dir = TempDir::new().expect("tempdir");
        let target = dir.path().join("btrfsroot");
        let run_mode = RunMode {
            dry_run: true,
            ..Default::default()
        };
        ensure_mounted(&target, Some(Path::new("/dev/sda2")), run_mode).expect("dry run");
        ensure_mounted(&target, Some(Path::new("/dev/sda2")), run_mode).expect("dry run again");
        assert!(!target.exists());
    }

    #[test]
    fn already_mounted_is_a_no_op() {
        // "/" is always a mountpoint, so this returns without mounting,
        // dry-run or not, and a second call changes nothing either.
        ensure_mounted(Path::new("/"), None, RunMode::default()).expect("first");
        ensure_mounted(Path::new("/"), None, RunMode::default()).expect("second");
    }

    #[test]
    fn unmountable_mountpoint_dir_is_a_mount_error() {
        let dir = TempDir::new().expect("tempdir");
        let file = dir.path().join("occupied");
        std::fs::write(&file, "not a directory").expect("write");
        // mkdir under a regular file fails; the whole precondition is a
        // mount failure, not a generic error.
        let err = ensure_mounted(&file.join("mnt"), None, RunMode::default())
            .expect_err("must fail");
        assert!(matches!(err, RollbackError::Mount { .. }), "got: {err:?}");
    }

    #[test]
    fn mount_failure_is_reported() {
        let dir = TempDir::new().expect("tempdir");
        // /dev/null is not a btrfs volume; the syscall must fail cleanly.
        let err = ensure_mounted(dir.path(), Some(Path::new("/dev/null")), RunMode::default())
            .expect_err("must fail");
        assert!(matches!(err, RollbackError::Mount { .. }));
    }
}
