use std::fs;
use std::path::Path;

use crate::error::{Result, RollbackError};

fn read_mounts() -> Result<String> {
    fs::read_to_string("/proc/self/mounts")
        .map_err(|e| RollbackError::message(format!("read /proc/self/mounts: {}", e)))
}

pub fn mountpoint_is_mounted(mountpoint: &Path) -> Result<bool> {
    Ok(contains_mountpoint(&read_mounts()?, mountpoint))
}

fn contains_mountpoint(contents: &str, mountpoint: &Path) -> bool {
    for line in contents.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 {
            continue;
        }
        if Path::new(fields[1]) == mountpoint {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOUNTS: &str = "\
/dev/sda2 / btrfs rw,relatime,subvolid=256,subvol=/@ 0 0
/dev/sda2 /btrfsroot btrfs rw,relatime,subvolid=5,subvol=/ 0 0
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0
";

    #[test]
    fn finds_mounted_path() {
        assert!(contains_mountpoint(MOUNTS, Path::new("/btrfsroot")));
        assert!(contains_mountpoint(MOUNTS, Path::new("/")));
    }

    #[test]
    fn rejects_unmounted_path() {
        assert!(!contains_mountpoint(MOUNTS, Path::new("/mnt")));
        assert!(!contains_mountpoint(MOUNTS, Path::new("/btrfs")));
    }

    #[test]
    fn tolerates_short_lines() {
        assert!(!contains_mountpoint("garbage\n", Path::new("/mnt")));
    }
}
