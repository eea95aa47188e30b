use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub root: RootConfig,
}

/// The `root` section of /etc/snapper-rollback.yaml.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RootConfig {
    /// Where the top-level subvolume (subvolid=5) gets mounted.
    pub mountpoint: PathBuf,
    /// Active root subvolume, relative to the mountpoint (usually "@").
    pub subvol_main: PathBuf,
    /// Snapshots subvolume, relative to the mountpoint (usually "@snapshots").
    pub subvol_snapshots: PathBuf,
    /// Block device to mount; when absent, fstab resolution is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev: Option<PathBuf>,
}

impl RootConfig {
    pub fn subvol_main_path(&self) -> PathBuf {
        self.mountpoint.join(&self.subvol_main)
    }

    pub fn snapshots_path(&self) -> PathBuf {
        self.mountpoint.join(&self.subvol_snapshots)
    }

    pub fn dev_label(&self) -> String {
        match &self.dev {
            Some(dev) => dev.display().to_string(),
            None => "the root device".to_string(),
        }
    }
}

impl Config {
    pub fn root_section(&self) -> &RootConfig {
        &self.root
    }
}

pub(crate) fn is_relative_subvol(path: &Path) -> bool {
    !path.as_os_str().is_empty() && path.is_relative()
}
