use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::config::model::{is_relative_subvol, Config};
use crate::error::{ConfigError, Result, RollbackError};
use crate::util::paths::path_has_parent_dir;

pub fn load_config(path: &Path) -> Result<Config> {
    let mut contents = String::new();
    File::open(path)
        .map_err(RollbackError::Io)?
        .read_to_string(&mut contents)
        .map_err(RollbackError::Io)?;
    let cfg: Config =
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&cfg)?;
    Ok(cfg)
}

fn validate(cfg: &Config) -> Result<()> {
    let root = &cfg.root;
    if !root.mountpoint.is_absolute() {
        return Err(ConfigError::Invalid("mountpoint must be an absolute path".to_string()).into());
    }
    if path_has_parent_dir(&root.mountpoint) {
        return Err(ConfigError::Invalid("mountpoint must not contain ..".to_string()).into());
    }
    for (key, subvol) in [
        ("subvol_main", &root.subvol_main),
        ("subvol_snapshots", &root.subvol_snapshots),
    ] {
        if !is_relative_subvol(subvol) {
            return Err(ConfigError::Invalid(format!(
                "{key} must be a non-empty path relative to the mountpoint"
            ))
            .into());
        }
        if path_has_parent_dir(subvol) {
            return Err(ConfigError::Invalid(format!("{key} must not contain ..")).into());
        }
    }
    if let Some(dev) = &root.dev {
        if !dev.is_absolute() {
            return Err(ConfigError::Invalid("dev must be an absolute path".to_string()).into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn write_config(yaml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("tempfile");
        file.write_all(yaml.as_bytes()).expect("write");
        file
    }

    #[test]
    fn load_full_config() {
        let file = write_config(
            r#"
root:
  mountpoint: /btrfsroot
  subvol_main: "@"
  subvol_snapshots: "@snapshots"
  dev: /dev/sda2
"#,
        );
        let cfg = load_config(file.path()).expect("load");
        assert_eq!(cfg.root.mountpoint, PathBuf::from("/btrfsroot"));
        assert_eq!(cfg.root.subvol_main_path(), PathBuf::from("/btrfsroot/@"));
        assert_eq!(
            cfg.root.snapshots_path(),
            PathBuf::from("/btrfsroot/@snapshots")
        );
        assert_eq!(cfg.root.dev, Some(PathBuf::from("/dev/sda2")));
    }

    #[test]
    fn dev_is_optional() {
        let file = write_config(
            r#"
root:
  mountpoint: /btrfsroot
  subvol_main: "@"
  subvol_snapshots: "@snapshots"
"#,
        );
        let cfg = load_config(file.path()).expect("load");
        assert!(cfg.root.dev.is_none());
        assert_eq!(cfg.root.dev_label(), "the root device");
    }

    #[test]
    fn rejects_relative_mountpoint() {
        let file = write_config(
            r#"
root:
  mountpoint: btrfsroot
  subvol_main: "@"
  subvol_snapshots: "@snapshots"
"#,
        );
        let err = load_config(file.path()).expect_err("must fail");
        assert!(matches!(err, RollbackError::Config(_)));
    }

    #[test]
    fn rejects_absolute_subvol() {
        let file = write_config(
            r#"
root:
  mountpoint: /btrfsroot
  subvol_main: "/@"
  subvol_snapshots: "@snapshots"
"#,
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn rejects_missing_section() {
        let file = write_config("other: {}\n");
        let err = load_config(file.path()).expect_err("must fail");
        assert!(matches!(err, RollbackError::Config(ConfigError::Parse(_))));
    }
}
