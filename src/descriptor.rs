use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, RollbackError};
use crate::types::{RunMode, SnapshotId};

pub const INFO_XML: &str = "info.xml";

/// Timestamp format used inside info.xml; UTC without a timezone suffix.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Format for the human-readable description, rendered in local time.
const LOCAL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// The snapper info.xml record. Field names match the on-disk element names;
/// real snapper files carry extra elements, which are ignored on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    pub num: String,
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cleanup: String,
}

impl SnapshotDescriptor {
    /// Record for the pre-rollback snapshot of the current root. `num` must
    /// match the directory the record is stored under.
    pub fn for_rollback(
        num: SnapshotId,
        source: SnapshotId,
        source_date: DateTime<Local>,
        now: DateTime<Utc>,
    ) -> Self {
        SnapshotDescriptor {
            kind: "single".to_string(),
            num: num.to_string(),
            date: now.format(DATE_FORMAT).to_string(),
            description: format!(
                "snapper-rollback: Rollback to snapshot #{} (snapshot creation date: {})",
                source,
                source_date.format(LOCAL_DATE_FORMAT)
            ),
            cleanup: "number".to_string(),
        }
    }

    pub fn creation_time(&self) -> std::result::Result<DateTime<Utc>, String> {
        NaiveDateTime::parse_from_str(&self.date, DATE_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(|e| format!("bad date {:?}: {}", self.date, e))
    }
}

pub fn read_descriptor(path: &Path) -> Result<SnapshotDescriptor> {
    let contents = fs::read_to_string(path).map_err(|e| RollbackError::Descriptor {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    quick_xml::de::from_str(&contents).map_err(|e| RollbackError::Descriptor {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

pub fn write_descriptor(
    path: &Path,
    descriptor: &SnapshotDescriptor,
    run_mode: RunMode,
) -> Result<()> {
    if run_mode.dry_run {
        info!("writing info.xml to {}", path.display());
        return Ok(());
    }
    let xml = encode(descriptor).map_err(|reason| RollbackError::Descriptor {
        path: path.to_path_buf(),
        reason,
    })?;
    fs::write(path, xml).map_err(|e| RollbackError::Descriptor {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn encode(descriptor: &SnapshotDescriptor) -> std::result::Result<String, String> {
    let mut body = String::new();
    let mut serializer = quick_xml::se::Serializer::with_root(&mut body, Some("snapshot"))
        .map_err(|e| e.to_string())?;
    serializer.indent(' ', 2);
    descriptor
        .serialize(serializer)
        .map_err(|e| e.to_string())?;
    Ok(format!("<?xml version=\"1.0\"?>\n{body}\n"))
}

/// Creation time of the rollback source, taken from its own descriptor and
/// converted to the local timezone for the new description. Missing or
/// unparseable source descriptors abort the whole operation before any
/// subvolume is touched.
pub fn source_creation_local(snapshots_dir: &Path, source: SnapshotId) -> Result<DateTime<Local>> {
    let path = snapshots_dir.join(source.to_string()).join(INFO_XML);
    let descriptor = read_descriptor(&path)?;
    let utc = descriptor
        .creation_time()
        .map_err(|reason| RollbackError::Descriptor { path, reason })?;
    Ok(utc.with_timezone(&Local))
}
