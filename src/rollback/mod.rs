//! The rollback state machine.
//!
//! The repositioning sequence touches non-transactional filesystem
//! primitives (rename, snapshot, set-default), so the ordering is what keeps
//! the volume recoverable: the main subvolume is renamed aside first, and
//! the only data-destroying outcome would be losing that rename. Everything
//! before it is read-only or creates ignorable garbage; everything after it
//! is undone by a single compensating rename.

use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::Utc;
use tracing::{error, info};

use crate::btrfs::SubvolumeOps;
use crate::config::RootConfig;
use crate::descriptor::{self, SnapshotDescriptor};
use crate::error::{Result, RollbackError};
use crate::mount;
use crate::snapshots;
use crate::types::{RunMode, SnapshotId};
use crate::util::paths::{ensure_dir, list_entries};

#[derive(Debug, Clone)]
pub struct RollbackPlan {
    pub mountpoint: PathBuf,
    pub subvol_main: PathBuf,
    pub snapshots_dir: PathBuf,
    pub source: SnapshotId,
    pub dev: Option<PathBuf>,
    dev_label: String,
}

impl RollbackPlan {
    pub fn from_config(root: &RootConfig, source: SnapshotId) -> Self {
        RollbackPlan {
            mountpoint: root.mountpoint.clone(),
            subvol_main: root.subvol_main_path(),
            snapshots_dir: root.snapshots_path(),
            source,
            dev: root.dev.clone(),
            dev_label: root.dev_label(),
        }
    }

    pub fn rollback_source(&self) -> PathBuf {
        snapshots::snapshot_subvol(&self.snapshots_dir, self.source)
    }
}

/// Phases of a rollback run. Each arm of the loop in [`execute`] performs
/// exactly one transition; any error aborts the run with the filesystem in
/// the state the phase documentation promises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Nothing done yet; nothing mutated on failure.
    Init,
    /// Volume mounted at the mountpoint; still nothing mutated.
    VolumeReady,
    /// New number allocated and its directory created. Failure past this
    /// point can leave the empty numbered directory behind, which snapper
    /// ignores.
    IdAllocated(SnapshotId),
    /// info.xml persisted; no subvolume touched yet.
    DescriptorWritten(SnapshotId),
    /// All three repositioning steps succeeded.
    Committed(SnapshotId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub new_id: SnapshotId,
}

pub fn execute(
    plan: &RollbackPlan,
    subvol: &dyn SubvolumeOps,
    run_mode: RunMode,
) -> Result<Outcome> {
    let mut phase = Phase::Init;
    loop {
        phase = match phase {
            Phase::Init => {
                mount::ensure_mounted(&plan.mountpoint, plan.dev.as_deref(), run_mode)?;
                Phase::VolumeReady
            }
            Phase::VolumeReady => {
                let entries = list_entries(&plan.snapshots_dir)?;
                let new_id = snapshots::next_snapshot_id(&entries);
                ensure_dir(&snapshots::snapshot_dir(&plan.snapshots_dir, new_id), run_mode)?;
                Phase::IdAllocated(new_id)
            }
            Phase::IdAllocated(new_id) => {
                let source_date = descriptor::source_creation_local(&plan.snapshots_dir, plan.source)?;
                let record =
                    SnapshotDescriptor::for_rollback(new_id, plan.source, source_date, Utc::now());
                descriptor::write_descriptor(
                    &snapshots::descriptor_path(&plan.snapshots_dir, new_id),
                    &record,
                    run_mode,
                )?;
                Phase::DescriptorWritten(new_id)
            }
            Phase::DescriptorWritten(new_id) => {
                reposition(plan, new_id, subvol, run_mode)?;
                Phase::Committed(new_id)
            }
            Phase::Committed(new_id) => {
                info!(
                    "{}rollback to {} complete, reboot to finish",
                    if run_mode.dry_run { "[dry-run] " } else { "" },
                    plan.rollback_source().display()
                );
                return Ok(Outcome { new_id });
            }
        };
    }
}

/// The three-step repositioning: vacate main, snapshot the source into its
/// place, mark it default. The rename must come first since two subvolumes
/// cannot share a path; it also guarantees the original root survives any
/// later failure, merely relocated.
fn reposition(
    plan: &RollbackPlan,
    new_id: SnapshotId,
    subvol: &dyn SubvolumeOps,
    run_mode: RunMode,
) -> Result<()> {
    let main = &plan.subvol_main;
    let target = snapshots::snapshot_subvol(&plan.snapshots_dir, new_id);
    let source = plan.rollback_source();

    if run_mode.dry_run {
        info!("mv {} {}", main.display(), target.display());
    } else {
        // NotFound is ambiguous: the main subvolume may be absent, or the
        // target's numbered directory may be missing. Only the former is the
        // misconfiguration case with the subvolid=5 hint.
        fs::rename(main, &target).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound && !main.exists() {
                RollbackError::SubvolumeMissing {
                    main: main.clone(),
                    dev: plan.dev_label.clone(),
                }
            } else {
                RollbackError::Io(err)
            }
        })?;
    }

    let outcome = subvol
        .create_snapshot(&source, main)
        .map_err(|e| ("snapshot", e))
        .and_then(|()| subvol.set_default(main).map_err(|e| ("set-default", e)));

    if let Err((step, err)) = outcome {
        // Main was vacated by the rename but never repopulated; put the
        // original root back. This is the single compensating action.
        if !main.is_dir() {
            info!("moving {} back to {}", target.display(), main.display());
            if let Err(undo) = fs::rename(&target, main) {
                error!(
                    "compensating rename failed: {}; original root left at {}",
                    undo,
                    target.display()
                );
            }
        }
        return Err(RollbackError::Repositioning {
            step,
            reason: err.to_string(),
        });
    }
    Ok(())
}
