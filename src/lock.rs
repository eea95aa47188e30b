use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::error::{Result, RollbackError};
use crate::types::RunMode;

const LOCK_FILE: &str = "/run/snapper-rollback.pid";

/// Releases the pidfile when dropped.
pub struct LockGuard;

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = unlock();
    }
}

/// Advisory single-invocation lock. Two rollbacks repositioning the same
/// volume at once would corrupt the layout, so a second invocation fails
/// with AlreadyRunning. Dry runs mutate nothing and skip the lock.
pub fn acquire(run_mode: RunMode) -> Result<Option<LockGuard>> {
    if run_mode.dry_run {
        return Ok(None);
    }
    match lock() {
        Ok(true) => Ok(Some(LockGuard)),
        Ok(false) => Err(RollbackError::AlreadyRunning),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => Err(RollbackError::Io(e)),
        Err(e) => Err(RollbackError::message(format!(
            "failed to lock {}: {}",
            LOCK_FILE, e
        ))),
    }
}

fn lock() -> io::Result<bool> {
    for _ in 0..3 {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(LOCK_FILE)
        {
            Ok(mut f) => {
                writeln!(f, "{}", std::process::id())?;
                return Ok(true);
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                let pid = match fs::read_to_string(LOCK_FILE) {
                    Ok(text) => text.trim().parse::<u32>().ok(),
                    Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                    Err(err) => return Err(err),
                };
                if let Some(pid) = pid {
                    if Path::new("/proc").join(pid.to_string()).exists() {
                        return Ok(false);
                    }
                }
                // Stale pidfile from a dead process.
                match fs::remove_file(LOCK_FILE) {
                    Ok(()) => continue,
                    Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                    Err(err) => return Err(err),
                }
            }
            Err(err) => return Err(err),
        }
    }
    Ok(false)
}

fn unlock() -> io::Result<()> {
    if let Ok(pid) = fs::read_to_string(LOCK_FILE) {
        if pid.trim() == std::process::id().to_string() {
            let _ = fs::remove_file(LOCK_FILE);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_skips_the_lock() {
        let run_mode = RunMode {
            dry_run: true,
            ..Default::default()
        };
        assert!(acquire(run_mode).expect("dry run").is_none());
    }
}
