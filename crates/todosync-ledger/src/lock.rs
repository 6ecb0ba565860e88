//! Single-run guard for a ledger path
//!
//! Two runs against the same ledger race on the document and can create
//! duplicate remote items. [`LedgerLock`] claims `<ledger>.lock` with an
//! exclusive create and releases it on drop.
//!
//! A run that dies without unwinding leaves the lock behind. A lock whose
//! owning pid is gone, whose content is unreadable, or that is older than
//! [`STALE_LOCK_AGE`] is taken over with a warning.

use crate::error::{LedgerError, LedgerResult};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Age after which a lock is considered abandoned regardless of its pid
pub const STALE_LOCK_AGE: Duration = Duration::from_secs(60 * 60);

/// Held for the duration of a run
#[derive(Debug)]
pub struct LedgerLock {
    lock_path: PathBuf,
}

impl LedgerLock {
    /// Claim the lock next to `ledger_path`
    ///
    /// # Errors
    /// - [`LedgerError::Locked`] if another run holds the lock
    /// - [`LedgerError::Lock`] if the lock file cannot be created
    pub fn acquire(ledger_path: &Path) -> LedgerResult<Self> {
        let lock_path = lock_path_for(ledger_path);
        let mut file = match create_exclusive(&lock_path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let owner = read_owner(&lock_path);
                if let Some(reason) = stale_reason(&lock_path, owner) {
                    tracing::warn!(
                        "Taking over stale ledger lock {} ({})",
                        lock_path.display(),
                        reason
                    );
                    match std::fs::remove_file(&lock_path) {
                        Ok(()) => {}
                        Err(e) if e.kind() == ErrorKind::NotFound => {}
                        Err(source) => return Err(LedgerError::Lock { lock_path, source }),
                    }
                    match create_exclusive(&lock_path) {
                        Ok(file) => file,
                        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                            let pid = read_owner(&lock_path);
                            return Err(LedgerError::Locked { lock_path, pid });
                        }
                        Err(source) => return Err(LedgerError::Lock { lock_path, source }),
                    }
                } else {
                    return Err(LedgerError::Locked {
                        lock_path,
                        pid: owner,
                    });
                }
            }
            Err(source) => return Err(LedgerError::Lock { lock_path, source }),
        };

        if let Err(e) = writeln!(file, "{}", std::process::id()) {
            tracing::warn!("Could not record pid in {}: {}", lock_path.display(), e);
        }
        tracing::debug!("Acquired ledger lock {}", lock_path.display());
        Ok(Self { lock_path })
    }

    /// Lock file path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for LedgerLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.lock_path) {
            tracing::warn!("Failed to release ledger lock {}: {}", self.lock_path.display(), e);
        }
    }
}

fn create_exclusive(lock_path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(lock_path)
}

/// Pid recorded in an existing lock file
fn read_owner(lock_path: &Path) -> Option<u32> {
    std::fs::read_to_string(lock_path)
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Why an existing lock may be taken over, if it may
fn stale_reason(lock_path: &Path, owner: Option<u32>) -> Option<String> {
    let Some(pid) = owner else {
        return Some("no readable owner pid".to_string());
    };
    if !pid_is_alive(pid) {
        return Some(format!("owner pid {pid} is not running"));
    }
    let age = std::fs::metadata(lock_path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| modified.elapsed().ok())?;
    (age > STALE_LOCK_AGE).then(|| format!("held by pid {pid} for {}s", age.as_secs()))
}

#[cfg(target_os = "linux")]
fn pid_is_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{pid}")).exists()
}

#[cfg(not(target_os = "linux"))]
fn pid_is_alive(_pid: u32) -> bool {
    true
}

/// `<ledger file name>.lock` in the ledger's directory
#[must_use]
pub fn lock_path_for(ledger_path: &Path) -> PathBuf {
    let mut name = ledger_path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".lock");
    ledger_path.with_file_name(name)
}
