//! Scoped file backup
//!
//! A session handle owns a byte-identical snapshot of the project file taken
//! before any mutation. The backup is a recovery artifact whose lifetime
//! outlives the session: commit retains it, and the editor never deletes it.
//! Suffixes are numbered so a later session cannot destroy an earlier
//! recovery point.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SessionError;

/// Handle over one session's backup
#[derive(Debug)]
pub struct SessionHandle {
    original: PathBuf,
    backup: PathBuf,
}

impl SessionHandle {
    /// Path being edited
    #[inline]
    #[must_use]
    pub fn original_path(&self) -> &Path {
        &self.original
    }

    /// Path of the backup artifact
    #[inline]
    #[must_use]
    pub fn backup_path(&self) -> &Path {
        &self.backup
    }
}

/// Copy the file at `path` to a fresh sibling backup and return the handle
///
/// # Errors
/// Returns [`SessionError::NotFound`] if `path` does not exist, or
/// [`SessionError::Io`] if the copy fails
pub fn begin_session(path: &Path) -> Result<SessionHandle, SessionError> {
    if !path.is_file() {
        return Err(SessionError::NotFound(path.to_path_buf()));
    }
    let backup = next_backup_path(path);
    fs::copy(path, &backup)?;
    tracing::info!(backup = %backup.display(), "created backup");
    Ok(SessionHandle {
        original: path.to_path_buf(),
        backup,
    })
}

/// Conclude the session, retaining the backup artifact
///
/// Returns the backup path for the session report.
#[must_use]
pub fn commit(handle: SessionHandle) -> PathBuf {
    handle.backup
}

/// Overwrite the original path with the backup's bytes
///
/// # Errors
/// Returns [`SessionError::Io`] if the restore copy fails
pub fn rollback(handle: &SessionHandle) -> Result<(), SessionError> {
    fs::copy(&handle.backup, &handle.original)?;
    tracing::warn!(
        original = %handle.original.display(),
        backup = %handle.backup.display(),
        "restored original from backup"
    );
    Ok(())
}

// `<path>.backup`, then `.backup-1`, `-2`, ...: first free suffix.
fn next_backup_path(path: &Path) -> PathBuf {
    let base = format!("{}.backup", path.display());
    let mut candidate = PathBuf::from(&base);
    let mut n = 0u32;
    while candidate.exists() {
        n += 1;
        candidate = PathBuf::from(format!("{base}-{n}"));
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_session_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("project.pbxproj");
        let result = begin_session(&missing);
        assert!(matches!(result, Err(SessionError::NotFound(_))));
    }

    #[test]
    fn backup_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.pbxproj");
        fs::write(&path, "original bytes").unwrap();

        let handle = begin_session(&path).unwrap();
        assert_eq!(fs::read(handle.backup_path()).unwrap(), b"original bytes");
    }

    #[test]
    fn rollback_restores_original_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.pbxproj");
        fs::write(&path, "original bytes").unwrap();

        let handle = begin_session(&path).unwrap();
        fs::write(&path, "clobbered").unwrap();
        rollback(&handle).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"original bytes");
    }

    #[test]
    fn successive_sessions_keep_distinct_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.pbxproj");
        fs::write(&path, "first").unwrap();

        let first = begin_session(&path).unwrap();
        let first_backup = commit(first);

        fs::write(&path, "second").unwrap();
        let second = begin_session(&path).unwrap();
        let second_backup = commit(second);

        assert_ne!(first_backup, second_backup);
        assert_eq!(fs::read(&first_backup).unwrap(), b"first");
        assert_eq!(fs::read(&second_backup).unwrap(), b"second");
    }
}
