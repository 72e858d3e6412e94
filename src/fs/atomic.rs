//! Durable write-then-replace for owner files.
//!
//! Every write follows the same pattern:
//! 1. Write the content to `.{filename}.tmp` in the target's directory
//! 2. fsync the temporary file
//! 3. Rename it over the target (atomic on the same filesystem)
//! 4. fsync the directory so the new entry survives a crash
//!
//! A failure in steps 1-3 removes the temporary file and leaves the previous
//! target untouched. `std::fs::rename` replaces an existing destination on
//! both POSIX and Windows, so no platform branch is needed.

use crate::error::{Result, StandLockError};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically replace `path` with `content`.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| StandLockError::persistence(parent, e))?;
    }

    let temp_path = temp_path_for(path)?;
    write_and_sync(&temp_path, content)?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(StandLockError::persistence(path, e));
    }

    sync_parent(path);
    Ok(())
}

/// Atomically replace `path` with a UTF-8 string.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
        StandLockError::UserError(format!("invalid file path '{}'", target.display()))
    })?;

    Ok(parent.join(format!(".{}.tmp", filename)))
}

fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| StandLockError::persistence(path, e))?;

    let written = file.write_all(content).and_then(|()| file.sync_all());
    if let Err(e) = written {
        drop(file);
        let _ = fs::remove_file(path);
        return Err(StandLockError::persistence(path, e));
    }

    Ok(())
}

#[cfg(unix)]
fn sync_parent(target: &Path) {
    if let Some(parent) = target.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }
}

// Directories cannot be opened for syncing on Windows.
#[cfg(not(unix))]
fn sync_parent(_target: &Path) {}
