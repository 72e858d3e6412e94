//! Durable per-owner storage.
//!
//! Each owner's locks live in `<data_dir>/<uuid>.yml`. Files are only
//! replaced through [`crate::fs::atomic_write`]; an owner with no locks keeps
//! an empty file rather than having it deleted.

mod codec;

pub use codec::{NAME_KEY, OwnerLoad, decode_owner_file, encode_owner_file};

use crate::error::{Result, StandLockError};
use crate::fs::atomic_write_file;
use crate::locks::LockRecord;
use crate::world::WorldDirectory;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use uuid::Uuid;

/// Extension of owner files.
pub const OWNER_FILE_EXT: &str = "yml";

/// Lowercase hyphenated UUID, the only accepted owner file stem.
static OWNER_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("owner id pattern is valid")
});

/// Directory of owner files.
#[derive(Debug, Clone)]
pub struct LockStore {
    data_dir: PathBuf,
}

impl LockStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Create the data directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StandLockError::persistence(&self.data_dir, e))
    }

    pub fn owner_path(&self, owner: Uuid) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", owner.hyphenated(), OWNER_FILE_EXT))
    }

    /// Owners that have a file in the data directory, sorted.
    ///
    /// Files that are not `.yml` or whose stem is not a canonical UUID are
    /// ignored.
    pub fn owner_ids(&self) -> Result<Vec<Uuid>> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StandLockError::persistence(&self.data_dir, e)),
        };

        let mut owners = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StandLockError::persistence(&self.data_dir, e))?;
            let path = entry.path();

            if path.extension().and_then(|e| e.to_str()) != Some(OWNER_FILE_EXT) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if !OWNER_ID_RE.is_match(stem) {
                continue;
            }
            if let Ok(owner) = Uuid::parse_str(stem) {
                owners.push(owner);
            }
        }

        owners.sort();
        Ok(owners)
    }

    /// Read one owner's file. A missing file means no locks.
    pub fn load_owner(&self, owner: Uuid, worlds: &dyn WorldDirectory) -> Result<OwnerLoad> {
        let path = self.owner_path(owner);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(OwnerLoad::default()),
            Err(e) => return Err(StandLockError::persistence(&path, e)),
        };

        decode_owner_file(owner, &content, worlds)
            .map_err(|reason| StandLockError::Corrupt { path, reason })
    }

    /// Replace one owner's file with the given records.
    pub fn save_owner(
        &self,
        owner: Uuid,
        name: Option<&str>,
        records: &[LockRecord],
    ) -> Result<()> {
        let path = self.owner_path(owner);
        let content = encode_owner_file(name, records).map_err(|e| StandLockError::Corrupt {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        atomic_write_file(&path, &content)
    }
}
