//! Lock data manager: the registry plus its persistence.
//!
//! Every mutating call updates the in-memory [`LockRegistry`] and then
//! rewrites the affected owners' files before returning. A failed write is
//! logged and the in-memory change is kept; the next successful save of that
//! owner brings the file back in line.
//!
//! The manager is single-writer: mutations take `&mut self`. Hosts that
//! dispatch from more than one thread share it as a [`SharedManager`].


use crate::error::Result;
use crate::locks::{LockRecord, LockRegistry};
use crate::position::BlockPosition;
use crate::store::LockStore;
use crate::world::{Clock, NameResolver, NoNames, SystemClock, WorldDirectory};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// A manager shared between the event loop and scheduled jobs.
pub type SharedManager = Arc<Mutex<LockDataManager>>;

/// Host services the manager depends on.
pub struct Collaborators {
    pub worlds: Box<dyn WorldDirectory + Send>,
    pub names: Box<dyn NameResolver + Send>,
    pub clock: Box<dyn Clock + Send>,
}

impl Collaborators {
    /// Collaborators with no name resolution and the system clock.
    pub fn new(worlds: impl WorldDirectory + Send + 'static) -> Self {
        Self {
            worlds: Box::new(worlds),
            names: Box::new(NoNames),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_names(mut self, names: impl NameResolver + Send + 'static) -> Self {
        self.names = Box::new(names);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }
}

/// Counts from a full reload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReloadSummary {
    pub owners: usize,
    pub records: usize,
    /// Entries dropped for a malformed key or an unknown world.
    pub dropped_entries: usize,
    /// Owner files that could not be read at all.
    pub skipped_files: usize,
}

pub struct LockDataManager {
    registry: LockRegistry,
    store: LockStore,
    collaborators: Collaborators,
    /// Display names last read from owner files, used when the resolver
    /// has nothing better.
    name_hints: HashMap<Uuid, String>,
}

impl LockDataManager {
    /// Open the registry stored in `data_dir`.
    ///
    /// Creates the directory if needed, loads every owner file, then
    /// rewrites all of them so dropped entries and refreshed names are
    /// reflected on disk. Owner files that cannot be rewritten are logged
    /// and left as they were; the loaded registry is still returned.
    pub fn open(data_dir: impl Into<PathBuf>, collaborators: Collaborators) -> Result<Self> {
        let store = LockStore::new(data_dir);
        store.ensure_dir()?;

        let mut manager = Self::with_store(store, collaborators);
        manager.reload()?;
        if let Err(e) = manager.save_all() {
            error!(error = %e, "lock data not normalized on open");
        }
        Ok(manager)
    }

    /// Load the registry stored in `data_dir` without writing anything.
    ///
    /// Entries dropped while loading stay in their files. A missing
    /// directory loads as empty.
    pub fn load(data_dir: impl Into<PathBuf>, collaborators: Collaborators) -> Result<Self> {
        let mut manager = Self::with_store(LockStore::new(data_dir), collaborators);
        manager.reload()?;
        Ok(manager)
    }

    fn with_store(store: LockStore, collaborators: Collaborators) -> Self {
        Self {
            registry: LockRegistry::new(),
            store,
            collaborators,
            name_hints: HashMap::new(),
        }
    }

    /// Wrap the manager for sharing across threads.
    pub fn into_shared(self) -> SharedManager {
        Arc::new(Mutex::new(self))
    }

    /// Discard in-memory state and rebuild it from the owner files.
    pub fn reload(&mut self) -> Result<ReloadSummary> {
        let owners = self.store.owner_ids()?;

        self.registry.clear();
        self.name_hints.clear();

        let mut summary = ReloadSummary::default();
        for owner in owners {
            let load = match self.store.load_owner(owner, self.collaborators.worlds.as_ref()) {
                Ok(load) => load,
                Err(e) => {
                    warn!(%owner, error = %e, "skipping unreadable owner file");
                    summary.skipped_files += 1;
                    continue;
                }
            };

            self.registry.register_owner(owner);
            if let Some(name) = load.name {
                self.name_hints.insert(owner, name);
            }
            summary.owners += 1;
            summary.dropped_entries += load.dropped;

            for record in load.records {
                if let Some(previous) =
                    self.registry
                        .add(record.owner, record.position, record.created_at)
                {
                    warn!(
                        position = %previous.position,
                        previous_owner = %previous.owner,
                        %owner,
                        "position claimed by two owner files, keeping the later one"
                    );
                }
            }
        }

        summary.records = self.registry.len();
        info!(
            owners = summary.owners,
            records = summary.records,
            dropped = summary.dropped_entries,
            skipped = summary.skipped_files,
            "lock data loaded"
        );
        Ok(summary)
    }

    /// Rewrite every known owner's file.
    ///
    /// Keeps going after a failure and returns the first error.
    pub fn save_all(&mut self) -> Result<()> {
        let mut owners = self.registry.owners();
        owners.sort();

        let mut first_error = None;
        for owner in owners {
            if let Err(e) = self.write_owner(owner) {
                error!(%owner, error = %e, "failed to save lock data");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn lookup(&self, position: &BlockPosition) -> Option<&LockRecord> {
        self.registry.lookup(position)
    }

    pub fn is_locked(&self, position: &BlockPosition) -> bool {
        self.registry.lookup(position).is_some()
    }

    /// Lock `position` for `owner`, stamped with the current time.
    ///
    /// A lock already held at the position is replaced and returned. A
    /// position that cannot be written as a key (empty world, coordinate
    /// beyond nine digits) is ignored.
    pub fn lock(&mut self, owner: Uuid, position: BlockPosition) -> Option<LockRecord> {
        if !position.is_storable() {
            debug!(%owner, %position, "ignoring lock request for unstorable position");
            return None;
        }

        let created_at = self.collaborators.clock.now_millis();
        let displaced = self.registry.add(owner, position, created_at);

        self.persist(owner);
        if let Some(previous) = &displaced
            && previous.owner != owner
        {
            self.persist(previous.owner);
        }
        displaced
    }

    /// Remove the lock at `position`. Returns the removed record, if any.
    pub fn unlock(&mut self, position: &BlockPosition) -> Option<LockRecord> {
        let removed = self.registry.remove(position)?;
        self.persist(removed.owner);
        Some(removed)
    }

    /// Remove `record` if it is still the lock at its position.
    pub fn unlock_record(&mut self, record: &LockRecord) -> Option<LockRecord> {
        let removed = self.registry.remove_record(record)?;
        self.persist(removed.owner);
        Some(removed)
    }

    pub fn count_for_owner(&self, owner: Uuid) -> usize {
        self.registry.count_for_owner(owner)
    }

    pub fn count_for_world(&self, world: &str) -> usize {
        self.registry.count_for_world(world)
    }

    /// Remove every lock in `world`, writing each affected owner once.
    pub fn evict_world(&mut self, world: &str) -> Vec<LockRecord> {
        let evicted = self.registry.evict_world(world);

        let affected: BTreeSet<Uuid> = evicted.iter().map(|r| r.owner).collect();
        for owner in affected {
            self.persist(owner);
        }

        if !evicted.is_empty() {
            info!(world, count = evicted.len(), "evicted world locks");
        }
        evicted
    }

    pub fn all_records(&self) -> Vec<LockRecord> {
        self.registry.all_records()
    }

    pub fn records_for_owner(&self, owner: Uuid) -> Vec<LockRecord> {
        self.registry.records_for_owner(owner).to_vec()
    }

    /// Read-only view of the registry.
    pub fn registry(&self) -> &LockRegistry {
        &self.registry
    }

    pub fn store(&self) -> &LockStore {
        &self.store
    }

    /// Best-known display name for an owner.
    pub fn display_name(&self, owner: Uuid) -> Option<String> {
        self.collaborators
            .names
            .display_name(owner)
            .or_else(|| self.name_hints.get(&owner).cloned())
    }

    fn persist(&mut self, owner: Uuid) {
        if let Err(e) = self.write_owner(owner) {
            error!(
                %owner,
                error = %e,
                "lock data not persisted; change is kept in memory until the next successful save"
            );
        }
    }

    fn write_owner(&mut self, owner: Uuid) -> Result<()> {
        let name = self.display_name(owner);
        if let Some(name) = &name {
            self.name_hints.insert(owner, name.clone());
        }

        self.store
            .save_owner(owner, name.as_deref(), self.registry.records_for_owner(owner))
    }
}

/// Lock the shared manager, recovering the data if a holder panicked.
///
/// The registry is left coherent after every completed call, so a poisoned
/// lock still guards usable state.
pub fn lock_shared(shared: &SharedManager) -> std::sync::MutexGuard<'_, LockDataManager> {
    shared.lock().unwrap_or_else(|poison| poison.into_inner())
}

impl std::fmt::Debug for LockDataManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockDataManager")
            .field("data_dir", &self.store.data_dir())
            .field("records", &self.registry.len())
            .finish()
    }
}
