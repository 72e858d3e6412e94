//! The in-memory lock index.
//!
//! Two maps describe the same set of records: one grouped by owner, one keyed
//! by canonical location. Both are private and every mutation goes through
//! the methods below, which update them together. The registry does no I/O;
//! [`crate::manager::LockDataManager`] persists whatever the registry reports
//! as changed.

use super::record::LockRecord;
use crate::position::BlockPosition;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Default, Clone)]
pub struct LockRegistry {
    by_owner: HashMap<Uuid, Vec<LockRecord>>,
    by_location: HashMap<String, LockRecord>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record and every known owner.
    pub fn clear(&mut self) {
        self.by_owner.clear();
        self.by_location.clear();
    }

    /// Make an owner known even if it holds no records, so it is included
    /// in [`LockRegistry::owners`] and gets its file rewritten on save-all.
    pub fn register_owner(&mut self, owner: Uuid) {
        self.by_owner.entry(owner).or_default();
    }

    pub fn lookup(&self, position: &BlockPosition) -> Option<&LockRecord> {
        self.by_location.get(&position.key())
    }

    /// Lock `position` for `owner`.
    ///
    /// An existing lock at the same position is removed first and returned.
    pub fn add(
        &mut self,
        owner: Uuid,
        position: BlockPosition,
        created_at: i64,
    ) -> Option<LockRecord> {
        let key = position.key();
        let displaced = self.remove_key(&key);

        let record = LockRecord::new(owner, position, created_at);
        self.by_owner.entry(owner).or_default().push(record.clone());
        self.by_location.insert(key, record);

        displaced
    }

    /// Remove the lock at `position`, if any.
    pub fn remove(&mut self, position: &BlockPosition) -> Option<LockRecord> {
        self.remove_key(&position.key())
    }

    /// Remove `record` if it is still the lock at its position.
    ///
    /// A record that has since been replaced by another owner's lock is left
    /// alone and `None` is returned.
    pub fn remove_record(&mut self, record: &LockRecord) -> Option<LockRecord> {
        let key = record.key();
        match self.by_location.get(&key) {
            Some(current) if current.owner == record.owner => self.remove_key(&key),
            _ => None,
        }
    }

    /// Remove the lock stored under a canonical key.
    ///
    /// The owner's collection is kept even when it becomes empty.
    fn remove_key(&mut self, key: &str) -> Option<LockRecord> {
        let record = self.by_location.remove(key)?;
        if let Some(records) = self.by_owner.get_mut(&record.owner) {
            records.retain(|r| r.position != record.position);
        }
        Some(record)
    }

    pub fn count_for_owner(&self, owner: Uuid) -> usize {
        self.by_owner.get(&owner).map_or(0, Vec::len)
    }

    /// Number of locks in `world`.
    ///
    /// Linear in the total number of locks.
    pub fn count_for_world(&self, world: &str) -> usize {
        self.by_location
            .values()
            .filter(|record| record.position.world == world)
            .count()
    }

    /// Remove every lock in `world` and return the removed records.
    pub fn evict_world(&mut self, world: &str) -> Vec<LockRecord> {
        let keys: Vec<String> = self
            .by_location
            .iter()
            .filter(|(_, record)| record.position.world == world)
            .map(|(key, _)| key.clone())
            .collect();

        keys.iter().filter_map(|key| self.remove_key(key)).collect()
    }

    /// Snapshot of every current lock.
    pub fn all_records(&self) -> Vec<LockRecord> {
        self.by_location.values().cloned().collect()
    }

    /// An owner's locks in the order they were added.
    pub fn records_for_owner(&self, owner: Uuid) -> &[LockRecord] {
        self.by_owner.get(&owner).map_or(&[], Vec::as_slice)
    }

    /// Snapshot of the locks in `world`.
    pub fn records_in_world(&self, world: &str) -> Vec<LockRecord> {
        self.by_location
            .values()
            .filter(|record| record.position.world == world)
            .cloned()
            .collect()
    }

    /// Every known owner, including owners whose collection is empty.
    pub fn owners(&self) -> Vec<Uuid> {
        self.by_owner.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.by_location.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_location.is_empty()
    }

    /// Verify that both indexes describe the same records.
    ///
    /// Returns a description of the first mismatch found.
    pub fn check_coherence(&self) -> Result<(), String> {
        let mut owner_total = 0;
        for (owner, records) in &self.by_owner {
            for record in records {
                owner_total += 1;
                if record.owner != *owner {
                    return Err(format!("{} filed under owner {}", record, owner));
                }
                match self.by_location.get(&record.key()) {
                    Some(located) if located == record => {}
                    _ => return Err(format!("{} missing from location index", record)),
                }
            }
        }

        if owner_total != self.by_location.len() {
            return Err(format!(
                "owner index holds {} records, location index holds {}",
                owner_total,
                self.by_location.len()
            ));
        }

        for (key, record) in &self.by_location {
            if *key != record.key() {
                return Err(format!("{} stored under key {}", record, key));
            }
        }

        Ok(())
    }
}
