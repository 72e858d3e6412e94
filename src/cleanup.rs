//! Reconciliation of the registry against the live world.
//!
//! Some time after startup, every lock whose position no longer holds a
//! placed object is evicted. Deciding what to evict is a pure function of
//! the registry and a snapshot of live positions ([`CleanupTask::plan`]);
//! applying it goes through the manager so each eviction is persisted.
//!
//! The task runs once. It never retries or reschedules itself, and running
//! it again with the same snapshot evicts nothing.

use crate::config::Config;
use crate::locks::{LockRecord, LockRegistry};
use crate::manager::{LockDataManager, SharedManager, lock_shared};
use crate::position::BlockPosition;
use crate::world::LiveObjects;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// A job handed to the host scheduler.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Host capability to run a job once after a delay.
pub trait Scheduler {
    fn schedule_once(&self, delay: Duration, job: Job);
}

/// Evicts locks whose object is gone.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanupTask {
    log_evictions: bool,
}

impl CleanupTask {
    pub fn new(log_evictions: bool) -> Self {
        Self { log_evictions }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cleanup_task_log)
    }

    /// Positions that are locked but absent from `live`, sorted.
    pub fn plan(registry: &LockRegistry, live: &HashSet<String>) -> Vec<BlockPosition> {
        let mut orphaned: Vec<BlockPosition> = registry
            .all_records()
            .into_iter()
            .filter(|record| !live.contains(&record.key()))
            .map(|record| record.position)
            .collect();
        orphaned.sort();
        orphaned
    }

    /// Evict every lock whose key is not in `live`.
    pub fn run(&self, manager: &mut LockDataManager, live: &HashSet<String>) -> Vec<LockRecord> {
        let mut evicted = Vec::new();
        for position in Self::plan(manager.registry(), live) {
            let Some(record) = manager.unlock(&position) else {
                continue;
            };
            if self.log_evictions {
                info!("lock data cleanup {}", record.key());
            }
            evicted.push(record);
        }

        debug!(evicted = evicted.len(), live = live.len(), "cleanup finished");
        evicted
    }

    /// Take a snapshot from `source` and run against it.
    pub fn run_with(
        &self,
        manager: &mut LockDataManager,
        source: &dyn LiveObjects,
    ) -> Vec<LockRecord> {
        let live = live_keys(source.live_positions());
        self.run(manager, &live)
    }
}

/// Canonical keys for a set of live positions.
pub fn live_keys(positions: impl IntoIterator<Item = BlockPosition>) -> HashSet<String> {
    positions.into_iter().map(|p| p.key()).collect()
}

/// Schedule the one-shot startup cleanup.
///
/// Returns `false` without scheduling anything when the configured delay is
/// `-1`. The live snapshot is taken when the job fires, not now.
pub fn schedule_startup_cleanup(
    config: &Config,
    scheduler: &dyn Scheduler,
    manager: SharedManager,
    source: Arc<dyn LiveObjects + Send + Sync>,
) -> bool {
    let Some(delay) = config.cleanup_delay() else {
        debug!("startup cleanup disabled");
        return false;
    };

    let task = CleanupTask::from_config(config);
    scheduler.schedule_once(
        delay,
        Box::new(move || {
            let mut manager = lock_shared(&manager);
            task.run_with(&mut manager, source.as_ref());
        }),
    );
    debug!(delay_secs = delay.as_secs(), "startup cleanup scheduled");
    true
}
