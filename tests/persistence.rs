//! End-to-end behaviour of the lock registry through the public API,
//! including restarts against the same data directory.

use standlock::cleanup::{Job, Scheduler, schedule_startup_cleanup};
use standlock::manager::lock_shared;
use standlock::world::{KnownWorlds, LiveObjects};
use standlock::{BlockPosition, Collaborators, Config, LockDataManager};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use uuid::Uuid;

fn open(dir: &Path) -> LockDataManager {
    LockDataManager::open(dir, Collaborators::new(KnownWorlds::any())).unwrap()
}

/// Lock keys written in an owner's file, without the name entry.
fn file_keys(manager: &LockDataManager, owner: Uuid) -> Vec<String> {
    let content = std::fs::read_to_string(manager.store().owner_path(owner)).unwrap();
    let mapping: serde_yaml::Mapping = serde_yaml::from_str(&content).unwrap_or_default();
    let mut keys: Vec<String> = mapping
        .keys()
        .filter_map(|k| k.as_str())
        .filter(|k| *k != "name")
        .map(String::from)
        .collect();
    keys.sort();
    keys
}

/// Runs every job as soon as it is scheduled.
struct Immediate;

impl Scheduler for Immediate {
    fn schedule_once(&self, _delay: Duration, job: Job) {
        job();
    }
}

#[test]
fn lock_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let owner = Uuid::new_v4();
    let position = BlockPosition::new("world", 10, 64, -5);

    let created_at = {
        let mut manager = open(temp_dir.path());
        manager.lock(owner, position.clone());
        manager.lookup(&position).unwrap().created_at
    };

    let manager = open(temp_dir.path());
    let record = manager.lookup(&position).unwrap();
    assert_eq!(record.owner, owner);
    assert_eq!(record.position, position);
    assert_eq!(record.created_at, created_at);
}

#[test]
fn second_owner_takes_over_position() {
    let temp_dir = TempDir::new().unwrap();
    let mut manager = open(temp_dir.path());
    let u1 = Uuid::new_v4();
    let u2 = Uuid::new_v4();
    let position = BlockPosition::new("world", 10, 64, -5);

    manager.lock(u1, position.clone());
    assert_eq!(manager.count_for_owner(u1), 1);

    manager.lock(u2, position.clone());
    assert_eq!(manager.count_for_owner(u1), 0);
    assert_eq!(manager.count_for_owner(u2), 1);
    assert_eq!(manager.lookup(&position).unwrap().owner, u2);

    assert!(file_keys(&manager, u1).is_empty());
    assert_eq!(file_keys(&manager, u2), vec!["world_10_64_-5"]);

    let reopened = open(temp_dir.path());
    assert_eq!(reopened.lookup(&position).unwrap().owner, u2);
    assert_eq!(reopened.count_for_owner(u1), 0);
}

#[test]
fn count_for_world_ignores_other_worlds() {
    let temp_dir = TempDir::new().unwrap();
    let mut manager = open(temp_dir.path());
    let owner = Uuid::new_v4();

    manager.lock(owner, BlockPosition::new("world", 0, 64, 0));
    manager.lock(owner, BlockPosition::new("nether", 0, 64, 0));

    assert_eq!(manager.count_for_world("world"), 1);
}

#[test]
fn scheduled_cleanup_evicts_missing_objects() {
    let temp_dir = TempDir::new().unwrap();
    let owner = Uuid::new_v4();
    let kept = BlockPosition::new("world", 1, 64, 1);
    let gone = BlockPosition::new("world", 2, 64, 2);

    let shared = open(temp_dir.path()).into_shared();
    {
        let mut manager = lock_shared(&shared);
        manager.lock(owner, kept.clone());
        manager.lock(owner, gone.clone());
    }

    let live: Arc<dyn LiveObjects + Send + Sync> = Arc::new(vec![kept.clone()]);
    assert!(schedule_startup_cleanup(
        &Config::default(),
        &Immediate,
        Arc::clone(&shared),
        live,
    ));

    let manager = lock_shared(&shared);
    assert!(manager.is_locked(&kept));
    assert!(!manager.is_locked(&gone));
    assert_eq!(file_keys(&manager, owner), vec!["world_1_64_1"]);
}

#[test]
fn malformed_entry_does_not_spoil_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let owner = Uuid::new_v4();
    std::fs::write(
        temp_dir.path().join(format!("{}.yml", owner)),
        "name: Steve\nbadkey: 1\nworld_1_2_3: 1700000000000\nworld_4_5_6: 1700000000001\n",
    )
    .unwrap();

    let manager = open(temp_dir.path());

    assert_eq!(manager.count_for_owner(owner), 2);
    assert_eq!(manager.display_name(owner).as_deref(), Some("Steve"));
    // Startup rewrites the file without the bad entry.
    assert_eq!(file_keys(&manager, owner), vec!["world_1_2_3", "world_4_5_6"]);
}

#[test]
fn files_from_unknown_worlds_are_trimmed() {
    let temp_dir = TempDir::new().unwrap();
    let owner = Uuid::new_v4();
    std::fs::write(
        temp_dir.path().join(format!("{}.yml", owner)),
        "world_1_2_3: 10\nskylands_1_2_3: 11\n",
    )
    .unwrap();

    let manager = LockDataManager::open(
        temp_dir.path(),
        Collaborators::new(KnownWorlds::new(["world"])),
    )
    .unwrap();

    assert_eq!(manager.count_for_owner(owner), 1);
    assert_eq!(manager.count_for_world("skylands"), 0);
    assert_eq!(file_keys(&manager, owner), vec!["world_1_2_3"]);
}
