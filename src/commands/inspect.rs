//! Read-only commands: `list`, `info`, `count`.

use crate::cli::{CountArgs, ListArgs, PositionArgs};
use serde::Serialize;
use standlock::error::{Result, StandLockError};
use standlock::locks::LockRecord;
use standlock::manager::LockDataManager;
use uuid::Uuid;

/// One lock as printed by `list --json`.
#[derive(Debug, Serialize)]
struct LockEntry<'a> {
    key: String,
    #[serde(flatten)]
    record: &'a LockRecord,
    name: Option<String>,
}

/// Records matching the filters, sorted by position.
fn select(manager: &LockDataManager, owner: Option<Uuid>, world: Option<&str>) -> Vec<LockRecord> {
    let mut records = match (owner, world) {
        (Some(owner), _) => manager.records_for_owner(owner),
        (None, Some(world)) => manager.registry().records_in_world(world),
        (None, None) => manager.all_records(),
    };
    if let Some(world) = world {
        records.retain(|record| record.position.world == world);
    }
    records.sort_by(|a, b| a.position.cmp(&b.position));
    records
}

pub fn cmd_list(manager: &LockDataManager, args: &ListArgs) -> Result<()> {
    let records = select(manager, args.owner, args.world.as_deref());

    if args.json {
        let entries: Vec<LockEntry<'_>> = records
            .iter()
            .map(|record| LockEntry {
                key: record.key(),
                record,
                name: manager.display_name(record.owner),
            })
            .collect();
        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| StandLockError::UserError(format!("failed to serialize locks: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    if records.is_empty() {
        println!("No locks.");
        return Ok(());
    }

    println!("Locks ({}):", records.len());
    println!();
    for record in &records {
        print_record(manager, record);
        println!();
    }

    Ok(())
}

pub fn cmd_info(manager: &LockDataManager, args: &PositionArgs) -> Result<()> {
    let position = args.to_position();

    match manager.lookup(&position) {
        Some(record) => print_record(manager, record),
        None => println!("No lock at {}.", position),
    }

    Ok(())
}

pub fn cmd_count(manager: &LockDataManager, args: &CountArgs) -> Result<()> {
    match (args.owner, args.world.as_deref()) {
        (Some(owner), _) => {
            println!("{}: {} lock(s)", owner, manager.count_for_owner(owner));
        }
        (None, Some(world)) => {
            println!("{}: {} lock(s)", world, manager.count_for_world(world));
        }
        (None, None) => {
            return Err(StandLockError::UserError("count needs --owner or --world".to_string()));
        }
    }
    Ok(())
}

fn print_record(manager: &LockDataManager, record: &LockRecord) {
    println!("  {}", record.position);
    match manager.display_name(record.owner) {
        Some(name) => println!("    Owner:      {} ({})", record.owner, name),
        None => println!("    Owner:      {}", record.owner),
    }
    match record.created_at_utc() {
        Some(created) => println!("    Created:    {}", created.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("    Created:    unknown"),
    }
    println!("    Age:        {}", record.age_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::open_temp;
    use standlock::BlockPosition;
    use tempfile::TempDir;

    #[test]
    fn select_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = open_temp(&temp_dir);
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        manager.lock(alice, BlockPosition::new("world", 5, 0, 0));
        manager.lock(alice, BlockPosition::new("world", -3, 0, 0));
        manager.lock(alice, BlockPosition::new("world_nether", 0, 0, 0));
        manager.lock(bob, BlockPosition::new("world", 1, 0, 0));

        let xs: Vec<i32> = select(&manager, None, Some("world"))
            .iter()
            .map(|r| r.position.x)
            .collect();
        assert_eq!(xs, vec![-3, 1, 5]);

        assert_eq!(select(&manager, Some(alice), None).len(), 3);
        assert_eq!(select(&manager, Some(bob), Some("world_nether")).len(), 0);
        assert!(select(&manager, Some(Uuid::new_v4()), None).is_empty());
    }

    #[test]
    fn json_entry_flattens_record() {
        let owner = Uuid::new_v4();
        let record = LockRecord::new(owner, BlockPosition::new("world", 1, 2, 3), 42);
        let entry = LockEntry {
            key: record.key(),
            record: &record,
            name: Some("Alice".to_string()),
        };

        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["key"], "world_1_2_3");
        assert_eq!(value["owner"], owner.to_string());
        assert_eq!(value["position"]["z"], 3);
        assert_eq!(value["created_at"], 42);
        assert_eq!(value["name"], "Alice");
    }

    #[test]
    fn count_without_filter_is_user_error() {
        let temp_dir = TempDir::new().unwrap();
        let manager = open_temp(&temp_dir);
        let args = CountArgs {
            owner: None,
            world: None,
        };

        assert!(cmd_count(&manager, &args).is_err());
    }

    #[test]
    fn info_on_unlocked_position_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let manager = open_temp(&temp_dir);
        let args = PositionArgs {
            world: "world".to_string(),
            x: 0,
            y: 0,
            z: 0,
        };

        assert!(cmd_info(&manager, &args).is_ok());
    }
}
