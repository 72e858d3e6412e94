//! Maintenance commands: `reload`, `save-all`, `cleanup`.

use crate::cli::CleanupArgs;
use standlock::cleanup::CleanupTask;
use standlock::config::Config;
use standlock::error::{Result, StandLockError};
use standlock::manager::LockDataManager;
use standlock::position::parse_key_parts;
use std::collections::HashSet;
use tracing::warn;

pub fn cmd_reload(manager: &mut LockDataManager) -> Result<()> {
    let summary = manager.reload()?;
    manager.save_all()?;

    println!("Reloaded lock data from {}", manager.store().data_dir().display());
    println!("  Owners:     {}", summary.owners);
    println!("  Locks:      {}", summary.records);
    if summary.dropped_entries > 0 {
        println!(
            "  Dropped:    {} malformed or unknown-world entries",
            summary.dropped_entries
        );
    }
    if summary.skipped_files > 0 {
        println!("  Skipped:    {} unreadable owner files", summary.skipped_files);
    }
    Ok(())
}

pub fn cmd_save_all(manager: &mut LockDataManager) -> Result<()> {
    manager.save_all()?;
    println!(
        "Saved {} owner file(s) to {}",
        manager.registry().owners().len(),
        manager.store().data_dir().display()
    );
    Ok(())
}

pub fn cmd_cleanup(
    manager: &mut LockDataManager,
    config: &Config,
    args: &CleanupArgs,
) -> Result<()> {
    let content = std::fs::read_to_string(&args.live).map_err(|e| {
        StandLockError::UserError(format!(
            "failed to read live positions '{}': {}",
            args.live.display(),
            e
        ))
    })?;
    let live = parse_live_keys(&content);

    let evicted = CleanupTask::from_config(config).run(manager, &live);

    println!("Cleanup evicted {} lock(s)", evicted.len());
    for record in &evicted {
        println!("  {} (owner {})", record.position, record.owner);
    }
    Ok(())
}

/// Canonical keys from a live-positions listing, one per line.
///
/// Blank lines and `#` comments are skipped. Keys are re-rendered so that
/// `world_07_64_0` matches the stored `world_7_64_0`.
fn parse_live_keys(content: &str) -> HashSet<String> {
    let mut live = HashSet::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_key_parts(line) {
            Some(position) => {
                live.insert(position.key());
            }
            None => warn!(line = index + 1, key = line, "ignoring malformed live position"),
        }
    }
    live
}
