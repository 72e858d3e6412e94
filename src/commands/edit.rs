//! Mutating commands: `lock`, `unlock`, `evict-world`.

use crate::cli::{EvictWorldArgs, LockArgs, PositionArgs};
use standlock::config::Config;
use standlock::error::{Result, StandLockError};
use standlock::manager::LockDataManager;
use standlock::position::MAX_COORD;
use standlock::world::WorldDirectory;

pub fn cmd_lock(manager: &mut LockDataManager, config: &Config, args: &LockArgs) -> Result<()> {
    let position = args.position.to_position();

    if position.world.is_empty() {
        return Err(StandLockError::UserError("world must not be empty".to_string()));
    }
    if !position.is_storable() {
        return Err(StandLockError::UserError(format!(
            "coordinates must be between {} and {}",
            -MAX_COORD, MAX_COORD
        )));
    }
    if !config.known_worlds().world_exists(&position.world) {
        return Err(StandLockError::UserError(format!(
            "unknown world '{}' (known: {})",
            position.world,
            config.worlds.join(", ")
        )));
    }

    match manager.lock(args.owner, position.clone()) {
        Some(previous) if previous.owner != args.owner => {
            println!(
                "Locked {} for {} (replaced lock held by {})",
                position, args.owner, previous.owner
            );
        }
        Some(_) => println!("Relocked {} for {}", position, args.owner),
        None => println!("Locked {} for {}", position, args.owner),
    }
    Ok(())
}

pub fn cmd_unlock(manager: &mut LockDataManager, args: &PositionArgs) -> Result<()> {
    let position = args.to_position();

    match manager.unlock(&position) {
        Some(record) => println!("Unlocked {} (owner {})", position, record.owner),
        None => println!("No lock at {}.", position),
    }
    Ok(())
}

pub fn cmd_evict_world(manager: &mut LockDataManager, args: &EvictWorldArgs) -> Result<()> {
    let evicted = manager.evict_world(&args.world);

    println!("Evicted {} lock(s) from '{}'", evicted.len(), args.world);
    for record in &evicted {
        println!("  {} (owner {})", record.position, record.owner);
    }
    Ok(())
}
