//! CLI argument parsing for standlock.
//!
//! Uses clap derive macros for declarative argument definitions.
//! Implementations live in the `commands` module.

use clap::{Args, Parser, Subcommand};
use standlock::BlockPosition;
use std::path::PathBuf;
use uuid::Uuid;

/// Standlock: inspect and maintain stand ownership locks.
///
/// Locks are stored as one YAML file per owner in the data directory.
/// Every command loads the whole directory first. Commands other than
/// `list`, `info` and `count` then rewrite each owner file in normalized
/// form, dropping entries for worlds missing from the config.
#[derive(Parser, Debug)]
#[command(name = "standlock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config.yml. Defaults apply when omitted.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory, overriding `data_dir` from the config.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List locks, optionally filtered by owner or world. Read-only.
    List(ListArgs),

    /// Show the lock at a position. Read-only.
    Info(PositionArgs),

    /// Count locks for an owner or a world. Read-only.
    Count(CountArgs),

    /// Lock a position for an owner, replacing any existing lock there.
    Lock(LockArgs),

    /// Remove the lock at a position.
    Unlock(PositionArgs),

    /// Remove every lock in a world.
    EvictWorld(EvictWorldArgs),

    /// Reload every owner file and report what was read.
    Reload,

    /// Rewrite every owner file.
    SaveAll,

    /// Evict locks whose position is not in a live-positions file.
    Cleanup(CleanupArgs),
}

impl Command {
    /// Whether the command only inspects lock data and must not write it.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Command::List(_) | Command::Info(_) | Command::Count(_))
    }
}

/// A block position given as `<world> <x> <y> <z>`.
#[derive(Args, Debug, Clone)]
pub struct PositionArgs {
    pub world: String,

    #[arg(allow_negative_numbers = true)]
    pub x: i32,

    #[arg(allow_negative_numbers = true)]
    pub y: i32,

    #[arg(allow_negative_numbers = true)]
    pub z: i32,
}

impl PositionArgs {
    pub fn to_position(&self) -> BlockPosition {
        BlockPosition::new(self.world.clone(), self.x, self.y, self.z)
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only locks held by this owner.
    #[arg(long)]
    pub owner: Option<Uuid>,

    /// Only locks in this world.
    #[arg(long)]
    pub world: Option<String>,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct CountArgs {
    /// Count locks held by this owner.
    #[arg(long)]
    pub owner: Option<Uuid>,

    /// Count locks in this world.
    #[arg(long)]
    pub world: Option<String>,
}

#[derive(Args, Debug)]
pub struct LockArgs {
    /// Owner UUID.
    pub owner: Uuid,

    #[command(flatten)]
    pub position: PositionArgs,
}

#[derive(Args, Debug)]
pub struct EvictWorldArgs {
    pub world: String,
}

#[derive(Args, Debug)]
pub struct CleanupArgs {
    /// File with one canonical position key (`world_x_y_z`) per line.
    /// Blank lines and lines starting with `#` are ignored.
    #[arg(long)]
    pub live: PathBuf,
}
