//! Command implementations for standlock.
//!
//! Mutating commands open the data directory through [`LockDataManager::open`],
//! which loads all owner files and rewrites them in normalized form. Read-only
//! commands use [`LockDataManager::load`] and leave the files untouched.

mod edit;
mod inspect;
mod maintain;

use crate::cli::{Cli, Command};
use standlock::config::Config;
use standlock::error::Result;
use standlock::manager::{Collaborators, LockDataManager};
use std::path::{Path, PathBuf};

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| PathBuf::from(&config.data_dir));
    let mut manager = if cli.command.is_read_only() {
        LockDataManager::load(&data_dir, Collaborators::new(config.known_worlds()))?
    } else {
        open_manager(&config, &data_dir)?
    };

    match cli.command {
        Command::List(args) => inspect::cmd_list(&manager, &args),
        Command::Info(args) => inspect::cmd_info(&manager, &args),
        Command::Count(args) => inspect::cmd_count(&manager, &args),
        Command::Lock(args) => edit::cmd_lock(&mut manager, &config, &args),
        Command::Unlock(args) => edit::cmd_unlock(&mut manager, &args),
        Command::EvictWorld(args) => edit::cmd_evict_world(&mut manager, &args),
        Command::Reload => maintain::cmd_reload(&mut manager),
        Command::SaveAll => maintain::cmd_save_all(&mut manager),
        Command::Cleanup(args) => maintain::cmd_cleanup(&mut manager, &config, &args),
    }
}

/// Load the config file if one was given, otherwise use defaults.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
}

fn open_manager(config: &Config, data_dir: &Path) -> Result<LockDataManager> {
    LockDataManager::open(data_dir, Collaborators::new(config.known_worlds()))
}
