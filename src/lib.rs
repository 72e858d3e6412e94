//! Standlock: ownership locks for placed world objects.
//!
//! The registry records which owner has claimed which block position, keeps
//! one YAML file per owner in a data directory, and reconciles itself
//! against the objects that actually exist in the world.
//!
//! - [`manager::LockDataManager`] is the entry point: every mutation is
//!   persisted before it returns.
//! - [`protection::Protection`] turns host events into lock decisions.
//! - [`cleanup`] evicts locks whose object no longer exists.

pub mod access;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod locks;
pub mod manager;
pub mod position;
pub mod protection;
pub mod store;
pub mod world;

pub use config::Config;
pub use error::{Result, StandLockError};
pub use locks::{LockRecord, LockRegistry};
pub use manager::{Collaborators, LockDataManager, SharedManager};
pub use position::BlockPosition;
