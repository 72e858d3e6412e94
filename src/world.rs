//! Collaborator interfaces supplied by the host.
//!
//! The registry never talks to a game server directly. Everything it needs
//! to know about the outside world comes through these traits: which worlds
//! exist, what display name an owner has, which objects are currently
//! placed, and what time it is.

use crate::position::BlockPosition;
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

/// Answers whether a world name refers to a known world.
pub trait WorldDirectory {
    fn world_exists(&self, name: &str) -> bool;

    /// Whether the world is currently loaded. Hosts that cannot tell the
    /// difference may rely on the default.
    fn world_is_loaded(&self, name: &str) -> bool {
        self.world_exists(name)
    }
}

/// Resolves an owner's best-known display name.
pub trait NameResolver {
    fn display_name(&self, owner: Uuid) -> Option<String>;
}

/// Snapshot of every placed object position across all loaded worlds.
pub trait LiveObjects {
    fn live_positions(&self) -> Vec<BlockPosition>;
}

/// Source of creation timestamps, in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// Wall clock backed by `chrono::Utc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A fixed set of world names.
///
/// An empty set accepts every name, which is what offline tooling wants when
/// it has no server to ask.
#[derive(Debug, Clone, Default)]
pub struct KnownWorlds {
    names: BTreeSet<String>,
}

impl KnownWorlds {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Accept any world name.
    pub fn any() -> Self {
        Self::default()
    }
}

impl WorldDirectory for KnownWorlds {
    fn world_exists(&self, name: &str) -> bool {
        self.names.is_empty() || self.names.contains(name)
    }
}

/// Resolver that never knows a name; stored hints are kept instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNames;

impl NameResolver for NoNames {
    fn display_name(&self, _owner: Uuid) -> Option<String> {
        None
    }
}

impl NameResolver for HashMap<Uuid, String> {
    fn display_name(&self, owner: Uuid) -> Option<String> {
        self.get(&owner).cloned()
    }
}

impl LiveObjects for Vec<BlockPosition> {
    fn live_positions(&self) -> Vec<BlockPosition> {
        self.clone()
    }
}
