//! Request/response contract for the trigger layer.
//!
//! The host turns world events (a stand placed, attacked, manipulated, a
//! piston pushing blocks) into calls here and acts on the returned decision:
//! cancel the event, remove the stand, show a message. Nothing in this
//! module talks to players directly.
//!
//! Pending commands model the two-step flow "run a command, then hit a
//! stand": the command arms an action for the player and their next attack
//! on a stand consumes it instead of being treated as an attack.


use crate::access::{AccessPolicy, Action, LockLimit};
use crate::config::Config;
use crate::manager::{LockDataManager, SharedManager, lock_shared};
use crate::position::BlockPosition;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// Outcome of placing a stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceDecision {
    /// Placed and locked for the placer.
    Locked,
    /// Placed without a lock because auto-lock is off.
    Placed,
    /// The placer would exceed their lock limit; remove the stand.
    LimitExceeded,
    /// The placer may not place stands; remove the stand.
    Denied,
}

/// Who is hitting a stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attacker {
    Player(Uuid),
    /// A projectile, with the player who fired it if there was one.
    Projectile { shooter: Option<Uuid> },
    /// Mobs, explosions, anything without a responsible player.
    Other,
}

impl Attacker {
    fn player(self) -> Option<Uuid> {
        match self {
            Attacker::Player(id) => Some(id),
            Attacker::Projectile { shooter } => shooter,
            Attacker::Other => None,
        }
    }
}

/// Owner details returned by the info command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerInfo {
    pub owner: Uuid,
    pub name: Option<String>,
}

/// Result of a pending command applied to a stand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Info: the stand's owner, or `None` when unlocked.
    Info(Option<OwnerInfo>),
    Locked,
    AlreadyLocked,
    LimitExceeded,
    Unlocked,
    NotLocked,
    NotOwner,
}

/// Outcome of an attack on a stand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttackDecision {
    /// Not locked; let the attack through.
    Allowed,
    /// The owner or an admin broke it; the lock was removed.
    Unlocked { owner: Uuid },
    /// Locked by someone else; cancel the attack.
    Cancelled { owner: Uuid },
    /// A pending command consumed the hit; cancel the attack.
    Command(CommandOutcome),
}

/// Outcome of a player manipulating a stand's equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractDecision {
    Allowed,
    Cancelled { owner: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingCommand {
    Info,
    Private,
    Remove,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    command: PendingCommand,
    persist: bool,
}

pub struct Protection {
    manager: SharedManager,
    policy: Box<dyn AccessPolicy + Send + Sync>,
    limit: LockLimit,
    auto_lock: bool,
    pending: HashMap<Uuid, Pending>,
}

impl Protection {
    pub fn new(
        manager: SharedManager,
        config: &Config,
        policy: impl AccessPolicy + Send + Sync + 'static,
    ) -> Self {
        Self {
            manager,
            policy: Box::new(policy),
            limit: LockLimit::new(config.armor_stand_limit),
            auto_lock: config.auto_lock,
            pending: HashMap::new(),
        }
    }

    /// Replace the limit resolver, e.g. to add per-subject overrides.
    pub fn with_limit(mut self, limit: LockLimit) -> Self {
        self.limit = limit;
        self
    }

    pub fn is_locked(&self, position: &BlockPosition) -> bool {
        lock_shared(&self.manager).is_locked(position)
    }

    /// A stand was placed at `position` by `actor`.
    pub fn place(&self, actor: Uuid, position: BlockPosition) -> PlaceDecision {
        if !self.policy.authorize(actor, Action::Place) {
            return PlaceDecision::Denied;
        }
        if !self.auto_lock {
            return PlaceDecision::Placed;
        }

        let mut manager = lock_shared(&self.manager);
        if !self.within_limit(&manager, actor) {
            return PlaceDecision::LimitExceeded;
        }
        manager.lock(actor, position);
        PlaceDecision::Locked
    }

    /// Something hit the stand at `position`.
    pub fn attack(&mut self, attacker: Attacker, position: &BlockPosition) -> AttackDecision {
        if let Attacker::Player(player) = attacker
            && let Some(command) = self.take_pending(player)
        {
            return AttackDecision::Command(self.apply(player, command, position));
        }

        let mut manager = lock_shared(&self.manager);
        let Some(owner) = manager.lookup(position).map(|r| r.owner) else {
            return AttackDecision::Allowed;
        };

        match attacker.player() {
            Some(player) if self.may_act_for(player, owner) => {
                manager.unlock(position);
                AttackDecision::Unlocked { owner }
            }
            _ => AttackDecision::Cancelled { owner },
        }
    }

    /// `actor` put items into or took items out of the stand at `position`.
    pub fn manipulate(&self, actor: Uuid, position: &BlockPosition) -> InteractDecision {
        let manager = lock_shared(&self.manager);
        match manager.lookup(position) {
            Some(record) if !self.may_act_for(actor, record.owner) => InteractDecision::Cancelled {
                owner: record.owner,
            },
            _ => InteractDecision::Allowed,
        }
    }

    /// Whether a piston moving blocks onto `targets` must be stopped.
    pub fn piston_blocked(&self, targets: &[BlockPosition]) -> bool {
        let manager = lock_shared(&self.manager);
        targets.iter().any(|target| manager.is_locked(target))
    }

    /// Arm `command` for `actor`'s next hit on a stand.
    ///
    /// With `persist` the command stays armed until cleared. Returns `false`
    /// when the actor may not use commands.
    pub fn set_pending(&mut self, actor: Uuid, command: PendingCommand, persist: bool) -> bool {
        if !self.policy.authorize(actor, Action::Command) {
            return false;
        }
        self.pending.insert(actor, Pending { command, persist });
        true
    }

    pub fn clear_pending(&mut self, actor: Uuid) -> Option<PendingCommand> {
        self.pending.remove(&actor).map(|p| p.command)
    }

    pub fn pending(&self, actor: Uuid) -> Option<PendingCommand> {
        self.pending.get(&actor).map(|p| p.command)
    }

    fn take_pending(&mut self, actor: Uuid) -> Option<PendingCommand> {
        let pending = *self.pending.get(&actor)?;
        if !pending.persist {
            self.pending.remove(&actor);
        }
        Some(pending.command)
    }

    fn apply(
        &self,
        actor: Uuid,
        command: PendingCommand,
        position: &BlockPosition,
    ) -> CommandOutcome {
        let mut manager = lock_shared(&self.manager);
        let owner = manager.lookup(position).map(|r| r.owner);
        debug!(%actor, ?command, %position, "applying pending command");

        match (command, owner) {
            (PendingCommand::Info, None) => CommandOutcome::Info(None),
            (PendingCommand::Info, Some(owner)) => CommandOutcome::Info(Some(OwnerInfo {
                owner,
                name: manager.display_name(owner),
            })),
            (PendingCommand::Private, Some(_)) => CommandOutcome::AlreadyLocked,
            (PendingCommand::Private, None) => {
                if !self.within_limit(&manager, actor) {
                    return CommandOutcome::LimitExceeded;
                }
                manager.lock(actor, position.clone());
                CommandOutcome::Locked
            }
            (PendingCommand::Remove, None) => CommandOutcome::NotLocked,
            (PendingCommand::Remove, Some(owner)) => {
                if !self.may_act_for(actor, owner) {
                    return CommandOutcome::NotOwner;
                }
                manager.unlock(position);
                CommandOutcome::Unlocked
            }
        }
    }

    fn may_act_for(&self, actor: Uuid, owner: Uuid) -> bool {
        actor == owner || self.policy.authorize(actor, Action::Admin)
    }

    fn within_limit(&self, manager: &LockDataManager, actor: Uuid) -> bool {
        self.limit
            .allows(self.policy.as_ref(), actor, manager.count_for_owner(actor))
    }
}
