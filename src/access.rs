//! Typed capability checks.
//!
//! Hosts answer "may subject S perform action A" through [`AccessPolicy`].
//! Lock limits combine a static value from config with an optional
//! per-subject override.

use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Actions gated by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Place a new stand.
    Place,
    /// Act on stands owned by others: unlock, manipulate, break.
    Admin,
    /// Place without the per-owner lock limit.
    InfinitePlace,
    /// Issue lock commands (info, private, remove).
    Command,
}

pub trait AccessPolicy {
    fn authorize(&self, subject: Uuid, action: Action) -> bool;
}

/// Every subject may place and use commands; nobody is admin or unlimited.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl AccessPolicy for DefaultPolicy {
    fn authorize(&self, _subject: Uuid, action: Action) -> bool {
        matches!(action, Action::Place | Action::Command)
    }
}

/// Explicit grant table layered over a set of actions everyone has.
#[derive(Debug, Clone, Default)]
pub struct StaticPolicy {
    everyone: HashSet<Action>,
    grants: HashMap<Uuid, HashSet<Action>>,
}

impl StaticPolicy {
    /// Policy where every subject starts with `everyone`.
    pub fn new(everyone: impl IntoIterator<Item = Action>) -> Self {
        Self {
            everyone: everyone.into_iter().collect(),
            grants: HashMap::new(),
        }
    }

    pub fn grant(mut self, subject: Uuid, action: Action) -> Self {
        self.grants.entry(subject).or_default().insert(action);
        self
    }
}

impl AccessPolicy for StaticPolicy {
    fn authorize(&self, subject: Uuid, action: Action) -> bool {
        self.everyone.contains(&action)
            || self
                .grants
                .get(&subject)
                .is_some_and(|actions| actions.contains(&action))
    }
}

/// Per-subject lock limit supplied by a richer permission backend.
pub trait LimitOverride {
    /// `Some(-1)` means unlimited; `None` defers to the static limit.
    fn lock_limit(&self, subject: Uuid) -> Option<i32>;
}

impl LimitOverride for HashMap<Uuid, i32> {
    fn lock_limit(&self, subject: Uuid) -> Option<i32> {
        self.get(&subject).copied()
    }
}

/// Resolves the effective lock limit for a subject.
pub struct LockLimit {
    static_limit: i32,
    overrides: Option<Box<dyn LimitOverride + Send + Sync>>,
}

impl LockLimit {
    pub fn new(static_limit: i32) -> Self {
        Self {
            static_limit,
            overrides: None,
        }
    }

    pub fn with_overrides(mut self, overrides: impl LimitOverride + Send + Sync + 'static) -> Self {
        self.overrides = Some(Box::new(overrides));
        self
    }

    /// Maximum locks for `subject`, `None` when unlimited.
    pub fn for_subject(&self, subject: Uuid) -> Option<usize> {
        let limit = self
            .overrides
            .as_ref()
            .and_then(|o| o.lock_limit(subject))
            .unwrap_or(self.static_limit);
        usize::try_from(limit).ok()
    }

    /// Whether `subject` holding `current` locks may take one more.
    pub fn allows(&self, policy: &dyn AccessPolicy, subject: Uuid, current: usize) -> bool {
        if policy.authorize(subject, Action::InfinitePlace) {
            return true;
        }
        self.for_subject(subject).is_none_or(|limit| current < limit)
    }
}

impl std::fmt::Debug for LockLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockLimit")
            .field("static_limit", &self.static_limit)
            .field("has_overrides", &self.overrides.is_some())
            .finish()
    }
}
