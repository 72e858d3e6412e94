//! A single ownership claim.

use crate::position::BlockPosition;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Timestamp stored for records whose creation time is not known.
pub const UNKNOWN_CREATED_AT: i64 = -1;

/// One owner's lock on one block position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockRecord {
    /// Owner identity. Fixed for the life of the record.
    pub owner: Uuid,

    /// Block position the lock covers, captured at lock time.
    pub position: BlockPosition,

    /// Creation time in milliseconds since the epoch, or [`UNKNOWN_CREATED_AT`].
    pub created_at: i64,
}

impl LockRecord {
    pub fn new(owner: Uuid, position: BlockPosition, created_at: i64) -> Self {
        Self {
            owner,
            position,
            created_at,
        }
    }

    /// Canonical location key for this record.
    pub fn key(&self) -> String {
        self.position.key()
    }

    /// Creation time, if it was recorded.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        if self.created_at < 0 {
            return None;
        }
        DateTime::from_timestamp_millis(self.created_at)
    }

    /// Format the age as a human-readable string ("3d 4h", "2h 5m", "7m").
    pub fn age_string(&self) -> String {
        let Some(created) = self.created_at_utc() else {
            return "unknown".to_string();
        };

        let age = Utc::now().signed_duration_since(created);
        let minutes = age.num_minutes();
        let hours = age.num_hours();
        let days = age.num_days();

        if days > 0 {
            format!("{}d {}h", days, hours % 24)
        } else if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else {
            format!("{}m", minutes.max(0))
        }
    }
}

impl fmt::Display for LockRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (owner: {}, age: {})",
            self.position,
            self.owner,
            self.age_string()
        )
    }
}
