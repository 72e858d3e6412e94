//! Config loading, validation, and derived values.

use super::model::Config;
use crate::error::{Result, StandLockError};
use crate::world::KnownWorlds;
use std::path::Path;
use std::time::Duration;

/// Longest accepted `cleanup_task_delay`, one year in minutes.
pub const MAX_CLEANUP_TASK_DELAY: i64 = 525_600;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            StandLockError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| StandLockError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            StandLockError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values.
    ///
    /// - `armor_stand_limit` and `cleanup_task_delay` must be `-1` or greater
    /// - `cleanup_task_delay` must be at most [`MAX_CLEANUP_TASK_DELAY`]
    /// - `data_dir` must be non-empty
    /// - `worlds` entries must be non-empty
    pub fn validate(&self) -> Result<()> {
        if self.armor_stand_limit < -1 {
            return Err(StandLockError::Config(format!(
                "armor_stand_limit must be -1 (unlimited) or greater, got {}",
                self.armor_stand_limit
            )));
        }

        if self.cleanup_task_delay < -1 {
            return Err(StandLockError::Config(format!(
                "cleanup_task_delay must be -1 (disabled) or greater, got {}",
                self.cleanup_task_delay
            )));
        }

        if self.cleanup_task_delay > MAX_CLEANUP_TASK_DELAY {
            return Err(StandLockError::Config(format!(
                "cleanup_task_delay must be at most {} minutes, got {}",
                MAX_CLEANUP_TASK_DELAY, self.cleanup_task_delay
            )));
        }

        if self.data_dir.trim().is_empty() {
            return Err(StandLockError::Config("data_dir must not be empty".to_string()));
        }

        if self.worlds.iter().any(|w| w.is_empty()) {
            return Err(StandLockError::Config("worlds entries must be non-empty".to_string()));
        }

        Ok(())
    }

    /// Delay before the startup cleanup runs, or `None` when disabled.
    ///
    /// Saturates for values that skipped validation.
    pub fn cleanup_delay(&self) -> Option<Duration> {
        u64::try_from(self.cleanup_task_delay)
            .ok()
            .map(|minutes| Duration::from_secs(minutes.saturating_mul(60)))
    }

    /// Static per-owner lock limit, or `None` when unlimited.
    pub fn lock_limit(&self) -> Option<usize> {
        usize::try_from(self.armor_stand_limit).ok()
    }

    /// World directory built from the `worlds` list.
    pub fn known_worlds(&self) -> KnownWorlds {
        KnownWorlds::new(self.worlds.iter().cloned())
    }
}
