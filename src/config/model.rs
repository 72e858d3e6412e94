//! Config struct definition and default implementation.

use serde::{Deserialize, Serialize};

/// Configuration for the lock registry.
///
/// This struct represents the contents of `config.yml`. Unknown fields are
/// ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Storage
    // =========================================================================
    /// Directory holding one `<uuid>.yml` file per owner.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Worlds whose positions are accepted when loading owner files.
    /// Empty accepts every world.
    #[serde(default)]
    pub worlds: Vec<String>,

    // =========================================================================
    // Locking
    // =========================================================================
    /// Maximum locks per owner; `-1` means unlimited.
    #[serde(default = "default_armor_stand_limit")]
    pub armor_stand_limit: i32,

    /// Whether newly placed stands are locked for the placer automatically.
    #[serde(default = "default_true")]
    pub auto_lock: bool,

    // =========================================================================
    // Cleanup
    // =========================================================================
    /// Minutes after startup before stale locks are reconciled; `-1` disables.
    #[serde(default = "default_cleanup_task_delay")]
    pub cleanup_task_delay: i64,

    /// Whether each cleanup eviction is logged.
    #[serde(default = "default_true")]
    pub cleanup_task_log: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            worlds: Vec::new(),
            armor_stand_limit: default_armor_stand_limit(),
            auto_lock: default_true(),
            cleanup_task_delay: default_cleanup_task_delay(),
            cleanup_task_log: default_true(),
        }
    }
}

pub(crate) fn default_data_dir() -> String {
    "data".to_string()
}
pub(crate) fn default_armor_stand_limit() -> i32 {
    100
}
pub(crate) fn default_cleanup_task_delay() -> i64 {
    1
}
pub(crate) fn default_true() -> bool {
    true
}
