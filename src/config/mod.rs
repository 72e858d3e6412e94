//! Configuration model for standlock.
//!
//! This module defines the Config struct that represents `config.yml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for optional fields, and validation of config values.

mod model;
mod operations;

#[cfg(test)]
mod tests;

pub use model::Config;
pub use operations::MAX_CLEANUP_TASK_DELAY;
