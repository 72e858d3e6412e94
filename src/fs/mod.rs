//! Filesystem utilities for standlock.
//!
//! Owner files are only ever replaced through [`atomic_write`], so a crash
//! mid-save never leaves a truncated file behind.

pub mod atomic;

pub use atomic::atomic_write;
pub use atomic::atomic_write_file;
