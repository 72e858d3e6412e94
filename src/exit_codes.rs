//! Exit code constants for the standlock admin CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid config)
//! - 2: Storage failure (owner file could not be written or read)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// Storage failure: an owner file or the data directory could not be used.
pub const STORAGE_FAILURE: i32 = 2;
