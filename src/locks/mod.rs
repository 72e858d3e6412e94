//! Lock records and the registry that indexes them.
//!
//! # Invariants
//!
//! - A record is in the owner index iff it is the value stored under its
//!   canonical key in the location index.
//! - At most one record exists per position. Locking an already-locked
//!   position silently replaces the previous record.
//! - An owner may be known with zero records after removals.

mod record;
mod registry;


pub use record::{LockRecord, UNKNOWN_CREATED_AT};
pub use registry::LockRegistry;
