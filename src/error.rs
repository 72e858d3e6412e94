//! Error types for standlock.
//!
//! Uses thiserror for derive macros. Malformed position keys and unknown
//! worlds are not errors here: the store drops those entries while loading.

use crate::exit_codes;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for standlock operations.
#[derive(Error, Debug)]
pub enum StandLockError {
    /// Invalid arguments or an unusable environment (missing config, bad input).
    #[error("{0}")]
    UserError(String),

    /// The configuration file parsed but holds invalid values.
    #[error("config validation failed: {0}")]
    Config(String),

    /// A durable write or directory scan failed.
    #[error("failed to persist '{}': {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An owner file exists but is not a flat key/value document.
    #[error("owner file '{}' is unreadable: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
}

impl StandLockError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StandLockError::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            StandLockError::UserError(_) | StandLockError::Config(_) => exit_codes::USER_ERROR,
            StandLockError::Persistence { .. } | StandLockError::Corrupt { .. } => {
                exit_codes::STORAGE_FAILURE
            }
        }
    }
}

/// Result type alias for standlock operations.
pub type Result<T> = std::result::Result<T, StandLockError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = StandLockError::UserError("bad argument".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn config_error_has_correct_exit_code() {
        let err = StandLockError::Config("armor_stand_limit must be >= -1".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
        assert_eq!(
            err.to_string(),
            "config validation failed: armor_stand_limit must be >= -1"
        );
    }

    #[test]
    fn persistence_error_reports_path_and_cause() {
        let err = StandLockError::persistence(
            "data/abc.yml",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.exit_code(), exit_codes::STORAGE_FAILURE);
        assert_eq!(err.to_string(), "failed to persist 'data/abc.yml': denied");
    }

    #[test]
    fn corrupt_error_has_storage_exit_code() {
        let err = StandLockError::Corrupt {
            path: PathBuf::from("data/abc.yml"),
            reason: "expected a mapping".to_string(),
        };
        assert_eq!(err.exit_code(), exit_codes::STORAGE_FAILURE);
    }
}
