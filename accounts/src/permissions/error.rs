//! Permission codec errors.

use thiserror::Error;

/// Errors raised while converting between flags and bitmasks.
///
/// Both variants indicate a caller bug rather than a runtime condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// A flag name outside the defined enumeration.
    #[error("Unknown permission flag: {0}")]
    UnknownFlag(String),

    /// A stored bitmask below zero.
    #[error("Invalid permissions bitmask {0}: must be non-negative")]
    InvalidBitmask(i64),
}
