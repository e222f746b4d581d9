//! Crate wide constants.

/// Default length of the sequence to sort when no length is requested.
pub const DEFAULT_SEQUENCE_LEN: usize = 40;

/// Default slice length at or below which a worker sorts locally
/// instead of delegating to its children.
pub const DEFAULT_THRESHOLD: usize = 10;
