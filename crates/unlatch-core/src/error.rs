//! Error types for the Unlatch library

use thiserror::Error;

/// Result type alias for controller operations
pub type Result<T> = std::result::Result<T, UnlatchError>;

/// Errors returned to the caller of the controller.
///
/// Authentication outcomes (unavailable, failed, errored) are not errors;
/// they are surfaced as a [`crate::Notice`] on the published state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnlatchError {
    /// An evaluation is already outstanding
    #[error("An authentication attempt is already in progress")]
    AttemptInProgress,
}
