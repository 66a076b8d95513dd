//! Domain error model.

use thiserror::Error;

/// Domain-level error raised by the shared primitives.
///
/// Request validation has its own error type in the profiles crate;
/// infrastructure concerns (database, identity provider) have theirs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
