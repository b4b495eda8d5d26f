//! Collision-level errors
//!
//! Only caller mistakes surface as errors. A body whose collider cannot be
//! built yet (its size is still unknown while assets load) is an expected
//! transient state and simply reports "no contact".

use thiserror::Error;

/// Errors raised by the collision core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollisionError {
    /// Bad collider request, malformed transform source, or similar
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Handle does not name a body in this world
    #[error("Unknown body handle")]
    UnknownBody,

    /// Handle does not name a group in this world
    #[error("Unknown group handle")]
    UnknownGroup,
}

impl CollisionError {
    /// Shorthand for [`CollisionError::InvalidArgument`]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result alias for collision operations
pub type Result<T> = std::result::Result<T, CollisionError>;
