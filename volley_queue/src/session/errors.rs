//! Session error types.

use thiserror::Error;

use crate::roster::PlayerId;

/// Errors from queue and attendance commands
#[derive(Debug, Clone, Eq, Error, PartialEq)]
pub enum SessionError {
    #[error("Player {0} is not on the roster")]
    UnknownPlayer(PlayerId),

    #[error("Player {0} is inactive")]
    InactivePlayer(PlayerId),

    #[error("Player {0} is on court right now")]
    AlreadyOnCourt(PlayerId),
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
