//! Rotation error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by rotation commands.
///
/// None of these are fatal. The session is left untouched whenever one is
/// returned, so callers can show the message and carry on.
#[derive(Debug, Clone, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum RotationError {
    #[error("Not enough players in the queue: {required} are needed, {available} waiting.")]
    InsufficientPlayers { required: usize, available: usize },

    #[error("A match is already in progress.")]
    MatchAlreadyInProgress,

    #[error("Unknown game mode '{0}' (expected 4v4 or 6v6)")]
    UnknownGameMode(String),

    #[error("Unknown side '{0}' (expected A or B)")]
    UnknownSide(String),
}

/// Result type for rotation operations
pub type RotationResult<T> = Result<T, RotationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_players_names_headcount() {
        let err = RotationError::InsufficientPlayers {
            required: 12,
            available: 9,
        };
        let msg = err.to_string();
        assert!(msg.contains("12 are needed"));
        assert!(msg.contains("9 waiting"));
    }
}
