//! Roster error types.

use super::models::PlayerId;
use thiserror::Error;

/// Roster errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// Player name is empty after trimming
    #[error("Player name can't be empty")]
    EmptyName,

    /// Player has no positions
    #[error("Player needs at least one position")]
    NoPositions,

    /// Player not found
    #[error("Player {0} not found")]
    NotFound(PlayerId),

    /// A textual attribute couldn't be parsed
    #[error("Invalid {field} '{value}'")]
    InvalidValue { field: &'static str, value: String },
}

/// Result type for roster operations
pub type RosterResult<T> = Result<T, RosterError>;
