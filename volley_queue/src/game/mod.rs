//! Match engine: team formation and winner-stays-on rotation.
//!
//! This module provides:
//! - Match, team and game mode models
//! - The deterministic team formation policy
//! - Rotation operations over a [`Session`](crate::session::Session)

pub mod errors;
pub mod formation;
pub mod models;
pub mod rotation;

pub use errors::{RotationError, RotationResult};
pub use formation::{Criterion, RoleGroup, form_teams, rank};
pub use models::{
    CHALLENGER_TEAM_NAME, GameMode, Match, MatchId, Side, TEAM_A_NAME, TEAM_B_NAME, Team,
    WINNER_TEAM_NAME,
};
pub use rotation::{
    EndOutcome, Started, SubstitutionOutcome, Transition, end_match, perform_substitution,
    start_match, suggest_substitute,
};
