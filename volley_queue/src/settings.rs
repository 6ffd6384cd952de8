//! Session settings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{GameMode, formation::Criterion};

/// Settings errors
#[derive(Debug, Clone, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum SettingsError {
    #[error("Unknown balancing criterion '{0}' (expected priority, setter or gender)")]
    UnknownCriterion(String),

    #[error("Balancing criterion '{0}' listed more than once")]
    DuplicateCriterion(String),

    #[error("Position {index} is out of range (have {len} criteria)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// User-adjustable settings read by the rotation engine.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameSettings {
    pub default_game_mode: GameMode,
    /// Balancing criteria, highest precedence first
    pub team_formation_priority: Vec<Criterion>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            default_game_mode: GameMode::SixVSix,
            team_formation_priority: Criterion::ALL.to_vec(),
        }
    }
}

impl GameSettings {
    /// Replace the criteria order.
    ///
    /// The list may be shorter than the full set; missing criteria are
    /// never applied.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::DuplicateCriterion`] if a criterion repeats.
    pub fn set_priority_order(&mut self, order: Vec<Criterion>) -> Result<(), SettingsError> {
        for (idx, criterion) in order.iter().enumerate() {
            if order[..idx].contains(criterion) {
                return Err(SettingsError::DuplicateCriterion(criterion.to_string()));
            }
        }
        self.team_formation_priority = order;
        Ok(())
    }

    /// Move the criterion at `from` so it ends up at `to`, shifting the
    /// others. Indices are zero-based.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::IndexOutOfRange`] if either index is past
    /// the end of the list.
    pub fn move_criterion(&mut self, from: usize, to: usize) -> Result<(), SettingsError> {
        let len = self.team_formation_priority.len();
        for index in [from, to] {
            if index >= len {
                return Err(SettingsError::IndexOutOfRange { index, len });
            }
        }
        let criterion = self.team_formation_priority.remove(from);
        self.team_formation_priority.insert(to, criterion);
        Ok(())
    }
}

/// Parse a comma separated criteria list such as `"setter,gender"`.
///
/// # Errors
///
/// Returns an error for unknown or repeated names.
pub fn parse_criteria(list: &str) -> Result<Vec<Criterion>, SettingsError> {
    let mut order: Vec<Criterion> = Vec::new();
    for part in list.split(',').filter(|s| !s.trim().is_empty()) {
        let criterion: Criterion = part.parse()?;
        if order.contains(&criterion) {
            return Err(SettingsError::DuplicateCriterion(criterion.to_string()));
        }
        order.push(criterion);
    }
    Ok(order)
}
