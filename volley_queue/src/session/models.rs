//! Session data models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::roster::{Player, PlayerId};

/// Who showed up on a given day, in check-in order.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    pub player_ids: Vec<PlayerId>,
}

/// Next challenger team as it stands in the queue right now.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ChallengerPreview {
    pub players: Vec<Player>,
    /// How many more queued players are needed to fill the team
    pub still_needed: usize,
}

impl ChallengerPreview {
    pub fn is_complete(&self) -> bool {
        self.still_needed == 0
    }
}
