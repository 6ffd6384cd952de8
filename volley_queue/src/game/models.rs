//! Match data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::errors::RotationError;
use crate::roster::{Player, PlayerId};

/// Match ID type
pub type MatchId = i64;

pub const TEAM_A_NAME: &str = "Time A";
pub const TEAM_B_NAME: &str = "Time B";
pub const WINNER_TEAM_NAME: &str = "Time A (Vencedor)";
pub const CHALLENGER_TEAM_NAME: &str = "Time B (Desafiante)";

/// Court format.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum GameMode {
    #[serde(rename = "4v4")]
    FourVFour,
    #[default]
    #[serde(rename = "6v6")]
    SixVSix,
}

impl GameMode {
    /// Players needed on court for both teams together.
    #[must_use]
    pub const fn headcount(self) -> usize {
        match self {
            Self::FourVFour => 8,
            Self::SixVSix => 12,
        }
    }

    /// Players on one side of the net.
    #[must_use]
    pub const fn team_size(self) -> usize {
        self.headcount() / 2
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FourVFour => write!(f, "4v4"),
            Self::SixVSix => write!(f, "6v6"),
        }
    }
}

impl FromStr for GameMode {
    type Err = RotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "4v4" | "4" => Ok(Self::FourVFour),
            "6v6" | "6" => Ok(Self::SixVSix),
            _ => Err(RotationError::UnknownGameMode(s.to_string())),
        }
    }
}

/// Side of the net.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

impl FromStr for Side {
    type Err = RotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" | "A" => Ok(Self::A),
            "b" | "B" => Ok(Self::B),
            _ => Err(RotationError::UnknownSide(s.to_string())),
        }
    }
}

/// A named line-up of player snapshots.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Team {
    pub name: String,
    pub players: Vec<Player>,
}

impl Team {
    pub fn new(name: impl Into<String>, players: Vec<Player>) -> Self {
        Self {
            name: name.into(),
            players,
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Player ids in line-up order.
    pub fn ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }
}

/// A match on court or in history.
///
/// Line-ups are fixed once drafted, apart from substitutions on the current
/// match. `end_time` and `winner` are written once when the match ends.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Match {
    pub id: MatchId,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub team_a: Team,
    pub team_b: Team,
    pub winner: Option<Side>,
    pub game_mode: GameMode,
}

impl Match {
    #[must_use]
    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    /// Which side a player is on, if any.
    pub fn side_of(&self, id: PlayerId) -> Option<Side> {
        if self.team_a.contains(id) {
            Some(Side::A)
        } else if self.team_b.contains(id) {
            Some(Side::B)
        } else {
            None
        }
    }

    /// Every player id on court, team A first.
    pub fn player_ids(&self) -> Vec<PlayerId> {
        let mut ids = self.team_a.ids();
        ids.extend(self.team_b.ids());
        ids
    }

    /// Finished copy of this match for the history.
    #[must_use]
    pub fn finished(&self, winner: Side, end_time: DateTime<Utc>) -> Self {
        Self {
            end_time: Some(end_time),
            winner: Some(winner),
            ..self.clone()
        }
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |team: &Team| {
            team.players
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(
            f,
            "Match #{} ({}): {} [{}] vs {} [{}]",
            self.id,
            self.game_mode,
            self.team_a.name,
            names(&self.team_a),
            self.team_b.name,
            names(&self.team_b)
        )?;
        if let Some(winner) = self.winner {
            write!(f, " - winner {winner}")?;
        }
        Ok(())
    }
}
