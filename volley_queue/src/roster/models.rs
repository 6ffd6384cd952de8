//! Player data models.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::errors::RosterError;

/// Player ID type
pub type PlayerId = i64;

/// On-court capability tag. A player may hold several.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Setter,
    Attacker,
    Defender,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Setter => "setter",
            Self::Attacker => "attacker",
            Self::Defender => "defender",
        };
        write!(f, "{repr}")
    }
}

impl FromStr for Position {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "s" | "setter" => Ok(Self::Setter),
            "a" | "attacker" => Ok(Self::Attacker),
            "d" | "defender" => Ok(Self::Defender),
            _ => Err(RosterError::InvalidValue {
                field: "position",
                value: s.to_string(),
            }),
        }
    }
}

/// Membership class. Members outrank visitors when balancing.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Member,
    Visitor,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member => write!(f, "member"),
            Self::Visitor => write!(f, "visitor"),
        }
    }
}

impl FromStr for Priority {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "m" | "member" => Ok(Self::Member),
            "v" | "visitor" => Ok(Self::Visitor),
            _ => Err(RosterError::InvalidValue {
                field: "priority",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

impl FromStr for Gender {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Self::Male),
            "f" | "female" => Ok(Self::Female),
            _ => Err(RosterError::InvalidValue {
                field: "gender",
                value: s.to_string(),
            }),
        }
    }
}

/// A registered player.
///
/// Matches hold clones of these taken when a team is drafted, so editing
/// the roster afterwards never rewrites match history.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub positions: Vec<Position>,
    pub priority: Priority,
    pub gender: Gender,
    pub active: bool,
}

impl Player {
    #[must_use]
    pub fn has_position(&self, position: Position) -> bool {
        self.positions.contains(&position)
    }

    #[must_use]
    pub fn is_setter(&self) -> bool {
        self.has_position(Position::Setter)
    }

    /// Whether both players hold at least one common position.
    #[must_use]
    pub fn shares_position_with(&self, other: &Player) -> bool {
        self.positions.iter().any(|pos| other.has_position(*pos))
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let positions = self
            .positions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/");
        write!(
            f,
            "#{} {} [{}] {} {}",
            self.id, self.name, positions, self.priority, self.gender
        )
    }
}

/// Player data as entered by a user, before an id is assigned.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct NewPlayer {
    pub name: String,
    pub positions: Vec<Position>,
    pub priority: Priority,
    pub gender: Gender,
}

impl NewPlayer {
    pub fn new(
        name: impl Into<String>,
        positions: Vec<Position>,
        priority: Priority,
        gender: Gender,
    ) -> Self {
        Self {
            name: name.into(),
            positions,
            priority,
            gender,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(positions: Vec<Position>) -> Player {
        Player {
            id: 1,
            name: "Ana".to_string(),
            positions,
            priority: Priority::Member,
            gender: Gender::Female,
            active: true,
        }
    }

    #[test]
    fn test_is_setter() {
        assert!(player(vec![Position::Attacker, Position::Setter]).is_setter());
        assert!(!player(vec![Position::Attacker, Position::Defender]).is_setter());
    }

    #[test]
    fn test_shares_position_with() {
        let a = player(vec![Position::Attacker]);
        let b = player(vec![Position::Defender, Position::Attacker]);
        let c = player(vec![Position::Setter]);
        assert!(a.shares_position_with(&b));
        assert!(!a.shares_position_with(&c));
    }

    #[test]
    fn test_parse_attributes() {
        assert_eq!("S".parse::<Position>(), Ok(Position::Setter));
        assert_eq!("defender".parse::<Position>(), Ok(Position::Defender));
        assert_eq!("visitor".parse::<Priority>(), Ok(Priority::Visitor));
        assert_eq!("f".parse::<Gender>(), Ok(Gender::Female));
        assert!(matches!(
            "libero".parse::<Position>(),
            Err(RosterError::InvalidValue {
                field: "position",
                ..
            })
        ));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Position::Setter).unwrap();
        assert_eq!(json, "\"setter\"");
        let priority: Priority = serde_json::from_str("\"member\"").unwrap();
        assert_eq!(priority, Priority::Member);
    }

    #[test]
    fn test_display() {
        let p = player(vec![Position::Setter, Position::Defender]);
        assert_eq!(p.to_string(), "#1 Ana [setter/defender] member female");
    }
}
