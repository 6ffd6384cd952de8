//! Team formation policy.
//!
//! Splits a drafted batch of players into two teams. The split is
//! deterministic: setters are dealt alternately, then the remaining role
//! groups are appended one player at a time to whichever team is smaller.
//! Within every group players are ordered by the configured criteria with
//! the player name as the final tie-break.

use log::debug;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, str::FromStr};

use crate::roster::{Gender, Player, Position, Priority};
use crate::settings::SettingsError;

/// Balancing criterion. Earlier criteria in the configured order win ties.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    /// Members before visitors
    Priority,
    /// Setters before everyone else
    Setter,
    /// Women before men
    Gender,
}

impl Criterion {
    pub const ALL: [Criterion; 3] = [Self::Priority, Self::Setter, Self::Gender];

    /// Compare two players on this criterion alone.
    #[must_use]
    pub fn compare(self, a: &Player, b: &Player) -> Ordering {
        match self {
            Self::Priority => preferred_first(
                a.priority == Priority::Member,
                b.priority == Priority::Member,
            ),
            Self::Setter => preferred_first(a.is_setter(), b.is_setter()),
            Self::Gender => {
                preferred_first(a.gender == Gender::Female, b.gender == Gender::Female)
            }
        }
    }
}

fn preferred_first(a: bool, b: bool) -> Ordering {
    b.cmp(&a)
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Priority => "priority",
            Self::Setter => "setter",
            Self::Gender => "gender",
        };
        write!(f, "{repr}")
    }
}

impl FromStr for Criterion {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "priority" => Ok(Self::Priority),
            "setter" => Ok(Self::Setter),
            "gender" => Ok(Self::Gender),
            other => Err(SettingsError::UnknownCriterion(other.to_string())),
        }
    }
}

/// Order two players by `order`, falling back to a case-sensitive name
/// comparison when every criterion ties.
#[must_use]
pub fn rank(a: &Player, b: &Player, order: &[Criterion]) -> Ordering {
    order
        .iter()
        .map(|criterion| criterion.compare(a, b))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| a.name.cmp(&b.name))
}

/// Role group a player is drafted from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RoleGroup {
    /// Holds the setter tag, whatever else they play
    Setter,
    /// Attacks and defends
    Versatile,
    AttackerOnly,
    DefenderOnly,
}

impl RoleGroup {
    /// Classify a player. `None` for a player without any position.
    #[must_use]
    pub fn of(player: &Player) -> Option<Self> {
        let attacker = player.has_position(Position::Attacker);
        let defender = player.has_position(Position::Defender);
        match (player.is_setter(), attacker, defender) {
            (true, _, _) => Some(Self::Setter),
            (false, true, true) => Some(Self::Versatile),
            (false, true, false) => Some(Self::AttackerOnly),
            (false, false, true) => Some(Self::DefenderOnly),
            (false, false, false) => None,
        }
    }
}

#[derive(Default)]
struct RoleGroups {
    setters: Vec<Player>,
    versatile: Vec<Player>,
    attackers: Vec<Player>,
    defenders: Vec<Player>,
}

impl RoleGroups {
    fn partition(candidates: &[Player]) -> Self {
        let mut groups = Self::default();
        for player in candidates {
            let bucket = match RoleGroup::of(player) {
                Some(RoleGroup::Setter) => &mut groups.setters,
                Some(RoleGroup::Versatile) => &mut groups.versatile,
                Some(RoleGroup::AttackerOnly) => &mut groups.attackers,
                Some(RoleGroup::DefenderOnly) => &mut groups.defenders,
                None => {
                    debug!("Player {} has no position, leaving out", player.id);
                    continue;
                }
            };
            bucket.push(player.clone());
        }
        groups
    }

    fn sort(&mut self, order: &[Criterion]) {
        for group in [
            &mut self.setters,
            &mut self.versatile,
            &mut self.attackers,
            &mut self.defenders,
        ] {
            group.sort_by(|a, b| rank(a, b, order));
        }
    }
}

/// Split `candidates` into team A and team B.
///
/// With an even number of candidates that all hold a position both teams
/// come out the same size. Position balance beyond that is best effort.
#[must_use]
pub fn form_teams(candidates: &[Player], order: &[Criterion]) -> (Vec<Player>, Vec<Player>) {
    let mut groups = RoleGroups::partition(candidates);
    groups.sort(order);

    let mut team_a = Vec::with_capacity(candidates.len() / 2 + 1);
    let mut team_b = Vec::with_capacity(candidates.len() / 2 + 1);

    for (idx, setter) in groups.setters.into_iter().enumerate() {
        if idx % 2 == 0 {
            team_a.push(setter);
        } else {
            team_b.push(setter);
        }
    }

    for group in [groups.versatile, groups.attackers, groups.defenders] {
        for player in group {
            if team_a.len() <= team_b.len() {
                team_a.push(player);
            } else {
                team_b.push(player);
            }
        }
    }

    debug!(
        "Formed teams of {} and {} from {} candidates",
        team_a.len(),
        team_b.len(),
        candidates.len()
    );
    (team_a, team_b)
}
