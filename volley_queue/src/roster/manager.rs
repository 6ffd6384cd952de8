//! Roster storage and lookup.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::errors::{RosterError, RosterResult};
use super::models::{NewPlayer, Player, PlayerId, Position};

/// Read-only view of the roster used by the rotation engine.
pub trait RosterProvider {
    /// Look a player up by id.
    fn find_player(&self, id: PlayerId) -> Option<&Player>;

    /// All players in a stable order.
    fn players(&self) -> &[Player];
}

/// Players resolved from a list of ids.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Snapshots of every id that resolved, in input order
    pub players: Vec<Player>,
    /// Ids that didn't resolve to a known player
    pub dropped: Vec<PlayerId>,
}

/// Turn ids into player snapshots, filtering out ids that no longer resolve.
///
/// Unknown ids are not an error. They are collected in [`Resolved::dropped`]
/// and logged so callers can surface them.
pub fn resolve<R, I>(roster: &R, ids: I) -> Resolved
where
    R: RosterProvider + ?Sized,
    I: IntoIterator<Item = PlayerId>,
{
    let mut resolved = Resolved::default();
    for id in ids {
        match roster.find_player(id) {
            Some(player) => resolved.players.push(player.clone()),
            None => {
                warn!("Dropping unknown player id {id}");
                resolved.dropped.push(id);
            }
        }
    }
    resolved
}

/// The set of registered players.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
}

impl RosterProvider for Roster {
    fn find_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn players(&self) -> &[Player] {
        &self.players
    }
}

impl Roster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from existing players, keeping their ids.
    #[must_use]
    pub fn from_players(players: Vec<Player>) -> Self {
        Self { players }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Register a new, active player and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::EmptyName`] or [`RosterError::NoPositions`]
    /// if the player data is incomplete.
    pub fn add_player(&mut self, new_player: NewPlayer) -> RosterResult<PlayerId> {
        let (name, positions) = validate(&new_player.name, &new_player.positions)?;
        let id = self.next_id();
        self.players.push(Player {
            id,
            name,
            positions,
            priority: new_player.priority,
            gender: new_player.gender,
            active: true,
        });
        info!("Registered player {id}");
        Ok(id)
    }

    /// Replace the stored player with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::NotFound`] if no player has this id, or a
    /// validation error if the new data is incomplete.
    pub fn update_player(&mut self, player: Player) -> RosterResult<()> {
        let (name, positions) = validate(&player.name, &player.positions)?;
        let slot = self
            .players
            .iter_mut()
            .find(|p| p.id == player.id)
            .ok_or(RosterError::NotFound(player.id))?;
        *slot = Player {
            name,
            positions,
            ..player
        };
        Ok(())
    }

    /// Flip a player's active flag and return the new value.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::NotFound`] if no player has this id.
    pub fn toggle_active(&mut self, id: PlayerId) -> RosterResult<bool> {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RosterError::NotFound(id))?;
        player.active = !player.active;
        Ok(player.active)
    }

    /// Set the active flag on every listed player. Unknown ids are ignored.
    pub fn set_active(&mut self, ids: &[PlayerId], active: bool) -> usize {
        let mut changed = 0;
        for player in self.players.iter_mut().filter(|p| ids.contains(&p.id)) {
            player.active = active;
            changed += 1;
        }
        changed
    }

    /// Delete players and return the removed entries.
    ///
    /// Queue and presence entries for these ids live in the session and must
    /// be purged there as well.
    pub fn remove_players(&mut self, ids: &[PlayerId]) -> Vec<Player> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.players)
            .into_iter()
            .partition(|p| ids.contains(&p.id));
        self.players = kept;
        if !removed.is_empty() {
            info!("Removed {} player(s) from the roster", removed.len());
        }
        removed
    }

    /// Active players sorted by name.
    pub fn active_players(&self) -> Vec<&Player> {
        let mut active: Vec<&Player> = self.players.iter().filter(|p| p.active).collect();
        active.sort_by(|a, b| a.name.cmp(&b.name));
        active
    }

    fn next_id(&self) -> PlayerId {
        self.players.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }
}

fn validate(name: &str, positions: &[Position]) -> RosterResult<(String, Vec<Position>)> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RosterError::EmptyName);
    }

    let mut unique = Vec::with_capacity(positions.len());
    for pos in positions {
        if !unique.contains(pos) {
            unique.push(*pos);
        }
    }
    if unique.is_empty() {
        return Err(RosterError::NoPositions);
    }

    Ok((name.to_string(), unique))
}
