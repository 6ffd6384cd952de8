//! The session state container.

use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};

use super::errors::{SessionError, SessionResult};
use super::models::{AttendanceRecord, ChallengerPreview};
use crate::game::{GameMode, Match, MatchId};
use crate::queue::Queue;
use crate::roster::{PlayerId, RosterProvider, resolve};

fn first_match_id() -> MatchId {
    1
}

/// Everything that changes during a playing day.
///
/// The application owns one of these and hands it to the rotation engine
/// explicitly; nothing here is global. Rotation operations take a
/// `&Session` and return the next one, so a rejected command leaves the
/// caller's copy untouched.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "StoredSession")]
pub struct Session {
    pub queue: Queue,
    pub current_match: Option<Match>,
    /// Finished matches, most recent first
    pub match_history: Vec<Match>,
    /// Players checked in today, in check-in order
    pub presence: Vec<PlayerId>,
    pub attendance_history: Vec<AttendanceRecord>,
    next_match_id: MatchId,
}

/// On-disk shape of a [`Session`]; the id counter may be missing.
#[derive(Deserialize)]
struct StoredSession {
    queue: Queue,
    current_match: Option<Match>,
    match_history: Vec<Match>,
    presence: Vec<PlayerId>,
    attendance_history: Vec<AttendanceRecord>,
    #[serde(default)]
    next_match_id: Option<MatchId>,
}

impl From<StoredSession> for Session {
    fn from(stored: StoredSession) -> Self {
        // Never hand out an id that is already in the history
        let after_seen = stored
            .match_history
            .iter()
            .chain(stored.current_match.as_ref())
            .map(|m| m.id + 1)
            .max()
            .unwrap_or_else(first_match_id);
        let next_match_id = stored
            .next_match_id
            .map_or(after_seen, |id| id.max(after_seen));

        Self {
            queue: stored.queue,
            current_match: stored.current_match,
            match_history: stored.match_history,
            presence: stored.presence,
            attendance_history: stored.attendance_history,
            next_match_id,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self {
            queue: Queue::new(),
            current_match: None,
            match_history: Vec::new(),
            presence: Vec::new(),
            attendance_history: Vec::new(),
            next_match_id: first_match_id(),
        }
    }
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a fresh match id.
    pub(crate) fn allocate_match_id(&mut self) -> MatchId {
        let id = self.next_match_id;
        self.next_match_id += 1;
        id
    }

    pub fn is_present(&self, id: PlayerId) -> bool {
        self.presence.contains(&id)
    }

    pub fn is_on_court(&self, id: PlayerId) -> bool {
        self.current_match
            .as_ref()
            .is_some_and(|m| m.side_of(id).is_some())
    }

    /// Put a player in line.
    ///
    /// Returns `Ok(false)` if the player was already queued.
    ///
    /// # Errors
    ///
    /// Fails if the player is unknown, inactive, or currently on court.
    pub fn add_to_queue<R: RosterProvider + ?Sized>(
        &mut self,
        roster: &R,
        id: PlayerId,
    ) -> SessionResult<bool> {
        self.check_eligible(roster, id)?;
        Ok(self.queue.enqueue(id))
    }

    /// Take a player out of line. Returns `false` if they weren't queued.
    pub fn remove_from_queue(&mut self, id: PlayerId) -> bool {
        self.queue.remove(id)
    }

    /// Mark a player present for `today` and queue them.
    ///
    /// Returns `Ok(false)` if they were already present.
    ///
    /// # Errors
    ///
    /// Same as [`Session::add_to_queue`].
    pub fn check_in<R: RosterProvider + ?Sized>(
        &mut self,
        roster: &R,
        id: PlayerId,
        today: NaiveDate,
    ) -> SessionResult<bool> {
        if self.is_present(id) {
            return Ok(false);
        }
        self.check_eligible(roster, id)?;
        self.queue.enqueue(id);
        self.presence.push(id);
        self.record_attendance(today);
        info!("Player {id} checked in");
        Ok(true)
    }

    /// Mark a player absent and take them out of line.
    ///
    /// A player on court stays there until the match ends or they are
    /// substituted. Returns `false` if they weren't present.
    pub fn check_out(&mut self, id: PlayerId, today: NaiveDate) -> bool {
        if !self.is_present(id) {
            return false;
        }
        self.queue.remove(id);
        self.presence.retain(|&present| present != id);
        self.record_attendance(today);
        info!("Player {id} checked out");
        true
    }

    /// Check a player in if absent, out if present. Returns the new presence.
    ///
    /// # Errors
    ///
    /// Same as [`Session::check_in`].
    pub fn toggle_presence<R: RosterProvider + ?Sized>(
        &mut self,
        roster: &R,
        id: PlayerId,
        today: NaiveDate,
    ) -> SessionResult<bool> {
        if self.is_present(id) {
            self.check_out(id, today);
            Ok(false)
        } else {
            self.check_in(roster, id, today)?;
            Ok(true)
        }
    }

    /// Purge deleted players from the queue and presence list.
    pub fn forget_players(&mut self, ids: &[PlayerId]) {
        self.queue.retain(|id| !ids.contains(id));
        self.presence.retain(|id| !ids.contains(id));
    }

    /// Start a new day: nobody present, empty queue, no match on court.
    /// History is kept.
    pub fn reset_day(&mut self, today: NaiveDate) {
        self.presence.clear();
        self.record_attendance(today);
        self.queue.clear();
        self.current_match = None;
        info!("Daily data reset");
    }

    /// Forget everything, history included.
    pub fn clear_all(&mut self) {
        *self = Self::default();
        info!("Session cleared");
    }

    /// The players who would form the next challenger team.
    pub fn challenger_preview<R: RosterProvider + ?Sized>(
        &self,
        roster: &R,
        mode: GameMode,
    ) -> ChallengerPreview {
        let needed = mode.team_size();
        let players = resolve(roster, self.queue.peek_front(needed)).players;
        ChallengerPreview {
            still_needed: needed.saturating_sub(players.len()),
            players,
        }
    }

    fn check_eligible<R: RosterProvider + ?Sized>(
        &self,
        roster: &R,
        id: PlayerId,
    ) -> SessionResult<()> {
        let player = roster
            .find_player(id)
            .ok_or(SessionError::UnknownPlayer(id))?;
        if !player.active {
            return Err(SessionError::InactivePlayer(id));
        }
        if self.is_on_court(id) {
            return Err(SessionError::AlreadyOnCourt(id));
        }
        Ok(())
    }

    fn record_attendance(&mut self, today: NaiveDate) {
        let player_ids = self.presence.clone();
        match self
            .attendance_history
            .iter_mut()
            .find(|record| record.date == today)
        {
            Some(record) => record.player_ids = player_ids,
            None => self.attendance_history.push(AttendanceRecord {
                date: today,
                player_ids,
            }),
        }
    }
}
