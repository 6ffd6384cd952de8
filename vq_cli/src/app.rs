//! Command execution against the application state.

use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};
use std::fmt::Write as _;
use thiserror::Error;
use volley_queue::{
    EndOutcome, GameMode, Match, NewPlayer, Player, PlayerId, RosterError, RosterProvider,
    RotationError, SessionError, SettingsError, Side, SubstitutionOutcome, end_match,
    perform_substitution, start_match, suggest_substitute,
};

use crate::commands::Command;
use crate::config::CliConfig;
use crate::store::{self, AppState, StoreError};

const DEFAULT_HISTORY_LEN: usize = 10;

pub const COMMANDS_HELP: &str = "\
COMMANDS:
  players                            List the roster
  add NAME POSITIONS PRIORITY GENDER Register a player (e.g. 'add Ana s,d member female')
  toggle ID                          Activate or deactivate a player
  delete ID...                       Remove players from the roster
  present ID                         Check a player in or out for today
  queue                              Show the queue and the next challengers
  enqueue ID                         Put a player at the back of the queue
  dequeue ID                         Take a player out of the queue
  start [4v4|6v6]                    Draft a match from the front of the queue
  end a|b                            End the match; the winners stay on
  sub OUT IN                         Swap a queued player onto court
  suggest OUT                        Recommend a substitute for a player on court
  match                              Show the match on court
  history [N]                        Show the last N matches
  mode 4v4|6v6                       Set the default game mode
  priority [LIST]                    Show or set the balancing criteria order
  priority move FROM TO              Move a criterion (1-based positions)
  reset-day                          Clear presence, queue and the match on court
  clear-all                          Forget everything
  quit                               Save and exit
";

/// What the prompt should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// A command that was rejected. State is unchanged when one is returned.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Rotation(#[from] RotationError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("No match in progress.")]
    NoMatch,

    #[error("Player {0} is not on the roster")]
    UnknownIncoming(PlayerId),

    #[error("Player {0} is not on court")]
    NotOnCourt(PlayerId),

    #[error("Player {0} is already on court")]
    AlreadyOnCourt(PlayerId),
}

/// The composition root: owns the state and runs commands against it.
pub struct App {
    state: AppState,
    config: CliConfig,
}

impl App {
    /// Wrap loaded state, applying configuration overrides to its settings.
    #[must_use]
    pub fn new(mut state: AppState, config: CliConfig) -> Self {
        config.apply_to(&mut state.settings);
        Self { state, config }
    }

    /// Load state from the configured data file.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but is unreadable.
    pub fn load(config: CliConfig) -> Result<Self, StoreError> {
        let state = store::load(&config.data_file)?;
        info!(
            "Loaded {} players, {} queued, {} matches played",
            state.roster.len(),
            state.session.queue.len(),
            state.session.match_history.len()
        );
        Ok(Self::new(state, config))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run a command now.
    ///
    /// # Errors
    ///
    /// Returns the rejection reason; state is unchanged on error.
    pub fn execute(&mut self, command: Command) -> Result<Reply, AppError> {
        self.execute_at(command, Utc::now())
    }

    /// Run a command as if it were `now`, saving afterwards if it changed state.
    ///
    /// # Errors
    ///
    /// Returns the rejection reason; state is unchanged on error.
    pub fn execute_at(&mut self, command: Command, now: DateTime<Utc>) -> Result<Reply, AppError> {
        let mutating = command.is_mutating();
        let reply = self.dispatch(command, now)?;
        if mutating {
            self.persist();
        }
        Ok(reply)
    }

    /// Save the state if autosave is on. Failures are logged, not returned.
    pub fn persist(&self) {
        if !self.config.autosave {
            return;
        }
        if let Err(err) = store::save(&self.config.data_file, &self.state) {
            warn!("Failed to save state: {err}");
        }
    }

    fn dispatch(&mut self, command: Command, now: DateTime<Utc>) -> Result<Reply, AppError> {
        let today = now.date_naive();
        let text = match command {
            Command::Help => COMMANDS_HELP.to_string(),
            Command::Quit => return Ok(Reply::Quit),
            Command::Players => self.list_players(),
            Command::Add(new_player) => self.add_player(new_player)?,
            Command::Toggle(id) => {
                let active = self.state.roster.toggle_active(id)?;
                let state = if active { "active" } else { "inactive" };
                format!("{} is now {state}", self.name_of(id))
            }
            Command::Delete(ids) => {
                let removed = self.state.roster.remove_players(&ids);
                self.state.session.forget_players(&ids);
                info!("Deleted {} players", removed.len());
                format!("Deleted {} player(s)", removed.len())
            }
            Command::Present(id) => self.toggle_presence(id, today)?,
            Command::Queue => self.show_queue(),
            Command::Enqueue(id) => {
                if self.state.session.add_to_queue(&self.state.roster, id)? {
                    format!("{} queued at position {}", self.name_of(id), self.state.session.queue.len())
                } else {
                    format!("{} is already in the queue", self.name_of(id))
                }
            }
            Command::Dequeue(id) => {
                if self.state.session.remove_from_queue(id) {
                    format!("{} left the queue", self.name_of(id))
                } else {
                    format!("Player {id} is not in the queue")
                }
            }
            Command::Start(mode) => self.start(mode, now)?,
            Command::End(winner) => self.end(winner, now)?,
            Command::Sub { out, incoming } => self.substitute(out, incoming)?,
            Command::Suggest(out) => {
                match suggest_substitute(&self.state.session, &self.state.roster, out) {
                    Some(player) => format!("Suggested substitute: {player}"),
                    None => "Nobody in the queue to bring in".to_string(),
                }
            }
            Command::Match => match &self.state.session.current_match {
                Some(current) => describe_match(current),
                None => return Err(AppError::NoMatch),
            },
            Command::History(count) => self.show_history(count.unwrap_or(DEFAULT_HISTORY_LEN)),
            Command::Mode(mode) => {
                self.state.settings.default_game_mode = mode;
                format!("Default game mode is now {mode}")
            }
            Command::ShowPriority => self.show_priority(),
            Command::SetPriority(order) => {
                self.state.settings.set_priority_order(order)?;
                self.show_priority()
            }
            Command::MovePriority { from, to } => {
                let len = self.state.settings.team_formation_priority.len();
                let index = |position: usize| {
                    position
                        .checked_sub(1)
                        .ok_or(SettingsError::IndexOutOfRange { index: position, len })
                };
                self.state.settings.move_criterion(index(from)?, index(to)?)?;
                self.show_priority()
            }
            Command::ResetDay => {
                self.state.session.reset_day(today);
                "Presence, queue and match on court cleared".to_string()
            }
            Command::ClearAll => {
                self.state = AppState::default();
                self.config.apply_to(&mut self.state.settings);
                info!("All data cleared");
                "All data cleared".to_string()
            }
        };
        Ok(Reply::Text(text))
    }

    fn name_of(&self, id: PlayerId) -> String {
        self.state
            .roster
            .find_player(id)
            .map_or_else(|| format!("Player {id}"), |p| p.name.clone())
    }

    fn list_players(&self) -> String {
        let players = self.state.roster.players();
        if players.is_empty() {
            return "No players registered".to_string();
        }
        let mut out = String::new();
        for player in players {
            let present = if self.state.session.is_present(player.id) {
                " (present)"
            } else {
                ""
            };
            let inactive = if player.active { "" } else { " (inactive)" };
            let _ = writeln!(out, "{player}{present}{inactive}");
        }
        out
    }

    fn add_player(&mut self, new_player: NewPlayer) -> Result<String, AppError> {
        let id = self.state.roster.add_player(new_player)?;
        let player = self
            .state
            .roster
            .find_player(id)
            .ok_or(RosterError::NotFound(id))?;
        Ok(format!("Added {player}"))
    }

    fn toggle_presence(&mut self, id: PlayerId, today: NaiveDate) -> Result<String, AppError> {
        let present = self
            .state
            .session
            .toggle_presence(&self.state.roster, id, today)?;
        let name = self.name_of(id);
        Ok(if present {
            let position = self.state.session.queue.position(id).map_or(0, |p| p + 1);
            format!("{name} checked in (queue position {position})")
        } else {
            format!("{name} checked out")
        })
    }

    fn show_queue(&self) -> String {
        let session = &self.state.session;
        if session.queue.is_empty() {
            return "The queue is empty".to_string();
        }
        let mut out = format!("Queue ({}):\n", session.queue.len());
        for (idx, id) in session.queue.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", idx + 1, self.name_of(id));
        }

        let mode = session
            .current_match
            .as_ref()
            .map_or(self.state.settings.default_game_mode, |m| m.game_mode);
        let preview = session.challenger_preview(&self.state.roster, mode);
        let _ = write!(out, "Next challengers: {}", names(&preview.players));
        if !preview.is_complete() {
            let _ = write!(out, " (need {} more)", preview.still_needed);
        }
        out
    }

    fn start(&mut self, mode: Option<GameMode>, now: DateTime<Utc>) -> Result<String, AppError> {
        let mode = mode.unwrap_or(self.state.settings.default_game_mode);
        let transition = start_match(
            &self.state.session,
            &self.state.roster,
            &self.state.settings,
            mode,
            now,
        )?;
        self.state.session = transition.session;

        let mut out = String::from("Match started\n");
        if let Some(current) = &self.state.session.current_match {
            out.push_str(&describe_match(current));
        }
        push_dropped(&mut out, &transition.outcome.dropped);
        Ok(out)
    }

    fn end(&mut self, winner: Side, now: DateTime<Utc>) -> Result<String, AppError> {
        let transition = end_match(&self.state.session, &self.state.roster, winner, now);
        self.state.session = transition.session;

        let mut out = match self.state.session.match_history.first() {
            Some(finished) if transition.outcome != EndOutcome::NoMatch => format!(
                "Match #{} won by {}\n",
                finished.id,
                finished.team(winner).name
            ),
            _ => String::new(),
        };
        match transition.outcome {
            EndOutcome::NoMatch => return Err(AppError::NoMatch),
            EndOutcome::SessionEnded => out.push_str(
                "Not enough players for a challenger team. The winners are first in the queue.",
            ),
            EndOutcome::NextMatch { dropped, .. } => {
                out.push_str("Winners stay on\n");
                if let Some(current) = &self.state.session.current_match {
                    out.push_str(&describe_match(current));
                }
                push_dropped(&mut out, &dropped);
            }
        }
        Ok(out)
    }

    fn substitute(&mut self, out: PlayerId, incoming: PlayerId) -> Result<String, AppError> {
        let transition =
            perform_substitution(&self.state.session, &self.state.roster, out, incoming);
        match transition.outcome {
            SubstitutionOutcome::Applied => {
                self.state.session = transition.session;
                Ok(format!(
                    "{} in for {}",
                    self.name_of(incoming),
                    self.name_of(out)
                ))
            }
            SubstitutionOutcome::NoMatch => Err(AppError::NoMatch),
            SubstitutionOutcome::UnknownIncoming => Err(AppError::UnknownIncoming(incoming)),
            SubstitutionOutcome::OutgoingNotOnCourt => Err(AppError::NotOnCourt(out)),
            SubstitutionOutcome::IncomingAlreadyOnCourt => Err(AppError::AlreadyOnCourt(incoming)),
        }
    }

    fn show_history(&self, count: usize) -> String {
        let history = &self.state.session.match_history;
        if history.is_empty() {
            return "No matches played yet".to_string();
        }
        history
            .iter()
            .take(count)
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn show_priority(&self) -> String {
        let settings = &self.state.settings;
        let mut out = format!("Default mode: {}\nBalancing order:", settings.default_game_mode);
        for (idx, criterion) in settings.team_formation_priority.iter().enumerate() {
            let _ = write!(out, "\n  {}. {criterion}", idx + 1);
        }
        out
    }
}

fn names(players: &[Player]) -> String {
    if players.is_empty() {
        return "-".to_string();
    }
    players
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_match(current: &Match) -> String {
    format!(
        "Match #{} ({})\n  {}: {}\n  {}: {}",
        current.id,
        current.game_mode,
        current.team_a.name,
        names(&current.team_a.players),
        current.team_b.name,
        names(&current.team_b.players)
    )
}

fn push_dropped(out: &mut String, dropped: &[PlayerId]) {
    if !dropped.is_empty() {
        let ids = dropped
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(out, "\nSkipped players no longer on the roster: {ids}");
    }
}
