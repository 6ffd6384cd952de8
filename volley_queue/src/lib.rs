//! # Volley Queue
//!
//! Queue and rotation engine for pickup volleyball.
//!
//! Players check in and join a first-come first-served line. A match is
//! drafted from the front of the line and split into two balanced teams.
//! When it ends the winners stay on court and face a challenger team
//! drafted from the line, while the losers go to the back.
//!
//! ## Core Modules
//!
//! - [`roster`]: Registered players and read-only lookup
//! - [`queue`]: The ordered waiting line
//! - [`game`]: Team formation and the rotation engine
//! - [`session`]: Daily state (queue, match on court, history, attendance)
//! - [`settings`]: Game mode and formation criteria
//!
//! ## Example
//!
//! ```
//! use chrono::Utc;
//! use volley_queue::{
//!     GameMode, GameSettings, Gender, NewPlayer, Position, Priority, Roster, Session,
//!     start_match,
//! };
//!
//! let mut roster = Roster::new();
//! let mut session = Session::new();
//! for i in 0..8 {
//!     let id = roster
//!         .add_player(NewPlayer::new(
//!             format!("Player {i}"),
//!             vec![Position::Attacker],
//!             Priority::Member,
//!             Gender::Female,
//!         ))
//!         .unwrap();
//!     session.add_to_queue(&roster, id).unwrap();
//! }
//!
//! let settings = GameSettings::default();
//! let started = start_match(&session, &roster, &settings, GameMode::FourVFour, Utc::now()).unwrap();
//! assert!(started.session.current_match.is_some());
//! assert!(started.session.queue.is_empty());
//! ```

/// Team formation, match models and rotation.
pub mod game;
pub use game::{
    Criterion, EndOutcome, GameMode, Match, MatchId, RotationError, RotationResult, Side,
    SubstitutionOutcome, Team, Transition, end_match, form_teams, perform_substitution,
    start_match, suggest_substitute,
};

/// The waiting line.
pub mod queue;
pub use queue::Queue;

/// Registered players.
pub mod roster;
pub use roster::{
    Gender, NewPlayer, Player, PlayerId, Position, Priority, Roster, RosterError, RosterProvider,
};

/// Daily session state.
pub mod session;
pub use session::{AttendanceRecord, ChallengerPreview, Session, SessionError};

/// User-facing game settings.
pub mod settings;
pub use settings::{GameSettings, SettingsError, parse_criteria};
