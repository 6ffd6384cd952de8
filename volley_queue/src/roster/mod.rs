//! Player roster.
//!
//! The roster owns every registered player. The rotation engine only reads
//! it through [`RosterProvider`] and copies players into matches by value.

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{RosterError, RosterResult};
pub use manager::{Resolved, Roster, RosterProvider, resolve};
pub use models::{Gender, NewPlayer, Player, PlayerId, Position, Priority};
