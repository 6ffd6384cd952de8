//! Session state: queue, match on court, history and attendance.

pub mod errors;
pub mod models;
pub mod state;

pub use errors::{SessionError, SessionResult};
pub use models::{AttendanceRecord, ChallengerPreview};
pub use state::Session;
