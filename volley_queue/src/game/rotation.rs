//! The rotation engine: winner-stays-on match flow over a [`Session`].
//!
//! Every operation reads the current session and returns the next one.
//! The input is never mutated, so a rejected command leaves no trace.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use super::errors::{RotationError, RotationResult};
use super::formation::form_teams;
use super::models::{
    CHALLENGER_TEAM_NAME, GameMode, Match, MatchId, Side, TEAM_A_NAME, TEAM_B_NAME, Team,
    WINNER_TEAM_NAME,
};
use crate::roster::{Player, PlayerId, RosterProvider, resolve};
use crate::session::Session;
use crate::settings::GameSettings;

/// The session after an operation, plus what happened.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transition<O> {
    pub session: Session,
    pub outcome: O,
}

impl<O> Transition<O> {
    fn new(session: Session, outcome: O) -> Self {
        Self { session, outcome }
    }
}

/// Result of a successful [`start_match`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Started {
    pub match_id: MatchId,
    /// Queue ids that no longer resolved and were left out of the draw
    pub dropped: Vec<PlayerId>,
}

/// Result of [`end_match`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EndOutcome {
    /// Nothing was on court.
    NoMatch,
    /// Winners stay on against a freshly drafted challenger team.
    NextMatch {
        match_id: MatchId,
        challengers: Vec<PlayerId>,
        dropped: Vec<PlayerId>,
    },
    /// Too few players left to draft challengers; winners went to the
    /// front of the queue.
    SessionEnded,
}

/// Result of [`perform_substitution`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubstitutionOutcome {
    Applied,
    NoMatch,
    UnknownIncoming,
    OutgoingNotOnCourt,
    IncomingAlreadyOnCourt,
}

impl SubstitutionOutcome {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

/// Draft a match from the front of the queue.
///
/// Takes exactly `mode.headcount()` ids in FIFO order, forms balanced teams
/// with the configured criteria and puts the match on court.
///
/// # Errors
///
/// [`RotationError::InsufficientPlayers`] if the queue is too short, then
/// [`RotationError::MatchAlreadyInProgress`] if a match is on court.
pub fn start_match<R: RosterProvider + ?Sized>(
    session: &Session,
    roster: &R,
    settings: &GameSettings,
    mode: GameMode,
    now: DateTime<Utc>,
) -> RotationResult<Transition<Started>> {
    let required = mode.headcount();
    if session.queue.len() < required {
        return Err(RotationError::InsufficientPlayers {
            required,
            available: session.queue.len(),
        });
    }
    if session.current_match.is_some() {
        return Err(RotationError::MatchAlreadyInProgress);
    }

    let mut next = session.clone();
    let drafted = resolve(roster, next.queue.take_front(required));
    let (team_a, team_b) = form_teams(&drafted.players, &settings.team_formation_priority);
    let match_id = next.allocate_match_id();

    info!(
        "Match #{match_id} ({mode}) started with {} vs {} players",
        team_a.len(),
        team_b.len()
    );
    next.current_match = Some(Match {
        id: match_id,
        start_time: now,
        end_time: None,
        team_a: Team::new(TEAM_A_NAME, team_a),
        team_b: Team::new(TEAM_B_NAME, team_b),
        winner: None,
        game_mode: mode,
    });

    Ok(Transition::new(
        next,
        Started {
            match_id,
            dropped: drafted.dropped,
        },
    ))
}

/// Close the current match and rotate.
///
/// The finished match goes to the front of the history. Losers join the
/// back of the line. If the line can fill a challenger team, the winners
/// stay on against it; otherwise the winners go to the front of the line
/// and the court is cleared.
pub fn end_match<R: RosterProvider + ?Sized>(
    session: &Session,
    roster: &R,
    winner: Side,
    now: DateTime<Utc>,
) -> Transition<EndOutcome> {
    let Some(current) = session.current_match.as_ref() else {
        debug!("No match on court to end");
        return Transition::new(session.clone(), EndOutcome::NoMatch);
    };

    let mut next = session.clone();
    next.match_history.insert(0, current.finished(winner, now));
    info!("Match #{} won by {}", current.id, current.team(winner).name);

    let winners = current.team(winner).players.clone();
    let challenger_size = current.game_mode.team_size();
    let mut pool = next.queue.to_vec();
    pool.extend(current.team(winner.opponent()).ids());

    if pool.len() < challenger_size {
        info!(
            "Only {} players waiting, {challenger_size} needed; session ended",
            pool.len()
        );
        let mut line: Vec<PlayerId> = winners.iter().map(|p| p.id).collect();
        line.extend(pool);
        next.queue.replace(line);
        next.current_match = None;
        return Transition::new(next, EndOutcome::SessionEnded);
    }

    let rest = pool.split_off(challenger_size);
    let drafted = resolve(roster, pool.iter().copied());
    let challengers = drafted.players.iter().map(|p| p.id).collect();
    let match_id = next.allocate_match_id();

    info!("Match #{match_id} ({}) started: winners stay on", current.game_mode);
    next.queue.replace(rest);
    next.current_match = Some(Match {
        id: match_id,
        start_time: now,
        end_time: None,
        team_a: Team::new(WINNER_TEAM_NAME, winners),
        team_b: Team::new(CHALLENGER_TEAM_NAME, drafted.players),
        winner: None,
        game_mode: current.game_mode,
    });

    Transition::new(
        next,
        EndOutcome::NextMatch {
            match_id,
            challengers,
            dropped: drafted.dropped,
        },
    )
}

/// Swap a queued player onto court in place of an on-court player.
///
/// The incoming player leaves the queue and the outgoing player rejoins at
/// the back. Anything that would break the one-place-per-player rule is a
/// no-op reported through the outcome.
pub fn perform_substitution<R: RosterProvider + ?Sized>(
    session: &Session,
    roster: &R,
    out_id: PlayerId,
    in_id: PlayerId,
) -> Transition<SubstitutionOutcome> {
    let unchanged = |outcome| Transition::new(session.clone(), outcome);

    let Some(current) = session.current_match.as_ref() else {
        return unchanged(SubstitutionOutcome::NoMatch);
    };
    let Some(incoming) = roster.find_player(in_id) else {
        warn!("Substitution ignored: player {in_id} is not on the roster");
        return unchanged(SubstitutionOutcome::UnknownIncoming);
    };
    if current.side_of(out_id).is_none() {
        warn!("Substitution ignored: player {out_id} is not on court");
        return unchanged(SubstitutionOutcome::OutgoingNotOnCourt);
    }
    if current.side_of(in_id).is_some() {
        warn!("Substitution ignored: player {in_id} is already on court");
        return unchanged(SubstitutionOutcome::IncomingAlreadyOnCourt);
    }

    let mut next = session.clone();
    next.queue.remove(in_id);
    next.queue.requeue(out_id);
    if let Some(on_court) = next.current_match.as_mut() {
        for team in [&mut on_court.team_a, &mut on_court.team_b] {
            for slot in team.players.iter_mut().filter(|p| p.id == out_id) {
                *slot = incoming.clone();
            }
        }
    }

    info!("Player {in_id} ({}) substituted for player {out_id}", incoming.name);
    Transition::new(next, SubstitutionOutcome::Applied)
}

/// Recommend a queued player to replace `out_id`.
///
/// A setter is replaced by the first queued setter if there is one. After
/// that the first queued player sharing any position wins, and failing
/// that the front of the line. Advisory only; nothing is changed.
pub fn suggest_substitute<R: RosterProvider + ?Sized>(
    session: &Session,
    roster: &R,
    out_id: PlayerId,
) -> Option<Player> {
    let outgoing = session
        .current_match
        .as_ref()
        .and_then(|m| {
            [&m.team_a, &m.team_b]
                .into_iter()
                .flat_map(|team| team.players.iter())
                .find(|p| p.id == out_id)
        })
        .or_else(|| roster.find_player(out_id))?;

    let waiting = resolve(roster, session.queue.iter()).players;
    let preferred = outgoing
        .is_setter()
        .then(|| waiting.iter().find(|p| p.is_setter()))
        .flatten()
        .or_else(|| waiting.iter().find(|p| p.shares_position_with(outgoing)));

    preferred.or_else(|| waiting.first()).cloned()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::roster::{Gender, NewPlayer, Position, Priority, Roster};

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 18, minute, 0).unwrap()
    }

    fn roster_of(n: usize) -> Roster {
        let mut roster = Roster::new();
        for i in 0..n {
            let positions = match i % 4 {
                0 => vec![Position::Setter],
                1 => vec![Position::Attacker],
                2 => vec![Position::Defender],
                _ => vec![Position::Attacker, Position::Defender],
            };
            let gender = if i % 2 == 0 { Gender::Male } else { Gender::Female };
            roster
                .add_player(NewPlayer::new(
                    format!("Player{i:02}"),
                    positions,
                    Priority::Member,
                    gender,
                ))
                .unwrap();
        }
        roster
    }

    fn queued(ids: impl IntoIterator<Item = PlayerId>) -> Session {
        let mut session = Session::new();
        session.queue.replace(ids.into_iter().collect());
        session
    }

    fn started(session: &Session, roster: &Roster, mode: GameMode) -> Session {
        start_match(session, roster, &GameSettings::default(), mode, at(0))
            .unwrap()
            .session
    }

    #[test]
    fn test_start_match_consumes_queue_front() {
        let roster = roster_of(10);
        let session = queued(1..=10);

        let transition =
            start_match(&session, &roster, &GameSettings::default(), GameMode::FourVFour, at(0))
                .unwrap();

        let next = transition.session;
        let current = next.current_match.as_ref().unwrap();
        assert_eq!(transition.outcome.match_id, current.id);
        assert_eq!(current.team_a.name, TEAM_A_NAME);
        assert_eq!(current.team_b.name, TEAM_B_NAME);
        assert_eq!(current.team_a.len(), 4);
        assert_eq!(current.team_b.len(), 4);
        let mut on_court = current.player_ids();
        on_court.sort_unstable();
        assert_eq!(on_court, (1..=8).collect::<Vec<_>>());
        assert_eq!(next.queue.to_vec(), vec![9, 10]);

        // Input untouched
        assert_eq!(session.queue.len(), 10);
        assert!(session.current_match.is_none());
    }

    #[test]
    fn test_start_match_insufficient_players() {
        let roster = roster_of(7);
        let session = queued(1..=7);
        let err = start_match(&session, &roster, &GameSettings::default(), GameMode::FourVFour, at(0))
            .unwrap_err();
        assert_eq!(
            err,
            RotationError::InsufficientPlayers {
                required: 8,
                available: 7
            }
        );
    }

    #[test]
    fn test_start_match_checks_headcount_before_current_match() {
        let roster = roster_of(8);
        let mut session = started(&queued(1..=8), &roster, GameMode::FourVFour);
        let err = start_match(&session, &roster, &GameSettings::default(), GameMode::FourVFour, at(1))
            .unwrap_err();
        assert!(matches!(err, RotationError::InsufficientPlayers { .. }));

        session.queue.replace((1..=8).collect());
        let err = start_match(&session, &roster, &GameSettings::default(), GameMode::FourVFour, at(1))
            .unwrap_err();
        assert_eq!(err, RotationError::MatchAlreadyInProgress);
    }

    #[test]
    fn test_start_match_drops_unknown_ids() {
        let roster = roster_of(7);
        let session = queued([1, 2, 3, 99, 4, 5, 6, 7, 8]);
        let transition =
            start_match(&session, &roster, &GameSettings::default(), GameMode::FourVFour, at(0))
                .unwrap();
        assert_eq!(transition.outcome.dropped, vec![99]);
        let current = transition.session.current_match.unwrap();
        assert_eq!(current.player_ids().len(), 7);
        assert_eq!(transition.session.queue.to_vec(), vec![8]);
    }

    #[test]
    fn test_end_match_without_match_is_noop() {
        let roster = roster_of(2);
        let session = queued([1, 2]);
        let transition = end_match(&session, &roster, Side::A, at(5));
        assert_eq!(transition.outcome, EndOutcome::NoMatch);
        assert_eq!(transition.session, session);
    }

    #[test]
    fn test_end_match_winners_stay_on() {
        let roster = roster_of(17);
        let mut session = started(&queued(1..=8), &roster, GameMode::FourVFour);
        session.queue.replace((13..=17).collect());
        let current = session.current_match.clone().unwrap();
        let winners = current.team_a.ids();
        let losers = current.team_b.ids();

        let transition = end_match(&session, &roster, Side::A, at(20));
        let next = transition.session;

        assert_eq!(next.match_history.len(), 1);
        assert_eq!(next.match_history[0].winner, Some(Side::A));
        assert_eq!(next.match_history[0].end_time, Some(at(20)));

        let rolled = next.current_match.as_ref().unwrap();
        assert_eq!(rolled.team_a.name, WINNER_TEAM_NAME);
        assert_eq!(rolled.team_b.name, CHALLENGER_TEAM_NAME);
        assert_eq!(rolled.team_a.ids(), winners);
        assert_eq!(rolled.team_b.ids(), vec![13, 14, 15, 16]);
        assert_ne!(rolled.id, current.id);

        let mut expected_queue = vec![17];
        expected_queue.extend(losers);
        assert_eq!(next.queue.to_vec(), expected_queue);
        assert!(matches!(
            transition.outcome,
            EndOutcome::NextMatch { ref challengers, .. } if challengers == &vec![13, 14, 15, 16]
        ));
    }

    #[test]
    fn test_end_match_draws_losers_when_queue_short() {
        let roster = roster_of(10);
        let session = started(&queued(1..=10), &roster, GameMode::FourVFour);
        let losers = session.current_match.as_ref().unwrap().team_a.ids();

        let next = end_match(&session, &roster, Side::B, at(20)).session;
        let rolled = next.current_match.unwrap();

        let mut expected = vec![9, 10];
        expected.extend(&losers[..2]);
        assert_eq!(rolled.team_b.ids(), expected);
        assert_eq!(next.queue.to_vec(), losers[2..].to_vec());
    }

    #[test]
    fn test_end_match_session_ends_when_pool_too_small() {
        let roster = roster_of(8);
        let mut session = started(&queued(1..=8), &roster, GameMode::FourVFour);
        // Losers leave before the end so the pool is short
        let current = session.current_match.clone().unwrap();
        session.current_match.as_mut().unwrap().team_b.players.truncate(2);
        let winners = current.team_a.ids();
        let remaining_losers = current.team_b.ids()[..2].to_vec();

        let transition = end_match(&session, &roster, Side::A, at(20));
        assert_eq!(transition.outcome, EndOutcome::SessionEnded);
        let next = transition.session;
        assert!(next.current_match.is_none());

        let mut expected = winners;
        expected.extend(remaining_losers);
        assert_eq!(next.queue.to_vec(), expected);
    }

    #[test]
    fn test_substitution_swaps_player() {
        let roster = roster_of(10);
        let session = started(&queued(1..=10), &roster, GameMode::FourVFour);
        let out_id = session.current_match.as_ref().unwrap().team_b.ids()[0];

        let transition = perform_substitution(&session, &roster, out_id, 9);
        assert_eq!(transition.outcome, SubstitutionOutcome::Applied);

        let next = transition.session;
        let current = next.current_match.as_ref().unwrap();
        assert_eq!(current.team_b.players[0].id, 9);
        assert_eq!(current.side_of(out_id), None);
        assert_eq!(next.queue.to_vec(), vec![10, out_id]);
        assert_eq!(current.id, session.current_match.as_ref().unwrap().id);
    }

    #[test]
    fn test_substitution_noops() {
        let roster = roster_of(10);
        let idle = queued(1..=10);
        assert_eq!(
            perform_substitution(&idle, &roster, 1, 9).outcome,
            SubstitutionOutcome::NoMatch
        );

        let session = started(&idle, &roster, GameMode::FourVFour);
        let on_court = session.current_match.as_ref().unwrap().player_ids();

        let cases = [
            (on_court[0], 42, SubstitutionOutcome::UnknownIncoming),
            (9, 10, SubstitutionOutcome::OutgoingNotOnCourt),
            (on_court[0], on_court[1], SubstitutionOutcome::IncomingAlreadyOnCourt),
        ];
        for (out_id, in_id, expected) in cases {
            let transition = perform_substitution(&session, &roster, out_id, in_id);
            assert_eq!(transition.outcome, expected);
            assert!(!transition.outcome.is_applied());
            assert_eq!(transition.session, session);
        }
    }

    #[test]
    fn test_suggest_substitute_prefers_setter_for_setter() {
        let roster = roster_of(16);
        let session = started(&queued(1..=16), &roster, GameMode::FourVFour);
        // Queue is 9..=16; setters are ids 1, 5, 9, 13
        let setter_on_court = session
            .current_match
            .as_ref()
            .unwrap()
            .team_a
            .players
            .iter()
            .find(|p| p.is_setter())
            .unwrap()
            .id;

        let mut session = session;
        session.queue.replace(vec![10, 11, 13, 9]);
        let pick = suggest_substitute(&session, &roster, setter_on_court).unwrap();
        assert_eq!(pick.id, 13);
    }

    #[test]
    fn test_suggest_substitute_shared_position_then_front() {
        let roster = roster_of(16);
        let session = started(&queued(1..=8), &roster, GameMode::FourVFour);
        // id 2 is attacker-only
        let mut with_queue = session.clone();
        with_queue.queue.replace(vec![9, 11, 12]);
        assert_eq!(suggest_substitute(&with_queue, &roster, 2).unwrap().id, 12);

        with_queue.queue.replace(vec![9, 11]);
        assert_eq!(suggest_substitute(&with_queue, &roster, 2).unwrap().id, 9);

        with_queue.queue.clear();
        assert!(suggest_substitute(&with_queue, &roster, 2).is_none());
        assert!(suggest_substitute(&session, &roster, 77).is_none());
    }

    #[test]
    fn test_suggest_substitute_setter_falls_back_to_shared_position() {
        let mut roster = roster_of(12);
        let mut hybrid = roster.find_player(1).unwrap().clone();
        hybrid.positions = vec![Position::Setter, Position::Attacker];
        roster.update_player(hybrid).unwrap();

        let mut session = started(&queued(1..=8), &roster, GameMode::FourVFour);
        // 11 is defender-only, 10 attacker-only; no setter waiting
        session.queue.replace(vec![11, 10]);
        assert_eq!(suggest_substitute(&session, &roster, 1).unwrap().id, 10);
    }
}
