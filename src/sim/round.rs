//! Round and series state machine
//!
//! ```text
//!  Simulating --(one kind left)--> RoundOver --(5 s)--> Simulating
//!       |
//!       +--(one kind left, 4th win)--> SeriesOver --(full reset)--> Simulating
//! ```
//!
//! Decisions are pure functions of the phase, the tallies and the clock;
//! timers and population changes belong to the caller.

use super::kind::{EntityKind, KindCounts};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::{ROUND_OVER_DELAY_MS, SERIES_WINS_NEEDED};

/// What the state machine wants to happen after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Keep simulating
    Continue,
    /// A kind took the round; the series goes on
    EndRound { winner: EntityKind },
    /// A kind took the round and with it the series
    EndSeries { winner: EntityKind },
    /// Waiting on a timer or a reset
    Hold,
}

/// Decide the transition for the current phase and tallies
pub fn evaluate(phase: GamePhase, live: &KindCounts, wins: &KindCounts) -> Transition {
    if phase != GamePhase::Simulating {
        return Transition::Hold;
    }
    match live.sole_survivor() {
        None => Transition::Continue,
        Some(winner) if wins.get(winner) + 1 >= SERIES_WINS_NEEDED => {
            Transition::EndSeries { winner }
        }
        Some(winner) => Transition::EndRound { winner },
    }
}

/// Wall-clock time at which a round that ended at `ended_at_ms` hands over
#[inline]
pub fn next_round_at(ended_at_ms: f64) -> f64 {
    ended_at_ms + ROUND_OVER_DELAY_MS
}

/// True once the round-over banner has been shown long enough
#[inline]
pub fn next_round_due(ended_at_ms: f64, now_ms: f64) -> bool {
    now_ms >= next_round_at(ended_at_ms)
}

/// Commit a round-ending transition to the state.
///
/// The winner's round tally is credited immediately so the score panel
/// updates with the banner. Returns the new phase.
pub fn apply(state: &mut GameState, transition: Transition) -> GamePhase {
    let winner = match transition {
        Transition::EndRound { winner } | Transition::EndSeries { winner } => winner,
        Transition::Continue | Transition::Hold => return state.phase,
    };

    let round = state.round.number;
    let series_over = state.series.record_round_win(winner);
    state.events.push(GameEvent::RoundWon { round, winner });
    log::info!(
        "Round {} won by {} (rock {} / paper {} / scissors {})",
        round,
        winner,
        state.series.wins.rock,
        state.series.wins.paper,
        state.series.wins.scissors
    );

    state.phase = if series_over {
        state.events.push(GameEvent::SeriesWon { winner });
        log::info!("{} wins the best of 7 after {} rounds", winner, round);
        GamePhase::SeriesOver { winner }
    } else {
        GamePhase::RoundOver { winner }
    };
    state.phase
}
