//! Per-frame simulation tick
//!
//! One call advances the arena by one frame: move, collide, recount, then
//! let the state machine look at the result.

use super::collision::{CollisionReport, resolve_collisions};
use super::motion::{effective_speed, integrate};
use super::round::{self, Transition};
use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Inputs for a single tick
#[derive(Debug, Clone)]
pub struct TickInput {
    /// User speed multiplier
    pub speed: f32,
    /// Drop to [`ENDGAME_SPEED`] once two kinds remain
    pub endgame_slowdown: bool,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            endgame_slowdown: true,
        }
    }
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Multiplier actually applied
    pub speed: f32,
    pub wall_bounces: u32,
    pub collisions: CollisionReport,
    pub transition: Transition,
}

impl TickReport {
    fn idle() -> Self {
        Self {
            speed: 0.0,
            wall_bounces: 0,
            collisions: CollisionReport::default(),
            transition: Transition::Hold,
        }
    }
}

/// Advance the game state by one frame.
///
/// Only `Simulating` moves anything; the other phases wait for a timer or a
/// reset and report [`Transition::Hold`].
pub fn tick(state: &mut GameState, input: &TickInput) -> TickReport {
    if state.phase != GamePhase::Simulating {
        return TickReport::idle();
    }

    state.time_ticks += 1;

    // Live counts from the end of the previous tick
    let speed = effective_speed(input.speed, &state.round.live, input.endgame_slowdown);
    let wall_bounces = integrate(&mut state.round.entities, speed, &state.arena, ENTITY_SIZE);
    let collisions = resolve_collisions(&mut state.round.entities, ENTITY_SIZE);

    let live = state.round.recount();
    let transition = round::evaluate(state.phase, &live, &state.series.wins);
    round::apply(state, transition);

    if collisions.conversions > 0 {
        log::trace!(
            "tick {}: {} conversions, live {}/{}/{}",
            state.time_ticks,
            collisions.conversions,
            live.rock,
            live.paper,
            live.scissors
        );
    }

    TickReport {
        speed,
        wall_bounces,
        collisions,
        transition,
    }
}
