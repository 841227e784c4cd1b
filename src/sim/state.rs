//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives on [`GameState`]; hosts own one
//! through a [`Session`](super::session::Session) and never keep ambient copies.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::kind::{EntityKind, KindCounts};
use super::layout::{LayoutPolicy, generate_entities};
use crate::consts::*;

/// Current phase of the round/series state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Entities are moving and converting each other
    Simulating,
    /// One kind took the round; waiting for the next round to start
    RoundOver { winner: EntityKind },
    /// One kind reached the series win target
    SeriesOver { winner: EntityKind },
}

impl GamePhase {
    pub fn winner(&self) -> Option<EntityKind> {
        match *self {
            GamePhase::Simulating => None,
            GamePhase::RoundOver { winner } | GamePhase::SeriesOver { winner } => Some(winner),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Simulating => "simulating",
            GamePhase::RoundOver { .. } => "round_over",
            GamePhase::SeriesOver { .. } => "series_over",
        }
    }
}

/// Notable transitions, drained by hosts after each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted { round: u32 },
    RoundWon { round: u32, winner: EntityKind },
    SeriesWon { winner: EntityKind },
    /// Series tallies were cleared
    Reset,
}

/// A single glyph moving through the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, kind: EntityKind) -> Self {
        Self { id, pos, vel, kind }
    }
}

/// Rectangular play area, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True until the host has measured a usable area
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Inclusive bounds for an entity centre of the given size.
    ///
    /// When the arena is narrower than one entity the upper bound collapses
    /// onto the lower one so clamping never sees `min > max`.
    pub fn bounds(&self, size: f32) -> (Vec2, Vec2) {
        let half = size / 2.0;
        let min = Vec2::splat(half);
        let max = Vec2::new(self.width - half, self.height - half).max(min);
        (min, max)
    }

    pub fn contains(&self, pos: Vec2, size: f32) -> bool {
        let (min, max) = self.bounds(size);
        pos.cmpge(min).all() && pos.cmple(max).all()
    }
}

/// Data that lives for exactly one round
#[derive(Debug, Clone, Default)]
pub struct RoundState {
    /// 1-based round number within the series
    pub number: u32,
    /// Live population (sorted by id)
    pub entities: Vec<Entity>,
    /// Per-kind live counts as of the last tick
    pub live: KindCounts,
}

impl RoundState {
    pub fn recount(&mut self) -> KindCounts {
        self.live = KindCounts::tally(self.entities.iter().map(|e| e.kind));
        self.live
    }
}

/// Cumulative best-of-seven score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesState {
    pub wins: KindCounts,
    pub champion: Option<EntityKind>,
}

impl SeriesState {
    /// Credit a round win. Returns true when it decides the series.
    pub fn record_round_win(&mut self, winner: EntityKind) -> bool {
        if self.champion.is_some() {
            return true;
        }
        self.wins.increment(winner);
        self.champion = self.wins.first_to(SERIES_WINS_NEEDED);
        self.champion.is_some()
    }

    pub fn reset(&mut self) {
        self.wins = KindCounts::default();
        self.champion = None;
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub arena: Arena,
    pub layout: LayoutPolicy,
    pub phase: GamePhase,
    pub round: RoundState,
    pub series: SeriesState,
    /// Simulation tick counter (ticks spent in `Simulating`)
    pub time_ticks: u64,
    /// Pending events for the host
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new series and lay out its first round
    pub fn new(seed: u64, arena: Arena, layout: LayoutPolicy) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            arena,
            layout,
            phase: GamePhase::Simulating,
            round: RoundState::default(),
            series: SeriesState::default(),
            time_ticks: 0,
            events: Vec::new(),
        };
        state.begin_round(1);
        state
    }

    /// Advance to the next round. Ignored once the series is decided.
    pub fn start_next_round(&mut self) -> bool {
        if matches!(self.phase, GamePhase::SeriesOver { .. }) {
            log::debug!("Series already decided, not starting another round");
            return false;
        }
        self.begin_round(self.round.number + 1);
        true
    }

    /// Re-deal the current round without touching the series score
    pub fn restart_round(&mut self) -> bool {
        match self.phase {
            GamePhase::Simulating => {
                self.begin_round(self.round.number);
                true
            }
            GamePhase::RoundOver { .. } => self.start_next_round(),
            GamePhase::SeriesOver { .. } => false,
        }
    }

    /// Clear the series and lay out a fresh first round
    pub fn full_reset(&mut self) {
        log::info!("Full reset (seed {})", self.seed);
        self.series.reset();
        self.events.push(GameEvent::Reset);
        self.begin_round(1);
    }

    /// Adopt new arena dimensions; the series starts over
    pub fn resize(&mut self, arena: Arena) {
        if arena == self.arena {
            return;
        }
        log::info!(
            "Arena resized {}x{} -> {}x{}",
            self.arena.width,
            self.arena.height,
            arena.width,
            arena.height
        );
        self.arena = arena;
        self.full_reset();
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn begin_round(&mut self, number: u32) {
        let entities = generate_entities(
            self.arena,
            ENTITY_COUNT_PER_TYPE,
            ENTITY_SIZE,
            self.layout,
            &mut self.rng,
        );
        self.round = RoundState {
            number,
            entities,
            live: KindCounts::default(),
        };
        self.round.recount();
        self.phase = GamePhase::Simulating;
        self.events.push(GameEvent::RoundStarted { round: number });
        log::info!(
            "Round {} started with {} entities ({:?} layout)",
            number,
            self.round.entities.len(),
            self.layout
        );
    }
}
