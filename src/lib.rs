//! RPS Arena - a rock-paper-scissors cellular simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (layout, motion, collisions, round/series state)
//! - `settings`: User-adjustable preferences (speed, layout policy, seed)

pub mod settings;
pub mod sim;

pub use settings::Settings;

use sim::Arena;

/// Game configuration constants
pub mod consts {
    /// Entities spawned per kind at round start
    pub const ENTITY_COUNT_PER_TYPE: u32 = 30;
    /// Glyph size in arena units; also the collision distance
    pub const ENTITY_SIZE: f32 = 30.0;
    /// Per-axis velocity scale applied to the [-1, 1] draw
    pub const VELOCITY_SCALE: f32 = 1.0;

    /// Width reserved for the stats panel beside the arena
    pub const STATS_PANEL_WIDTH: f32 = 260.0;

    /// Round-over banner duration before the next round starts
    pub const ROUND_OVER_DELAY_MS: f64 = 5000.0;
    /// Round wins needed to take the series (best of 7)
    pub const SERIES_WINS_NEEDED: u32 = 4;

    /// Speed slider range
    pub const SPEED_MIN: f32 = 0.1;
    pub const SPEED_MAX: f32 = 5.0;
    pub const SPEED_STEP: f32 = 0.1;
    pub const DEFAULT_SPEED: f32 = 1.0;
    /// Speed used once only two kinds are left alive
    pub const ENDGAME_SPEED: f32 = 0.2;

    /// Nominal host frame interval (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}

/// Arena left over from a host viewport after the stats panel is carved out
#[inline]
pub fn arena_for_viewport(viewport_width: f32, viewport_height: f32) -> Arena {
    Arena::new(viewport_width - consts::STATS_PANEL_WIDTH, viewport_height)
}
