//! Read-only view of a frame for renderers and logs

use serde::Serialize;

use super::kind::{EntityKind, KindCounts};
use super::state::GameState;

/// One glyph to draw
#[derive(Debug, Clone, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub kind: EntityKind,
    pub glyph: &'static str,
}

/// Everything the stats panel and the canvas need for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub round: u32,
    pub phase: &'static str,
    /// Round winner while the banner is up, champion once the series is over
    pub winner: Option<EntityKind>,
    pub champion: Option<EntityKind>,
    pub live: KindCounts,
    pub wins: KindCounts,
    /// Milliseconds until the next round starts, if one is scheduled
    pub next_round_in_ms: Option<f64>,
    pub entities: Vec<EntityView>,
}

impl Snapshot {
    pub fn capture(state: &GameState, next_round_in_ms: Option<f64>) -> Self {
        Self {
            round: state.round.number,
            phase: state.phase.as_str(),
            winner: state.phase.winner(),
            champion: state.series.champion,
            live: state.round.live,
            wins: state.series.wins,
            next_round_in_ms,
            entities: state
                .round
                .entities
                .iter()
                .map(|e| EntityView {
                    id: e.id,
                    x: e.pos.x,
                    y: e.pos.y,
                    kind: e.kind,
                    glyph: e.kind.emoji(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
