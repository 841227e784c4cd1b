//! Deterministic simulation module
//!
//! All arena logic lives here. This module must stay pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by entity index)
//! - Time only from the host clock passed into `Session::frame`
//! - No rendering or platform dependencies

pub mod collision;
pub mod kind;
pub mod layout;
pub mod motion;
pub mod round;
pub mod schedule;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, find_contacts, resolve_collisions, resolve_contacts};
pub use kind::{EntityKind, KindCounts, duel};
pub use layout::{LayoutPolicy, generate_entities};
pub use motion::{effective_speed, integrate};
pub use round::Transition;
pub use schedule::{Scheduler, Task, TimerHandle};
pub use session::{FrameReport, HostInput, Session};
pub use snapshot::{EntityView, Snapshot};
pub use state::{Arena, Entity, GameEvent, GamePhase, GameState, RoundState, SeriesState};
pub use tick::{TickInput, TickReport, tick};
