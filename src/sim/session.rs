//! Simulation driver owned by a host
//!
//! A [`Session`] owns the [`GameState`], the user's [`Settings`] and the
//! scheduler holding the round-over delay. The host calls [`Session::frame`]
//! once per display refresh with its clock; UI callbacks either call the
//! reset methods directly or raise flags on [`HostInput`] for the next frame.

use super::round::{self, Transition};
use super::schedule::{Scheduler, Task, TimerHandle};
use super::snapshot::Snapshot;
use super::state::{Arena, GamePhase, GameState};
use super::tick::{TickInput, TickReport, tick};
use crate::settings::Settings;

/// One-shot requests from UI callbacks, consumed by the next frame
#[derive(Debug, Clone, Default)]
pub struct HostInput {
    /// New slider value
    pub speed: Option<f32>,
    /// Re-deal the current round, keeping the series score
    pub reset_round: bool,
    /// Start the series over
    pub full_reset: bool,
    /// New arena dimensions
    pub resize: Option<Arena>,
}

/// Result of one host frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// A scheduled round start fired this frame
    pub round_started: bool,
    pub tick: Option<TickReport>,
}

#[derive(Debug)]
pub struct Session {
    pub state: GameState,
    pub settings: Settings,
    pub input: HostInput,
    scheduler: Scheduler,
    next_round: Option<TimerHandle>,
    /// Host time at which the current round ended, while its banner shows
    round_ended_at: Option<f64>,
    running: bool,
    /// Clock of the most recent frame
    now_ms: f64,
}

impl Session {
    /// Start a series. `fallback_seed` is used when the settings carry none.
    pub fn new(arena: Arena, settings: Settings, fallback_seed: u64) -> Self {
        let seed = settings.seed.unwrap_or(fallback_seed);
        log::info!(
            "Session starting: arena {}x{}, seed {}, speed {}",
            arena.width,
            arena.height,
            seed,
            settings.speed
        );
        Self {
            state: GameState::new(seed, arena, settings.layout),
            settings,
            input: HostInput::default(),
            scheduler: Scheduler::new(),
            next_round: None,
            round_ended_at: None,
            running: true,
            now_ms: 0.0,
        }
    }

    /// Advance one display frame at host time `now_ms`
    pub fn frame(&mut self, now_ms: f64) -> FrameReport {
        if !self.running {
            return FrameReport {
                round_started: false,
                tick: None,
            };
        }
        self.now_ms = now_ms;
        self.apply_input();

        let mut round_started = false;
        for task in self.scheduler.poll(now_ms) {
            match task {
                Task::StartNextRound => {
                    self.next_round = None;
                    match self.round_ended_at.take() {
                        Some(ended) if round::next_round_due(ended, now_ms) => {
                            round_started |= self.state.start_next_round();
                        }
                        ended => log::warn!("Round start fired early (round ended at {:?})", ended),
                    }
                }
            }
        }

        let input = TickInput {
            speed: self.settings.speed,
            endgame_slowdown: self.settings.endgame_slowdown,
        };
        let report = tick(&mut self.state, &input);

        match report.transition {
            Transition::EndRound { .. } => {
                let due = round::next_round_at(now_ms);
                self.round_ended_at = Some(now_ms);
                self.next_round = Some(self.scheduler.schedule(Task::StartNextRound, due));
            }
            Transition::EndSeries { .. } => self.cancel_next_round(),
            Transition::Continue | Transition::Hold => {}
        }

        FrameReport {
            round_started,
            tick: Some(report),
        }
    }

    /// Clear the series and deal a fresh first round
    pub fn full_reset(&mut self) {
        self.cancel_next_round();
        self.state.full_reset();
    }

    /// Re-deal the current round. In `RoundOver` this skips the wait.
    pub fn reset_round(&mut self) -> bool {
        if matches!(self.state.phase, GamePhase::SeriesOver { .. }) {
            return false;
        }
        self.cancel_next_round();
        self.state.restart_round()
    }

    /// Adopt new arena dimensions (starts the series over when they change)
    pub fn resize(&mut self, arena: Arena) {
        if arena == self.state.arena {
            return;
        }
        self.cancel_next_round();
        self.state.resize(arena);
    }

    pub fn set_speed(&mut self, speed: f32) -> f32 {
        self.settings.set_speed(speed)
    }

    /// Stop for good: pending timers are dropped and further frames do nothing
    pub fn shutdown(&mut self) {
        let dropped = self.scheduler.cancel_all();
        self.next_round = None;
        self.round_ended_at = None;
        self.running = false;
        log::info!("Session shut down ({} pending timers cancelled)", dropped);
    }

    /// Bring a shut-down session back with a fresh series in `arena`.
    /// Returns false if the session was still running.
    pub fn resume(&mut self, arena: Arena, fallback_seed: u64) -> bool {
        if self.running {
            return false;
        }
        log::info!("Session resuming");
        *self = Session::new(arena, self.settings.clone(), fallback_seed);
        true
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Host time at which the pending next round starts
    pub fn next_round_due(&self) -> Option<f64> {
        self.next_round
            .filter(|&h| self.scheduler.is_pending(h))
            .and(self.round_ended_at)
            .map(round::next_round_at)
    }

    pub fn snapshot(&self) -> Snapshot {
        let remaining = self.next_round_due().map(|due| (due - self.now_ms).max(0.0));
        Snapshot::capture(&self.state, remaining)
    }

    fn apply_input(&mut self) {
        let input = std::mem::take(&mut self.input);
        if let Some(speed) = input.speed {
            self.set_speed(speed);
        }
        if let Some(arena) = input.resize {
            self.resize(arena);
        }
        if input.full_reset {
            self.full_reset();
        } else if input.reset_round {
            self.reset_round();
        }
    }

    fn cancel_next_round(&mut self) {
        self.round_ended_at = None;
        if let Some(handle) = self.next_round.take() {
            if self.scheduler.cancel(handle) {
                log::debug!("Cancelled pending round start");
            }
        }
    }
}
