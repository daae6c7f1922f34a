//! Game session: the command surface the presentation layer drives
//!
//! Commands issued in a phase that forbids them are ignored, never errors.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::scoring::{PointsBreakdown, level_for_score, score_tap};
use super::spawner;
use super::state::{Cell, CellKind, Coord, GameEvent, GamePhase, SessionSnapshot, SessionState};
use crate::highscores::{HighScoreStore, MemoryStore};
use crate::tuning::Tuning;

/// Result of a lifecycle command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    /// Not valid in the current phase; nothing changed
    Ignored,
}

impl CommandOutcome {
    pub fn is_applied(self) -> bool {
        self == CommandOutcome::Applied
    }
}

/// Result of tapping a board slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Not playing, off the board, or an empty slot
    Ignored,
    /// Tapped a bomb and lost a life
    Bomb,
    /// Tapped a target or bonus
    Scored(PointsBreakdown),
}

/// One player's game, from title screen through any number of runs
pub struct GameSession<S: HighScoreStore = MemoryStore> {
    pub(super) state: SessionState,
    pub(super) tuning: Tuning,
    pub(super) rng: Pcg32,
    pub(super) store: S,
    pub(super) events: Vec<GameEvent>,
}

impl GameSession<MemoryStore> {
    /// Session with default balance and an in-memory high score
    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, Tuning::default(), MemoryStore::new())
    }
}

impl<S: HighScoreStore> GameSession<S> {
    /// Create a session on the title screen. The stored high score is read
    /// once; a failing store counts as no high score.
    pub fn new(seed: u64, tuning: Tuning, store: S) -> Self {
        let tuning = tuning.validated();
        let high_score = match store.get() {
            Ok(Some(value)) => {
                log::info!("Loaded high score {}", value);
                value
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("High score unavailable, using 0: {}", e);
                0
            }
        };

        Self {
            state: SessionState::new(&tuning, high_score),
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            store,
            events: Vec::new(),
        }
    }

    // === Commands ===

    /// Begin a new game from the title screen or after game over
    pub fn start(&mut self) -> CommandOutcome {
        match self.state.phase {
            GamePhase::Ready | GamePhase::GameOver => {}
            phase => return self.ignored("start", phase),
        }

        self.state.reset_for_new_game(&self.tuning);
        self.state.phase = GamePhase::Playing;
        let now = self.state.time_ms;
        self.state.next_spawn_at_ms = Some(now);
        self.state.next_sweep_at_ms = Some(now.saturating_add(self.tuning.sweep_interval_ms));
        log::info!("Game started (high score {})", self.state.high_score);
        CommandOutcome::Applied
    }

    /// Freeze the board; the clock keeps running but nothing decays
    pub fn pause(&mut self) -> CommandOutcome {
        if self.state.phase != GamePhase::Playing {
            return self.ignored("pause", self.state.phase);
        }
        self.state.pause_anchor_ms = Some(self.state.time_ms);
        self.state.phase = GamePhase::Paused;
        log::debug!("Paused at {}ms", self.state.time_ms);
        CommandOutcome::Applied
    }

    /// Continue after a pause. Every cell and pending deadline moves forward
    /// by the pause length, so remaining lifetimes are unchanged.
    pub fn resume(&mut self) -> CommandOutcome {
        if self.state.phase != GamePhase::Paused {
            return self.ignored("resume", self.state.phase);
        }
        let anchor = self.state.pause_anchor_ms.take().unwrap_or(self.state.time_ms);
        let paused_for = self.state.time_ms.saturating_sub(anchor);

        self.state.board.shift_spawn_times(paused_for);
        self.state.next_spawn_at_ms = self
            .state
            .next_spawn_at_ms
            .map(|t| t.saturating_add(paused_for));
        self.state.next_sweep_at_ms = self
            .state
            .next_sweep_at_ms
            .map(|t| t.saturating_add(paused_for));
        self.state.total_paused_ms = self.state.total_paused_ms.saturating_add(paused_for);
        self.state.phase = GamePhase::Playing;
        log::debug!("Resumed after {}ms pause", paused_for);
        CommandOutcome::Applied
    }

    /// Back to the title screen from anywhere
    pub fn go_home(&mut self) -> CommandOutcome {
        self.state.board.clear();
        self.cancel_schedule();
        self.state.pause_anchor_ms = None;
        self.state.phase = GamePhase::Ready;
        log::debug!("Returned to title screen");
        CommandOutcome::Applied
    }

    /// Tap the slot at (row, col)
    pub fn tap(&mut self, row: usize, col: usize) -> TapOutcome {
        if self.state.phase != GamePhase::Playing {
            log::debug!("Ignored tap while {:?}", self.state.phase);
            return TapOutcome::Ignored;
        }
        let Some(coord) = Coord::new(row, col) else {
            log::debug!("Ignored tap off the board at ({}, {})", row, col);
            return TapOutcome::Ignored;
        };
        // Taps always clear the slot
        let Some(cell) = self.state.board.take(coord) else {
            return TapOutcome::Ignored;
        };

        match cell.kind {
            CellKind::Bomb => {
                self.events.push(GameEvent::BombHit);
                self.lose_lives(1);
                TapOutcome::Bomb
            }
            CellKind::Target | CellKind::Bonus => {
                let now = self.state.time_ms;
                let points = score_tap(
                    &self.tuning,
                    &cell,
                    now,
                    self.state.combo,
                    self.state.last_tap_at_ms,
                );
                self.state.score = self.state.score.saturating_add(points.total);
                self.state.combo = self.state.combo.saturating_add(1);
                self.state.last_tap_at_ms = Some(now);

                self.events.push(GameEvent::GoodHit {
                    kind: cell.kind,
                    points: points.total,
                });
                if self.state.combo >= self.tuning.combo_milestone {
                    self.events.push(GameEvent::ComboMilestone {
                        combo: self.state.combo,
                    });
                }
                self.update_level();
                TapOutcome::Scored(points)
            }
        }
    }

    /// Place a specific cell on an empty slot (scripted scenarios and demos).
    /// Only while playing.
    pub fn spawn_cell_at(&mut self, coord: Coord, kind: CellKind) -> Option<Cell> {
        if self.state.phase != GamePhase::Playing {
            return None;
        }
        spawner::spawn_at(&mut self.state, coord, kind, &self.tuning, &mut self.events)
    }

    // === Queries ===

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.snapshot()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn high_score(&self) -> u64 {
        self.state.high_score
    }

    pub fn combo(&self) -> u32 {
        self.state.combo
    }

    pub fn lives(&self) -> u8 {
        self.state.lives
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    /// Logical clock (ms); does not advance while paused
    pub fn now_ms(&self) -> u64 {
        self.state.logical_now()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Events not yet drained
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending events; each is delivered once
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Internal rules ===

    /// Apply life loss from bombs or misses in a single update
    pub(super) fn lose_lives(&mut self, count: u32) {
        if count == 0 {
            return;
        }
        let count = u8::try_from(count).unwrap_or(u8::MAX);
        self.state.lives = self.state.lives.saturating_sub(count);
        self.state.combo = 0;
        if self.state.lives == 0 {
            self.game_over();
        }
    }

    fn update_level(&mut self) {
        let level = level_for_score(self.state.score, &self.tuning);
        if level > self.state.level {
            self.state.level = level;
            log::info!("Level up: {}", level);
            self.events.push(GameEvent::LevelUp { level });
        }
    }

    fn game_over(&mut self) {
        self.state.phase = GamePhase::GameOver;
        self.cancel_schedule();

        let score = self.state.score;
        let new_high_score = score > self.state.high_score;
        if new_high_score {
            self.state.high_score = score;
            match self.store.set(score) {
                Ok(()) => log::info!("High score saved ({})", score),
                Err(e) => log::warn!("Failed to save high score {}: {}", score, e),
            }
        }
        log::info!("Game over: score {} (misses {})", score, self.state.misses);
        self.events.push(GameEvent::GameOver {
            score,
            new_high_score,
        });
    }

    fn cancel_schedule(&mut self) {
        self.state.next_spawn_at_ms = None;
        self.state.next_sweep_at_ms = None;
    }

    fn ignored(&self, command: &str, phase: GamePhase) -> CommandOutcome {
        log::debug!("Ignored {} while {:?}", command, phase);
        CommandOutcome::Ignored
    }
}
