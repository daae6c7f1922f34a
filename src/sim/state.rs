//! Game state and core simulation types
//!
//! Everything a session mutates lives in [`SessionState`]; the presentation
//! layer only ever sees a [`SessionSnapshot`] copy.

use serde::{Deserialize, Serialize};

use super::board::Board;
use crate::consts::GRID_SIZE;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing ticking
    #[default]
    Ready,
    /// Active gameplay
    Playing,
    /// Clock anchored, cells frozen
    Paused,
    /// Run ended
    GameOver,
}

/// Cell types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Normal target
    Target,
    /// Golden cell: more points, shorter life
    Bonus,
    /// Costs a life when tapped, harmless when left alone
    Bomb,
}

impl CellKind {
    /// Whether letting this cell expire costs a life
    pub fn is_missable(self) -> bool {
        !matches!(self, CellKind::Bomb)
    }
}

/// A board coordinate (row, col), both below [`GRID_SIZE`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    /// Returns `None` for coordinates off the board
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < GRID_SIZE && col < GRID_SIZE).then_some(Self { row, col })
    }

    /// All coordinates in row-major order
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..GRID_SIZE).flat_map(|row| (0..GRID_SIZE).map(move |col| Coord { row, col }))
    }
}

/// A spawned object on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Unique per session, only used to correlate UI animation
    pub id: u32,
    pub kind: CellKind,
    /// Session clock time the cell appeared (shifted forward by pauses)
    pub spawned_at_ms: u64,
    /// Untapped cells expire once elapsed time exceeds this
    pub lifetime_ms: u64,
}

impl Cell {
    /// Time since spawn, never negative
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.spawned_at_ms)
    }

    /// Time left before expiry (0 once expired)
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.lifetime_ms.saturating_sub(self.elapsed_ms(now_ms))
    }

    /// Remaining life as a 0.0-1.0 fraction, for decay tinting
    pub fn remaining_fraction(&self, now_ms: u64) -> f32 {
        if self.lifetime_ms == 0 {
            return 0.0;
        }
        self.remaining_ms(now_ms) as f32 / self.lifetime_ms as f32
    }

    /// Strictly past its lifetime
    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.elapsed_ms(now_ms) > self.lifetime_ms
    }
}

/// Notifications for the presentation layer. Drained once, never required
/// for engine correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    CellSpawned { id: u32, coord: Coord, kind: CellKind },
    CellExpired { id: u32, coord: Coord, kind: CellKind },
    BombHit,
    GoodHit { kind: CellKind, points: u64 },
    ComboMilestone { combo: u32 },
    LevelUp { level: u32 },
    GameOver { score: u64, new_high_score: bool },
}

/// Complete mutable session state
#[derive(Debug, Clone)]
pub struct SessionState {
    pub board: Board,
    pub score: u64,
    pub high_score: u64,
    /// Consecutive good taps without a miss or bomb
    pub combo: u32,
    pub lives: u8,
    pub level: u32,
    pub phase: GamePhase,
    /// Session time of the last scoring tap
    pub last_tap_at_ms: Option<u64>,
    /// Targets and bonuses that expired this game
    pub misses: u32,
    /// Session clock (ms), advanced by `tick`
    pub time_ms: u64,
    /// Clock value when the current pause began
    pub pause_anchor_ms: Option<u64>,
    /// Total time spent paused this game
    pub total_paused_ms: u64,
    /// Next spawn deadline; `None` when spawning is cancelled
    pub next_spawn_at_ms: Option<u64>,
    /// Next decay sweep deadline
    pub next_sweep_at_ms: Option<u64>,
    /// Next cell ID
    next_cell_id: u32,
}

impl SessionState {
    /// Fresh state on the title screen
    pub fn new(tuning: &Tuning, high_score: u64) -> Self {
        Self {
            board: Board::new(),
            score: 0,
            high_score,
            combo: 0,
            lives: tuning.starting_lives,
            level: 1,
            phase: GamePhase::Ready,
            last_tap_at_ms: None,
            misses: 0,
            time_ms: 0,
            pause_anchor_ms: None,
            total_paused_ms: 0,
            next_spawn_at_ms: None,
            next_sweep_at_ms: None,
            next_cell_id: 0,
        }
    }

    /// Reset everything a new game starts from. Keeps the clock and high score.
    pub fn reset_for_new_game(&mut self, tuning: &Tuning) {
        self.board.clear();
        self.score = 0;
        self.combo = 0;
        self.lives = tuning.starting_lives;
        self.level = 1;
        self.last_tap_at_ms = None;
        self.misses = 0;
        self.pause_anchor_ms = None;
        self.total_paused_ms = 0;
        self.next_cell_id = 0;
    }

    /// Allocate a new cell ID
    pub fn next_cell_id(&mut self) -> u32 {
        let id = self.next_cell_id;
        self.next_cell_id = self.next_cell_id.wrapping_add(1);
        id
    }

    /// Clock as seen by cells: frozen at the pause anchor while paused
    pub fn logical_now(&self) -> u64 {
        match self.phase {
            GamePhase::Paused => self.pause_anchor_ms.unwrap_or(self.time_ms),
            _ => self.time_ms,
        }
    }

    /// Read-only copy for rendering
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: self.board.clone(),
            score: self.score,
            high_score: self.high_score,
            combo: self.combo,
            lives: self.lives,
            level: self.level,
            phase: self.phase,
            misses: self.misses,
            time_ms: self.logical_now(),
        }
    }
}

/// What the presentation layer renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub board: Board,
    pub score: u64,
    pub high_score: u64,
    pub combo: u32,
    pub lives: u8,
    pub level: u32,
    pub phase: GamePhase,
    pub misses: u32,
    /// Logical clock at snapshot time (frozen while paused), for
    /// `Cell::remaining_fraction`
    pub time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(spawned_at_ms: u64, lifetime_ms: u64) -> Cell {
        Cell {
            id: 0,
            kind: CellKind::Target,
            spawned_at_ms,
            lifetime_ms,
        }
    }

    #[test]
    fn test_coord_bounds() {
        assert!(Coord::new(0, 0).is_some());
        assert!(Coord::new(4, 4).is_some());
        assert!(Coord::new(5, 0).is_none());
        assert!(Coord::new(0, 5).is_none());
        assert_eq!(Coord::all().count(), GRID_SIZE * GRID_SIZE);
    }

    #[test]
    fn test_cell_expiry_is_strict() {
        let c = cell(1000, 3000);
        assert!(!c.is_expired(4000));
        assert!(c.is_expired(4001));
        assert_eq!(c.remaining_ms(2500), 1500);
        assert_eq!(c.remaining_ms(9000), 0);
        // Clock behind spawn time counts as zero elapsed
        assert_eq!(c.elapsed_ms(500), 0);
    }

    #[test]
    fn test_remaining_fraction() {
        let c = cell(0, 2000);
        assert!((c.remaining_fraction(0) - 1.0).abs() < f32::EPSILON);
        assert!((c.remaining_fraction(500) - 0.75).abs() < f32::EPSILON);
        assert_eq!(c.remaining_fraction(5000), 0.0);
    }

    #[test]
    fn test_cell_ids_increase() {
        let mut state = SessionState::new(&Tuning::default(), 0);
        let a = state.next_cell_id();
        let b = state.next_cell_id();
        assert!(b > a);
        state.reset_for_new_game(&Tuning::default());
        assert_eq!(state.next_cell_id(), 0);
    }

    #[test]
    fn test_logical_now_freezes_while_paused() {
        let mut state = SessionState::new(&Tuning::default(), 0);
        state.phase = GamePhase::Playing;
        state.time_ms = 1000;
        assert_eq!(state.logical_now(), 1000);

        state.phase = GamePhase::Paused;
        state.pause_anchor_ms = Some(1000);
        state.time_ms = 6000;
        assert_eq!(state.logical_now(), 1000);
        assert_eq!(state.snapshot().time_ms, 1000);
    }

    #[test]
    fn test_bomb_is_not_missable() {
        assert!(CellKind::Target.is_missable());
        assert!(CellKind::Bonus.is_missable());
        assert!(!CellKind::Bomb.is_missable());
    }
}
