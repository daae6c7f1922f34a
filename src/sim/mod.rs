//! Deterministic session engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Logical clock only, advanced by `GameSession::tick`
//! - Seeded RNG only
//! - Stable iteration order (row-major board scans)
//! - No rendering or platform dependencies

pub mod board;
pub mod scoring;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tick;

pub use board::Board;
pub use scoring::{PointsBreakdown, level_for_score, score_tap};
pub use session::{CommandOutcome, GameSession, TapOutcome};
pub use spawner::{lifetime_ms, spawn_interval_ms};
pub use state::{Cell, CellKind, Coord, GameEvent, GamePhase, SessionSnapshot, SessionState};
pub use tick::{Activity, next_due};
