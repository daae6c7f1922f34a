//! BlortNix - a 5x5 reaction tapping game
//!
//! Core modules:
//! - `sim`: Deterministic session engine (spawning, decay, scoring, phases)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Best-effort high score persistence
//! - `feedback`: Presentation-side notification routing
//! - `autoplay`: Demo player that picks taps from a snapshot

pub mod autoplay;
pub mod feedback;
pub mod highscores;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScoreStore, MemoryStore, StoreError};
pub use sim::{GameSession, GamePhase, SessionSnapshot};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Board is a fixed square of this many rows and columns
    pub const GRID_SIZE: usize = 5;

    /// Namespaced key the high score is stored under
    pub const STORAGE_KEY: &str = "@blortnix_highscore";

    /// Lives never exceed this, whatever the tuning says
    pub const MAX_LIVES: u8 = 3;

    /// Level ceiling
    pub const MAX_LEVEL: u32 = 15;
}
