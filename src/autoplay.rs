//! Idle/demo player
//!
//! Looks at a snapshot and picks the next slot to tap, with a human-ish
//! reaction delay and tap rate so it eventually loses.

use crate::sim::{CellKind, Coord, GamePhase, SessionSnapshot};

/// Demo player settings
#[derive(Debug, Clone, Copy)]
pub struct Autoplay {
    /// Cells younger than this are not noticed yet (ms)
    pub reaction_ms: u64,
    /// Minimum time between taps (ms)
    pub tap_interval_ms: u64,
    last_tap_at_ms: Option<u64>,
}

impl Default for Autoplay {
    fn default() -> Self {
        Self::new(350, 450)
    }
}

impl Autoplay {
    pub fn new(reaction_ms: u64, tap_interval_ms: u64) -> Self {
        Self {
            reaction_ms,
            tap_interval_ms,
            last_tap_at_ms: None,
        }
    }

    /// Forget tap timing (call when a new game starts)
    pub fn reset(&mut self) {
        self.last_tap_at_ms = None;
    }

    /// Next slot to tap, if the player is ready and something is worth it
    pub fn next_tap(&mut self, snapshot: &SessionSnapshot) -> Option<Coord> {
        if snapshot.phase != GamePhase::Playing {
            return None;
        }
        let now = snapshot.time_ms;
        if let Some(last) = self.last_tap_at_ms {
            if now.saturating_sub(last) < self.tap_interval_ms {
                return None;
            }
        }

        let coord = choose_tap(snapshot, self.reaction_ms)?;
        self.last_tap_at_ms = Some(now);
        Some(coord)
    }
}

/// Best visible cell: bonuses first, then whatever is closest to expiring.
/// Bombs are never chosen.
pub fn choose_tap(snapshot: &SessionSnapshot, reaction_ms: u64) -> Option<Coord> {
    let now = snapshot.time_ms;
    snapshot
        .board
        .cells()
        .filter(|(_, cell)| cell.kind != CellKind::Bomb)
        .filter(|(_, cell)| cell.elapsed_ms(now) >= reaction_ms)
        .min_by_key(|(coord, cell)| (cell.kind != CellKind::Bonus, cell.remaining_ms(now), *coord))
        .map(|(coord, _)| coord)
}
