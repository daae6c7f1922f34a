//! Cell spawning
//!
//! Cadence and lifetimes shrink with level; the kind is a weighted draw.

use rand::Rng;

use super::state::{Cell, CellKind, Coord, GameEvent, SessionState};
use crate::tuning::Tuning;

/// Time between spawns at `level`: `max(min, base - level * step)`
pub fn spawn_interval_ms(level: u32, tuning: &Tuning) -> u64 {
    let reduction = u64::from(level).saturating_mul(tuning.spawn_interval_step_ms);
    tuning
        .spawn_interval_base_ms
        .saturating_sub(reduction)
        .max(tuning.spawn_interval_min_ms)
}

/// Lifetime of a new cell; bonuses decay faster
pub fn lifetime_ms(kind: CellKind, level: u32, tuning: &Tuning) -> u64 {
    let reduction = u64::from(level).saturating_mul(tuning.lifetime_step_ms);
    let base = tuning
        .lifetime_base_ms
        .saturating_sub(reduction)
        .max(tuning.lifetime_min_ms);
    match kind {
        CellKind::Bonus => ((base as f64) * tuning.bonus_lifetime_factor).round() as u64,
        CellKind::Target | CellKind::Bomb => base,
    }
}

/// Map a uniform [0, 1) roll onto a cell kind
pub fn kind_for_roll(roll: f64, tuning: &Tuning) -> CellKind {
    if roll < tuning.bomb_chance {
        CellKind::Bomb
    } else if roll < tuning.bomb_chance + tuning.bonus_chance {
        CellKind::Bonus
    } else {
        CellKind::Target
    }
}

/// Create a cell of `kind` at `coord`. Returns `None` if the slot is taken.
pub fn spawn_at(
    state: &mut SessionState,
    coord: Coord,
    kind: CellKind,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> Option<Cell> {
    if state.board.get(coord).is_some() {
        return None;
    }
    let cell = Cell {
        id: state.next_cell_id(),
        kind,
        spawned_at_ms: state.time_ms,
        lifetime_ms: lifetime_ms(kind, state.level, tuning),
    };
    if !state.board.place(coord, cell) {
        return None;
    }
    log::debug!(
        "Spawned {:?} #{} at ({}, {}) for {}ms",
        kind,
        cell.id,
        coord.row,
        coord.col,
        cell.lifetime_ms
    );
    events.push(GameEvent::CellSpawned {
        id: cell.id,
        coord,
        kind,
    });
    Some(cell)
}

/// Spawn one random cell on a random empty slot. No-op on a full board.
pub fn spawn_random<R: Rng>(
    state: &mut SessionState,
    rng: &mut R,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> Option<Cell> {
    let empty = state.board.empty_slots();
    if empty.is_empty() {
        return None;
    }
    let coord = empty[rng.random_range(0..empty.len())];
    let kind = kind_for_roll(rng.random::<f64>(), tuning);
    spawn_at(state, coord, kind, tuning, events)
}
