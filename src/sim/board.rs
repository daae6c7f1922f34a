//! The 5x5 board
//!
//! Slots are stored row-major; at most one cell per coordinate.

use serde::{Deserialize, Serialize};

use super::state::{Cell, Coord};
use crate::consts::GRID_SIZE;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    slots: [[Option<Cell>; GRID_SIZE]; GRID_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.slots = Default::default();
    }

    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.slots.get(coord.row)?.get(coord.col)?.as_ref()
    }

    /// Put a cell into an empty slot. Returns false if occupied or off-board.
    pub fn place(&mut self, coord: Coord, cell: Cell) -> bool {
        match self.slots.get_mut(coord.row).and_then(|r| r.get_mut(coord.col)) {
            Some(slot) if slot.is_none() => {
                *slot = Some(cell);
                true
            }
            _ => false,
        }
    }

    /// Remove and return the cell at `coord`
    pub fn take(&mut self, coord: Coord) -> Option<Cell> {
        self.slots.get_mut(coord.row)?.get_mut(coord.col)?.take()
    }

    /// Empty slots in row-major order
    pub fn empty_slots(&self) -> Vec<Coord> {
        Coord::all().filter(|c| self.get(*c).is_none()).collect()
    }

    /// Occupied slots in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        Coord::all().filter_map(|c| self.get(c).map(|cell| (c, cell)))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == GRID_SIZE * GRID_SIZE
    }

    /// Push every spawn time forward (pause compensation)
    pub fn shift_spawn_times(&mut self, delta_ms: u64) {
        for cell in self.slots.iter_mut().flatten().flatten() {
            cell.spawned_at_ms = cell.spawned_at_ms.saturating_add(delta_ms);
        }
    }

    /// Remove every expired cell, returning them in row-major order
    pub fn remove_expired(&mut self, now_ms: u64) -> Vec<(Coord, Cell)> {
        let expired: Vec<Coord> = self
            .cells()
            .filter(|(_, cell)| cell.is_expired(now_ms))
            .map(|(coord, _)| coord)
            .collect();
        expired
            .into_iter()
            .filter_map(|coord| self.take(coord).map(|cell| (coord, cell)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::CellKind;

    fn target(id: u32, spawned_at_ms: u64) -> Cell {
        Cell {
            id,
            kind: CellKind::Target,
            spawned_at_ms,
            lifetime_ms: 1000,
        }
    }

    fn at(row: usize, col: usize) -> Coord {
        Coord::new(row, col).unwrap()
    }

    #[test]
    fn test_place_rejects_occupied_slot() {
        let mut board = Board::new();
        assert!(board.place(at(1, 2), target(0, 0)));
        assert!(!board.place(at(1, 2), target(1, 0)));
        assert_eq!(board.get(at(1, 2)).map(|c| c.id), Some(0));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_take_clears_slot() {
        let mut board = Board::new();
        board.place(at(0, 0), target(7, 0));
        assert_eq!(board.take(at(0, 0)).map(|c| c.id), Some(7));
        assert!(board.take(at(0, 0)).is_none());
        assert!(board.is_empty());
    }

    #[test]
    fn test_empty_slots_and_full() {
        let mut board = Board::new();
        assert_eq!(board.empty_slots().len(), 25);
        for (i, coord) in Coord::all().enumerate() {
            board.place(coord, target(i as u32, 0));
        }
        assert!(board.is_full());
        assert!(board.empty_slots().is_empty());
    }

    #[test]
    fn test_remove_expired_and_shift() {
        let mut board = Board::new();
        board.place(at(0, 0), target(0, 0));
        board.place(at(2, 3), target(1, 500));
        board.shift_spawn_times(100);
        // Cell 0 now spawned at 100, cell 1 at 600
        let removed = board.remove_expired(1101);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].0, at(0, 0));
        assert_eq!(board.len(), 1);
    }
}
