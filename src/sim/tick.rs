//! Logical clock and scheduler
//!
//! The presentation layer reports elapsed time through [`GameSession::tick`].
//! Inside one tick, due activities run in timestamp order:
//! - Decay sweep every `sweep_interval_ms`
//! - Spawn at a level-dependent interval, re-read after every spawn
//!
//! Nothing fires outside `Playing`. While paused the clock keeps moving and
//! `resume` shifts every deadline, so no missed intervals are replayed.
//! A deadline that would pass `u64::MAX` is dropped.

use super::session::GameSession;
use super::spawner;
use super::state::{GameEvent, GamePhase, SessionState};
use crate::highscores::HighScoreStore;

/// Periodic work driven by the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Sweep,
    Spawn,
}

/// Earliest pending deadline. A sweep wins a tie with a spawn.
pub fn next_due(state: &SessionState) -> Option<(u64, Activity)> {
    match (state.next_sweep_at_ms, state.next_spawn_at_ms) {
        (Some(sweep), Some(spawn)) if spawn < sweep => Some((spawn, Activity::Spawn)),
        (Some(sweep), _) => Some((sweep, Activity::Sweep)),
        (None, Some(spawn)) => Some((spawn, Activity::Spawn)),
        (None, None) => None,
    }
}

impl<S: HighScoreStore> GameSession<S> {
    /// Advance the session clock by `dt_ms`, running every activity that
    /// falls due on the way
    pub fn tick(&mut self, dt_ms: u64) {
        let target = self.state.time_ms.saturating_add(dt_ms);

        while self.state.phase == GamePhase::Playing {
            let Some((due, activity)) = next_due(&self.state) else {
                break;
            };
            if due > target {
                break;
            }
            self.state.time_ms = self.state.time_ms.max(due);

            match activity {
                Activity::Sweep => {
                    self.state.next_sweep_at_ms = due.checked_add(self.tuning.sweep_interval_ms);
                    self.sweep_expired();
                }
                Activity::Spawn => {
                    let interval = spawner::spawn_interval_ms(self.state.level, &self.tuning);
                    self.state.next_spawn_at_ms = due.checked_add(interval);
                    spawner::spawn_random(
                        &mut self.state,
                        &mut self.rng,
                        &self.tuning,
                        &mut self.events,
                    );
                }
            }
        }

        self.state.time_ms = target;
    }

    /// Remove expired cells. Every expired target or bonus is a miss; all
    /// misses of one sweep cost their lives together.
    pub(super) fn sweep_expired(&mut self) {
        let expired = self.state.board.remove_expired(self.state.time_ms);
        if expired.is_empty() {
            return;
        }

        let mut misses = 0u32;
        for (coord, cell) in &expired {
            if cell.kind.is_missable() {
                misses += 1;
            }
            self.events.push(GameEvent::CellExpired {
                id: cell.id,
                coord: *coord,
                kind: cell.kind,
            });
        }

        if misses > 0 {
            log::debug!("{} cell(s) missed at {}ms", misses, self.state.time_ms);
            self.state.misses = self.state.misses.saturating_add(misses);
            self.lose_lives(misses);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::GRID_SIZE;
    use crate::sim::state::{CellKind, Coord};
    use proptest::prelude::*;

    fn at(row: usize, col: usize) -> Coord {
        Coord::new(row, col).unwrap()
    }

    fn started(seed: u64) -> GameSession {
        let mut session = GameSession::with_seed(seed);
        session.start();
        session
    }

    fn spawned_count(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::CellSpawned { .. }))
            .count()
    }

    #[test]
    fn test_first_spawn_is_immediate_then_follows_interval() {
        let mut session = started(12345);
        session.tick(0);
        assert_eq!(session.state().board.len(), 1);

        // Level 1 interval is 1120ms
        session.tick(1119);
        assert_eq!(session.state().board.len(), 1);
        session.tick(1);
        assert_eq!(session.state().board.len(), 2);
    }

    #[test]
    fn test_no_activity_outside_playing() {
        let mut session = GameSession::with_seed(5);
        session.tick(60_000);
        assert!(session.state().board.is_empty());
        assert!(session.drain_events().is_empty());
        assert_eq!(session.now_ms(), 60_000);
    }

    #[test]
    fn test_missed_target_costs_a_life_bomb_does_not() {
        let mut session = started(1);
        session.state.next_spawn_at_ms = None;
        session.spawn_cell_at(at(0, 0), CellKind::Target);
        session.spawn_cell_at(at(0, 1), CellKind::Bomb);
        session.state.combo = 3;

        // Lifetime 2850: still alive at exactly 2850, gone by the 2900 sweep
        session.tick(2850);
        assert_eq!(session.state().board.len(), 2);
        session.tick(50);
        assert!(session.state().board.is_empty());
        assert_eq!(session.lives(), 2);
        assert_eq!(session.combo(), 0);
        assert_eq!(session.state().misses, 1);
    }

    #[test]
    fn test_only_expired_bombs_keep_combo() {
        let mut session = started(1);
        session.state.next_spawn_at_ms = None;
        session.spawn_cell_at(at(2, 2), CellKind::Bomb);
        session.state.combo = 3;
        session.tick(5000);
        assert!(session.state().board.is_empty());
        assert_eq!(session.lives(), 3);
        assert_eq!(session.combo(), 3);
    }

    #[test]
    fn test_two_misses_in_one_sweep() {
        let mut session = started(1);
        session.state.next_spawn_at_ms = None;
        session.spawn_cell_at(at(0, 0), CellKind::Target);
        session.spawn_cell_at(at(4, 4), CellKind::Target);
        session.tick(2900);
        assert_eq!(session.lives(), 1);
        assert_eq!(session.state().misses, 2);

        let expired = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::CellExpired { .. }))
            .count();
        assert_eq!(expired, 2);
    }

    #[test]
    fn test_misses_end_game_and_stop_spawning() {
        let mut session = started(1);
        session.state.next_spawn_at_ms = None;
        for col in 0..3 {
            session.spawn_cell_at(at(1, col), CellKind::Target);
        }
        session.tick(3000);
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(session.lives(), 0);

        session.drain_events();
        session.tick(60_000);
        assert_eq!(spawned_count(&session.drain_events()), 0);
    }

    #[test]
    fn test_pause_preserves_remaining_lifetime() {
        let mut session = started(1);
        session.state.next_spawn_at_ms = None;
        let cell = session.spawn_cell_at(at(3, 1), CellKind::Target).unwrap();

        session.tick(1000);
        let remaining_at_pause = cell.lifetime_ms - (session.now_ms() - cell.spawned_at_ms);
        session.pause();
        session.tick(10_000);
        assert!(session.state().board.get(at(3, 1)).is_some());
        session.resume();

        let shifted = *session.state().board.get(at(3, 1)).unwrap();
        let remaining_after = shifted.lifetime_ms - (session.now_ms() - shifted.spawned_at_ms);
        assert_eq!(remaining_after, remaining_at_pause);
        assert_eq!(shifted.remaining_ms(session.now_ms()), remaining_at_pause);
        assert_eq!(session.state().total_paused_ms, 10_000);
    }

    #[test]
    fn test_resume_does_not_burst_spawns() {
        let mut session = started(77);
        session.tick(500);
        session.drain_events();

        session.pause();
        session.tick(30_000);
        session.resume();

        // 620ms remained until the next spawn when paused
        session.tick(619);
        assert_eq!(spawned_count(&session.drain_events()), 0);
        session.tick(1);
        assert_eq!(spawned_count(&session.drain_events()), 1);
    }

    #[test]
    fn test_spawning_stops_when_board_full() {
        let mut session = started(3);
        // Bombs never cost lives when they expire; fill with long-lived bombs
        session.tuning.lifetime_base_ms = 1_000_000;
        session.tuning.lifetime_min_ms = 1_000_000;
        session.tuning.bomb_chance = 1.0;
        session.tuning.bonus_chance = 0.0;
        session.tick(60_000);
        assert_eq!(session.state().board.len(), GRID_SIZE * GRID_SIZE);
        assert_eq!(spawned_count(&session.drain_events()), GRID_SIZE * GRID_SIZE);
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_level_speeds_up_spawning() {
        let mut session = started(3);
        session.state.next_spawn_at_ms = None;
        session.state.score = 4500;
        session.spawn_cell_at(at(0, 0), CellKind::Target);
        session.tap(0, 0);
        assert_eq!(session.level(), 10);

        // Re-arm spawning: interval is now 400ms
        session.state.next_spawn_at_ms = Some(session.now_ms());
        session.drain_events();
        session.tick(800);
        assert_eq!(spawned_count(&session.drain_events()), 3);
    }

    #[test]
    fn test_start_at_end_of_clock() {
        let mut session = GameSession::with_seed(1);
        session.tick(u64::MAX);
        assert!(session.start().is_applied());
        session.tick(1000);
        assert_eq!(session.now_ms(), u64::MAX);
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.state().board.len(), 1);
        assert_eq!(session.state().next_spawn_at_ms, None);
        assert_eq!(session.state().next_sweep_at_ms, None);
    }

    #[test]
    fn test_resume_after_huge_pause() {
        let mut session = started(1);
        session.tick(500);
        session.pause();
        session.tick(u64::MAX);
        assert!(session.resume().is_applied());
        session.tick(100);
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.lives(), 3);
    }

    #[test]
    fn test_snapshot_clock_frozen_while_paused() {
        let mut session = started(1);
        session.state.next_spawn_at_ms = None;
        session.spawn_cell_at(at(2, 3), CellKind::Target);
        session.tick(1000);

        let remaining = |session: &GameSession| {
            let snapshot = session.snapshot();
            snapshot.board.get(at(2, 3)).map(|c| c.remaining_ms(snapshot.time_ms))
        };
        let before = remaining(&session);
        assert_eq!(before, Some(1850));

        session.pause();
        session.tick(5000);
        assert_eq!(remaining(&session), before);
        assert_eq!(session.now_ms(), 1000);

        session.resume();
        assert_eq!(remaining(&session), before);
        assert_eq!(session.now_ms(), 6000);
    }

    #[test]
    fn test_next_due_prefers_sweep_on_tie() {
        let mut state = SessionState::new(&Default::default(), 0);
        assert_eq!(next_due(&state), None);
        state.next_sweep_at_ms = Some(100);
        state.next_spawn_at_ms = Some(100);
        assert_eq!(next_due(&state), Some((100, Activity::Sweep)));
        state.next_spawn_at_ms = Some(50);
        assert_eq!(next_due(&state), Some((50, Activity::Spawn)));
        state.next_sweep_at_ms = None;
        assert_eq!(next_due(&state), Some((50, Activity::Spawn)));
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed and inputs end up identical
        let run = |seed| {
            let mut session = started(seed);
            for step in 0..400u64 {
                session.tick(16);
                if step % 7 == 0 {
                    let snapshot = session.snapshot();
                    if let Some((coord, _)) = snapshot.board.cells().next() {
                        session.tap(coord.row, coord.col);
                    }
                }
            }
            session.snapshot()
        };
        assert_eq!(run(99999), run(99999));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Tick(u64),
        Tap(usize, usize),
        Start,
        Pause,
        Resume,
        Home,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (0u64..3000).prop_map(Op::Tick),
            6 => (0usize..6, 0usize..6).prop_map(|(r, c)| Op::Tap(r, c)),
            1 => Just(Op::Start),
            1 => Just(Op::Pause),
            1 => Just(Op::Resume),
            1 => Just(Op::Home),
        ]
    }

    proptest! {
        #[test]
        fn prop_lives_and_level_invariants(seed in any::<u64>(), ops in prop::collection::vec(op(), 0..200)) {
            let mut session = started(seed);
            let max_level = session.tuning().max_level;
            for op in ops {
                match op {
                    Op::Tick(dt) => session.tick(dt),
                    Op::Tap(r, c) => { session.tap(r, c); }
                    Op::Start => { session.start(); }
                    Op::Pause => { session.pause(); }
                    Op::Resume => { session.resume(); }
                    Op::Home => { session.go_home(); }
                }
                prop_assert!(session.lives() <= 3);
                let expected = (session.score() / 500 + 1).min(u64::from(max_level)) as u32;
                prop_assert_eq!(session.level(), expected);
                if session.lives() == 0 {
                    prop_assert_ne!(session.phase(), GamePhase::Playing);
                }
            }
        }

        #[test]
        fn prop_pause_keeps_every_remaining_lifetime(seed in any::<u64>(), before in 0u64..2000, pause in 0u64..100_000) {
            let mut session = started(seed);
            session.tick(before);
            prop_assume!(session.phase() == GamePhase::Playing);
            let now = session.now_ms();
            let remaining: Vec<_> = session
                .state()
                .board
                .cells()
                .map(|(coord, cell)| (coord, cell.remaining_ms(now)))
                .collect();

            session.pause();
            session.tick(pause);
            session.resume();

            let now = session.now_ms();
            for (coord, left) in remaining {
                let cell = session.state().board.get(coord);
                prop_assert_eq!(cell.map(|c| c.remaining_ms(now)), Some(left));
            }
        }
    }
}
