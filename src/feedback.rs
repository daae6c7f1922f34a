//! Presentation-side feedback
//!
//! The engine only queues [`GameEvent`]s. A presentation adapter drains them
//! and routes each one to a [`FeedbackSink`] (flash the screen, buzz, play a
//! sound). Nothing here feeds back into game state.

use crate::sim::{CellKind, Coord, GameEvent};

/// Tactile feedback types, strongest last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Haptic {
    /// Target tapped
    LightImpact,
    /// Bonus tapped
    HeavyImpact,
    /// Level reached
    Success,
    /// Bomb hit or game lost
    Error,
}

impl Haptic {
    /// Haptic to fire for an event, if any
    pub fn for_event(event: &GameEvent) -> Option<Haptic> {
        match event {
            GameEvent::GoodHit {
                kind: CellKind::Bonus,
                ..
            } => Some(Haptic::HeavyImpact),
            GameEvent::GoodHit { .. } => Some(Haptic::LightImpact),
            GameEvent::BombHit | GameEvent::GameOver { .. } => Some(Haptic::Error),
            GameEvent::LevelUp { .. } => Some(Haptic::Success),
            GameEvent::ComboMilestone { .. }
            | GameEvent::CellSpawned { .. }
            | GameEvent::CellExpired { .. } => None,
        }
    }
}

/// Receiver for engine notifications. Every method defaults to a no-op so an
/// adapter only implements what it renders.
pub trait FeedbackSink {
    fn on_bomb_hit(&mut self) {}
    fn on_good_hit(&mut self, _kind: CellKind, _points: u64) {}
    fn on_level_up(&mut self, _level: u32) {}
    fn on_game_over(&mut self, _score: u64, _new_high_score: bool) {}
    fn on_combo_milestone(&mut self, _combo: u32) {}
    fn on_cell_spawned(&mut self, _id: u32, _coord: Coord, _kind: CellKind) {}
    fn on_cell_expired(&mut self, _id: u32, _coord: Coord, _kind: CellKind) {}
}

/// Route drained events to `sink`, in order
pub fn dispatch<S>(events: impl IntoIterator<Item = GameEvent>, sink: &mut S)
where
    S: FeedbackSink + ?Sized,
{
    for event in events {
        match event {
            GameEvent::BombHit => sink.on_bomb_hit(),
            GameEvent::GoodHit { kind, points } => sink.on_good_hit(kind, points),
            GameEvent::LevelUp { level } => sink.on_level_up(level),
            GameEvent::GameOver {
                score,
                new_high_score,
            } => sink.on_game_over(score, new_high_score),
            GameEvent::ComboMilestone { combo } => sink.on_combo_milestone(combo),
            GameEvent::CellSpawned { id, coord, kind } => sink.on_cell_spawned(id, coord, kind),
            GameEvent::CellExpired { id, coord, kind } => sink.on_cell_expired(id, coord, kind),
        }
    }
}

/// Sink that narrates events through `log`
#[derive(Debug, Default)]
pub struct LogSink;

impl FeedbackSink for LogSink {
    fn on_bomb_hit(&mut self) {
        log::info!("Bomb hit");
    }

    fn on_level_up(&mut self, level: u32) {
        log::info!("Level {}", level);
    }

    fn on_game_over(&mut self, score: u64, new_high_score: bool) {
        if new_high_score {
            log::info!("Game over - NEW HIGH SCORE {}", score);
        } else {
            log::info!("Game over - score {}", score);
        }
    }

    fn on_combo_milestone(&mut self, combo: u32) {
        log::debug!("Combo x{}", combo);
    }
}
