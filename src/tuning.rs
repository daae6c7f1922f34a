//! Game balance tables
//!
//! Every number that shapes pacing and scoring lives here so a session can be
//! run with alternative balance (tests, practice modes) without touching the
//! engine. Defaults reproduce the shipped game.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_LEVEL, MAX_LIVES};
use crate::sim::CellKind;

/// Balance parameters for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Lives & levels ===
    /// Lives at the start of a game
    pub starting_lives: u8,
    /// Score needed per level
    pub points_per_level: u64,
    /// Highest reachable level
    pub max_level: u32,

    // === Spawning ===
    /// Spawn interval at level 0 (ms)
    pub spawn_interval_base_ms: u64,
    /// Spawn interval reduction per level (ms)
    pub spawn_interval_step_ms: u64,
    /// Fastest spawn interval (ms)
    pub spawn_interval_min_ms: u64,
    /// Cumulative threshold below which a draw yields a bomb
    pub bomb_chance: f64,
    /// Chance of a bonus (stacked on top of `bomb_chance`)
    pub bonus_chance: f64,

    // === Decay ===
    /// Cell lifetime at level 0 (ms)
    pub lifetime_base_ms: u64,
    /// Lifetime reduction per level (ms)
    pub lifetime_step_ms: u64,
    /// Shortest lifetime (ms)
    pub lifetime_min_ms: u64,
    /// Bonus cells live this fraction of the normal lifetime
    pub bonus_lifetime_factor: f64,
    /// How often expired cells are swept (ms)
    pub sweep_interval_ms: u64,

    // === Scoring ===
    pub target_points: u64,
    pub bonus_points: u64,
    /// Time bonus for a tap at the instant of spawn
    pub max_time_bonus: u64,
    /// Taps closer together than this earn `quick_bonus`
    pub quick_tap_window_ms: u64,
    pub quick_bonus: u64,
    /// Combo multiplier never exceeds this
    pub max_combo_multiplier: u32,
    /// Combo count from which `ComboMilestone` fires
    pub combo_milestone: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            points_per_level: 500,
            max_level: 15,

            spawn_interval_base_ms: 1200,
            spawn_interval_step_ms: 80,
            spawn_interval_min_ms: 400,
            bomb_chance: 0.08,
            bonus_chance: 0.10,

            lifetime_base_ms: 3000,
            lifetime_step_ms: 150,
            lifetime_min_ms: 1200,
            bonus_lifetime_factor: 0.6,
            sweep_interval_ms: 100,

            target_points: 10,
            bonus_points: 50,
            max_time_bonus: 10,
            quick_tap_window_ms: 300,
            quick_bonus: 5,
            max_combo_multiplier: 10,
            combo_milestone: 5,
        }
    }
}

impl Tuning {
    /// Parse a tuning table from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Tuning::validated)
    }

    /// Clamp values that would stall or break the engine
    pub fn validated(mut self) -> Self {
        self.starting_lives = self.starting_lives.clamp(1, MAX_LIVES);
        self.points_per_level = self.points_per_level.max(1);
        self.max_level = self.max_level.clamp(1, MAX_LEVEL);
        self.spawn_interval_min_ms = self.spawn_interval_min_ms.max(1);
        self.lifetime_min_ms = self.lifetime_min_ms.max(1);
        self.sweep_interval_ms = self.sweep_interval_ms.max(1);
        self.max_combo_multiplier = self.max_combo_multiplier.max(1);
        self.bomb_chance = self.bomb_chance.clamp(0.0, 1.0);
        self.bonus_chance = self.bonus_chance.clamp(0.0, 1.0 - self.bomb_chance);
        self.bonus_lifetime_factor = self.bonus_lifetime_factor.clamp(0.01, 1.0);
        self
    }

    /// Base points for tapping a cell of this kind (bombs score nothing)
    pub fn base_points(&self, kind: CellKind) -> u64 {
        match kind {
            CellKind::Target => self.target_points,
            CellKind::Bonus => self.bonus_points,
            CellKind::Bomb => 0,
        }
    }
}
