//! Tap scoring and level rules
//!
//! `points = (base + time_bonus + quick_bonus) * min(combo + 1, cap)`, where
//! the combo is the count before this tap.

use serde::{Deserialize, Serialize};

use super::state::Cell;
use crate::tuning::Tuning;

/// Points awarded for one good tap, with its parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointsBreakdown {
    pub base: u64,
    pub time_bonus: u64,
    pub quick_bonus: u64,
    pub multiplier: u32,
    pub total: u64,
}

/// Bonus for reacting quickly: `floor(remaining / lifetime * max)`.
/// Elapsed time is clamped to the cell lifetime.
pub fn time_bonus(lifetime_ms: u64, elapsed_ms: u64, max_bonus: u64) -> u64 {
    if lifetime_ms == 0 {
        return 0;
    }
    let remaining = lifetime_ms - elapsed_ms.min(lifetime_ms);
    remaining.saturating_mul(max_bonus) / lifetime_ms
}

/// Whether a tap at `now_ms` chains onto the previous scoring tap
pub fn is_quick_tap(last_tap_at_ms: Option<u64>, now_ms: u64, window_ms: u64) -> bool {
    last_tap_at_ms.is_some_and(|last| now_ms.saturating_sub(last) < window_ms)
}

/// Multiplier from the combo count before the tap
pub fn combo_multiplier(combo: u32, cap: u32) -> u32 {
    combo.saturating_add(1).min(cap)
}

/// Score a good tap on `cell` at `now_ms`
pub fn score_tap(
    tuning: &Tuning,
    cell: &Cell,
    now_ms: u64,
    combo: u32,
    last_tap_at_ms: Option<u64>,
) -> PointsBreakdown {
    let base = tuning.base_points(cell.kind);
    let time_bonus = time_bonus(cell.lifetime_ms, cell.elapsed_ms(now_ms), tuning.max_time_bonus);
    let quick_bonus = if is_quick_tap(last_tap_at_ms, now_ms, tuning.quick_tap_window_ms) {
        tuning.quick_bonus
    } else {
        0
    };
    let multiplier = combo_multiplier(combo, tuning.max_combo_multiplier);
    let total = base
        .saturating_add(time_bonus)
        .saturating_add(quick_bonus)
        .saturating_mul(u64::from(multiplier));

    PointsBreakdown {
        base,
        time_bonus,
        quick_bonus,
        multiplier,
        total,
    }
}

/// Level implied by a score, in `1..=max_level`
pub fn level_for_score(score: u64, tuning: &Tuning) -> u32 {
    let level = score / tuning.points_per_level.max(1) + 1;
    level.min(u64::from(tuning.max_level)) as u32
}
