//! Coarse strategy mode.
//!
//! Recomputed from scratch every turn with no hysteresis; the mode may flip
//! on any turn and callers handle each turn independently.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;
use crate::world::WorldState;

/// Which build and training policy applies this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StrategyMode {
    /// Knights and the base build order.
    #[default]
    Default,
    /// The enemy has dug in behind towers: open with giant barracks and
    /// produce giants.
    GiantSiege,
}

/// Pick the mode for the current turn.
#[must_use]
pub fn select_strategy(world: &WorldState, tuning: &Tuning) -> StrategyMode {
    select_mode(world.enemy_tower_count(), world.turn(), tuning)
}

/// Mode for a given enemy tower count and turn number.
#[must_use]
pub fn select_mode(enemy_towers: usize, turn: u32, tuning: &Tuning) -> StrategyMode {
    if enemy_towers > tuning.alternate_enemy_towers && turn > tuning.alternate_after_turn {
        StrategyMode::GiantSiege
    } else {
        StrategyMode::Default
    }
}
