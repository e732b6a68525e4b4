//! Unit training queue.
//!
//! Units to produce wait in a FIFO. Enqueueing is gated by projected gold:
//! the bank minus the cost of everything already queued. At most one unit
//! leaves the queue per turn, and only when an idle barracks of the right
//! kind exists.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::site::{SiteId, StructureKind};
use crate::strategy::StrategyMode;
use crate::targeting::SiteFilter;
use crate::tuning::Tuning;
use crate::unit::UnitType;
use crate::world::WorldState;

/// FIFO of unit types awaiting production.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrainingPlanner {
    queue: VecDeque<UnitType>,
}

impl TrainingPlanner {
    /// Create an empty planner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gold left after paying for everything queued.
    #[must_use]
    pub fn projected_gold(&self, gold: i32, tuning: &Tuning) -> i32 {
        gold - self
            .queue
            .iter()
            .map(|unit| tuning.unit_cost(*unit))
            .sum::<i32>()
    }

    /// Add units according to `mode` and the gold available.
    pub fn replenish(&mut self, world: &WorldState, tuning: &Tuning, mode: StrategyMode) {
        let knight = tuning.unit_cost(UnitType::Knight);
        let knights_capped = world.own_unit_count(UnitType::Knight) >= tuning.max_knights;
        let enemy_towers = world.enemy_tower_count();

        match mode {
            StrategyMode::Default => {
                if !self.queue.is_empty() || knights_capped {
                    return;
                }
                let projected = self.projected_gold(world.gold(), tuning);
                if enemy_towers > 1 && projected >= 2 * knight {
                    self.enqueue(UnitType::Knight);
                    self.enqueue(UnitType::Knight);
                } else if enemy_towers <= 1 && projected >= knight {
                    self.enqueue(UnitType::Knight);
                }
            }
            StrategyMode::GiantSiege => {
                let giant = tuning.unit_cost(UnitType::Giant);
                if self.queue.is_empty() && self.projected_gold(world.gold(), tuning) >= giant {
                    self.enqueue(UnitType::Giant);
                }
                if world.own_unit_count(UnitType::Giant) >= 1
                    && self.projected_gold(world.gold(), tuning) >= knight
                {
                    self.enqueue(UnitType::Knight);
                }
            }
        }
    }

    /// Pop the head of the queue if an idle barracks can train it.
    ///
    /// The barracks nearest the enemy queen wins. The queue is untouched
    /// when no barracks is ready.
    pub fn dispatch(&mut self, world: &WorldState) -> Option<SiteId> {
        let head = *self.queue.front()?;
        let kind = StructureKind::barracks_for(head)?;
        let found = world.find_closest_site(
            world.enemy_queen().position,
            &SiteFilter::idle_production(kind),
        )?;

        self.queue.pop_front();
        tracing::debug!("Training {:?} at site {}", head, found.id);
        Some(found.id)
    }

    /// Replenish then dispatch. Returns the site to train at, if any.
    pub fn plan_turn(
        &mut self,
        world: &WorldState,
        tuning: &Tuning,
        mode: StrategyMode,
    ) -> Option<SiteId> {
        self.replenish(world, tuning, mode);
        self.dispatch(world)
    }

    fn enqueue(&mut self, unit: UnitType) {
        tracing::debug!("Queued {:?}, queue length {}", unit, self.queue.len() + 1);
        self.queue.push_back(unit);
    }

    /// Units waiting, head first.
    #[must_use]
    pub fn queued(&self) -> &VecDeque<UnitType> {
        &self.queue
    }

    /// Whether nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
