//! Ordered build plan.
//!
//! Slot `i` of the plan is the structure wanted on the `i`-th closest site
//! to the queen's starting position. The base sequence comes from
//! [`Tuning::build_order`]; each evaluation then swaps depleted mine slots
//! for towers and, in [`StrategyMode::GiantSiege`], opens with giant
//! barracks. Nothing is carried between evaluations.

use crate::site::{SiteId, StructureKind};
use crate::strategy::StrategyMode;
use crate::tuning::Tuning;
use crate::world::WorldState;

/// Desired structure per start-distance rank for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    slots: Vec<StructureKind>,
}

impl BuildPlan {
    /// Evaluate the plan against the current world.
    #[must_use]
    pub fn evaluate(world: &WorldState, tuning: &Tuning, mode: StrategyMode) -> Self {
        let order = world.start_order();
        let mut slots = tuning.build_order.clone();

        for (slot, kind) in slots.iter_mut().enumerate() {
            if *kind != StructureKind::Mine {
                continue;
            }
            let depleted = order
                .get(slot)
                .and_then(|id| world.site(*id))
                .is_some_and(|site| site.is_depleted(tuning.mine_depletion_gold));
            if depleted {
                *kind = StructureKind::Tower;
            }
        }

        if mode == StrategyMode::GiantSiege {
            if let Some(first) = slots.first_mut() {
                *first = StructureKind::GiantBarracks;
            }
        }

        Self { slots }
    }

    /// Plan with the given slots as-is, skipping evaluation.
    #[must_use]
    pub fn from_slots(slots: Vec<StructureKind>) -> Self {
        Self { slots }
    }

    /// Desired structure for rank `slot`.
    #[must_use]
    pub fn slot(&self, slot: usize) -> Option<StructureKind> {
        self.slots.get(slot).copied()
    }

    /// All slots, nearest rank first.
    #[must_use]
    pub fn slots(&self) -> &[StructureKind] {
        &self.slots
    }

    /// Pair each reachable slot with the site occupying its rank.
    ///
    /// Slots past the number of sites, and sites past the plan length, are
    /// dropped.
    pub fn assignments<'a>(
        &'a self,
        world: &'a WorldState,
    ) -> impl DoubleEndedIterator<Item = (usize, SiteId, StructureKind)> + 'a {
        world
            .start_order()
            .iter()
            .zip(self.slots.iter())
            .enumerate()
            .map(|(slot, (id, kind))| (slot, *id, *kind))
    }
}
