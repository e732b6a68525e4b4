//! Per-turn decision engine.
//!
//! Owns the world, the tuning and the training queue for one match. Each
//! call to [`DecisionEngine::next_turn`] absorbs a snapshot and returns the
//! two commands for that turn. Given the same sequence of snapshots the
//! output sequence is always identical.

use crate::build_plan::BuildPlan;
use crate::command::{QueenCommand, TrainCommand};
use crate::error::Result;
use crate::queen::{decide_queen, DecisionContext};
use crate::site::SiteInit;
use crate::strategy::{select_strategy, StrategyMode};
use crate::training::TrainingPlanner;
use crate::tuning::Tuning;
use crate::world::{TurnSnapshot, WorldState};

/// Commands chosen for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOrders {
    /// Queen action, first output line.
    pub queen: QueenCommand,
    /// Training action, second output line.
    pub train: TrainCommand,
    /// Name of the queen rule that fired.
    pub rule: &'static str,
    /// Strategy mode in force this turn.
    pub mode: StrategyMode,
}

/// Decision engine for one match.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    world: WorldState,
    tuning: Tuning,
    training: TrainingPlanner,
}

impl DecisionEngine {
    /// Create an engine from the startup site table.
    #[must_use]
    pub fn new(sites: impl IntoIterator<Item = SiteInit>, tuning: Tuning) -> Self {
        let world = WorldState::new(sites);
        tracing::debug!("Engine created with {} sites", world.site_count());
        Self {
            world,
            tuning,
            training: TrainingPlanner::new(),
        }
    }

    /// Absorb `snapshot` and decide this turn's commands.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot names a site absent from the
    /// startup table.
    pub fn next_turn(&mut self, snapshot: &TurnSnapshot) -> Result<TurnOrders> {
        let events = self.world.begin_turn(snapshot)?;
        if !events.is_empty() {
            tracing::debug!("Turn {}: {} site changes", self.world.turn(), events.len());
        }

        let mode = select_strategy(&self.world, &self.tuning);
        let plan = BuildPlan::evaluate(&self.world, &self.tuning, mode);

        let decision = {
            let ctx = DecisionContext::new(&self.world, &self.tuning, &plan);
            decide_queen(&ctx)
        };
        let train = TrainCommand::from(self.training.plan_turn(&self.world, &self.tuning, mode));

        tracing::debug!(
            "Turn {} ({:?}): {} -> {}, {}",
            self.world.turn(),
            mode,
            decision.rule,
            decision.command,
            train
        );

        Ok(TurnOrders {
            queen: decision.command,
            train,
            rule: decision.rule,
            mode,
        })
    }

    /// Current world.
    #[must_use]
    pub fn world(&self) -> &WorldState {
        &self.world
    }

    /// Tuning in use.
    #[must_use]
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Training queue.
    #[must_use]
    pub fn training(&self) -> &TrainingPlanner {
        &self.training
    }
}
