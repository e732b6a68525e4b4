//! # Royale Core
//!
//! Deterministic per-turn decision engine for a queen-and-sites strategy
//! game.
//!
//! This crate contains **only** decision logic:
//! - No IO
//! - No randomness
//! - No floating-point math (integer squared distances, fixed-point lengths)
//! - Ordered maps everywhere, so iteration order never depends on hashing
//!
//! Feeding the same sequence of snapshots into a [`engine::DecisionEngine`]
//! always yields the same sequence of commands.
//!
//! ## Crate Structure
//!
//! - [`world`] - Sites, units and incrementally tracked counters
//! - [`targeting`] - Capability-filtered nearest-site search
//! - [`build_plan`] - Start-distance build plan
//! - [`strategy`] - Default / giant-siege mode selection
//! - [`training`] - Unit production queue
//! - [`queen`] - Queen rule chain
//! - [`engine`] - Ties the above together, one call per turn
//! - [`tuning`] - Strategy constants, loadable from RON

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod build_plan;
pub mod command;
pub mod engine;
pub mod error;
pub mod math;
pub mod queen;
pub mod site;
pub mod strategy;
pub mod targeting;
pub mod training;
pub mod tuning;
pub mod unit;
pub mod world;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::build_plan::BuildPlan;
    pub use crate::command::{BuildOrder, QueenCommand, TrainCommand};
    pub use crate::engine::{DecisionEngine, TurnOrders};
    pub use crate::error::{CoreError, Result};
    pub use crate::math::{Fixed, Position};
    pub use crate::queen::{decide_queen, DecisionContext, QueenDecision, QUEEN_RULES};
    pub use crate::site::{
        classify, Owner, RawStructure, Site, SiteId, SiteInit, SiteSnapshot, StructureKind,
    };
    pub use crate::strategy::{select_strategy, StrategyMode};
    pub use crate::targeting::{find_closest_site, SiteFilter, SiteMatch};
    pub use crate::training::TrainingPlanner;
    pub use crate::tuning::{Tuning, TuningError};
    pub use crate::unit::{Unit, UnitType};
    pub use crate::world::{Counters, SiteEvent, TurnSnapshot, WorldState};
}
