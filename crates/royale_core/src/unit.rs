//! Units as reported by the snapshot.
//!
//! Units carry no identity across turns; both lists are rebuilt from every
//! snapshot. The two queens are the only units the world state keeps as
//! singletons.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::math::Position;
use crate::site::Owner;

/// Unit category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitType {
    /// The queen. Not trainable.
    Queen,
    /// Melee unit trained in groups at knight barracks.
    Knight,
    /// Ranged unit trained at archer barracks.
    Archer,
    /// Siege unit trained at giant barracks.
    Giant,
}

impl UnitType {
    /// Types a barracks can produce.
    pub const TRAINABLE: [UnitType; 3] = [UnitType::Knight, UnitType::Archer, UnitType::Giant];

    /// Wire code for this unit type.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            UnitType::Queen => -1,
            UnitType::Knight => 0,
            UnitType::Archer => 1,
            UnitType::Giant => 2,
        }
    }
}

impl TryFrom<i32> for UnitType {
    type Error = CoreError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            -1 => Ok(UnitType::Queen),
            0 => Ok(UnitType::Knight),
            1 => Ok(UnitType::Archer),
            2 => Ok(UnitType::Giant),
            other => Err(CoreError::InvalidUnitType(other)),
        }
    }
}

/// A unit seen this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Current position.
    pub position: Position,
    /// Remaining hit points.
    pub health: i32,
    /// Controlling side.
    pub owner: Owner,
    /// Unit category.
    pub unit_type: UnitType,
}

impl Unit {
    /// Create a unit.
    #[must_use]
    pub const fn new(position: Position, health: i32, owner: Owner, unit_type: UnitType) -> Self {
        Self {
            position,
            health,
            owner,
            unit_type,
        }
    }

    /// Placeholder queen used until the first snapshot arrives.
    #[must_use]
    pub const fn absent_queen(owner: Owner) -> Self {
        Self::new(Position::ORIGIN, 0, owner, UnitType::Queen)
    }

    /// Whether this is a queen.
    #[must_use]
    pub fn is_queen(&self) -> bool {
        self.unit_type == UnitType::Queen
    }
}
