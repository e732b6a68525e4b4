//! Sites and the structure classifier.
//!
//! A site is a fixed map location that can be neutral or owned and can hold
//! at most one structure. The wire format encodes a barracks' sub-type as a
//! parameter; [`classify`] folds that parameter into a first-class
//! [`StructureKind`] so the rest of the engine reasons about disjoint kinds.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::math::{Fixed, Position};
use crate::unit::UnitType;

/// Unique identifier for sites, stable for the whole game.
pub type SiteId = u32;

/// Who controls a site or unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Owner {
    /// Nobody.
    #[default]
    Neutral,
    /// Us.
    Friendly,
    /// The opponent.
    Enemy,
}

impl Owner {
    /// Wire code for this owner.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Owner::Neutral => -1,
            Owner::Friendly => 0,
            Owner::Enemy => 1,
        }
    }
}

impl TryFrom<i32> for Owner {
    type Error = CoreError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            -1 => Ok(Owner::Neutral),
            0 => Ok(Owner::Friendly),
            1 => Ok(Owner::Enemy),
            other => Err(CoreError::InvalidOwner(other)),
        }
    }
}

/// Structure category exactly as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RawStructure {
    /// Empty site.
    #[default]
    None,
    /// Gold mine.
    Mine,
    /// Defensive tower.
    Tower,
    /// Barracks of some sub-type.
    Barracks,
}

impl RawStructure {
    /// Wire code for this structure.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            RawStructure::None => -1,
            RawStructure::Mine => 0,
            RawStructure::Tower => 1,
            RawStructure::Barracks => 2,
        }
    }
}

impl TryFrom<i32> for RawStructure {
    type Error = CoreError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            -1 => Ok(RawStructure::None),
            0 => Ok(RawStructure::Mine),
            1 => Ok(RawStructure::Tower),
            2 => Ok(RawStructure::Barracks),
            other => Err(CoreError::InvalidStructureType(other)),
        }
    }
}

/// Effective structure category used by planning and targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum StructureKind {
    /// Empty site.
    #[default]
    None,
    /// Gold mine.
    Mine,
    /// Defensive tower.
    Tower,
    /// Barracks producing knights.
    KnightBarracks,
    /// Barracks producing archers.
    ArcherBarracks,
    /// Barracks producing giants.
    GiantBarracks,
}

impl StructureKind {
    /// Whether this kind produces units.
    #[must_use]
    pub const fn is_barracks(self) -> bool {
        matches!(
            self,
            StructureKind::KnightBarracks
                | StructureKind::ArcherBarracks
                | StructureKind::GiantBarracks
        )
    }

    /// Unit type trained by this kind, if any.
    #[must_use]
    pub const fn trains(self) -> Option<UnitType> {
        match self {
            StructureKind::KnightBarracks => Some(UnitType::Knight),
            StructureKind::ArcherBarracks => Some(UnitType::Archer),
            StructureKind::GiantBarracks => Some(UnitType::Giant),
            _ => None,
        }
    }

    /// Barracks kind that trains `unit`, if it is trainable.
    #[must_use]
    pub const fn barracks_for(unit: UnitType) -> Option<Self> {
        match unit {
            UnitType::Knight => Some(StructureKind::KnightBarracks),
            UnitType::Archer => Some(StructureKind::ArcherBarracks),
            UnitType::Giant => Some(StructureKind::GiantBarracks),
            UnitType::Queen => None,
        }
    }

    /// Token used by the `BUILD` command, `None` for an empty site.
    #[must_use]
    pub const fn build_token(self) -> Option<&'static str> {
        match self {
            StructureKind::None => None,
            StructureKind::Mine => Some("MINE"),
            StructureKind::Tower => Some("TOWER"),
            StructureKind::KnightBarracks => Some("BARRACKS-KNIGHT"),
            StructureKind::ArcherBarracks => Some("BARRACKS-ARCHER"),
            StructureKind::GiantBarracks => Some("BARRACKS-GIANT"),
        }
    }
}

/// Resolve the effective structure kind from the wire category and param2.
///
/// A barracks whose sub-parameter names giants or archers resolves to that
/// barracks kind; every other barracks is a knight barracks. Non-barracks
/// categories pass through unchanged.
#[must_use]
pub fn classify(raw: RawStructure, param2: i32) -> StructureKind {
    match raw {
        RawStructure::None => StructureKind::None,
        RawStructure::Mine => StructureKind::Mine,
        RawStructure::Tower => StructureKind::Tower,
        RawStructure::Barracks if param2 == UnitType::Giant.code() => StructureKind::GiantBarracks,
        RawStructure::Barracks if param2 == UnitType::Archer.code() => {
            StructureKind::ArcherBarracks
        }
        RawStructure::Barracks => StructureKind::KnightBarracks,
    }
}

/// Fixed site description from the startup snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteInit {
    /// Site identifier.
    pub id: SiteId,
    /// Site centre.
    pub position: Position,
    /// Site radius.
    pub radius: i32,
}

/// Per-turn site record from the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSnapshot {
    /// Site identifier.
    pub id: SiteId,
    /// Gold left in the ground, -1 when not visible.
    pub gold_remaining: i32,
    /// Maximum mine income for this site, -1 when not visible.
    pub max_mine_size: i32,
    /// Wire structure category.
    pub structure: RawStructure,
    /// Current owner.
    pub owner: Owner,
    /// Structure-specific parameter 1.
    pub param1: i32,
    /// Structure-specific parameter 2.
    pub param2: i32,
}

/// Long-lived site record, updated in place every turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    /// Site identifier.
    pub id: SiteId,
    /// Site centre.
    pub position: Position,
    /// Site radius.
    pub radius: i32,
    /// Wire structure category.
    pub structure: RawStructure,
    /// Effective structure kind, kept in step with `structure`/`param2`.
    pub kind: StructureKind,
    /// Current owner.
    pub owner: Owner,
    /// Mine income, tower hit points or barracks cooldown.
    pub param1: i32,
    /// Tower range or barracks sub-type.
    pub param2: i32,
    /// Gold left in the ground.
    pub gold_remaining: i32,
    /// Maximum mine income for this site.
    pub max_mine_size: i32,
    /// Distance to our queen this turn.
    pub distance_from_my_queen: Fixed,
    /// Distance to the enemy queen this turn.
    pub distance_from_enemy_queen: Fixed,
    /// Distance to our queen's starting location, set on the first turn.
    pub distance_from_start: Fixed,
}

impl Site {
    /// Create an empty, neutral site from its startup description.
    #[must_use]
    pub fn new(init: SiteInit) -> Self {
        Self {
            id: init.id,
            position: init.position,
            radius: init.radius,
            structure: RawStructure::None,
            kind: StructureKind::None,
            owner: Owner::Neutral,
            param1: 0,
            param2: 0,
            gold_remaining: 0,
            max_mine_size: 0,
            distance_from_my_queen: Fixed::ZERO,
            distance_from_enemy_queen: Fixed::ZERO,
            distance_from_start: Fixed::ZERO,
        }
    }

    /// Overwrite every mutable field from the snapshot.
    pub(crate) fn overwrite(&mut self, snapshot: &SiteSnapshot) {
        self.structure = snapshot.structure;
        self.kind = classify(snapshot.structure, snapshot.param2);
        self.owner = snapshot.owner;
        self.param1 = snapshot.param1;
        self.param2 = snapshot.param2;
        self.gold_remaining = snapshot.gold_remaining;
        self.max_mine_size = snapshot.max_mine_size;
    }

    /// Current mine income.
    #[must_use]
    pub const fn mine_income(&self) -> i32 {
        self.param1
    }

    /// Current tower attack range.
    #[must_use]
    pub const fn tower_range(&self) -> i32 {
        self.param2
    }

    /// Turns until this barracks can train again.
    #[must_use]
    pub const fn barracks_cooldown(&self) -> i32 {
        self.param1
    }

    /// Whether this is a barracks that can start training now.
    #[must_use]
    pub fn is_idle_barracks(&self) -> bool {
        self.kind.is_barracks() && self.barracks_cooldown() <= 0
    }

    /// Whether the ground gold is at or below `threshold`.
    #[must_use]
    pub const fn is_depleted(&self, threshold: i32) -> bool {
        self.gold_remaining <= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn classify_folds_only_barracks(param2 in any::<i32>()) {
            let expected = match param2 {
                2 => StructureKind::GiantBarracks,
                1 => StructureKind::ArcherBarracks,
                _ => StructureKind::KnightBarracks,
            };
            prop_assert_eq!(classify(RawStructure::Barracks, param2), expected);
            prop_assert_eq!(classify(RawStructure::Tower, param2), StructureKind::Tower);
            prop_assert_eq!(classify(RawStructure::Mine, param2), StructureKind::Mine);
            prop_assert_eq!(classify(RawStructure::None, param2), StructureKind::None);
        }
    }

    #[test]
    fn test_barracks_sub_types() {
        assert_eq!(classify(RawStructure::Barracks, 2), StructureKind::GiantBarracks);
        assert_eq!(classify(RawStructure::Barracks, 1), StructureKind::ArcherBarracks);
        assert_eq!(classify(RawStructure::Barracks, 0), StructureKind::KnightBarracks);
        assert_eq!(classify(RawStructure::Barracks, -1), StructureKind::KnightBarracks);
        assert_eq!(classify(RawStructure::Barracks, 99), StructureKind::KnightBarracks);
    }

    #[test]
    fn test_non_barracks_pass_through() {
        for param2 in [-1, 0, 1, 2, 500] {
            assert_eq!(classify(RawStructure::None, param2), StructureKind::None);
            assert_eq!(classify(RawStructure::Mine, param2), StructureKind::Mine);
            assert_eq!(classify(RawStructure::Tower, param2), StructureKind::Tower);
        }
    }

    #[test]
    fn test_wire_codes() {
        assert_eq!(Owner::try_from(-1), Ok(Owner::Neutral));
        assert_eq!(Owner::try_from(0), Ok(Owner::Friendly));
        assert_eq!(Owner::try_from(1), Ok(Owner::Enemy));
        assert_eq!(Owner::try_from(2), Err(CoreError::InvalidOwner(2)));

        assert_eq!(RawStructure::try_from(2), Ok(RawStructure::Barracks));
        assert_eq!(
            RawStructure::try_from(3),
            Err(CoreError::InvalidStructureType(3))
        );
        assert_eq!(RawStructure::Tower.code(), 1);
    }

    #[test]
    fn test_build_tokens() {
        assert_eq!(StructureKind::Mine.build_token(), Some("MINE"));
        assert_eq!(StructureKind::GiantBarracks.build_token(), Some("BARRACKS-GIANT"));
        assert_eq!(StructureKind::None.build_token(), None);
    }

    #[test]
    fn test_barracks_for_unit_round_trips() {
        for unit in [UnitType::Knight, UnitType::Archer, UnitType::Giant] {
            let kind = StructureKind::barracks_for(unit).unwrap();
            assert_eq!(kind.trains(), Some(unit));
        }
        assert_eq!(StructureKind::barracks_for(UnitType::Queen), None);
    }

    #[test]
    fn test_overwrite_reclassifies() {
        let mut site = Site::new(SiteInit {
            id: 4,
            position: Position::new(10, 20),
            radius: 60,
        });
        site.overwrite(&SiteSnapshot {
            id: 4,
            gold_remaining: 150,
            max_mine_size: 3,
            structure: RawStructure::Barracks,
            owner: Owner::Friendly,
            param1: 0,
            param2: 1,
        });
        assert_eq!(site.kind, StructureKind::ArcherBarracks);
        assert!(site.is_idle_barracks());
        assert_eq!(site.position, Position::new(10, 20));
    }
}
