//! Tunable strategy constants.
//!
//! The compiled-in [`Tuning::default`] is the strategy the bot plays with.
//! A RON file with the same shape can override it for experiments.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::site::StructureKind;
use crate::unit::UnitType;

/// Error type for tuning operations.
#[derive(Error, Debug)]
pub enum TuningError {
    /// File not found.
    #[error("Tuning file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read tuning file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse tuning: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// Parsed but unusable.
    #[error("Invalid tuning: {0}")]
    Invalid(String),
}

/// Every constant the decision rules consult.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Map width in map units.
    pub map_width: i32,
    /// Map height in map units.
    pub map_height: i32,
    /// Enemy units strictly inside this radius count as "near".
    pub alert_radius: i32,
    /// Queen health below which she retreats to the home corner.
    pub low_health: i32,
    /// A mine slot becomes a tower once its site's gold is at or below this.
    pub mine_depletion_gold: i32,
    /// Towers are upgraded until their range reaches this value.
    pub min_tower_range: i32,
    /// No more knights are queued while this many are alive.
    pub max_knights: usize,
    /// Gold cost per trainable unit type.
    pub unit_costs: BTreeMap<UnitType, i32>,
    /// Alternate strategy needs more than this many enemy towers...
    pub alternate_enemy_towers: usize,
    /// ...and a turn number past this one.
    pub alternate_after_turn: u32,
    /// Desired structure per start-distance rank.
    pub build_order: Vec<StructureKind>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            map_width: 1920,
            map_height: 1000,
            alert_radius: 150,
            low_health: 25,
            mine_depletion_gold: 10,
            min_tower_range: 500,
            max_knights: 12,
            unit_costs: [
                (UnitType::Knight, 80),
                (UnitType::Archer, 100),
                (UnitType::Giant, 140),
            ]
            .into_iter()
            .collect(),
            alternate_enemy_towers: 3,
            alternate_after_turn: 150,
            build_order: vec![
                StructureKind::Mine,
                StructureKind::KnightBarracks,
                StructureKind::Mine,
                StructureKind::Mine,
                StructureKind::Mine,
                StructureKind::Tower,
                StructureKind::Tower,
                StructureKind::Mine,
                StructureKind::Tower,
                StructureKind::Mine,
                StructureKind::Tower,
            ],
        }
    }
}

impl Tuning {
    /// Load tuning from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TuningError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TuningError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string. Missing fields take their default values.
    pub fn from_ron_str(ron: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = ron::from_str(ron)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize as pretty RON.
    pub fn to_ron_string(&self) -> Result<String, TuningError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| TuningError::Invalid(e.to_string()))
    }

    /// Reject settings the decision rules cannot work with.
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.map_width <= 0 || self.map_height <= 0 {
            return Err(TuningError::Invalid(format!(
                "map size must be positive, got {}x{}",
                self.map_width, self.map_height
            )));
        }
        if self.build_order.is_empty() {
            return Err(TuningError::Invalid("build order is empty".to_string()));
        }
        if let Some(slot) = self
            .build_order
            .iter()
            .position(|kind| *kind == StructureKind::None)
        {
            return Err(TuningError::Invalid(format!(
                "build order slot {slot} has no structure"
            )));
        }
        if let Some((unit, cost)) = self.unit_costs.iter().find(|(_, cost)| **cost < 0) {
            return Err(TuningError::Invalid(format!(
                "negative cost {cost} for {unit:?}"
            )));
        }
        Ok(())
    }

    /// Gold cost of `unit`.
    ///
    /// A type missing from the cost table costs nothing; this is logged
    /// rather than treated as fatal.
    #[must_use]
    pub fn unit_cost(&self, unit: UnitType) -> i32 {
        match self.unit_costs.get(&unit) {
            Some(cost) => *cost,
            None => {
                tracing::warn!("No cost known for {:?}, assuming 0", unit);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.unit_cost(UnitType::Knight), 80);
        assert_eq!(tuning.unit_cost(UnitType::Giant), 140);
    }

    #[test]
    fn test_unknown_cost_is_zero() {
        assert_eq!(Tuning::default().unit_cost(UnitType::Queen), 0);
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let tuning = Tuning::from_ron_str("(alert_radius: 300, low_health: 10)").unwrap();
        assert_eq!(tuning.alert_radius, 300);
        assert_eq!(tuning.low_health, 10);
        assert_eq!(tuning.build_order, Tuning::default().build_order);
    }

    #[test]
    fn test_build_order_from_ron() {
        let tuning = Tuning::from_ron_str("(build_order: [Mine, Tower, GiantBarracks])").unwrap();
        assert_eq!(
            tuning.build_order,
            vec![
                StructureKind::Mine,
                StructureKind::Tower,
                StructureKind::GiantBarracks
            ]
        );
    }

    #[test]
    fn test_empty_build_order_rejected() {
        let err = Tuning::from_ron_str("(build_order: [])").unwrap_err();
        assert!(matches!(err, TuningError::Invalid(_)));
    }

    #[test]
    fn test_none_slot_rejected() {
        let tuning = Tuning {
            build_order: vec![StructureKind::Mine, StructureKind::None],
            ..Tuning::default()
        };
        let err = tuning.validate().unwrap_err();
        assert!(matches!(err, TuningError::Invalid(_)));
    }

    #[test]
    fn test_negative_cost_rejected() {
        let err = Tuning::from_ron_str("(unit_costs: {Knight: -5})").unwrap_err();
        assert!(matches!(err, TuningError::Invalid(_)));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let err = Tuning::from_ron_str("(alert_radius: \"far\")").unwrap_err();
        assert!(matches!(err, TuningError::ParseError(_)));
    }

    #[test]
    fn test_pretty_ron_round_trip() {
        let tuning = Tuning::default();
        let text = tuning.to_ron_string().unwrap();
        assert_eq!(Tuning::from_ron_str(&text).unwrap(), tuning);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tuning.ron");
        std::fs::write(&path, "(max_knights: 4, alternate_after_turn: 90)").unwrap();
        let tuning = Tuning::load(&path).unwrap();
        assert_eq!(tuning.max_knights, 4);
        assert_eq!(tuning.alternate_after_turn, 90);
        assert_eq!(tuning.min_tower_range, 500);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Tuning::load("/definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, TuningError::FileNotFound(_)));
    }
}
