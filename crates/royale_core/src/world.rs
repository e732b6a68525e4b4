//! World state: long-lived sites, per-turn units, incremental counters.
//!
//! Sites are created once from the startup snapshot and then updated in
//! place. Friendly tower and barracks counts and the enemy tower set are
//! never recomputed by scanning; [`WorldState::apply_site`] adjusts them at
//! the moment a site's owner or effective kind changes, comparing the stored
//! record against the incoming one *before* overwriting it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::math::Position;
use crate::site::{classify, Owner, Site, SiteId, SiteInit, SiteSnapshot, StructureKind};
use crate::unit::{Unit, UnitType};

/// Everything the engine receives for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TurnSnapshot {
    /// Gold in the bank.
    pub gold: i32,
    /// Site the queen is touching, if any.
    pub touched_site: Option<SiteId>,
    /// One record per site.
    pub sites: Vec<SiteSnapshot>,
    /// Every visible unit, queens included.
    pub units: Vec<Unit>,
}

/// Counter transition caused by a site update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiteEvent {
    /// We now own a tower here.
    TowerGained(SiteId),
    /// A tower we owned here is gone.
    TowerLost(SiteId),
    /// We now own a barracks of this kind here.
    BarracksGained(SiteId, StructureKind),
    /// A barracks we owned here is gone.
    BarracksLost(SiteId, StructureKind),
    /// The enemy now has a tower here.
    EnemyTowerSeen(SiteId),
    /// The enemy tower here is gone.
    EnemyTowerGone(SiteId),
}

/// Aggregate counters, used to compare incremental tracking with a rescan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Counters {
    /// Friendly towers.
    pub towers: usize,
    /// Friendly barracks per kind.
    pub barracks: BTreeMap<StructureKind, usize>,
    /// Sites holding enemy towers.
    pub enemy_towers: BTreeSet<SiteId>,
}

/// Game state for one match.
#[derive(Debug, Clone)]
pub struct WorldState {
    sites: BTreeMap<SiteId, Site>,
    own_units: Vec<Unit>,
    enemy_units: Vec<Unit>,
    my_queen: Unit,
    enemy_queen: Unit,
    gold: i32,
    touched_site: Option<SiteId>,
    turn: u32,
    counters: Counters,
    own_unit_counts: BTreeMap<UnitType, usize>,
    start_position: Option<Position>,
    starting_health: i32,
    start_order: Vec<SiteId>,
}

impl WorldState {
    /// Create the world from the startup site table. Every site starts
    /// empty and neutral.
    #[must_use]
    pub fn new(sites: impl IntoIterator<Item = SiteInit>) -> Self {
        let sites = sites
            .into_iter()
            .map(|init| (init.id, Site::new(init)))
            .collect();
        Self {
            sites,
            own_units: Vec::new(),
            enemy_units: Vec::new(),
            my_queen: Unit::absent_queen(Owner::Friendly),
            enemy_queen: Unit::absent_queen(Owner::Enemy),
            gold: 0,
            touched_site: None,
            turn: 0,
            counters: Counters::default(),
            own_unit_counts: BTreeMap::new(),
            start_position: None,
            starting_health: 0,
            start_order: Vec::new(),
        }
    }

    /// Absorb one turn's snapshot.
    ///
    /// Sites are compared and overwritten, units rebuilt, the start ordering
    /// computed on the first turn, and queen distances refreshed.
    pub fn begin_turn(&mut self, snapshot: &TurnSnapshot) -> Result<Vec<SiteEvent>> {
        self.turn += 1;
        self.gold = snapshot.gold;
        self.touched_site = snapshot.touched_site;

        let mut events = Vec::new();
        for site in &snapshot.sites {
            events.extend(self.apply_site(site)?);
        }

        self.rebuild_units(&snapshot.units);

        if self.start_position.is_none() {
            self.record_start();
        }
        self.refresh_queen_distances();

        tracing::debug!(
            "Turn {}: {} knights, {} archers, {} giants",
            self.turn,
            self.own_unit_count(UnitType::Knight),
            self.own_unit_count(UnitType::Archer),
            self.own_unit_count(UnitType::Giant),
        );

        Ok(events)
    }

    /// Compare `snapshot` with the stored site, adjust counters, then
    /// overwrite the stored site.
    pub fn apply_site(&mut self, snapshot: &SiteSnapshot) -> Result<Vec<SiteEvent>> {
        let site = self
            .sites
            .get(&snapshot.id)
            .ok_or(CoreError::UnknownSite(snapshot.id))?;

        let old = (site.owner, site.kind);
        let new = (snapshot.owner, classify(snapshot.structure, snapshot.param2));

        let mut events = Vec::new();
        if old != new {
            self.retract(snapshot.id, old.0, old.1, &mut events);
            self.register(snapshot.id, new.0, new.1, &mut events);
        }

        if let Some(site) = self.sites.get_mut(&snapshot.id) {
            site.overwrite(snapshot);
        }
        Ok(events)
    }

    fn retract(
        &mut self,
        id: SiteId,
        owner: Owner,
        kind: StructureKind,
        events: &mut Vec<SiteEvent>,
    ) {
        match (owner, kind) {
            (Owner::Friendly, StructureKind::Tower) => {
                self.counters.towers = self.counters.towers.saturating_sub(1);
                tracing::debug!("Lost tower at {}, total {}", id, self.counters.towers);
                events.push(SiteEvent::TowerLost(id));
            }
            (Owner::Friendly, kind) if kind.is_barracks() => {
                let count = self.counters.barracks.entry(kind).or_insert(0);
                *count = count.saturating_sub(1);
                tracing::debug!("Lost {:?} at {}, total {}", kind, id, count);
                events.push(SiteEvent::BarracksLost(id, kind));
            }
            (Owner::Enemy, StructureKind::Tower) => {
                self.counters.enemy_towers.remove(&id);
                tracing::debug!("Enemy tower at {} gone", id);
                events.push(SiteEvent::EnemyTowerGone(id));
            }
            _ => {}
        }
    }

    fn register(
        &mut self,
        id: SiteId,
        owner: Owner,
        kind: StructureKind,
        events: &mut Vec<SiteEvent>,
    ) {
        match (owner, kind) {
            (Owner::Friendly, StructureKind::Tower) => {
                self.counters.towers += 1;
                tracing::debug!("Gained tower at {}, total {}", id, self.counters.towers);
                events.push(SiteEvent::TowerGained(id));
            }
            (Owner::Friendly, kind) if kind.is_barracks() => {
                let count = self.counters.barracks.entry(kind).or_insert(0);
                *count += 1;
                tracing::debug!("Gained {:?} at {}, total {}", kind, id, count);
                events.push(SiteEvent::BarracksGained(id, kind));
            }
            (Owner::Enemy, StructureKind::Tower) => {
                self.counters.enemy_towers.insert(id);
                tracing::debug!("Enemy tower seen at {}", id);
                events.push(SiteEvent::EnemyTowerSeen(id));
            }
            _ => {}
        }
    }

    /// Replace both unit lists and the queens from this turn's records.
    pub fn rebuild_units(&mut self, units: &[Unit]) {
        self.own_units.clear();
        self.enemy_units.clear();
        self.own_unit_counts.clear();

        for unit in units {
            match (unit.is_queen(), unit.owner) {
                (true, Owner::Friendly) => self.my_queen = *unit,
                (true, _) => self.enemy_queen = *unit,
                (false, Owner::Friendly) => {
                    self.own_units.push(*unit);
                    *self.own_unit_counts.entry(unit.unit_type).or_insert(0) += 1;
                }
                (false, _) => self.enemy_units.push(*unit),
            }
        }
    }

    fn record_start(&mut self) {
        let start = self.my_queen.position;
        self.start_position = Some(start);
        self.starting_health = self.my_queen.health;

        for site in self.sites.values_mut() {
            site.distance_from_start = site.position.distance(start);
        }

        let mut order: Vec<(i64, SiteId)> = self
            .sites
            .values()
            .map(|site| (site.position.distance_squared(start), site.id))
            .collect();
        order.sort_unstable();
        self.start_order = order.into_iter().map(|(_, id)| id).collect();

        tracing::debug!("Start at {:?}, site order {:?}", start, self.start_order);
    }

    fn refresh_queen_distances(&mut self) {
        let mine = self.my_queen.position;
        let theirs = self.enemy_queen.position;
        for site in self.sites.values_mut() {
            site.distance_from_my_queen = site.position.distance(mine);
            site.distance_from_enemy_queen = site.position.distance(theirs);
        }
    }

    /// Count friendly towers, barracks and enemy towers by scanning every
    /// site. Used to audit the incremental counters.
    #[must_use]
    pub fn rescan_counters(&self) -> Counters {
        let mut counters = Counters::default();
        for site in self.sites.values() {
            match (site.owner, site.kind) {
                (Owner::Friendly, StructureKind::Tower) => counters.towers += 1,
                (Owner::Friendly, kind) if kind.is_barracks() => {
                    *counters.barracks.entry(kind).or_insert(0) += 1;
                }
                (Owner::Enemy, StructureKind::Tower) => {
                    counters.enemy_towers.insert(site.id);
                }
                _ => {}
            }
        }
        counters
    }

    /// Incrementally tracked counters, normalised for comparison with
    /// [`Self::rescan_counters`].
    #[must_use]
    pub fn counters(&self) -> Counters {
        let mut counters = self.counters.clone();
        counters.barracks.retain(|_, count| *count > 0);
        counters
    }

    /// Whether any enemy unit stands strictly inside `radius` of `position`.
    #[must_use]
    pub fn enemies_near(&self, position: Position, radius: i32) -> bool {
        self.enemy_units
            .iter()
            .any(|unit| position.is_within(unit.position, radius))
    }

    /// IDs of sites whose owner is selected by the flags, in ID order.
    #[must_use]
    pub fn site_ids(&self, owned: bool, enemy: bool, neutral: bool) -> Vec<SiteId> {
        self.sites
            .values()
            .filter(|site| match site.owner {
                Owner::Friendly => owned,
                Owner::Enemy => enemy,
                Owner::Neutral => neutral,
            })
            .map(|site| site.id)
            .collect()
    }

    /// All sites, in ID order.
    pub fn sites(&self) -> impl Iterator<Item = &Site> {
        self.sites.values()
    }

    /// One site.
    #[must_use]
    pub fn site(&self, id: SiteId) -> Option<&Site> {
        self.sites.get(&id)
    }

    /// Number of sites.
    #[must_use]
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Friendly towers.
    #[must_use]
    pub fn tower_count(&self) -> usize {
        self.counters.towers
    }

    /// Friendly barracks of `kind`.
    #[must_use]
    pub fn barracks_count(&self, kind: StructureKind) -> usize {
        self.counters.barracks.get(&kind).copied().unwrap_or(0)
    }

    /// Sites holding enemy towers.
    #[must_use]
    pub fn enemy_towers(&self) -> &BTreeSet<SiteId> {
        &self.counters.enemy_towers
    }

    /// Number of enemy towers.
    #[must_use]
    pub fn enemy_tower_count(&self) -> usize {
        self.counters.enemy_towers.len()
    }

    /// Living friendly units of `unit_type`.
    #[must_use]
    pub fn own_unit_count(&self, unit_type: UnitType) -> usize {
        self.own_unit_counts.get(&unit_type).copied().unwrap_or(0)
    }

    /// Our non-queen units this turn.
    #[must_use]
    pub fn own_units(&self) -> &[Unit] {
        &self.own_units
    }

    /// Enemy non-queen units this turn.
    #[must_use]
    pub fn enemy_units(&self) -> &[Unit] {
        &self.enemy_units
    }

    /// Our queen.
    #[must_use]
    pub fn my_queen(&self) -> &Unit {
        &self.my_queen
    }

    /// The enemy queen.
    #[must_use]
    pub fn enemy_queen(&self) -> &Unit {
        &self.enemy_queen
    }

    /// Gold in the bank.
    #[must_use]
    pub fn gold(&self) -> i32 {
        self.gold
    }

    /// Site the queen is touching.
    #[must_use]
    pub fn touched_site(&self) -> Option<SiteId> {
        self.touched_site
    }

    /// Current turn, 1 on the first snapshot.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Our queen's position on the first turn.
    #[must_use]
    pub fn start_position(&self) -> Option<Position> {
        self.start_position
    }

    /// Our queen's health on the first turn.
    #[must_use]
    pub fn starting_health(&self) -> i32 {
        self.starting_health
    }

    /// Site IDs ordered by distance from the start position, nearest first.
    #[must_use]
    pub fn start_order(&self) -> &[SiteId] {
        &self.start_order
    }
}
