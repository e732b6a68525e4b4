//! Capability-filtered nearest-site search.
//!
//! Every "where do I go, build or train next" question is a [`SiteFilter`]
//! over [`find_closest_site`]. Filters are exclusionary: a `false` flag
//! removes sites of that owner or kind; a `true` flag removes nothing.
//! Empty sites are never excluded by a kind flag.

use serde::{Deserialize, Serialize};

use crate::math::{root_of_squared, Fixed, Position};
use crate::site::{Owner, Site, SiteId, StructureKind};
use crate::world::WorldState;

/// Owner and kind flags for [`find_closest_site`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteFilter {
    /// Keep sites we own.
    pub owned: bool,
    /// Keep enemy sites.
    pub enemy: bool,
    /// Keep neutral sites.
    pub neutral: bool,
    /// Keep mines.
    pub mine: bool,
    /// Keep towers.
    pub tower: bool,
    /// Keep knight barracks.
    pub knight_barracks: bool,
    /// Keep archer barracks.
    pub archer_barracks: bool,
    /// Keep giant barracks.
    pub giant_barracks: bool,
    /// Keep only barracks that are off cooldown.
    pub idle_only: bool,
}

impl Default for SiteFilter {
    fn default() -> Self {
        Self::ANY
    }
}

impl SiteFilter {
    /// Every site qualifies.
    pub const ANY: Self = Self {
        owned: true,
        enemy: true,
        neutral: true,
        mine: true,
        tower: true,
        knight_barracks: true,
        archer_barracks: true,
        giant_barracks: true,
        idle_only: false,
    };

    /// Sites with no structure that we do not own: somewhere to build.
    pub const BUILDABLE: Self = Self {
        owned: false,
        enemy: true,
        neutral: true,
        mine: false,
        tower: false,
        knight_barracks: false,
        archer_barracks: false,
        giant_barracks: false,
        idle_only: false,
    };

    /// Our idle barracks of exactly `kind`.
    #[must_use]
    pub fn idle_production(kind: StructureKind) -> Self {
        Self {
            owned: true,
            enemy: false,
            neutral: false,
            mine: false,
            tower: false,
            knight_barracks: kind == StructureKind::KnightBarracks,
            archer_barracks: kind == StructureKind::ArcherBarracks,
            giant_barracks: kind == StructureKind::GiantBarracks,
            idle_only: true,
        }
    }

    /// Drop sites held by `owner`.
    #[must_use]
    pub fn without_owner(mut self, owner: Owner) -> Self {
        match owner {
            Owner::Friendly => self.owned = false,
            Owner::Enemy => self.enemy = false,
            Owner::Neutral => self.neutral = false,
        }
        self
    }

    /// Drop sites holding `kind`. Has no effect for [`StructureKind::None`].
    #[must_use]
    pub fn without_kind(mut self, kind: StructureKind) -> Self {
        match kind {
            StructureKind::None => {}
            StructureKind::Mine => self.mine = false,
            StructureKind::Tower => self.tower = false,
            StructureKind::KnightBarracks => self.knight_barracks = false,
            StructureKind::ArcherBarracks => self.archer_barracks = false,
            StructureKind::GiantBarracks => self.giant_barracks = false,
        }
        self
    }

    fn keeps_owner(&self, owner: Owner) -> bool {
        match owner {
            Owner::Friendly => self.owned,
            Owner::Enemy => self.enemy,
            Owner::Neutral => self.neutral,
        }
    }

    fn keeps_kind(&self, kind: StructureKind) -> bool {
        match kind {
            StructureKind::None => true,
            StructureKind::Mine => self.mine,
            StructureKind::Tower => self.tower,
            StructureKind::KnightBarracks => self.knight_barracks,
            StructureKind::ArcherBarracks => self.archer_barracks,
            StructureKind::GiantBarracks => self.giant_barracks,
        }
    }

    /// Whether `site` survives every flag.
    #[must_use]
    pub fn accepts(&self, site: &Site) -> bool {
        self.keeps_owner(site.owner)
            && self.keeps_kind(site.kind)
            && (!self.idle_only || site.is_idle_barracks())
    }
}

/// Result of a successful nearest-site search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteMatch {
    /// Nearest qualifying site.
    pub id: SiteId,
    /// Its distance from the reference position.
    pub distance: Fixed,
}

/// Nearest site to `position` accepted by `filter`.
///
/// Ties go to whichever qualifying site comes first in `sites`; over a
/// [`WorldState`] that is the lowest ID. `None` when nothing qualifies.
pub fn find_closest_site<'a>(
    sites: impl IntoIterator<Item = &'a Site>,
    position: Position,
    filter: &SiteFilter,
) -> Option<SiteMatch> {
    let mut best: Option<(i64, SiteId)> = None;
    for site in sites {
        if !filter.accepts(site) {
            continue;
        }
        let d2 = site.position.distance_squared(position);
        if best.map_or(true, |(best_d2, _)| d2 < best_d2) {
            best = Some((d2, site.id));
        }
    }

    best.map(|(d2, id)| SiteMatch {
        id,
        distance: root_of_squared(d2),
    })
}

impl WorldState {
    /// Nearest site in this world to `position` accepted by `filter`.
    #[must_use]
    pub fn find_closest_site(&self, position: Position, filter: &SiteFilter) -> Option<SiteMatch> {
        find_closest_site(self.sites(), position, filter)
    }
}
