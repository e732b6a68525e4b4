//! Commands emitted each turn and their wire text.

use std::fmt;

use crate::math::Position;
use crate::site::{SiteId, StructureKind};

/// A structure the queen can build, paired with where.
///
/// Only constructible for real structures, so every value has a wire token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOrder {
    site: SiteId,
    kind: StructureKind,
}

impl BuildOrder {
    /// Build `kind` at `site`. `None` for [`StructureKind::None`].
    #[must_use]
    pub fn new(site: SiteId, kind: StructureKind) -> Option<Self> {
        kind.build_token().map(|_| Self { site, kind })
    }

    /// Target site.
    #[must_use]
    pub const fn site(&self) -> SiteId {
        self.site
    }

    /// Structure to build.
    #[must_use]
    pub const fn kind(&self) -> StructureKind {
        self.kind
    }
}

/// The queen's action for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueenCommand {
    /// Walk in a straight line toward a point.
    Move(Position),
    /// Build, or upgrade, a structure on the touched site.
    Build(BuildOrder),
}

impl QueenCommand {
    /// Build `kind` at `site`, if `kind` is a real structure.
    #[must_use]
    pub fn build(site: SiteId, kind: StructureKind) -> Option<Self> {
        BuildOrder::new(site, kind).map(QueenCommand::Build)
    }
}

impl fmt::Display for QueenCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueenCommand::Move(target) => write!(f, "MOVE {} {}", target.x, target.y),
            QueenCommand::Build(order) => write!(
                f,
                "BUILD {} {}",
                order.site,
                order.kind.build_token().unwrap_or_default()
            ),
        }
    }
}

/// Barracks to start training at this turn.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrainCommand {
    /// Site IDs, possibly empty.
    pub sites: Vec<SiteId>,
}

impl TrainCommand {
    /// Train nowhere.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// Train at one site.
    #[must_use]
    pub fn at(site: SiteId) -> Self {
        Self { sites: vec![site] }
    }
}

impl From<Option<SiteId>> for TrainCommand {
    fn from(site: Option<SiteId>) -> Self {
        site.map_or_else(Self::idle, Self::at)
    }
}

impl fmt::Display for TrainCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TRAIN")?;
        for site in &self.sites {
            write!(f, " {site}")?;
        }
        Ok(())
    }
}
