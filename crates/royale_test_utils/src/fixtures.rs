//! Test fixtures and helpers.
//!
//! Pre-built site layouts, snapshots and units, plus a writer that renders
//! them in the line protocol so runner tests can feed them through stdin.

use std::fmt::Write as _;

use royale_core::math::Position;
use royale_core::site::{Owner, RawStructure, SiteId, SiteInit, SiteSnapshot};
use royale_core::unit::{Unit, UnitType};
use royale_core::world::TurnSnapshot;

/// Default site radius used by fixtures.
pub const SITE_RADIUS: i32 = 60;

/// Startup record for a site at `(x, y)`.
#[must_use]
pub fn site_at(id: SiteId, x: i32, y: i32) -> SiteInit {
    SiteInit {
        id,
        position: Position::new(x, y),
        radius: SITE_RADIUS,
    }
}

/// Sites along the x axis at the given distances from the origin, with IDs
/// in the same order.
#[must_use]
pub fn sites_on_a_line(distances: &[i32]) -> Vec<SiteInit> {
    distances
        .iter()
        .zip(0..)
        .map(|(&d, id)| site_at(id, d, 0))
        .collect()
}

/// An empty neutral site with plenty of gold.
#[must_use]
pub fn neutral(id: SiteId) -> SiteSnapshot {
    SiteSnapshot {
        id,
        gold_remaining: 250,
        max_mine_size: 3,
        structure: RawStructure::None,
        owner: Owner::Neutral,
        param1: -1,
        param2: -1,
    }
}

/// A site holding `structure` for `owner` with the given parameters.
#[must_use]
pub fn built(id: SiteId, structure: RawStructure, owner: Owner, param1: i32, param2: i32) -> SiteSnapshot {
    SiteSnapshot {
        structure,
        owner,
        param1,
        param2,
        ..neutral(id)
    }
}

/// A queen for `owner` at `(x, y)`.
#[must_use]
pub fn queen(owner: Owner, x: i32, y: i32, health: i32) -> Unit {
    Unit::new(Position::new(x, y), health, owner, UnitType::Queen)
}

/// A knight for `owner` at `(x, y)`.
#[must_use]
pub fn knight(owner: Owner, x: i32, y: i32) -> Unit {
    Unit::new(Position::new(x, y), 25, owner, UnitType::Knight)
}

/// A quiet turn: every site neutral, both queens at full health far
/// apart, our queen at `(x, y)`.
#[must_use]
pub fn quiet_turn(sites: &[SiteInit], x: i32, y: i32) -> TurnSnapshot {
    TurnSnapshot {
        gold: 0,
        touched_site: None,
        sites: sites.iter().map(|s| neutral(s.id)).collect(),
        units: vec![
            queen(Owner::Friendly, x, y, 100),
            queen(Owner::Enemy, 1900, 950, 100),
        ],
    }
}

/// Render the startup block.
#[must_use]
pub fn write_startup(sites: &[SiteInit]) -> String {
    let mut out = format!("{}\n", sites.len());
    for site in sites {
        let _ = writeln!(
            out,
            "{} {} {} {}",
            site.id, site.position.x, site.position.y, site.radius
        );
    }
    out
}

/// Render one turn block.
#[must_use]
pub fn write_turn(turn: &TurnSnapshot) -> String {
    let touched = turn.touched_site.map_or(-1, i64::from);
    let mut out = format!("{} {}\n", turn.gold, touched);
    for site in &turn.sites {
        let _ = writeln!(
            out,
            "{} {} {} {} {} {} {}",
            site.id,
            site.gold_remaining,
            site.max_mine_size,
            site.structure.code(),
            site.owner.code(),
            site.param1,
            site.param2
        );
    }
    let _ = writeln!(out, "{}", turn.units.len());
    for unit in &turn.units {
        let _ = writeln!(
            out,
            "{} {} {} {} {}",
            unit.position.x,
            unit.position.y,
            unit.owner.code(),
            unit.unit_type.code(),
            unit.health
        );
    }
    out
}

/// Render a whole match: startup followed by every turn.
#[must_use]
pub fn write_transcript(sites: &[SiteInit], turns: &[TurnSnapshot]) -> String {
    let mut out = write_startup(sites);
    for turn in turns {
        out.push_str(&write_turn(turn));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sites_on_a_line() {
        let sites = sites_on_a_line(&[100, 300, 500]);
        assert_eq!(sites.len(), 3);
        assert_eq!(sites[2].id, 2);
        assert_eq!(sites[2].position, Position::new(500, 0));
    }

    #[test]
    fn test_turn_text() {
        let sites = sites_on_a_line(&[100]);
        let mut turn = quiet_turn(&sites, 0, 0);
        turn.sites[0] = built(0, RawStructure::Barracks, Owner::Friendly, 0, 2);
        let text = write_turn(&turn);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "0 -1");
        assert_eq!(lines[1], "0 250 3 2 0 0 2");
        assert_eq!(lines[2], "2");
        assert_eq!(lines[3], "0 0 0 -1 100");
        assert_eq!(lines[4], "1900 950 1 -1 100");
    }

    #[test]
    fn test_transcript_starts_with_site_table() {
        let sites = sites_on_a_line(&[100, 300]);
        let text = write_transcript(&sites, &[]);
        assert_eq!(text, "2\n0 100 0 60\n1 300 0 60\n");
    }
}
