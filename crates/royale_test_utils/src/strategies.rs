//! Proptest strategies.
//!
//! These generate random but reproducible site layouts, site updates and
//! filters for property-based tests of the engine.

use proptest::prelude::*;
use royale_core::math::Position;
use royale_core::site::{Owner, RawStructure, SiteId, SiteInit, SiteSnapshot};
use royale_core::targeting::SiteFilter;

/// Map-sized position.
pub fn arb_position() -> impl Strategy<Value = Position> {
    (0i32..=1920, 0i32..=1000).prop_map(|(x, y)| Position::new(x, y))
}

/// Any owner.
pub fn arb_owner() -> impl Strategy<Value = Owner> {
    prop_oneof![Just(Owner::Neutral), Just(Owner::Friendly), Just(Owner::Enemy)]
}

/// Any wire structure category.
pub fn arb_raw_structure() -> impl Strategy<Value = RawStructure> {
    prop_oneof![
        Just(RawStructure::None),
        Just(RawStructure::Mine),
        Just(RawStructure::Tower),
        Just(RawStructure::Barracks),
    ]
}

/// Site parameter. Small values so barracks sub-types and idle cooldowns
/// come up often.
pub fn arb_param() -> impl Strategy<Value = i32> {
    prop_oneof![-1i32..=3, 0i32..=800]
}

/// Startup table with IDs `0..n` for some `n` in `1..max_sites`.
pub fn arb_site_layout(max_sites: usize) -> impl Strategy<Value = Vec<SiteInit>> {
    proptest::collection::vec(arb_position(), 1..max_sites).prop_map(|positions| {
        positions
            .into_iter()
            .zip(0..)
            .map(|(position, id)| SiteInit {
                id,
                position,
                radius: 60,
            })
            .collect()
    })
}

/// One site update for site `id`.
pub fn arb_site_snapshot(id: SiteId) -> impl Strategy<Value = SiteSnapshot> {
    (
        -1i32..300,
        arb_raw_structure(),
        arb_owner(),
        arb_param(),
        arb_param(),
    )
        .prop_map(move |(gold_remaining, structure, owner, param1, param2)| SiteSnapshot {
            id,
            gold_remaining,
            max_mine_size: 3,
            structure,
            owner,
            param1,
            param2,
        })
}

/// A sequence of site updates over a table of `site_count` sites, in any
/// order and with repeats.
pub fn arb_update_sequence(
    site_count: u32,
    max_len: usize,
) -> impl Strategy<Value = Vec<SiteSnapshot>> {
    proptest::collection::vec(
        (0..site_count).prop_flat_map(arb_site_snapshot),
        0..max_len,
    )
}

/// Any combination of filter flags.
pub fn arb_site_filter() -> impl Strategy<Value = SiteFilter> {
    proptest::collection::vec(any::<bool>(), 9).prop_map(|f| SiteFilter {
        owned: f[0],
        enemy: f[1],
        neutral: f[2],
        mine: f[3],
        tower: f[4],
        knight_barracks: f[5],
        archer_barracks: f[6],
        giant_barracks: f[7],
        idle_only: f[8],
    })
}
