//! Decision benchmarks for royale_core.
//!
//! Run with: `cargo bench -p royale_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use royale_core::prelude::*;
use royale_test_utils::fixtures::{built, knight, quiet_turn, site_at};

fn crowded_match() -> (Vec<SiteInit>, TurnSnapshot) {
    let sites: Vec<SiteInit> = (0..24)
        .map(|id| site_at(id, 80 * (id as i32 % 12) + 100, 250 + 500 * (id as i32 / 12)))
        .collect();
    let mut turn = quiet_turn(&sites, 120, 300);
    turn.gold = 300;
    turn.touched_site = Some(3);
    turn.sites[1] = built(1, RawStructure::Barracks, Owner::Friendly, 0, 0);
    turn.sites[20] = built(20, RawStructure::Tower, Owner::Enemy, 700, 450);
    for i in 0..30 {
        turn.units.push(knight(Owner::Enemy, 900 + 10 * i, 500));
    }
    (sites, turn)
}

/// One full turn: snapshot absorption, plan, rule chain and training.
pub fn decision_benchmark(c: &mut Criterion) {
    let (sites, turn) = crowded_match();

    c.bench_function("next_turn", |b| {
        b.iter_batched(
            || DecisionEngine::new(sites.iter().copied(), Tuning::default()),
            |mut engine| black_box(engine.next_turn(black_box(&turn))),
            criterion::BatchSize::SmallInput,
        )
    });

    c.bench_function("find_closest_site", |b| {
        let mut engine = DecisionEngine::new(sites.iter().copied(), Tuning::default());
        let _ = engine.next_turn(&turn);
        b.iter(|| {
            engine
                .world()
                .find_closest_site(black_box(Position::new(960, 500)), &SiteFilter::BUILDABLE)
        })
    });
}

criterion_group!(benches, decision_benchmark);
criterion_main!(benches);
