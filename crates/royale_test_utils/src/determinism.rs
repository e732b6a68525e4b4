//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the decision engine produces
//! identical commands given identical snapshots.
//!
//! # Sources of non-determinism we guard against
//!
//! - **Floating-point math**: distances are integer squared values or
//!   [`royale_core::math::Fixed`].
//! - **HashMap iteration order**: sites live in an ordered map, so scans
//!   and tie-breaks always run in ID order.
//! - **Hidden state**: the only state carried between turns is the site
//!   table, the counters, the start ordering and the training queue.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use royale_core::engine::{DecisionEngine, TurnOrders};
use royale_core::error::Result;
use royale_core::site::SiteInit;
use royale_core::tuning::Tuning;
use royale_core::world::TurnSnapshot;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of turns played per run.
    pub turns: usize,
}

impl DeterminismResult {
    fn from_hashes(hashes: Vec<u64>, turns: usize) -> Self {
        let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
        tracing::debug!(
            "Determinism check: {} runs, {} steps, deterministic = {}",
            hashes.len(),
            turns,
            is_deterministic
        );
        Self {
            is_deterministic,
            hashes,
            turns,
        }
    }

    /// Get all unique hashes (should be 1 for a deterministic engine).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that all runs produced identical hashes.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Engine is non-deterministic!\n\
                 Runs: {}\n\
                 Turns: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.turns,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a stateful process multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run
/// * `steps` - Number of steps per run
/// * `setup` - Function to create initial state
/// * `step` - Function to advance state by one step
/// * `hash` - Function to compute state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    steps: usize,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S, usize),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for index in 0..steps {
            step(&mut state, index);
        }

        hashes.push(hash(&state));
    }

    DeterminismResult::from_hashes(hashes, steps)
}

/// Play `turns` through a fresh engine and return the command lines.
///
/// # Errors
///
/// Propagates the first snapshot the engine rejects.
pub fn play(sites: &[SiteInit], tuning: &Tuning, turns: &[TurnSnapshot]) -> Result<Vec<String>> {
    let mut engine = DecisionEngine::new(sites.iter().copied(), tuning.clone());
    let mut lines = Vec::with_capacity(turns.len() * 2);
    for turn in turns {
        let orders = engine.next_turn(turn)?;
        lines.push(orders.queen.to_string());
        lines.push(orders.train.to_string());
    }
    Ok(lines)
}

/// Hash of one turn's wire output.
#[must_use]
pub fn orders_hash(orders: &TurnOrders) -> u64 {
    compute_hash(&(orders.queen.to_string(), orders.train.to_string()))
}

/// Replay the same match `runs` times through fresh engines and compare
/// the full command streams.
///
/// # Errors
///
/// Returns the first snapshot the engine rejects; a failed turn is never
/// counted as a match.
pub fn verify_engine_determinism(
    runs: usize,
    sites: &[SiteInit],
    tuning: &Tuning,
    turns: &[TurnSnapshot],
) -> Result<DeterminismResult> {
    let mut hashes = Vec::with_capacity(runs);
    for _ in 0..runs {
        let mut engine = DecisionEngine::new(sites.iter().copied(), tuning.clone());
        let mut trail = Vec::with_capacity(turns.len());
        for turn in turns {
            trail.push(orders_hash(&engine.next_turn(turn)?));
        }
        hashes.push(compute_hash(&trail));
    }
    Ok(DeterminismResult::from_hashes(hashes, turns.len()))
}

/// Run two engines side by side and report the first turn (1-based) whose
/// commands differ.
#[must_use]
pub fn find_first_divergence(
    sites: &[SiteInit],
    tuning: &Tuning,
    turns: &[TurnSnapshot],
) -> Option<usize> {
    let mut first = DecisionEngine::new(sites.iter().copied(), tuning.clone());
    let mut second = DecisionEngine::new(sites.iter().copied(), tuning.clone());

    for (index, turn) in turns.iter().enumerate() {
        let a = first.next_turn(turn).ok();
        let b = second.next_turn(turn).ok();
        if a != b {
            return Some(index + 1);
        }
    }
    None
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
