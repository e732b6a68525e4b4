//! Turn loop.
//!
//! Blocks on the next snapshot, decides, writes two lines, repeats. The
//! game ends when input ends at a turn boundary.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use royale_core::engine::DecisionEngine;
use royale_core::strategy::StrategyMode;
use royale_core::tuning::Tuning;

use crate::protocol::{read_startup, read_turn, write_orders, Result, TokenReader};

/// What happened over one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Turns answered.
    pub turns: u32,
    /// How often each queen rule fired.
    pub rules: BTreeMap<&'static str, u32>,
    /// Turns spent in giant-siege mode.
    pub siege_turns: u32,
    /// Turns that started a training.
    pub trainings: u32,
}

impl SessionSummary {
    fn record(&mut self, rule: &'static str, mode: StrategyMode, trained: bool) {
        self.turns += 1;
        *self.rules.entry(rule).or_insert(0) += 1;
        if mode == StrategyMode::GiantSiege {
            self.siege_turns += 1;
        }
        if trained {
            self.trainings += 1;
        }
    }
}

/// Drives one match over a reader/writer pair.
#[derive(Debug, Clone, Default)]
pub struct BotRunner {
    tuning: Tuning,
}

impl BotRunner {
    /// Create a runner with the given tuning.
    pub fn new(tuning: Tuning) -> Self {
        Self { tuning }
    }

    /// Play a whole match.
    ///
    /// # Errors
    ///
    /// Any malformed input, or a failed write, ends the session with an
    /// error.
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut output: W) -> Result<SessionSummary> {
        let mut reader = TokenReader::new(input);
        let sites = read_startup(&mut reader)?;
        let site_count = sites.len();
        for site in &sites {
            tracing::debug!(
                "Site {} at {} radius {}",
                site.id,
                site.position,
                site.radius
            );
        }

        let mut engine = DecisionEngine::new(sites, self.tuning.clone());
        let mut summary = SessionSummary::default();

        while let Some(snapshot) = read_turn(&mut reader, site_count)? {
            let orders = engine.next_turn(&snapshot)?;
            write_orders(&mut output, &orders)?;
            summary.record(orders.rule, orders.mode, !orders.train.sites.is_empty());
        }

        tracing::info!(
            "Game over after {} turns, {} trainings, {} siege turns",
            summary.turns,
            summary.trainings,
            summary.siege_turns
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_match() {
        let mut out = Vec::new();
        let summary = BotRunner::default().run("0\n".as_bytes(), &mut out).unwrap();
        assert_eq!(summary.turns, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_one_turn_two_lines() {
        let input = "1\n0 100 0 60\n0 0\n0 200 3 -1 -1 -1 -1\n2\n0 0 0 -1 100\n1800 900 1 -1 100\n";
        let mut out = Vec::new();
        let summary = BotRunner::default().run(input.as_bytes(), &mut out).unwrap();
        assert_eq!(summary.turns, 1);
        assert_eq!(summary.rules.get("build_order"), Some(&1));
        assert_eq!(String::from_utf8(out).unwrap(), "BUILD 0 MINE\nTRAIN\n");
    }

    #[test]
    fn test_bad_touched_site_keeps_playing() {
        let sites = "0 200 3 -1 -1 -1 -1\n2\n0 0 0 -1 100\n1800 900 1 -1 100\n";
        let input = format!("1\n0 100 0 60\n0 -2\n{sites}0 0\n{sites}");
        let mut out = Vec::new();
        let summary = BotRunner::default().run(input.as_bytes(), &mut out).unwrap();
        assert_eq!(summary.turns, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "MOVE 100 0\nTRAIN\nBUILD 0 MINE\nTRAIN\n"
        );
    }
}
