use chrono::{DateTime, Local};

use crate::recognition::domain::identity_resolver::IdentityResolver;
use crate::shared::constants::DEFAULT_ROSTER;

/// Seconds per gate cycle; the gate is open during the first second.
const GATE_PERIOD_SECS: i64 = 10;

/// Stand-in recognizer that picks a roster name from the wall clock.
///
/// With `t` the whole Unix seconds of `now`, it answers only when at least
/// one face is present and `t mod 10 < 1`, and then returns
/// `roster[t mod roster.len()]`.
pub struct SimulatedIdentityResolver {
    roster: Vec<String>,
}

impl SimulatedIdentityResolver {
    pub fn new(roster: Vec<String>) -> Self {
        Self { roster }
    }

    pub fn roster(&self) -> &[String] {
        &self.roster
    }
}

impl Default for SimulatedIdentityResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ROSTER.iter().map(|s| s.to_string()).collect())
    }
}

impl IdentityResolver for SimulatedIdentityResolver {
    fn resolve(&self, now: DateTime<Local>, detection_count: usize) -> Option<String> {
        if detection_count == 0 || self.roster.is_empty() {
            return None;
        }
        let t = now.timestamp();
        if t.rem_euclid(GATE_PERIOD_SECS) >= 1 {
            return None;
        }
        let idx = t.rem_euclid(self.roster.len() as i64) as usize;
        Some(self.roster[idx].clone())
    }
}
