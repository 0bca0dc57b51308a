use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::constants::{FAME_WEIGHTS, FAME_WINDOW};

/// Rolling window of the last seasons' fame; older seasons weigh less.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FameTracker {
    seasons: VecDeque<i64>,
}

impl Default for FameTracker {
    fn default() -> Self {
        Self { seasons: std::iter::repeat(0).take(FAME_WINDOW).collect() }
    }
}

impl FameTracker {
    pub fn fame(&self) -> i64 {
        let weighted: f64 = self
            .seasons
            .iter()
            .zip(FAME_WEIGHTS.iter())
            .map(|(&value, &weight)| value as f64 * weight)
            .sum();
        weighted.trunc() as i64
    }

    /// Pushes the newest season, dropping the oldest.
    pub fn add(&mut self, value: i64) {
        self.seasons.pop_front();
        self.seasons.push_back(value);
    }

    /// Oldest season first.
    pub fn seasons(&self) -> impl Iterator<Item = i64> + '_ {
        self.seasons.iter().copied()
    }
}
