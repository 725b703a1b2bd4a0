use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Per-player score counters for one match. The unit mutated on every
/// recorded leg.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub sets: u32,
    pub legs: u32,
}

impl ScoreState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Display for ScoreState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s/{}l", self.sets, self.legs)
    }
}
