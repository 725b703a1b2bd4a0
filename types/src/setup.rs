use serde::{Deserialize, Serialize};

fn default_target_sets() -> u32 {
    3
}

fn default_legs_per_set() -> u32 {
    3
}

fn default_game_type() -> String {
    "501".to_string()
}

/// Parameters supplied by the match-setup collaborator. `game_type`,
/// `double_in` and `double_out` are stored on the match as metadata and
/// never interpreted here; the scoring unit is a won leg, not a throw.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchSetup {
    pub players: Vec<String>,
    #[serde(default = "default_target_sets")]
    pub target_sets: u32,
    #[serde(default = "default_legs_per_set")]
    pub legs_per_set: u32,
    #[serde(default = "default_game_type")]
    pub game_type: String,
    #[serde(default)]
    pub double_in: bool,
    #[serde(default)]
    pub double_out: bool,
    #[serde(default)]
    pub starting_index: usize,
}

impl MatchSetup {
    pub fn new(players: Vec<String>, target_sets: u32, legs_per_set: u32) -> Self {
        Self {
            players,
            target_sets,
            legs_per_set,
            game_type: default_game_type(),
            double_in: false,
            double_out: true,
            starting_index: 0,
        }
    }
}
