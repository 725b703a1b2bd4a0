use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Career record for one player. The display name doubles as the identity
/// and as the join key into `MatchState::players`, so renaming a player has
/// to sweep the match records too (the session owns that cascade).
///
/// `wins <= matches` holds across any sequence of create / apply / undo
/// operations; the session keeps both counters in lock-step with match
/// status transitions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub wins: u32,
    pub matches: u32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Player {
    pub fn new(name: &str) -> Self {
        Self {
            id: name.to_string(),
            wins: 0,
            matches: 0,
            created_at: chrono::Utc::now(),
        }
    }

    /// Fraction of played matches won, 0.0 for a fresh player.
    pub fn win_rate(&self) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.matches)
        }
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} wins / {} matches)",
            self.id, self.wins, self.matches
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_rate_handles_fresh_players() {
        let p = Player::new("Alice");
        assert_eq!(p.win_rate(), 0.0);
    }

    #[test]
    fn win_rate_is_wins_over_matches() {
        let mut p = Player::new("Alice");
        p.matches = 4;
        p.wins = 1;
        assert_eq!(p.win_rate(), 0.25);
    }
}
