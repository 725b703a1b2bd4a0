use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{MatchSetup, ScoreState};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Playing,
    Finished,
}

impl Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Playing => write!(f, "playing"),
            MatchStatus::Finished => write!(f, "finished"),
        }
    }
}

/// One match of darts: fixed player order, per-player score counters, and a
/// snapshot history that makes every recorded leg reversible.
///
/// Transitions never touch storage or career stats. The caller persists the
/// returned value and settles win credit itself, so a transition is a pure
/// function from (match, event) to the next match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchState {
    pub id: Uuid,
    pub players: Vec<String>,
    pub target_sets: u32,
    pub legs_per_set: u32,
    pub game_type: String,
    pub double_in: bool,
    pub double_out: bool,
    pub starting_index: usize,
    pub scores: Vec<ScoreState>,
    /// Pre-mutation score snapshots, one per recorded leg. Append-only
    /// except for the pop in `undo`.
    pub history: Vec<Vec<ScoreState>>,
    pub status: MatchStatus,
    pub winner: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl MatchState {
    pub fn new(setup: MatchSetup) -> Self {
        let scores = setup.players.iter().map(|_| ScoreState::new()).collect();
        Self {
            id: Uuid::new_v4(),
            players: setup.players,
            target_sets: setup.target_sets,
            legs_per_set: setup.legs_per_set,
            game_type: setup.game_type,
            double_in: setup.double_in,
            double_out: setup.double_out,
            starting_index: setup.starting_index,
            scores,
            history: Vec::new(),
            status: MatchStatus::Playing,
            winner: None,
            created_at: chrono::Utc::now(),
        }
    }

    /// Record a won leg for the player at `player_index` and return the next
    /// match state. Exactly one snapshot is pushed and exactly one player's
    /// counters move, apart from the leg reset every player gets on a set
    /// rollover.
    ///
    /// Recording against a finished match or an out-of-range index is a
    /// guarded no-op: the input state comes back unchanged. UI double-clicks
    /// land here, so idempotent safety beats strict precondition checks.
    pub fn apply_leg_win(&self, player_index: usize) -> MatchState {
        if self.status == MatchStatus::Finished {
            log::warn!("Ignoring leg win for finished match {}", self.id);
            return self.clone();
        }
        if player_index >= self.players.len() {
            log::warn!(
                "Ignoring leg win for out-of-range player index {player_index} in match {}",
                self.id
            );
            return self.clone();
        }

        let mut next = self.clone();
        next.history.push(self.scores.clone());
        next.scores[player_index].legs += 1;

        if next.scores[player_index].legs >= next.legs_per_set {
            next.scores[player_index].sets += 1;
            // A set boundary closes the round for everyone, not just the winner.
            for score in next.scores.iter_mut() {
                score.legs = 0;
            }
        }

        if next.scores[player_index].sets >= next.target_sets {
            next.status = MatchStatus::Finished;
            next.winner = Some(next.players[player_index].clone());
        }

        log::info!(
            "{} won a leg: {next}",
            next.players[player_index]
        );
        next
    }

    /// Revert the most recent recorded leg: pop the last snapshot and restore
    /// it, unconditionally returning the match to `Playing` with no winner.
    /// This is the only way to reverse a completed match, so the caller must
    /// read the pre-undo status and winner before calling if it needs to
    /// reverse an externally recorded win credit.
    ///
    /// An empty history is a guarded no-op, not an error.
    pub fn undo(&self) -> MatchState {
        let mut next = self.clone();
        let Some(previous_scores) = next.history.pop() else {
            log::warn!("Nothing to undo for match {}", self.id);
            return next;
        };
        next.scores = previous_scores;
        next.status = MatchStatus::Playing;
        next.winner = None;
        log::info!("Undid last leg: {next}");
        next
    }

    /// Index of the player on turn. Rotation is strictly round-robin by
    /// recorded leg count: winning or losing a leg never changes the order,
    /// the turn just advances one seat per leg.
    pub fn turn_index(&self) -> usize {
        (self.history.len() + self.starting_index) % self.players.len()
    }

    /// Indices of the player(s) holding the maximum set count, for display.
    /// Empty until someone has won a set; ties are not broken.
    pub fn leader_indices(&self) -> Vec<usize> {
        let max_sets = self.scores.iter().map(|s| s.sets).max().unwrap_or(0);
        if max_sets == 0 {
            return Vec::new();
        }
        self.scores
            .iter()
            .positions(|s| s.sets == max_sets)
            .collect()
    }

    /// Number of legs recorded so far (equals the snapshot count).
    pub fn leg_count(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }
}

impl Display for MatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let board = self
            .players
            .iter()
            .zip(&self.scores)
            .map(|(name, score)| format!("{name} {score}"))
            .join(" | ");
        write!(f, "[{}] {}", self.status, board)
    }
}
