use serde::{Deserialize, Serialize};
use types::{MatchState, MatchStatus, Player, ScoreState};
use uuid::Uuid;

use crate::StorageError;

/// Flat row image of a [`Player`]. Counters are widened to `i64` for SQLite.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlayerRow {
    pub id: String,
    pub wins: i64,
    pub matches: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl PlayerRow {
    pub fn from_player(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            wins: i64::from(player.wins),
            matches: i64::from(player.matches),
            created_at: player.created_at,
        }
    }

    pub fn into_player(self) -> Result<Player, StorageError> {
        let wins = u32::try_from(self.wins)
            .map_err(|_| StorageError::InvalidRow(format!("negative wins for {}", self.id)))?;
        let matches = u32::try_from(self.matches)
            .map_err(|_| StorageError::InvalidRow(format!("negative matches for {}", self.id)))?;
        Ok(Player {
            id: self.id,
            wins,
            matches,
            created_at: self.created_at,
        })
    }
}

/// Row image of a [`MatchState`]. Player order, current scores and the undo
/// history are stored as JSON columns; everything else is flat.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MatchRow {
    pub id: String,
    pub players: String,
    pub target_sets: i64,
    pub legs_per_set: i64,
    pub game_type: String,
    pub double_in: bool,
    pub double_out: bool,
    pub starting_index: i64,
    pub scores: String,
    pub history: String,
    pub status: String,
    pub winner: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl MatchRow {
    pub fn from_state(state: &MatchState) -> Result<Self, StorageError> {
        Ok(Self {
            id: state.id.to_string(),
            players: serde_json::to_string(&state.players)?,
            target_sets: i64::from(state.target_sets),
            legs_per_set: i64::from(state.legs_per_set),
            game_type: state.game_type.clone(),
            double_in: state.double_in,
            double_out: state.double_out,
            starting_index: state.starting_index as i64,
            scores: serde_json::to_string(&state.scores)?,
            history: serde_json::to_string(&state.history)?,
            status: state.status.to_string(),
            winner: state.winner.clone(),
            created_at: state.created_at,
        })
    }

    pub fn into_state(self) -> Result<MatchState, StorageError> {
        let id = Uuid::parse_str(&self.id)?;
        let players: Vec<String> = serde_json::from_str(&self.players)?;
        let scores: Vec<ScoreState> = serde_json::from_str(&self.scores)?;
        let history: Vec<Vec<ScoreState>> = serde_json::from_str(&self.history)?;
        let status = match self.status.as_str() {
            "playing" => MatchStatus::Playing,
            "finished" => MatchStatus::Finished,
            other => {
                return Err(StorageError::InvalidRow(format!(
                    "unknown match status {other:?} for {id}"
                )))
            }
        };
        let target_sets = u32::try_from(self.target_sets)
            .map_err(|_| StorageError::InvalidRow(format!("negative target_sets for {id}")))?;
        let legs_per_set = u32::try_from(self.legs_per_set)
            .map_err(|_| StorageError::InvalidRow(format!("negative legs_per_set for {id}")))?;
        let starting_index = usize::try_from(self.starting_index)
            .map_err(|_| StorageError::InvalidRow(format!("negative starting_index for {id}")))?;

        Ok(MatchState {
            id,
            players,
            target_sets,
            legs_per_set,
            game_type: self.game_type,
            double_in: self.double_in,
            double_out: self.double_out,
            starting_index,
            scores,
            history,
            status,
            winner: self.winner,
            created_at: self.created_at,
        })
    }
}
