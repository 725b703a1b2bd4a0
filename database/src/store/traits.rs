use async_trait::async_trait;
use types::{MatchState, Player};
use uuid::Uuid;

use crate::StorageError;

/// Durable store for player records and match records. The scoring engine
/// never calls this directly; the session persists each new match value
/// after a transition and treats failures as best-effort: a failed load
/// falls back to empty defaults, failed saves are logged and retried but
/// never escalated into scoring.
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn load_players(&mut self) -> Result<Vec<Player>, StorageError>;
    async fn load_matches(&mut self) -> Result<Vec<MatchState>, StorageError>;
    async fn save_player(&mut self, player: &Player) -> Result<(), StorageError>;
    async fn save_match(&mut self, state: &MatchState) -> Result<(), StorageError>;
    async fn delete_player(&mut self, id: &str) -> Result<(), StorageError>;
    async fn delete_match(&mut self, id: Uuid) -> Result<(), StorageError>;

    /// Persist a player rename in one transaction: move the player row to the
    /// new id and upsert every match the session rewrote for the cascade, so
    /// the rename is visible as a single update or not at all.
    async fn apply_rename(
        &mut self,
        old_id: &str,
        new_id: &str,
        rewritten: &[MatchState],
    ) -> Result<(), StorageError>;
}
