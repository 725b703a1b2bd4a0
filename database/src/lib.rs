pub mod config;
pub mod error;
pub mod models;
pub mod retry;
pub mod store;

pub use config::StoreConfig;
pub use error::StorageError;
pub use models::{MatchRow, PlayerRow};
pub use retry::retry_with_backoff;
pub use store::{MatchStore, SqliteStore};

use types::{MatchState, Player};
use uuid::Uuid;

// NoopStore for when persistence is not needed (tests, dry runs). Loads
// report an empty world and every write succeeds without effect.
pub struct NoopStore;

#[async_trait::async_trait]
impl MatchStore for NoopStore {
    async fn load_players(&mut self) -> Result<Vec<Player>, StorageError> {
        Ok(Vec::new())
    }

    async fn load_matches(&mut self) -> Result<Vec<MatchState>, StorageError> {
        Ok(Vec::new())
    }

    async fn save_player(&mut self, _player: &Player) -> Result<(), StorageError> {
        Ok(())
    }

    async fn save_match(&mut self, _state: &MatchState) -> Result<(), StorageError> {
        Ok(())
    }

    async fn delete_player(&mut self, _id: &str) -> Result<(), StorageError> {
        Ok(())
    }

    async fn delete_match(&mut self, _id: Uuid) -> Result<(), StorageError> {
        Ok(())
    }

    async fn apply_rename(
        &mut self,
        _old_id: &str,
        _new_id: &str,
        _rewritten: &[MatchState],
    ) -> Result<(), StorageError> {
        Ok(())
    }
}
