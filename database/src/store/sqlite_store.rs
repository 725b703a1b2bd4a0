use std::time::Duration;

use sqlx::SqlitePool;
use types::{MatchState, Player};
use uuid::Uuid;

use super::MatchStore;
use crate::models::{MatchRow, PlayerRow};
use crate::retry::retry_with_backoff;
use crate::StorageError;

const SAVE_RETRIES: usize = 2;
const SAVE_RETRY_DELAY: Duration = Duration::from_millis(50);

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Migration(e.to_string()))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

async fn upsert_player_row(pool: &SqlitePool, row: &PlayerRow) -> Result<(), StorageError> {
    sqlx::query(
        "INSERT INTO players (id, wins, matches, created_at) VALUES (?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET wins = excluded.wins, matches = excluded.matches",
    )
    .bind(&row.id)
    .bind(row.wins)
    .bind(row.matches)
    .bind(row.created_at)
    .execute(pool)
    .await
    .map_err(|e| StorageError::Query(e.to_string()))?;
    Ok(())
}

async fn upsert_match_row(pool: &SqlitePool, row: &MatchRow) -> Result<(), StorageError> {
    sqlx::query(
        "INSERT OR REPLACE INTO matches
         (id, players, target_sets, legs_per_set, game_type, double_in, double_out,
          starting_index, scores, history, status, winner, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&row.id)
    .bind(&row.players)
    .bind(row.target_sets)
    .bind(row.legs_per_set)
    .bind(&row.game_type)
    .bind(row.double_in)
    .bind(row.double_out)
    .bind(row.starting_index)
    .bind(&row.scores)
    .bind(&row.history)
    .bind(&row.status)
    .bind(&row.winner)
    .bind(row.created_at)
    .execute(pool)
    .await
    .map_err(|e| StorageError::Query(e.to_string()))?;
    Ok(())
}

#[async_trait::async_trait]
impl MatchStore for SqliteStore {
    async fn load_players(&mut self) -> Result<Vec<Player>, StorageError> {
        let rows = sqlx::query_as::<_, PlayerRow>(
            "SELECT id, wins, matches, created_at FROM players ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Query(e.to_string()))?;

        rows.into_iter().map(PlayerRow::into_player).collect()
    }

    async fn load_matches(&mut self) -> Result<Vec<MatchState>, StorageError> {
        let rows = sqlx::query_as::<_, MatchRow>(
            "SELECT id, players, target_sets, legs_per_set, game_type, double_in, double_out,
                    starting_index, scores, history, status, winner, created_at
             FROM matches ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Query(e.to_string()))?;

        rows.into_iter().map(MatchRow::into_state).collect()
    }

    async fn save_player(&mut self, player: &Player) -> Result<(), StorageError> {
        let row = PlayerRow::from_player(player);
        let pool = self.pool.clone();
        retry_with_backoff(
            move || {
                let pool = pool.clone();
                let row = row.clone();
                Box::pin(async move { upsert_player_row(&pool, &row).await })
            },
            SAVE_RETRIES,
            SAVE_RETRY_DELAY,
        )
        .await
    }

    async fn save_match(&mut self, state: &MatchState) -> Result<(), StorageError> {
        let row = MatchRow::from_state(state)?;
        let pool = self.pool.clone();
        retry_with_backoff(
            move || {
                let pool = pool.clone();
                let row = row.clone();
                Box::pin(async move { upsert_match_row(&pool, &row).await })
            },
            SAVE_RETRIES,
            SAVE_RETRY_DELAY,
        )
        .await
    }

    async fn delete_player(&mut self, id: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM players WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Query(e.to_string()))?;
        Ok(())
    }

    async fn delete_match(&mut self, id: Uuid) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM matches WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Query(e.to_string()))?;
        Ok(())
    }

    async fn apply_rename(
        &mut self,
        old_id: &str,
        new_id: &str,
        rewritten: &[MatchState],
    ) -> Result<(), StorageError> {
        let rows: Vec<MatchRow> = rewritten
            .iter()
            .map(MatchRow::from_state)
            .collect::<Result<_, _>>()?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Transaction(e.to_string()))?;

        sqlx::query("UPDATE players SET id = ? WHERE id = ?")
            .bind(new_id)
            .bind(old_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Query(e.to_string()))?;

        for row in &rows {
            sqlx::query(
                "INSERT OR REPLACE INTO matches
                 (id, players, target_sets, legs_per_set, game_type, double_in, double_out,
                  starting_index, scores, history, status, winner, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&row.id)
            .bind(&row.players)
            .bind(row.target_sets)
            .bind(row.legs_per_set)
            .bind(&row.game_type)
            .bind(row.double_in)
            .bind(row.double_out)
            .bind(row.starting_index)
            .bind(&row.scores)
            .bind(&row.history)
            .bind(&row.status)
            .bind(&row.winner)
            .bind(row.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Query(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Transaction(e.to_string()))?;

        tracing::info!(old_id, new_id, matches = rows.len(), "Applied player rename");
        Ok(())
    }
}
