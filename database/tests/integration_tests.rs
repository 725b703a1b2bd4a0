//! Integration tests for SqliteStore against an in-memory database.
//!
//! The pool is capped at one connection so every query sees the same
//! in-memory database as the migrations.

use database::{MatchStore, NoopStore, SqliteStore};
use sqlx::sqlite::SqlitePoolOptions;
use types::{MatchSetup, MatchStatus, Player};

async fn memory_store() -> SqliteStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("Failed to connect");
    let store = SqliteStore::new(pool);
    store.run_migrations().await.expect("Migrations failed");
    store
}

fn two_player_setup() -> MatchSetup {
    MatchSetup::new(vec!["Alice".to_string(), "Bob".to_string()], 2, 3)
}

#[tokio::test]
async fn player_rows_round_trip() {
    let mut store = memory_store().await;

    let mut alice = Player::new("Alice");
    alice.matches = 3;
    alice.wins = 1;
    store.save_player(&alice).await.expect("save failed");

    let players = store.load_players().await.expect("load failed");
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].id, "Alice");
    assert_eq!(players[0].wins, 1);
    assert_eq!(players[0].matches, 3);
}

#[tokio::test]
async fn saving_a_player_twice_upserts() {
    let mut store = memory_store().await;

    let mut alice = Player::new("Alice");
    store.save_player(&alice).await.expect("save failed");
    alice.matches = 1;
    store.save_player(&alice).await.expect("save failed");

    let players = store.load_players().await.expect("load failed");
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].matches, 1);
}

#[tokio::test]
async fn match_rows_round_trip_with_history() {
    let mut store = memory_store().await;

    let state = types::MatchState::new(two_player_setup())
        .apply_leg_win(0)
        .apply_leg_win(1)
        .apply_leg_win(0);
    store.save_match(&state).await.expect("save failed");

    let matches = store.load_matches().await.expect("load failed");
    assert_eq!(matches.len(), 1);
    let loaded = &matches[0];
    assert_eq!(loaded.id, state.id);
    assert_eq!(loaded.leg_count(), 3);
    assert_eq!(loaded.scores, state.scores);
    assert_eq!(loaded.history, state.history);
    assert_eq!(loaded.status, MatchStatus::Playing);
}

#[tokio::test]
async fn save_match_after_each_transition_overwrites_the_row() {
    let mut store = memory_store().await;

    let state = types::MatchState::new(two_player_setup());
    store.save_match(&state).await.expect("save failed");

    let next = state.apply_leg_win(0);
    store.save_match(&next).await.expect("save failed");

    let matches = store.load_matches().await.expect("load failed");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].leg_count(), 1);
}

#[tokio::test]
async fn deleting_rows_removes_them() {
    let mut store = memory_store().await;

    let state = types::MatchState::new(two_player_setup());
    store.save_match(&state).await.expect("save failed");
    store.save_player(&Player::new("Alice")).await.expect("save failed");

    store.delete_match(state.id).await.expect("delete failed");
    store.delete_player("Alice").await.expect("delete failed");

    assert!(store.load_matches().await.expect("load failed").is_empty());
    assert!(store.load_players().await.expect("load failed").is_empty());
}

#[tokio::test]
async fn rename_moves_player_row_and_rewrites_matches() {
    let mut store = memory_store().await;

    let mut alice = Player::new("Alice");
    alice.matches = 1;
    alice.wins = 1;
    store.save_player(&alice).await.expect("save failed");

    let mut state = types::MatchState::new(two_player_setup());
    state = state.apply_leg_win(0); // keep some history around the rename
    store.save_match(&state).await.expect("save failed");

    let mut rewritten = state.clone();
    rewritten.players[0] = "Alicia".to_string();
    store
        .apply_rename("Alice", "Alicia", std::slice::from_ref(&rewritten))
        .await
        .expect("rename failed");

    let players = store.load_players().await.expect("load failed");
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].id, "Alicia");
    assert_eq!(players[0].wins, 1);

    let matches = store.load_matches().await.expect("load failed");
    assert_eq!(matches[0].players, vec!["Alicia", "Bob"]);
    assert_eq!(matches[0].leg_count(), 1);
}

#[tokio::test]
async fn matches_load_most_recent_first() {
    let mut store = memory_store().await;

    let mut older = types::MatchState::new(two_player_setup());
    older.created_at = chrono::Utc::now() - chrono::Duration::hours(1);
    let newer = types::MatchState::new(two_player_setup());

    store.save_match(&older).await.expect("save failed");
    store.save_match(&newer).await.expect("save failed");

    let matches = store.load_matches().await.expect("load failed");
    assert_eq!(matches[0].id, newer.id);
    assert_eq!(matches[1].id, older.id);
}

#[tokio::test]
async fn noop_store_reports_an_empty_world() {
    let mut store = NoopStore;
    assert!(store.load_players().await.expect("load failed").is_empty());
    assert!(store.load_matches().await.expect("load failed").is_empty());
    store
        .save_match(&types::MatchState::new(two_player_setup()))
        .await
        .expect("noop save failed");
}
