use database::MatchStore;
use types::{MatchSetup, MatchState, Player};
use uuid::Uuid;

use crate::{Roster, SessionError};

const MIN_PLAYERS: usize = 2;
const MAX_PLAYERS: usize = 4;

/// One scoring session: the roster, the match list, the active-match
/// reference and a handle to the store. The engine itself stays a pure
/// transition on `MatchState`; this type sequences each transition with the
/// ledger update it implies and a best-effort save. Calls are serialized by
/// construction (`&mut self`), which is all the concurrency model asks for.
pub struct Session<S: MatchStore> {
    store: S,
    roster: Roster,
    matches: Vec<MatchState>,
    active: Option<Uuid>,
}

impl<S: MatchStore> Session<S> {
    /// Load players and matches from the store. A failed load is logged and
    /// replaced with an empty default rather than failing the session.
    pub async fn load(mut store: S) -> Self {
        let players = match store.load_players().await {
            Ok(players) => players,
            Err(e) => {
                log::error!("Failed to load players, starting with an empty roster: {e}");
                Vec::new()
            }
        };
        let matches = match store.load_matches().await {
            Ok(matches) => matches,
            Err(e) => {
                log::error!("Failed to load matches, starting with an empty list: {e}");
                Vec::new()
            }
        };
        Self {
            store,
            roster: Roster::new(players),
            matches,
            active: None,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn matches(&self) -> &[MatchState] {
        &self.matches
    }

    pub fn active_match(&self) -> Option<&MatchState> {
        let id = self.active?;
        self.matches.iter().find(|m| m.id == id)
    }

    /// Most recently created matches first, for the match-list view.
    pub fn recent_matches(&self, limit: usize) -> Vec<&MatchState> {
        let mut recent: Vec<&MatchState> = self.matches.iter().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit);
        recent
    }

    /// Resume a stored match as the active one.
    pub fn set_active(&mut self, id: Uuid) -> Result<(), SessionError> {
        if !self.matches.iter().any(|m| m.id == id) {
            return Err(SessionError::MatchNotFound(id));
        }
        self.active = Some(id);
        Ok(())
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    pub async fn add_player(&mut self, name: &str) -> Result<(), SessionError> {
        let player = self.roster.add(name)?.clone();
        self.persist_player(&player).await;
        Ok(())
    }

    /// Drop a player record and their stats. Their historical matches keep
    /// the name; lookups against it simply stop resolving.
    pub async fn delete_player(&mut self, name: &str) -> Result<(), SessionError> {
        self.roster
            .remove(name)
            .ok_or_else(|| SessionError::UnknownPlayer(name.to_string()))?;
        if let Err(e) = self.store.delete_player(name).await {
            log::error!("Failed to delete player {name:?} from store: {e}");
        }
        Ok(())
    }

    /// Create a match from the setup collaborator's parameters, count it in
    /// every participant's `matches`, persist, and make it active.
    pub async fn create_match(&mut self, setup: MatchSetup) -> Result<Uuid, SessionError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&setup.players.len()) {
            return Err(SessionError::PlayerCount(setup.players.len()));
        }
        for (idx, name) in setup.players.iter().enumerate() {
            if !self.roster.contains(name) {
                return Err(SessionError::UnknownPlayer(name.clone()));
            }
            if setup.players[..idx].contains(name) {
                return Err(SessionError::DuplicateParticipant(name.clone()));
            }
        }

        let state = MatchState::new(setup);
        let id = state.id;
        log::info!("Starting match {id}: {}", state.players.join(" vs "));

        self.roster.record_match_start(&state.players);
        for name in state.players.clone() {
            if let Some(player) = self.roster.get(&name) {
                let player = player.clone();
                self.persist_player(&player).await;
            }
        }

        self.persist_match(&state).await;
        self.matches.push(state);
        self.active = Some(id);
        Ok(id)
    }

    /// Record a won leg on the active match. If this transition finishes the
    /// match, the winner's career win is credited in the same call, before
    /// the new state is persisted.
    pub async fn record_leg_win(&mut self, player_index: usize) -> Result<(), SessionError> {
        let idx = self.active_index()?;
        let current = &self.matches[idx];
        let was_finished = current.is_finished();

        let next = current.apply_leg_win(player_index);
        let winner = next.winner.clone();
        let newly_finished = !was_finished && next.is_finished();
        self.matches[idx] = next;

        if newly_finished {
            if let Some(winner) = winner {
                self.roster.record_match_win(&winner);
                if let Some(player) = self.roster.get(&winner) {
                    let player = player.clone();
                    self.persist_player(&player).await;
                }
            }
        }

        let snapshot = self.matches[idx].clone();
        self.persist_match(&snapshot).await;
        Ok(())
    }

    /// Undo the last recorded leg on the active match. The pre-undo status
    /// and winner are read first: after the engine undo they are gone from
    /// the match, and they decide whether a win credit must be reversed.
    pub async fn undo_leg(&mut self) -> Result<(), SessionError> {
        let idx = self.active_index()?;
        let current = &self.matches[idx];
        let prior_winner = if current.is_finished() {
            current.winner.clone()
        } else {
            None
        };

        let next = current.undo();
        self.matches[idx] = next;

        if let Some(prior_winner) = prior_winner {
            self.roster.revert_match_win(&prior_winner);
            if let Some(player) = self.roster.get(&prior_winner) {
                let player = player.clone();
                self.persist_player(&player).await;
            }
        }

        let snapshot = self.matches[idx].clone();
        self.persist_match(&snapshot).await;
        Ok(())
    }

    /// Rename a player everywhere: the roster record, every match's player
    /// list, and every recorded winner. Matches that never saw the old name
    /// are left untouched; the store applies the whole cascade as one update.
    pub async fn rename_player(&mut self, old_id: &str, new_id: &str) -> Result<(), SessionError> {
        let new_id = new_id.trim();
        if old_id == new_id {
            return Ok(());
        }
        self.roster.rename(old_id, new_id)?;

        let mut rewritten = Vec::new();
        for state in self.matches.iter_mut() {
            let references_old = state.players.iter().any(|p| p == old_id)
                || state.winner.as_deref() == Some(old_id);
            if !references_old {
                continue;
            }
            for player in state.players.iter_mut() {
                if player == old_id {
                    *player = new_id.to_string();
                }
            }
            if state.winner.as_deref() == Some(old_id) {
                state.winner = Some(new_id.to_string());
            }
            rewritten.push(state.clone());
        }

        log::info!(
            "Renamed player {old_id:?} -> {new_id:?} across {} matches",
            rewritten.len()
        );
        if let Err(e) = self.store.apply_rename(old_id, new_id, &rewritten).await {
            log::error!("Failed to persist rename of {old_id:?}: {e}");
        }
        Ok(())
    }

    /// Remove a match record. Deleting the active match clears the active
    /// reference so the caller lands back on the match list.
    pub async fn delete_match(&mut self, id: Uuid) -> Result<(), SessionError> {
        let pos = self
            .matches
            .iter()
            .position(|m| m.id == id)
            .ok_or(SessionError::MatchNotFound(id))?;
        self.matches.remove(pos);
        if self.active == Some(id) {
            self.active = None;
        }
        if let Err(e) = self.store.delete_match(id).await {
            log::error!("Failed to delete match {id} from store: {e}");
        }
        Ok(())
    }

    fn active_index(&self) -> Result<usize, SessionError> {
        let id = self.active.ok_or(SessionError::NoActiveMatch)?;
        self.matches
            .iter()
            .position(|m| m.id == id)
            .ok_or(SessionError::NoActiveMatch)
    }

    // Best-effort persistence: a failed save leaves the in-memory state ahead
    // of the durable one until the next successful save.
    async fn persist_match(&mut self, state: &MatchState) {
        if let Err(e) = self.store.save_match(state).await {
            log::error!("Failed to save match {}, continuing unsaved: {e}", state.id);
        }
    }

    async fn persist_player(&mut self, player: &Player) {
        if let Err(e) = self.store.save_player(player).await {
            log::error!("Failed to save player {}, continuing unsaved: {e}", player.id);
        }
    }
}
