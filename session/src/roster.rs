use types::Player;

use crate::SessionError;

/// The player roster plus the career-stats ledger. `matches` moves exactly
/// once per created match and `wins` exactly once per finished match, with
/// the reverse applied when a finishing leg is undone, so `wins <= matches`
/// holds across any sequence of create / record / undo operations.
#[derive(Debug, Default, Clone)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn get(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Add a fresh player. Duplicate names are rejected before any mutation.
    pub fn add(&mut self, name: &str) -> Result<&Player, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyPlayerName);
        }
        if self.contains(name) {
            return Err(SessionError::DuplicatePlayer(name.to_string()));
        }
        self.players.push(Player::new(name));
        Ok(&self.players[self.players.len() - 1])
    }

    pub fn remove(&mut self, id: &str) -> Option<Player> {
        let idx = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(idx))
    }

    /// Credit a played match to every participant. Called exactly once per
    /// match, at creation; engine transitions never come back here.
    pub fn record_match_start(&mut self, participants: &[String]) {
        for id in participants {
            match self.get_mut(id) {
                Some(player) => player.matches += 1,
                None => log::warn!("Match references unknown player {id:?}, not counting it"),
            }
        }
    }

    /// Credit a match win. Called once, with the transition that finishes
    /// the match.
    pub fn record_match_win(&mut self, winner: &str) {
        match self.get_mut(winner) {
            Some(player) => player.wins += 1,
            None => log::warn!("Match won by unknown player {winner:?}, not counting it"),
        }
    }

    /// Take back a previously credited win, flooring at zero. The floor
    /// guards against a double-undo racing an inconsistent match record.
    pub fn revert_match_win(&mut self, prior_winner: &str) {
        match self.get_mut(prior_winner) {
            Some(player) if player.wins > 0 => player.wins -= 1,
            Some(player) => {
                log::warn!("Win revert for {} with zero wins, keeping zero", player.id)
            }
            None => log::warn!("Win revert for unknown player {prior_winner:?}"),
        }
    }

    /// Move the player record to a new id, keeping its stats. The match-side
    /// half of the cascade (players lists and winners) is the session's job.
    pub fn rename(&mut self, old_id: &str, new_id: &str) -> Result<(), SessionError> {
        let new_id = new_id.trim();
        if new_id.is_empty() {
            return Err(SessionError::EmptyPlayerName);
        }
        if self.contains(new_id) {
            return Err(SessionError::DuplicatePlayer(new_id.to_string()));
        }
        let player = self
            .get_mut(old_id)
            .ok_or_else(|| SessionError::UnknownPlayer(old_id.to_string()))?;
        player.id = new_id.to_string();
        Ok(())
    }

    /// Players ordered for the hall-of-fame view: most wins first.
    pub fn standings(&self) -> Vec<&Player> {
        let mut standings: Vec<&Player> = self.players.iter().collect();
        standings.sort_by(|a, b| b.wins.cmp(&a.wins));
        standings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_with(names: &[&str]) -> Roster {
        let mut roster = Roster::default();
        for name in names {
            roster.add(name).expect("fresh name");
        }
        roster
    }

    #[test]
    fn duplicate_names_are_rejected_before_mutation() {
        let mut roster = roster_with(&["Alice"]);
        let err = roster.add("Alice").unwrap_err();
        assert_eq!(err, SessionError::DuplicatePlayer("Alice".to_string()));
        assert_eq!(roster.players().len(), 1);
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut roster = Roster::default();
        assert_eq!(roster.add("   "), Err(SessionError::EmptyPlayerName));
    }

    #[test]
    fn match_start_counts_every_participant_once() {
        let mut roster = roster_with(&["Alice", "Bob"]);
        roster.record_match_start(&["Alice".to_string(), "Bob".to_string()]);
        assert_eq!(roster.get("Alice").unwrap().matches, 1);
        assert_eq!(roster.get("Bob").unwrap().matches, 1);
        assert_eq!(roster.get("Alice").unwrap().wins, 0);
    }

    #[test]
    fn win_and_revert_stay_within_matches() {
        let mut roster = roster_with(&["Alice", "Bob"]);
        roster.record_match_start(&["Alice".to_string(), "Bob".to_string()]);
        roster.record_match_win("Alice");
        assert_eq!(roster.get("Alice").unwrap().wins, 1);
        roster.revert_match_win("Alice");
        assert_eq!(roster.get("Alice").unwrap().wins, 0);

        for p in roster.players() {
            assert!(p.wins <= p.matches);
        }
    }

    #[test]
    fn revert_floors_at_zero() {
        let mut roster = roster_with(&["Alice"]);
        roster.revert_match_win("Alice");
        roster.revert_match_win("Alice");
        assert_eq!(roster.get("Alice").unwrap().wins, 0);
    }

    #[test]
    fn unknown_ids_are_ignored_not_errors() {
        let mut roster = roster_with(&["Alice"]);
        roster.record_match_start(&["Ghost".to_string()]);
        roster.record_match_win("Ghost");
        roster.revert_match_win("Ghost");
        assert_eq!(roster.players().len(), 1);
    }

    #[test]
    fn rename_moves_stats_and_rejects_collisions() {
        let mut roster = roster_with(&["Alice", "Bob"]);
        roster.record_match_start(&["Alice".to_string()]);
        roster.record_match_win("Alice");

        roster.rename("Alice", "Alicia").expect("rename");
        assert!(roster.get("Alice").is_none());
        let alicia = roster.get("Alicia").unwrap();
        assert_eq!(alicia.wins, 1);
        assert_eq!(alicia.matches, 1);

        assert_eq!(
            roster.rename("Alicia", "Bob"),
            Err(SessionError::DuplicatePlayer("Bob".to_string()))
        );
        assert_eq!(
            roster.rename("Ghost", "Gus"),
            Err(SessionError::UnknownPlayer("Ghost".to_string()))
        );
    }

    #[test]
    fn standings_order_by_wins() {
        let mut roster = roster_with(&["Alice", "Bob"]);
        roster.record_match_start(&["Alice".to_string(), "Bob".to_string()]);
        roster.record_match_start(&["Alice".to_string(), "Bob".to_string()]);
        roster.record_match_win("Bob");
        roster.record_match_win("Bob");

        let standings = roster.standings();
        assert_eq!(standings[0].id, "Bob");
        assert_eq!(standings[1].id, "Alice");
    }
}
