use thiserror::Error;
use uuid::Uuid;

/// Validation failures surfaced to the caller as blocking messages. Engine
/// misuse (leg win on a finished match, undo with no history) is not here:
/// those are guarded no-ops inside the transition itself.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("A player named {0:?} already exists")]
    DuplicatePlayer(String),

    #[error("No player named {0:?}")]
    UnknownPlayer(String),

    #[error("Player names must not be empty")]
    EmptyPlayerName,

    #[error("A match takes 2 to 4 players, got {0}")]
    PlayerCount(usize),

    #[error("Player {0:?} was selected more than once")]
    DuplicateParticipant(String),

    #[error("No match with id {0}")]
    MatchNotFound(Uuid),

    #[error("No active match")]
    NoActiveMatch,
}
