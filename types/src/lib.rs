pub mod match_state;
pub mod player;
pub mod score;
pub mod setup;

pub use match_state::{MatchState, MatchStatus};
pub use player::Player;
pub use score::ScoreState;
pub use setup::MatchSetup;
