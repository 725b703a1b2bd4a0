pub mod error;
pub mod roster;
pub mod session;

pub use error::SessionError;
pub use roster::Roster;
pub use session::Session;
