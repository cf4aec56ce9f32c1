mod broadcaster;
mod rng;
mod session;

pub use broadcaster::{GameBroadcaster, GameStateUpdate};
pub use rng::SessionRng;
pub use session::{GameSession, GameSessionState};
