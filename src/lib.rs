pub mod config;
pub mod game;
pub mod logger;
pub mod session;

pub use config::{GameConfig, Validate, load_config, save_config};
pub use game::{Direction, GameOverSummary, GameState, Phase, Point};
pub use session::{GameBroadcaster, GameSession, GameSessionState, GameStateUpdate, SessionRng};
