mod state;
mod types;

pub use state::{FOOD_SCORE, GameState};
pub use types::{Direction, GameOverSummary, Phase, Point};
