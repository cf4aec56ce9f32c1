use std::future::Future;

use crate::game::{GameOverSummary, GameState};

/// Snapshot published to observers after every transition.
#[derive(Clone, Debug)]
pub struct GameStateUpdate {
    pub tick: u64,
    pub state: GameState,
}

/// Sink for state snapshots. Renderers and score recorders implement this;
/// the session never learns who is listening.
pub trait GameBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_state(&self, update: GameStateUpdate) -> impl Future<Output = ()> + Send;

    fn broadcast_game_over(&self, summary: GameOverSummary) -> impl Future<Output = ()> + Send;
}
