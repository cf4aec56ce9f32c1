use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::config::GameConfig;
use crate::game::{Direction, GameOverSummary, GameState, Phase};
use crate::log;

use super::broadcaster::{GameBroadcaster, GameStateUpdate};
use super::rng::SessionRng;

/// Shared handle to one game session. The `game_state` slot is the single
/// owner of the current frame; commands and the tick loop both replace it
/// wholesale under the mutex, so no tick ever observes a half-applied
/// command.
#[derive(Clone)]
pub struct GameSessionState {
    pub game_state: Arc<Mutex<GameState>>,
    pub tick: Arc<Mutex<u64>>,
    pub rng: Arc<Mutex<SessionRng>>,
    tick_interval: Arc<Mutex<Duration>>,
    min_tick_interval: Duration,
    speed_step: Duration,
}

impl GameSessionState {
    pub fn create(config: &GameConfig, seed: u64) -> Self {
        let game_state = GameState::new(config.board_width as i32, config.board_height as i32);
        Self {
            game_state: Arc::new(Mutex::new(game_state)),
            tick: Arc::new(Mutex::new(0u64)),
            rng: Arc::new(Mutex::new(SessionRng::new(seed))),
            tick_interval: Arc::new(Mutex::new(Duration::from_millis(
                config.tick_interval_ms as u64,
            ))),
            min_tick_interval: Duration::from_millis(config.min_tick_interval_ms as u64),
            speed_step: Duration::from_millis(config.speed_step_ms as u64),
        }
    }

    pub async fn handle_start(&self) {
        let mut game_state = self.game_state.lock().await;
        let mut rng = self.rng.lock().await;
        *game_state = game_state.start(&mut rng);
        log!(
            "Game started on {}x{} board",
            game_state.board_width,
            game_state.board_height
        );
    }

    pub async fn handle_turn(&self, direction: Direction) {
        let mut game_state = self.game_state.lock().await;
        *game_state = game_state.turn(direction);
    }

    pub async fn handle_pause(&self) {
        let mut game_state = self.game_state.lock().await;
        *game_state = game_state.toggle_pause();
    }

    pub async fn handle_reset(&self) {
        let mut game_state = self.game_state.lock().await;
        *game_state = game_state.reset();
        log!("Session reset to idle");
    }

    pub async fn snapshot(&self) -> GameState {
        self.game_state.lock().await.clone()
    }

    pub async fn current_score(&self) -> u32 {
        self.game_state.lock().await.score
    }

    pub async fn current_tick(&self) -> u64 {
        *self.tick.lock().await
    }

    pub async fn tick_interval(&self) -> Duration {
        *self.tick_interval.lock().await
    }

    /// Tighten the cadence by one step, clamped at the floor. Takes effect
    /// from the next tick; a sleep already in flight is not shortened.
    pub async fn increase_speed(&self) {
        let mut interval = self.tick_interval.lock().await;
        *interval = interval.saturating_sub(self.speed_step).max(self.min_tick_interval);
        log!("Tick interval tightened to {}ms", interval.as_millis());
    }

    pub async fn set_interval(&self, new_interval: Duration) -> Result<(), String> {
        if new_interval < self.min_tick_interval {
            return Err(format!(
                "Tick interval must be at least {}ms",
                self.min_tick_interval.as_millis()
            ));
        }
        *self.tick_interval.lock().await = new_interval;
        Ok(())
    }
}

pub struct GameSession;

impl GameSession {
    /// Drive `advance` at the session's cadence, publishing every resulting
    /// snapshot. The loop keeps ticking through Paused (advance is a no-op
    /// there) and exits once the phase settles on GameOver or Idle; the
    /// game-over summary is broadcast exactly once. Call `handle_start`
    /// before spawning this.
    pub async fn run(
        session_state: GameSessionState,
        broadcaster: impl GameBroadcaster,
    ) -> GameOverSummary {
        loop {
            let interval = *session_state.tick_interval.lock().await;
            sleep(interval).await;

            let mut game_state = session_state.game_state.lock().await;
            let mut rng = session_state.rng.lock().await;
            *game_state = game_state.advance(&mut rng);
            drop(rng);

            let mut tick_value = session_state.tick.lock().await;
            *tick_value += 1;
            let current_tick = *tick_value;
            drop(tick_value);

            let snapshot = game_state.clone();
            drop(game_state);

            broadcaster
                .broadcast_state(GameStateUpdate {
                    tick: current_tick,
                    state: snapshot.clone(),
                })
                .await;

            match snapshot.phase {
                Phase::Playing | Phase::Paused => {}
                Phase::GameOver => {
                    let summary = snapshot.summary();
                    broadcaster.broadcast_game_over(summary).await;
                    log!(
                        "Game over. Score: {}, snake length: {}",
                        summary.score,
                        summary.snake_length
                    );
                    return summary;
                }
                Phase::Idle => {
                    // The host reset the session while we were sleeping.
                    return snapshot.summary();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use super::*;
    use crate::game::Point;

    #[derive(Clone, Default)]
    struct RecordingBroadcaster {
        updates: Arc<StdMutex<Vec<GameStateUpdate>>>,
        summaries: Arc<StdMutex<Vec<GameOverSummary>>>,
    }

    impl GameBroadcaster for RecordingBroadcaster {
        async fn broadcast_state(&self, update: GameStateUpdate) {
            self.updates.lock().unwrap().push(update);
        }

        async fn broadcast_game_over(&self, summary: GameOverSummary) {
            self.summaries.lock().unwrap().push(summary);
        }
    }

    fn test_config() -> GameConfig {
        GameConfig {
            board_width: 10,
            board_height: 10,
            tick_interval_ms: 50,
            min_tick_interval_ms: 50,
            speed_step_ms: 20,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_stops_after_wall_collision() {
        let session = GameSessionState::create(&test_config(), 7);
        session.handle_start().await;
        let broadcaster = RecordingBroadcaster::default();

        let summary = GameSession::run(session.clone(), broadcaster.clone()).await;

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.phase, Phase::GameOver);
        assert_eq!(summary.score, snapshot.score);
        assert_eq!(summary.snake_length, snapshot.snake.len());
        assert_eq!(broadcaster.summaries.lock().unwrap().len(), 1);

        // No further advances once the loop has returned.
        let ticks_at_exit = session.current_tick().await;
        sleep(Duration::from_millis(500)).await;
        assert_eq!(session.current_tick().await, ticks_at_exit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_keeps_ticking_while_paused() {
        let session = GameSessionState::create(&test_config(), 3);
        session.handle_start().await;
        session.handle_pause().await;
        let broadcaster = RecordingBroadcaster::default();

        let handle = tokio::spawn(GameSession::run(session.clone(), broadcaster.clone()));
        sleep(Duration::from_millis(300)).await;

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.phase, Phase::Paused);
        assert_eq!(snapshot.snake, vec![Point::new(5, 5)]);
        assert!(session.current_tick().await > 0);

        session.handle_reset().await;
        let summary = handle.await.expect("session task should not panic");
        assert_eq!(summary.score, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_after_pause_moves_snake_again() {
        let session = GameSessionState::create(&test_config(), 3);
        session.handle_start().await;
        session.handle_pause().await;
        let broadcaster = RecordingBroadcaster::default();

        let handle = tokio::spawn(GameSession::run(session.clone(), broadcaster.clone()));
        sleep(Duration::from_millis(200)).await;
        assert_eq!(session.snapshot().await.snake, vec![Point::new(5, 5)]);

        session.handle_pause().await;
        sleep(Duration::from_millis(200)).await;
        assert_ne!(session.snapshot().await.snake, vec![Point::new(5, 5)]);

        session.handle_reset().await;
        handle.await.expect("session task should not panic");
    }

    #[tokio::test]
    async fn test_increase_speed_clamps_at_floor() {
        let config = GameConfig {
            tick_interval_ms: 80,
            min_tick_interval_ms: 50,
            speed_step_ms: 20,
            ..GameConfig::default()
        };
        let session = GameSessionState::create(&config, 1);

        session.increase_speed().await;
        assert_eq!(session.tick_interval().await, Duration::from_millis(60));
        session.increase_speed().await;
        assert_eq!(session.tick_interval().await, Duration::from_millis(50));
        session.increase_speed().await;
        assert_eq!(session.tick_interval().await, Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_set_interval_rejects_below_floor() {
        let session = GameSessionState::create(&GameConfig::default(), 1);

        assert!(session.set_interval(Duration::from_millis(99)).await.is_err());
        assert!(session.set_interval(Duration::from_millis(150)).await.is_ok());
        assert_eq!(session.tick_interval().await, Duration::from_millis(150));
    }

    #[tokio::test]
    async fn test_commands_apply_atomically_to_the_slot() {
        let session = GameSessionState::create(&test_config(), 9);
        session.handle_start().await;
        session.handle_turn(Direction::Down).await;
        assert_eq!(session.snapshot().await.direction, Direction::Down);

        session.handle_turn(Direction::Up).await;
        // Reversal is rejected inside the transition, not surfaced as an error.
        assert_eq!(session.snapshot().await.direction, Direction::Down);

        assert_eq!(session.current_score().await, 0);
    }
}
