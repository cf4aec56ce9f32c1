use crate::log;
use crate::session::SessionRng;

use super::types::{Direction, GameOverSummary, Phase, Point};

pub const FOOD_SCORE: u32 = 10;

const MAX_FOOD_SAMPLES: usize = 100;

/// One frame of the game. Transitions never mutate in place; each returns
/// a fresh value that wholly supersedes the previous one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub snake: Vec<Point>,
    pub food: Point,
    pub direction: Direction,
    pub phase: Phase,
    pub score: u32,
    pub board_width: i32,
    pub board_height: i32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(20, 20)
    }
}

impl GameState {
    pub fn new(board_width: i32, board_height: i32) -> Self {
        Self {
            snake: vec![Point::new(board_width / 2, board_height / 2)],
            food: Point::new(board_width / 4, board_height / 4),
            direction: Direction::Right,
            phase: Phase::Idle,
            score: 0,
            board_width,
            board_height,
        }
    }

    pub fn head(&self) -> Point {
        *self.snake.first().expect("snake body should never be empty")
    }

    pub fn summary(&self) -> GameOverSummary {
        GameOverSummary {
            score: self.score,
            snake_length: self.snake.len(),
        }
    }

    fn contains_point(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.board_width && point.y >= 0 && point.y < self.board_height
    }

    /// Move the snake one cell. Has no effect outside `Phase::Playing`;
    /// collisions end the game with everything else left as it was.
    pub fn advance(&self, rng: &mut SessionRng) -> GameState {
        if self.phase != Phase::Playing {
            return self.clone();
        }

        let head = self.head();
        let (dx, dy) = self.direction.delta();
        let new_head = Point::new(head.x + dx, head.y + dy);

        if !self.contains_point(new_head) {
            log!("Wall collision at ({}, {})", new_head.x, new_head.y);
            return GameState {
                phase: Phase::GameOver,
                ..self.clone()
            };
        }

        if self.snake.contains(&new_head) {
            log!("Self collision at ({}, {})", new_head.x, new_head.y);
            return GameState {
                phase: Phase::GameOver,
                ..self.clone()
            };
        }

        let mut snake = Vec::with_capacity(self.snake.len() + 1);
        snake.push(new_head);
        snake.extend_from_slice(&self.snake);

        if new_head == self.food {
            let score = self.score + FOOD_SCORE;
            let food = spawn_food(&snake, self.board_width, self.board_height, self.food, rng);
            log!(
                "Ate food at ({}, {}). Score: {}",
                new_head.x,
                new_head.y,
                score
            );
            GameState {
                snake,
                food,
                score,
                ..self.clone()
            }
        } else {
            snake.pop();
            GameState {
                snake,
                ..self.clone()
            }
        }
    }

    /// Change heading for subsequent `advance` calls. Reversing into the
    /// snake's own neck is silently rejected.
    pub fn turn(&self, new_direction: Direction) -> GameState {
        if new_direction.is_opposite(&self.direction) {
            return self.clone();
        }
        GameState {
            direction: new_direction,
            ..self.clone()
        }
    }

    /// Begin a new game from any phase, including restarting after a
    /// game over.
    pub fn start(&self, rng: &mut SessionRng) -> GameState {
        let snake = vec![Point::new(self.board_width / 2, self.board_height / 2)];
        let default_food = Point::new(self.board_width / 4, self.board_height / 4);
        let food = spawn_food(&snake, self.board_width, self.board_height, default_food, rng);
        GameState {
            snake,
            food,
            direction: Direction::Right,
            phase: Phase::Playing,
            score: 0,
            board_width: self.board_width,
            board_height: self.board_height,
        }
    }

    /// Toggle Playing and Paused. Idle and GameOver are unaffected.
    pub fn toggle_pause(&self) -> GameState {
        let phase = match self.phase {
            Phase::Playing => Phase::Paused,
            Phase::Paused => Phase::Playing,
            other => other,
        };
        GameState {
            phase,
            ..self.clone()
        }
    }

    /// Back to the canonical idle state for the same board size.
    pub fn reset(&self) -> GameState {
        GameState::new(self.board_width, self.board_height)
    }
}

/// Rejection-sample a cell that is free of the snake. Once occupancy is
/// high enough that sampling keeps missing, fall back to drawing from the
/// explicit free-cell set. A fully occupied board leaves the food where
/// it was.
fn spawn_food(
    snake: &[Point],
    width: i32,
    height: i32,
    current: Point,
    rng: &mut SessionRng,
) -> Point {
    for _ in 0..MAX_FOOD_SAMPLES {
        let candidate = Point::new(rng.random_range(0..width), rng.random_range(0..height));
        if !snake.contains(&candidate) {
            log!("Food spawned at ({}, {})", candidate.x, candidate.y);
            return candidate;
        }
    }

    let free: Vec<Point> = (0..height)
        .flat_map(|y| (0..width).map(move |x| Point::new(x, y)))
        .filter(|p| !snake.contains(p))
        .collect();

    if free.is_empty() {
        return current;
    }

    let candidate = free[rng.random_range(0..free.len())];
    log!("Food spawned at ({}, {})", candidate.x, candidate.y);
    candidate
}
