use criterion::{Criterion, criterion_group, criterion_main};
use snake_engine::game::{Direction, GameState, Phase, Point};
use snake_engine::session::SessionRng;

fn long_snake_state(length: i32) -> GameState {
    // Snake stretched along one row, head leading to the right with room
    // to move.
    let snake: Vec<Point> = (0..length).map(|i| Point::new(length - i, 25)).collect();
    GameState {
        snake,
        food: Point::new(49, 49),
        direction: Direction::Right,
        phase: Phase::Playing,
        score: 0,
        board_width: 50,
        board_height: 50,
    }
}

fn bench_advance_long_snake(c: &mut Criterion) {
    let state = long_snake_state(40);
    let mut rng = SessionRng::new(42);
    c.bench_function("advance_long_snake", |b| b.iter(|| state.advance(&mut rng)));
}

fn bench_advance_eats_and_respawns_food(c: &mut Criterion) {
    let mut state = long_snake_state(40);
    state.food = Point::new(41, 25);
    let mut rng = SessionRng::new(42);
    c.bench_function("advance_eats_and_respawns_food", |b| {
        b.iter(|| state.advance(&mut rng))
    });
}

criterion_group!(
    benches,
    bench_advance_long_snake,
    bench_advance_eats_and_respawns_food
);
criterion_main!(benches);
