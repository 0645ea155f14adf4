use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tilesearch::engine::{Board, Direction, Game};
use tilesearch::solver::{Propagation, SearchConfig, Solver};
use tilesearch::utils::board_from_str_array;

fn corpus() -> Vec<Board> {
    let mut rng = SmallRng::seed_from_u64(1337);
    let mut game = Game::new(&mut rng);
    let mut boards = vec![*game.board()];
    for i in 0..40 {
        let dir = Direction::ALL[i % Direction::ALL.len()];
        if game.process_move(dir, &mut rng) {
            boards.push(*game.board());
        }
    }
    boards
}

fn bench_apply_move(c: &mut Criterion) {
    let boards = corpus();
    c.bench_function("engine/apply_move_all_directions", |b| {
        b.iter(|| {
            let mut acc = 0u64;
            for board in &boards {
                for dir in Direction::ALL {
                    let mut next = *board;
                    next.apply_move(&mut acc, dir);
                }
            }
            black_box(acc)
        })
    });
}

fn bench_search(c: &mut Criterion) {
    let board = board_from_str_array(&["1.2.", "12..", "3..1", "...2"]).unwrap();
    for propagation in [Propagation::Max, Propagation::Average] {
        for max_depth in [3u32, 5] {
            let name = format!("solver/{}_depth_{}", propagation, max_depth);
            c.bench_function(&name, |b| {
                let mut solver = Solver::with_config(SearchConfig {
                    max_depth,
                    propagation,
                });
                let mut rng = SmallRng::seed_from_u64(7);
                b.iter(|| black_box(solver.get_next_move(black_box(&board), &mut rng)))
            });
        }
    }
}

criterion_group!(benches, bench_apply_move, bench_search);
criterion_main!(benches);
