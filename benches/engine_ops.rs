use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use engine_2048::engine::{BoardEngine, Direction, Grid};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn corpus() -> Vec<Grid> {
    let mut game = BoardEngine::from_seed(42);
    let mut grids = vec![Grid::EMPTY, *game.grid()];
    // Derive a variety of densities deterministically
    let seq = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
    for i in 0..40 {
        game.shift(seq[i % seq.len()]);
        grids.push(*game.grid());
    }
    grids
}

fn bench_shift(c: &mut Criterion) {
    for dir in Direction::ALL {
        c.bench_function(&format!("shift/{}", dir.to_string().to_lowercase()), |bch| {
            let grids = corpus();
            bch.iter(|| {
                let mut acc = 0u64;
                for g in &grids {
                    acc = acc.wrapping_add(g.shifted(dir).1);
                }
                black_box(acc)
            })
        });
    }
}

fn bench_engine_moves(c: &mut Criterion) {
    c.bench_function("grid/spawn_random_tile", |bch| {
        bch.iter_batched(
            || (Grid::EMPTY, StdRng::seed_from_u64(7)),
            |(mut g, mut rng)| {
                for _ in 0..16 {
                    g.spawn_random_tile(&mut rng);
                }
                black_box(g)
            },
            BatchSize::SmallInput,
        )
    });
    c.bench_function("engine/shift_cycle", |bch| {
        bch.iter_batched(
            || BoardEngine::from_seed(9),
            |mut game| {
                for dir in Direction::ALL.iter().cycle().take(64) {
                    game.shift(*dir);
                }
                black_box(game.score())
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_queries(c: &mut Criterion) {
    c.bench_function("query/check_lost", |bch| {
        let games: Vec<BoardEngine> = corpus()
            .into_iter()
            .map(|g| BoardEngine::with_grid(g, StdRng::seed_from_u64(0)))
            .collect();
        bch.iter(|| black_box(games.iter().filter(|g| g.check_lost()).count()))
    });
    c.bench_function("query/count_empty", |bch| {
        let grids = corpus();
        bch.iter(|| black_box(grids.iter().map(Grid::count_empty).sum::<usize>()))
    });
}

criterion_group!(engine_ops, bench_shift, bench_engine_moves, bench_queries);
criterion_main!(engine_ops);
