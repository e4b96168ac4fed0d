use criterion::{black_box, criterion_group, criterion_main, Criterion};
use memory_pairs::core::{
    board, snapshot, ScoreRules, SimpleRng, TurnCoordinator, TurnTiming,
};
use memory_pairs::types::GridSize;

fn dealt(grid: GridSize, seed: u32) -> TurnCoordinator {
    let keys = board::generate(grid, &mut SimpleRng::new(seed)).unwrap();
    TurnCoordinator::new(grid, &keys, ScoreRules::default(), TurnTiming::default()).unwrap()
}

fn bench_generate_board(c: &mut Criterion) {
    let grid = GridSize::new(6, 6);
    let mut rng = SimpleRng::new(12345);

    c.bench_function("generate_6x6", |b| {
        b.iter(|| board::generate(black_box(grid), &mut rng).unwrap())
    });
}

fn bench_tick(c: &mut Criterion) {
    let mut game = dealt(GridSize::new(4, 4), 12345);

    c.bench_function("game_tick_16ms", |b| {
        b.iter(|| {
            game.tick(black_box(16));
        })
    });
}

fn bench_full_game(c: &mut Criterion) {
    let grid = GridSize::new(6, 6);
    let keys = board::generate(grid, &mut SimpleRng::new(12345)).unwrap();

    // Select each pair in turn; every move is a match.
    let mut order: Vec<u32> = (0..keys.len() as u32).collect();
    order.sort_by_key(|&id| keys[id as usize]);

    c.bench_function("scripted_game_6x6", |b| {
        b.iter(|| {
            let mut game =
                TurnCoordinator::new(grid, &keys, ScoreRules::default(), TurnTiming::default())
                    .unwrap();
            for pair in order.chunks(2) {
                game.handle_card_selected(pair[0]);
                game.handle_card_selected(pair[1]);
                game.tick(1300);
                black_box(game.drain_events());
            }
            game.tick(1000);
            black_box(game.drain_events())
        })
    });
}

fn bench_snapshot_encode(c: &mut Criterion) {
    let game = dealt(GridSize::new(6, 6), 12345);
    let snap = game.snapshot();

    c.bench_function("snapshot_serialize_6x6", |b| {
        b.iter(|| snapshot::serialize(black_box(&snap)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_generate_board,
    bench_tick,
    bench_full_game,
    bench_snapshot_encode
);
criterion_main!(benches);
