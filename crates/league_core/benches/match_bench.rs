use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use league_core::engine::MatchSimulator;
use league_core::{Game, GameParams, PlayerModel, Surface};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_match_simulation(c: &mut Criterion) {
    let params = GameParams::default();
    let home = PlayerModel::new("Jack", "Ben", "Reid", 50, 50, 18, Surface::Clay);
    let away = PlayerModel::new("Liam", "Max", "Kelly", 50, 50, 18, Surface::Grass);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    c.bench_function("match_simulation", |b| {
        b.iter(|| {
            let (mut home, mut away) = (home.clone(), away.clone());
            let simulator = MatchSimulator::new(&params.match_rules).on_surface(Surface::Clay);
            black_box(simulator.play(&mut home, &mut away, &mut rng))
        });
    });
}

fn bench_full_season(c: &mut Criterion) {
    let mut group = c.benchmark_group("season");
    group.sample_size(10);

    group.bench_function("ai_only_season", |b| {
        b.iter_batched(
            || {
                let mut game = Game::new(GameParams::default(), "bench", 0, 7).unwrap();
                game.set_controlled(0, false).unwrap();
                game
            },
            |mut game| {
                let season = game.season();
                while game.season() == season {
                    game.update().unwrap();
                }
                black_box(game)
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_match_simulation, bench_full_season);
criterion_main!(benches);
