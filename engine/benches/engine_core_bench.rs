// engine/benches/engine_core_bench.rs
#![forbid(unsafe_code)]

/**
 * Core engine micro-benchmarks.
 *
 * Focus:
 * - Speculative resolution (`GridStatus::check_positions`)
 * - Move search latency per AI variant on a fixed mid-game board
 * - Live grid ticks under an AI controller
 */
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::prelude::*;

use amoebax_engine::engine::{
    Colour, Grid, GridConfig, GridStatus, Move, Orientation, PairGenerator, PairSink, GRID_HEIGHT,
    INITIAL_PAIRS,
};
use amoebax_engine::policy::{
    find_best_move, AiKind, AiPlayer, Aggressivity, Anticipation, Controller,
};

const MID_GAME: [&str; 7] = [
    "#.....", "BR..P.", "BRG.PO", "GGRBOO", "RPRBGR", "RPPBGG", "OOBRRB",
];

fn mid_game_grid(seed: u64) -> Grid {
    let mut g = Grid::new(seed);
    let mut generator = PairGenerator::new(seed);
    generator.generate(INITIAL_PAIRS, &mut [&mut g as &mut dyn PairSink]);

    let top = GRID_HEIGHT - MID_GAME.len();
    for (i, row) in MID_GAME.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            let c = Colour::from_glyph(ch).expect("benchmark glyph");
            if !c.is_empty() {
                g.place_amoeba(x, top + i, c);
            }
        }
    }
    g
}

fn bench_check_positions(c: &mut Criterion) {
    let board = GridStatus::from_rows(&MID_GAME).expect("valid benchmark board");

    c.bench_function("status.check_positions.all_moves", |b| {
        b.iter(|| {
            for mv in Move::all() {
                let mut s = board;
                black_box(s.check_positions(Colour::Red, Colour::Blue, mv));
            }
        });
    });

    c.bench_function("status.check_positions.blue_chain", |b| {
        let mv = Move::new(3, Orientation::Top).expect("in bounds");
        b.iter_batched(
            || board,
            |mut s| black_box(s.check_positions(Colour::Blue, Colour::Red, mv)),
            BatchSize::SmallInput,
        );
    });
}

fn bench_find_best_move(c: &mut Criterion) {
    for kind in [
        AiKind::Dumb,
        AiKind::Simple(Aggressivity::Full),
        AiKind::Anticipatory(Anticipation::NextTwo),
        AiKind::Advanced,
    ] {
        let g = mid_game_grid(1234);
        let policy = kind.policy();
        c.bench_function(&format!("policy.find_best_move.{kind}"), |b| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| black_box(find_best_move(&g, &policy, &mut rng)));
        });
    }
}

fn bench_grid_ticks(c: &mut Criterion) {
    c.bench_function("grid.update.advanced_1000_ticks", |b| {
        b.iter_batched(
            || {
                let mut g = Grid::with_config(GridConfig::instant(), 99).expect("valid config");
                let mut generator = PairGenerator::new(99);
                generator.generate(INITIAL_PAIRS, &mut [&mut g as &mut dyn PairSink]);
                (g, generator, AiPlayer::new(AiKind::Advanced, 5))
            },
            |(mut g, mut generator, mut ai)| {
                for _ in 0..1_000 {
                    if g.is_filled() {
                        break;
                    }
                    ai.update(1, &mut g);
                    g.update(1);
                    if g.has_new_falling_pair() {
                        generator.generate(1, &mut [&mut g as &mut dyn PairSink]);
                    }
                }
                black_box(g.score())
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    engine_core_benches,
    bench_check_positions,
    bench_find_best_move,
    bench_grid_ticks
);
criterion_main!(engine_core_benches);
