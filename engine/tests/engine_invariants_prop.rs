// engine/tests/engine_invariants_prop.rs
#![forbid(unsafe_code)]

/**
 * Property/invariant tests for the grid state machine and the speculative resolver.
 *
 * Purpose:
 * - Provide fuzz-like coverage using generated seeds, command scripts and ghost bursts.
 * - Lock invariants that must hold regardless of how the grid is driven.
 *
 * Invariants covered:
 * - Every amoeba the arena holds is referenced from exactly one place.
 * - A settled board never holds a same-colour group of `MIN_GROUP_SIZE` or more.
 * - Waiting ghosts never exceed `MAX_WAITING_GHOSTS`.
 * - A grid is `Filled` exactly when the overflow cell is occupied at quiescence.
 * - `check_positions` is a pure function of board, pair and move.
 * - Matches replay identically from the same seed.
 */
use proptest::prelude::*;

use amoebax_engine::engine::{
    Colour, Command, Grid, GridConfig, GridState, GridStatus, Move, Orientation, PairGenerator,
    PairSink, GRID_HEIGHT, GRID_WIDTH, INITIAL_PAIRS, MAX_WAITING_GHOSTS, MIN_GROUP_SIZE,
    OVERFLOW_COLUMN, OVERFLOW_ROW,
};
use amoebax_engine::policy::{AiKind, AiPlayer};
use amoebax_engine::session::{Match, Side};

const COMMANDS: [Command; 6] = [
    Command::MoveLeft,
    Command::MoveRight,
    Command::RotateClockwise,
    Command::RotateCounterClockwise,
    Command::MaxFallingSpeed,
    Command::NormalFallingSpeed,
];

/// Size of the largest same-colour playable group, by flood fill.
fn largest_group(s: &GridStatus) -> usize {
    let mut seen = [[false; GRID_HEIGHT]; GRID_WIDTH];
    let mut largest = 0;
    for x0 in 0..GRID_WIDTH {
        for y0 in 0..GRID_HEIGHT {
            let c = s.colour_at(x0 as i32, y0 as i32);
            if !c.is_playable() || seen[x0][y0] {
                continue;
            }
            let mut stack = vec![(x0 as i32, y0 as i32)];
            seen[x0][y0] = true;
            let mut size = 0;
            while let Some((x, y)) = stack.pop() {
                size += 1;
                for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
                    if s.colour_at(nx, ny) != c || seen[nx as usize][ny as usize] {
                        continue;
                    }
                    seen[nx as usize][ny as usize] = true;
                    stack.push((nx, ny));
                }
            }
            largest = largest.max(size);
        }
    }
    largest
}

fn assert_ids_consistent(g: &Grid) {
    let mut ids = g.live_amoeba_ids();
    let referenced = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), referenced, "an amoeba is referenced twice");
    assert_eq!(ids.len(), g.amoeba_count(), "arena holds unreferenced amoebas");
}

fn assert_quiescent(g: &Grid) {
    let s = g.state();
    assert!(largest_group(&s) < MIN_GROUP_SIZE, "unresolved group:\n{}", g.render_ascii());
    assert!(g.floating_amoebas().is_empty());
    assert!(g.falling_pair().is_none());
    let overflow = !s
        .colour_at(OVERFLOW_COLUMN as i32, OVERFLOW_ROW as i32)
        .is_empty();
    assert_eq!(overflow, g.grid_state() == GridState::Filled);
}

fn colour_strategy() -> impl Strategy<Value = Colour> {
    prop_oneof![
        Just(Colour::Red),
        Just(Colour::Blue),
        Just(Colour::Green),
        Just(Colour::Orange),
        Just(Colour::Purple),
        Just(Colour::Ghost),
    ]
}

fn move_strategy() -> impl Strategy<Value = Move> {
    (0..GRID_WIDTH, 0..4usize)
        .prop_filter_map("satellite off the board", |(x, o)| {
            Move::new(x, Orientation::ALL[o])
        })
}

/// Compact board: each column is a bottom-up stack of up to 12 colours.
fn board_strategy() -> impl Strategy<Value = GridStatus> {
    prop::collection::vec(prop::collection::vec(colour_strategy(), 0..12), GRID_WIDTH).prop_map(
        |columns| {
            let mut s = GridStatus::empty();
            for (x, stack) in columns.iter().enumerate() {
                for (h, &c) in stack.iter().enumerate() {
                    s.set_colour(x as i32, (GRID_HEIGHT - 1 - h) as i32, c);
                }
            }
            s
        },
    )
}

#[test]
fn fresh_grid_has_no_amoebas_until_fed() {
    let g = Grid::new(3);
    assert_eq!(g.grid_state(), GridState::AwaitingInitialFill);
    assert_eq!(g.amoeba_count(), 0);
    assert!(g.live_amoeba_ids().is_empty());
}

proptest! {
    #[test]
    fn scripted_rollout_respects_grid_invariants(
        seed in any::<u64>(),
        script in prop::collection::vec((0..8usize, 0..40u32), 50..400),
    ) {
        let mut g = Grid::with_config(GridConfig::instant(), seed).unwrap();
        let mut generator = PairGenerator::new(seed);
        generator.generate(INITIAL_PAIRS, &mut [&mut g as &mut dyn PairSink]);

        for (cmd, ghosts) in script {
            if let Some(&c) = COMMANDS.get(cmd) {
                g.apply(c);
            }
            // Rare bursts; most ticks send nothing.
            if ghosts >= 35 {
                g.increment_waiting_ghosts(ghosts - 30);
            }
            g.update(1);
            if g.has_new_falling_pair() {
                generator.generate(1, &mut [&mut g as &mut dyn PairSink]);
            }

            assert_ids_consistent(&g);
            prop_assert!(g.waiting_ghosts() <= MAX_WAITING_GHOSTS);
            if matches!(g.grid_state(), GridState::QueueShifting | GridState::Filled) {
                assert_quiescent(&g);
            }
            if g.is_filled() {
                break;
            }
        }
    }

    #[test]
    fn waiting_ghosts_are_capped(bursts in prop::collection::vec(0..50u32, 1..20)) {
        let mut g = Grid::new(1);
        let mut expected = 0u32;
        for n in bursts {
            g.increment_waiting_ghosts(n);
            expected = (expected + n).min(MAX_WAITING_GHOSTS);
            prop_assert_eq!(g.waiting_ghosts(), expected);
        }
    }

    #[test]
    fn check_positions_is_pure_and_leaves_no_groups(
        board in board_strategy(),
        main in colour_strategy(),
        satellite in colour_strategy(),
        mv in move_strategy(),
    ) {
        let mut a = board;
        let mut b = board;
        let ra = a.check_positions(main, satellite, mv);
        let rb = b.check_positions(main, satellite, mv);
        prop_assert_eq!(&ra, &rb);
        prop_assert_eq!(a, b);

        prop_assert!(largest_group(&a) < MIN_GROUP_SIZE);
        prop_assert_eq!(ra.filled, a.is_filled());
        for x in 0..GRID_WIDTH {
            prop_assert_eq!(usize::from(ra.column_heights[x]), a.column_height(x));
        }
    }

    #[test]
    fn matches_replay_from_the_same_seed(seed in any::<u64>()) {
        let run = || {
            let mut m = Match::new(
                seed,
                Box::new(AiPlayer::new(AiKind::Dumb, seed)),
                Box::new(AiPlayer::new(AiKind::Dumb, seed ^ 1)),
                GridConfig::instant(),
            )
            .unwrap();
            for _ in 0..600 {
                m.update(1);
            }
            Side::BOTH.map(|side| {
                let g = m.grid(side);
                (g.score(), g.falling_pair_serial(), g.render_ascii())
            })
        };
        prop_assert_eq!(run(), run());
    }
}
