// engine/tests/session_scenarios.rs
#![forbid(unsafe_code)]

/**
 * Scenario tests for the layers above a single grid.
 *
 * Purpose:
 * - Versus matches: shared pair sequence, ghost transfer, outcome detection.
 * - Training: level-driven speed and a run to game over.
 * - Human input mapping through the same `Controller` seam the AI uses.
 */
use amoebax_engine::engine::{
    Colour, Grid, GridConfig, GridState, Orientation, PairSink, GRID_HEIGHT, OVERFLOW_COLUMN,
    OVERFLOW_ROW, SPAWN_COLUMN,
};
use amoebax_engine::policy::{Controller, HumanController, Key, KeyEvent};
use amoebax_engine::session::{Match, MatchOutcome, Side, Training};

/// Never touches the grid.
struct Idle;

impl Controller for Idle {
    fn update(&mut self, _elapsed_ms: u32, _grid: &mut Grid) {}
}

fn idle_match(seed: u64) -> Match {
    Match::new(seed, Box::new(Idle), Box::new(Idle), GridConfig::instant()).unwrap()
}

/// Ghosts never group, so a ghost column fills the overflow cell without chaining.
fn wall_up_overflow_column(g: &mut Grid) {
    for y in OVERFLOW_ROW..GRID_HEIGHT {
        assert!(g.place_amoeba(OVERFLOW_COLUMN, y, Colour::Ghost));
    }
}

#[test]
fn both_sides_see_the_same_pairs() {
    let m = idle_match(42);
    let l = m.grid(Side::Left);
    let r = m.grid(Side::Right);

    let (lp, rp) = (l.falling_pair().unwrap(), r.falling_pair().unwrap());
    assert_eq!((lp.main, lp.satellite), (rp.main, rp.satellite));
    assert_eq!(l.queued_pairs(), r.queued_pairs());
    assert_eq!(m.generated_pairs(), 4);
}

#[test]
fn leader_never_starves_and_pairs_stay_in_sync() {
    let mut m = idle_match(3);
    // Slow the right side down so the left one leads.
    m.grid_mut(Side::Right).set_falling_time_ms(5);

    for _ in 0..2_000 {
        if m.update(1) != MatchOutcome::InProgress {
            break;
        }
        for side in Side::BOTH {
            let g = m.grid(side);
            if g.grid_state() == GridState::QueueShifting {
                assert!(g.backlog_len() >= 1, "{side:?} waits for a pair");
            }
        }
    }
    assert!(m.grid(Side::Left).falling_pair_serial() > m.grid(Side::Right).falling_pair_serial());
}

#[test]
fn a_chain_sends_ghosts_to_the_opponent() {
    let mut m = idle_match(8);
    let colour = m.grid(Side::Left).falling_pair().unwrap().main;
    {
        let left = m.grid_mut(Side::Left);
        for y in GRID_HEIGHT - 3..GRID_HEIGHT {
            assert!(left.place_amoeba(SPAWN_COLUMN, y, colour));
        }
    }

    for _ in 0..500 {
        m.update(1);
        if m.ghosts_sent(Side::Left) > 0 {
            break;
        }
    }
    // 40 or 60 points depending on the satellite: one ghost either way.
    assert_eq!(m.ghosts_sent(Side::Left), 1);
    assert_eq!(m.grid(Side::Right).waiting_ghosts(), 1);
    assert_eq!(m.grid(Side::Left).max_step_chain(), 1);
}

#[test]
fn filled_side_loses() {
    let mut m = idle_match(5);
    wall_up_overflow_column(m.grid_mut(Side::Left));

    let mut outcome = MatchOutcome::InProgress;
    for _ in 0..100 {
        outcome = m.update(1);
        if outcome != MatchOutcome::InProgress {
            break;
        }
    }
    assert_eq!(outcome, MatchOutcome::Winner(Side::Right));
    assert!(m.grid(Side::Left).is_filled());

    // Finished matches stay finished.
    let ticks = m.ticks();
    assert_eq!(m.update(1), MatchOutcome::Winner(Side::Right));
    assert_eq!(m.ticks(), ticks);
}

#[test]
fn simultaneous_fill_is_a_draw() {
    let mut m = idle_match(6);
    for side in Side::BOTH {
        wall_up_overflow_column(m.grid_mut(side));
    }
    let mut outcome = MatchOutcome::InProgress;
    for _ in 0..100 {
        outcome = m.update(1);
        if outcome != MatchOutcome::InProgress {
            break;
        }
    }
    assert_eq!(outcome, MatchOutcome::Draw);
}

#[test]
fn training_starts_at_level_one_speed_and_ends_on_fill() {
    let mut t = Training::new(11, Box::new(Idle), GridConfig::instant()).unwrap();
    assert_eq!(t.level_index(), 0);
    assert_eq!(t.grid().config().falling_time_ms, t.current_level().falling_time_ms);

    let mut running = true;
    for _ in 0..200_000 {
        running = t.update(50);
        if !running {
            break;
        }
    }
    assert!(!running);
    assert!(t.grid().is_filled());
    assert!(!t.update(50), "a filled training session stays over");
}

#[test]
fn human_keys_drive_the_pair() {
    let mut g = Grid::new(2);
    for _ in 0..4 {
        g.add_new_pair(Colour::Red, Colour::Blue);
    }
    let mut human = HumanController::new();

    human.push(KeyEvent::Pressed(Key::Left));
    human.push(KeyEvent::Released(Key::Left));
    human.push(KeyEvent::Pressed(Key::Left));
    human.push(KeyEvent::Pressed(Key::RotateClockwise));
    human.update(0, &mut g);

    let pair = g.falling_pair().unwrap();
    assert_eq!(pair.main_x, SPAWN_COLUMN as i32 - 2);
    assert_eq!(pair.orientation, Orientation::Right);

    human.push(KeyEvent::Pressed(Key::Down));
    human.update(0, &mut g);
    assert!(g.is_max_speed());

    human.push(KeyEvent::Released(Key::Down));
    human.update(0, &mut g);
    assert!(!g.is_max_speed());
    assert_eq!(human.name(), "human");
}
