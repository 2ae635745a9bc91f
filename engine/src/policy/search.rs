// engine/src/policy/search.rs
#![forbid(unsafe_code)]

use log::debug;
use rand::Rng;
use rustc_hash::FxHashMap;

use crate::engine::{
    Colour, FallingPairView, Grid, GridStatus, Move, Orientation, PositionResult, GRID_HEIGHT,
    GRID_WIDTH, SPAWN_COLUMN, SPAWN_ROW,
};

use super::score::{advanced_score, first_step_score, simple_score, FILLED_PENALTY};
use super::variants::{AiPolicy, ScoreFormula};

fn score_result<R: Rng>(r: &PositionResult, formula: ScoreFormula, rng: &mut R) -> i32 {
    match formula {
        ScoreFormula::Random => rng.gen_range(0..i32::from(u16::MAX)),
        ScoreFormula::Simple { hold_small_chains } => simple_score(r, hold_small_chains),
        ScoreFormula::FirstStep => first_step_score(r),
        ScoreFormula::Advanced => advanced_score(r),
    }
}

/// Where a not-yet-spawned pair starts.
fn spawn_view(main: Colour, satellite: Colour) -> FallingPairView {
    FallingPairView {
        main,
        satellite,
        main_x: SPAWN_COLUMN as i32,
        main_y: SPAWN_ROW as i32,
        orientation: Orientation::Top,
        half_step: false,
        rotating: false,
    }
}

/**
 * Conservative reachability of `mv` from the pair's current place.
 *
 * Every column the pair sweeps (one extra column on each side when it has to rotate) must be
 * empty in a band of rows around the main amoeba. Moves that would squeeze through a gap are
 * rejected even when a skilled player could make them.
 */
pub fn is_reachable(state: &GridStatus, from: &FallingPairView, mv: Move) -> bool {
    let (sat_x, _) = from.satellite_pos();
    let target_main = mv.main_x as i32;
    let target_sat = mv.satellite_x() as i32;

    let mut left = from.main_x.min(sat_x).min(target_main).min(target_sat);
    let mut right = from.main_x.max(sat_x).max(target_main).max(target_sat);
    if from.orientation != mv.orientation {
        left -= 1;
        right += 1;
    }
    let left = left.max(0);
    let right = right.min(GRID_WIDTH as i32 - 1);

    let top = (from.main_y - 1).max(0);
    let bottom = (from.main_y + 1 + i32::from(from.half_step)).min(GRID_HEIGHT as i32 - 1);

    (left..=right).all(|x| (top..=bottom).all(|y| state.is_empty_at(x, y)))
}

struct Search<'a, R: Rng> {
    policy: &'a AiPolicy,
    /// Deeper plies, in order: next, following.
    plies: Vec<(Colour, Colour)>,
    discount: i64,
    cache: FxHashMap<(GridStatus, usize), i64>,
    rng: &'a mut R,
    evaluated: u64,
}

impl<R: Rng> Search<'_, R> {
    /// Score of the best continuation from `state` for ply `depth`.
    fn best_value(&mut self, state: &GridStatus, depth: usize) -> i64 {
        let key = (*state, depth);
        if let Some(&v) = self.cache.get(&key) {
            return v;
        }

        let (main, satellite) = self.plies[depth];
        let from = spawn_view(main, satellite);
        let mut best: Option<i64> = None;

        for mv in Move::all().filter(|&mv| is_reachable(state, &from, mv)) {
            let v = self.evaluate(state, main, satellite, mv, depth + 1);
            if best.map_or(true, |b| v > b) {
                best = Some(v);
            }
        }

        let v = best.unwrap_or(i64::from(FILLED_PENALTY));
        self.cache.insert(key, v);
        v
    }

    /// Simulate `mv` on a copy of `state` and blend in the deeper plies starting at `next_depth`.
    fn evaluate(
        &mut self,
        state: &GridStatus,
        main: Colour,
        satellite: Colour,
        mv: Move,
        next_depth: usize,
    ) -> i64 {
        let mut after = *state;
        let r = after.check_positions(main, satellite, mv);
        self.evaluated += 1;

        let s0 = i64::from(score_result(&r, self.policy.formula, &mut *self.rng));
        if r.filled || next_depth >= self.plies.len() {
            return s0;
        }
        s0 + self.best_value(&after, next_depth) * self.discount / 100
    }
}

/// Best reachable move for the live pair, or `None` when there is no pair or no reachable
/// move. The first strictly better move wins, so ties resolve to enumeration order.
pub fn find_best_move<R: Rng>(grid: &Grid, policy: &AiPolicy, rng: &mut R) -> Option<Move> {
    let pair = grid.falling_pair()?;
    let state = grid.state();

    let queued = grid.queued_pairs();
    let mut plies = Vec::with_capacity(2);
    if policy.check_next {
        plies.extend(queued.first().copied());
        if policy.check_following {
            plies.extend(queued.get(1).copied());
        }
    }

    let mut search = Search {
        policy,
        plies,
        discount: policy.discount_percent(grid.waiting_ghosts()),
        cache: FxHashMap::default(),
        rng,
        evaluated: 0,
    };

    let mut best: Option<(Move, i64)> = None;
    for mv in Move::all().filter(|&mv| is_reachable(&state, &pair, mv)) {
        let v = search.evaluate(&state, pair.main, pair.satellite, mv, 0);
        match best {
            None => best = Some((mv, v)),
            Some((_bm, bv)) if v > bv => best = Some((mv, v)),
            _ => {}
        }
    }

    if let Some((mv, v)) = best {
        debug!(
            "ai move col={} {:?} score={} evaluated={}",
            mv.main_x, mv.orientation, v, search.evaluated
        );
    }
    best.map(|(mv, _)| mv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walls_of_amoebas_cut_off_far_columns() {
        let state = GridStatus::from_rows(&[
            "..R...", "..B...", "..R...", "..B...", "..R...", "..B...", "..R...", "..B...",
            "..R...", "..B...", "..R...", "..B...", "..R...", "..B...",
        ])
        .unwrap();
        let from = spawn_view(Colour::Red, Colour::Red);
        let left = Move::new(0, Orientation::Top).unwrap();
        let right = Move::new(5, Orientation::Top).unwrap();
        assert!(!is_reachable(&state, &from, left));
        assert!(is_reachable(&state, &from, right));
    }

    #[test]
    fn empty_board_reaches_every_move() {
        let state = GridStatus::empty();
        let from = spawn_view(Colour::Red, Colour::Blue);
        assert_eq!(Move::all().filter(|&m| is_reachable(&state, &from, m)).count(), 22);
    }
}
