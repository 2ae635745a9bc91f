// engine/src/engine/constants.rs
#![forbid(unsafe_code)]

pub const GRID_WIDTH: usize = 6;
pub const GRID_HEIGHT: usize = 15;
pub const GRID_CELLS: usize = GRID_WIDTH * GRID_HEIGHT;

/// Top rows are the non-rendered overflow zone.
pub const FIRST_VISIBLE_HEIGHT: usize = 3;
pub const VISIBLE_HEIGHT: usize = GRID_HEIGHT - FIRST_VISIBLE_HEIGHT;

/**
 * Game-over cell: the grid is filled once this cell is occupied after settling.
 *
 * The falling pair spawns in the same column (main one row above the overflow row, satellite
 * on top of it), so as long as the overflow cell is empty the spawn cells are empty as well.
 */
pub const OVERFLOW_COLUMN: usize = 3;
pub const OVERFLOW_ROW: usize = FIRST_VISIBLE_HEIGHT - 1;

pub const SPAWN_COLUMN: usize = OVERFLOW_COLUMN;
pub const SPAWN_ROW: usize = OVERFLOW_ROW - 1;

pub const MIN_GROUP_SIZE: usize = 4;

pub const MAX_WAITING_GHOSTS: u32 = 30;
pub const GHOST_SCORE_DIVISOR: u64 = 70;

/// Pairs shown as "next" and "following".
pub const QUEUE_LEN: usize = 2;
/// Pairs a grid needs before the first one starts falling.
pub const INITIAL_PAIRS: usize = 4;

/// Shift cap for the chain multiplier; deeper chains score as this step.
const MAX_SCORE_SHIFT: u32 = 40;

#[inline]
pub fn cell_index(x: usize, y: usize) -> usize {
    debug_assert!(x < GRID_WIDTH && y < GRID_HEIGHT);
    y * GRID_WIDTH + x
}

#[inline]
pub fn cell_coords(idx: usize) -> (usize, usize) {
    (idx % GRID_WIDTH, idx / GRID_WIDTH)
}

#[inline]
pub fn in_bounds(x: i32, y: i32) -> bool {
    x >= 0 && y >= 0 && (x as usize) < GRID_WIDTH && (y as usize) < GRID_HEIGHT
}

/// Bounds-checked index; `None` outside the board.
#[inline]
pub fn checked_index(x: i32, y: i32) -> Option<usize> {
    in_bounds(x, y).then(|| cell_index(x as usize, y as usize))
}

/// Score of one chain pass removing `removed` non-ghost amoebas at chain step `step` (0-based).
#[inline]
pub fn chain_step_score(removed: u32, step: u32) -> u64 {
    let base = u64::from((2 * removed).saturating_sub(4)) * 10;
    base << step.min(MAX_SCORE_SHIFT)
}

/// Ghost amoebas produced by a pass worth `score` points.
#[inline]
pub fn ghosts_for_score(score: u64) -> u32 {
    score.div_ceil(GHOST_SCORE_DIVISOR).min(u64::from(u32::MAX)) as u32
}
