// engine/src/policy/score.rs
#![forbid(unsafe_code)]

use crate::engine::PositionResult;

/// Score of any move that fills the grid.
pub const FILLED_PENALTY: i32 = -1_000_000;

/// Column height (from the floor) at which the AI stops building and takes what it gets.
pub const DANGER_HEIGHT: u8 = 9;

const LOST_AMOEBA_PENALTY: i32 = 5_000;
/// Chains smaller than this are held back by aggressive players.
const SMALL_CHAIN_TOTAL: u32 = 8;
const MAX_CHAIN_SHIFT: usize = 10;

#[inline]
fn height_penalty(r: &PositionResult) -> i32 {
    let max = i32::from(r.max_height);
    max * max * 4 + i32::from(r.overflow_column_height) * 10
}

/// Bigger and later chain steps weigh exponentially more.
#[inline]
fn chain_reward(steps: &[u32]) -> i32 {
    steps
        .iter()
        .enumerate()
        .map(|(i, &n)| (n.min(1_000) as i32 * 40) << i.min(MAX_CHAIN_SHIFT))
        .fold(0i32, i32::saturating_add)
}

#[inline]
pub fn in_danger(r: &PositionResult) -> bool {
    r.overflow_column_height >= DANGER_HEIGHT || r.max_height >= DANGER_HEIGHT + 2
}

#[inline]
fn base(r: &PositionResult) -> Option<i32> {
    if r.filled {
        return None;
    }
    Some(-height_penalty(r) - i32::from(r.lost_amoebas) * LOST_AMOEBA_PENALTY)
}

pub fn simple_score(r: &PositionResult, hold_small_chains: bool) -> i32 {
    let Some(s) = base(r) else {
        return FILLED_PENALTY;
    };
    let holding =
        hold_small_chains && r.total_removed() < SMALL_CHAIN_TOTAL && !in_danger(r);
    if holding {
        // Reward the build-up instead of cashing in.
        let wasted = i32::try_from(r.total_removed()).unwrap_or(i32::MAX);
        return s + r.grouped_amoebas as i32 * 10 - wasted * 20;
    }
    s.saturating_add(chain_reward(&r.step_chains))
}

pub fn first_step_score(r: &PositionResult) -> i32 {
    let Some(s) = base(r) else {
        return FILLED_PENALTY;
    };
    s.saturating_add(chain_reward(&r.step_chains[..r.step_chains.len().min(1)]))
}

pub fn advanced_score(r: &PositionResult) -> i32 {
    if r.filled {
        return FILLED_PENALTY;
    }
    simple_score(r, false)
        .saturating_add(r.grouped_amoebas as i32 * 15)
        .saturating_add(r.ghosts_removed as i32 * 30)
}
