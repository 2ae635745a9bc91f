// engine/src/policy/player.rs
#![forbid(unsafe_code)]

use log::trace;
use rand::prelude::*;

use crate::engine::{FallingPairView, Grid, Move};

use super::base::Controller;
use super::search::find_best_move;
use super::variants::{AiKind, AiPolicy};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AiState {
    Idle,
    ComputingMove,
    MovingToPosition,
    WaitingNextPair,
}

/// Computer player: plans one move per falling pair and executes it one command per
/// decision interval.
#[derive(Clone, Debug)]
pub struct AiPlayer {
    kind: AiKind,
    policy: AiPolicy,
    // Decision timing and the Dumb formula.
    rng: StdRng,
    state: AiState,
    wait_ms: u32,
    target: Option<Move>,
    serial: Option<u64>,
    decisions: u64,
}

impl AiPlayer {
    pub fn new(kind: AiKind, seed: u64) -> Self {
        Self::with_policy(kind, kind.policy(), seed)
    }

    /// Same search as `kind` with custom knobs (pacing, look-ahead).
    pub fn with_policy(kind: AiKind, policy: AiPolicy, seed: u64) -> Self {
        let mut player = Self {
            kind,
            policy,
            rng: StdRng::seed_from_u64(seed),
            state: AiState::Idle,
            wait_ms: 0,
            target: None,
            serial: None,
            decisions: 0,
        };
        player.wait_ms = player.next_delay();
        player
    }

    #[inline]
    pub fn kind(&self) -> AiKind {
        self.kind
    }

    #[inline]
    pub fn policy(&self) -> &AiPolicy {
        &self.policy
    }

    #[inline]
    pub fn state(&self) -> AiState {
        self.state
    }

    #[inline]
    pub fn target(&self) -> Option<Move> {
        self.target
    }

    /// Moves planned so far.
    #[inline]
    pub fn decisions(&self) -> u64 {
        self.decisions
    }

    /// `time_to_wait_ms` plus uniform jitter in `±time_deviation_ms`.
    fn next_delay(&mut self) -> u32 {
        let base = i64::from(self.policy.time_to_wait_ms);
        let dev = i64::from(self.policy.time_deviation_ms);
        let jitter = if dev > 0 {
            self.rng.gen_range(-dev..=dev)
        } else {
            0
        };
        (base + jitter).clamp(0, i64::from(u32::MAX)) as u32
    }

    fn reset(&mut self, serial: Option<u64>) {
        if self.state != AiState::Idle {
            trace!("ai {} reset to idle", self.kind);
        }
        self.state = AiState::Idle;
        self.target = None;
        self.serial = serial;
    }

    /// One command toward the target; leaves MovingToPosition once there or when stuck.
    fn step_towards(&mut self, grid: &mut Grid, pair: FallingPairView) {
        let Some(target) = self.target else {
            self.state = AiState::Idle;
            return;
        };

        let ok = match pair.orientation.clockwise_turns_to(target.orientation) {
            1 | 2 => grid.rotate_clockwise(),
            3 => grid.rotate_counter_clockwise(),
            _ => {
                let x = target.main_x as i32;
                if pair.main_x < x {
                    grid.move_right()
                } else if pair.main_x > x {
                    grid.move_left()
                } else {
                    if self.policy.max_speed {
                        grid.set_max_falling_speed();
                    }
                    self.state = AiState::WaitingNextPair;
                    return;
                }
            }
        };

        // A rotation still animating is retried; anything else blocked means the path closed.
        if !ok && !pair.rotating {
            trace!("ai {} path blocked at column {}", self.kind, pair.main_x);
            self.state = AiState::WaitingNextPair;
        }
    }
}

impl Controller for AiPlayer {
    fn update(&mut self, elapsed_ms: u32, grid: &mut Grid) {
        let Some(pair) = grid.falling_pair() else {
            if self.state != AiState::Idle {
                self.reset(self.serial);
            }
            return;
        };
        let serial = grid.falling_pair_serial();
        if self.serial != Some(serial) {
            self.reset(Some(serial));
        }

        self.wait_ms = self.wait_ms.saturating_sub(elapsed_ms);
        if self.wait_ms > 0 {
            return;
        }
        self.wait_ms = self.next_delay();

        match self.state {
            AiState::Idle => self.state = AiState::ComputingMove,
            AiState::ComputingMove => {
                // No legal move: stay idle and retry on the next decision.
                self.target = find_best_move(grid, &self.policy, &mut self.rng);
                self.state = if self.target.is_some() {
                    self.decisions += 1;
                    AiState::MovingToPosition
                } else {
                    AiState::Idle
                };
            }
            AiState::MovingToPosition => self.step_towards(grid, pair),
            AiState::WaitingNextPair => {}
        }
    }

    fn name(&self) -> String {
        self.kind.to_string()
    }
}
