// engine/src/engine/grid.rs
#![forbid(unsafe_code)]

use std::collections::VecDeque;
use std::mem;

use log::{debug, info, trace};
use rand::prelude::*;

use crate::engine::amoeba::{Amoeba, Colour, NeighbourState};
use crate::engine::arena::{AmoebaArena, AmoebaId};
use crate::engine::command::Command;
use crate::engine::config::{ConfigError, GridConfig};
use crate::engine::constants::{
    cell_coords, cell_index, chain_step_score, checked_index, ghosts_for_score, GRID_CELLS,
    GRID_HEIGHT, GRID_WIDTH, INITIAL_PAIRS, MAX_WAITING_GHOSTS, MIN_GROUP_SIZE, OVERFLOW_COLUMN,
    OVERFLOW_ROW, QUEUE_LEN, SPAWN_COLUMN, SPAWN_ROW,
};
use crate::engine::generator::PairSink;
use crate::engine::groups::{find_groups, neighbour_mask};
use crate::engine::labels::ChainLabel;
use crate::engine::pair::{FallingPair, FallingPairView, Orientation};
use crate::engine::status::GridStatus;

/// Frames of the landing-silhouette animation.
pub const SILHOUETTE_FRAMES: u8 = 4;
/// Waiting ghosts drawn as one big icon.
pub const GHOSTS_PER_BIG_ICON: u32 = GRID_WIDTH as u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridState {
    AwaitingInitialFill,
    FallingPair,
    FloatingPieces,
    PiecesDying,
    QueueShifting,
    /// Terminal.
    Filled,
}

/// Render-facing snapshot of one amoeba. Coordinates are in cells and include half-cell offsets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmoebaView {
    pub id: AmoebaId,
    pub colour: Colour,
    pub neighbours: NeighbourState,
    pub x: f32,
    pub y: f32,
    pub visible: bool,
    pub dying: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GhostIcons {
    pub big: u32,
    pub small: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FloatingAmoeba {
    id: AmoebaId,
    x: usize,
    /// Negative while an incoming ghost is still above the board.
    y: i32,
}

type QueuedPair = (AmoebaId, AmoebaId);

/**
 * One player's live board.
 *
 * `update` advances a per-tick state machine; every wait is a millisecond counter fed by the
 * caller's elapsed time. Amoebas live in a grid-owned arena and are referenced by id from
 * exactly one place: a board cell, the falling pair, the floating list, the queue or the
 * backlog.
 */
#[derive(Clone, Debug)]
pub struct Grid {
    config: GridConfig,
    arena: AmoebaArena,
    board: [Option<AmoebaId>; GRID_CELLS],
    state: GridState,

    falling: Option<FallingPair>,
    queue: VecDeque<QueuedPair>,
    backlog: VecDeque<QueuedPair>,
    floating: Vec<FloatingAmoeba>,
    float_half_step: bool,
    dying: Vec<usize>,

    // One timer per state; reset on every transition.
    state_timer_ms: u32,
    blink_timer_ms: u32,
    rotation_left_ms: u32,
    silhouette_timer_ms: u32,
    max_speed: bool,

    score: u64,
    step_chain: u32,
    max_step_chain: u32,
    waiting_ghosts: u32,
    opponent_ghosts: u32,
    labels: Vec<ChainLabel>,

    new_falling_pair: bool,
    serial: u64,

    // Ghost column shuffles.
    rng: StdRng,
}

impl Grid {
    pub fn new(seed: u64) -> Self {
        Self::build(GridConfig::default(), seed)
    }

    pub fn with_config(config: GridConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, seed))
    }

    fn build(config: GridConfig, seed: u64) -> Self {
        Self {
            config,
            arena: AmoebaArena::default(),
            board: [None; GRID_CELLS],
            state: GridState::AwaitingInitialFill,
            falling: None,
            queue: VecDeque::with_capacity(QUEUE_LEN),
            backlog: VecDeque::new(),
            floating: Vec::new(),
            float_half_step: false,
            dying: Vec::new(),
            state_timer_ms: 0,
            blink_timer_ms: 0,
            rotation_left_ms: 0,
            silhouette_timer_ms: 0,
            max_speed: false,
            score: 0,
            step_chain: 0,
            max_step_chain: 0,
            waiting_ghosts: 0,
            opponent_ghosts: 0,
            labels: Vec::new(),
            new_falling_pair: false,
            serial: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Level changes only touch the normal fall speed; max speed never gets slower than it.
    pub fn set_falling_time_ms(&mut self, ms: u32) {
        self.config.falling_time_ms = ms.max(1);
        self.config.max_speed_falling_time_ms = self
            .config
            .max_speed_falling_time_ms
            .min(self.config.falling_time_ms);
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    pub fn update(&mut self, elapsed_ms: u32) {
        self.new_falling_pair = false;

        for label in &mut self.labels {
            label.age(elapsed_ms);
        }
        self.labels.retain(ChainLabel::is_active);

        match self.state {
            GridState::AwaitingInitialFill | GridState::Filled => {}
            GridState::FallingPair => self.update_falling(elapsed_ms),
            GridState::FloatingPieces => self.update_floating(elapsed_ms),
            GridState::PiecesDying => self.update_dying(elapsed_ms),
            GridState::QueueShifting => self.update_queue_shift(elapsed_ms),
        }
    }

    fn set_state(&mut self, next: GridState) {
        trace!("grid state {:?} -> {:?}", self.state, next);
        self.state = next;
        self.state_timer_ms = 0;
    }

    /// Accumulate `elapsed_ms` and report whether one `period_ms` step is due.
    ///
    /// Leftover time is clamped to one period, so a long tick never skips cells.
    fn step_due(&mut self, elapsed_ms: u32, period_ms: u32) -> bool {
        self.state_timer_ms = self.state_timer_ms.saturating_add(elapsed_ms);
        if self.state_timer_ms < period_ms {
            return false;
        }
        self.state_timer_ms = (self.state_timer_ms - period_ms).min(period_ms);
        true
    }

    // -------------------------------------------------------------------------
    // Falling pair
    // -------------------------------------------------------------------------

    fn update_falling(&mut self, elapsed_ms: u32) {
        self.rotation_left_ms = self.rotation_left_ms.saturating_sub(elapsed_ms);
        self.silhouette_timer_ms = self.silhouette_timer_ms.wrapping_add(elapsed_ms);

        let period = if self.max_speed {
            self.config.max_speed_falling_time_ms
        } else {
            self.config.falling_time_ms
        };
        if !self.step_due(elapsed_ms, period) {
            return;
        }

        let Some(mut pair) = self.falling else {
            return;
        };
        if pair.half_step {
            pair.y += 1;
            pair.half_step = false;
            if self.max_speed {
                self.score += 1;
            }
            self.falling = Some(pair);
        } else if pair
            .cells()
            .iter()
            .all(|&(x, y)| self.is_free(x, y + 1))
        {
            pair.half_step = true;
            self.falling = Some(pair);
        } else {
            self.lock_falling_pair(pair);
        }
    }

    fn lock_falling_pair(&mut self, pair: FallingPair) {
        self.falling = None;
        self.max_speed = false;
        let (sx, sy) = pair.satellite_pos();
        for (id, x, y) in [(pair.main, pair.x, pair.y), (pair.satellite, sx, sy)] {
            if let Some(i) = checked_index(x, y) {
                self.board[i] = Some(id);
            } else {
                // Unreachable while moves are bounds-checked; drop rather than alias.
                self.arena.remove(id);
            }
        }
        trace!("pair locked at ({}, {}) {:?}", pair.x, pair.y, pair.orientation);
        self.refresh_neighbours();
        self.enter_floating();
    }

    /// In-bounds and unoccupied. The falling pair itself is not on the board.
    #[inline]
    fn is_free(&self, x: i32, y: i32) -> bool {
        checked_index(x, y).is_some_and(|i| self.board[i].is_none())
    }

    /// Free cell, also checking the row below while the pair straddles two rows.
    #[inline]
    fn is_free_for_pair(&self, x: i32, y: i32, half_step: bool) -> bool {
        self.is_free(x, y) && (!half_step || self.is_free(x, y + 1))
    }

    fn shift(&mut self, dx: i32) -> bool {
        if self.state != GridState::FallingPair {
            return false;
        }
        let Some(mut pair) = self.falling else {
            return false;
        };
        if !pair
            .cells()
            .iter()
            .all(|&(x, y)| self.is_free_for_pair(x + dx, y, pair.half_step))
        {
            return false;
        }
        pair.x += dx;
        self.falling = Some(pair);
        true
    }

    fn rotate(&mut self, clockwise: bool) -> bool {
        if self.state != GridState::FallingPair || self.rotation_left_ms > 0 {
            return false;
        }
        let Some(mut pair) = self.falling else {
            return false;
        };
        let target = if clockwise {
            pair.orientation.clockwise()
        } else {
            pair.orientation.counter_clockwise()
        };
        let (dx, dy) = target.offset();

        if self.is_free_for_pair(pair.x + dx, pair.y + dy, pair.half_step) {
            pair.orientation = target;
        } else {
            // Kick is a column shift only: away from a sideways obstacle, or toward the
            // column the satellite is leaving when the new offset is vertical.
            let kick = if dx != 0 { -dx } else { pair.orientation.offset().0 };
            let x = pair.x + kick;
            if !self.is_free_for_pair(x, pair.y, pair.half_step)
                || !self.is_free_for_pair(x + dx, pair.y + dy, pair.half_step)
            {
                return false;
            }
            pair.x = x;
            pair.orientation = target;
        }

        self.falling = Some(pair);
        self.rotation_left_ms = self.config.rotation_time_ms;
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(1)
    }

    pub fn rotate_clockwise(&mut self) -> bool {
        self.rotate(true)
    }

    pub fn rotate_counter_clockwise(&mut self) -> bool {
        self.rotate(false)
    }

    pub fn set_max_falling_speed(&mut self) -> bool {
        if self.state != GridState::FallingPair || self.max_speed {
            return false;
        }
        self.max_speed = true;
        true
    }

    pub fn set_normal_falling_speed(&mut self) -> bool {
        if self.state != GridState::FallingPair || !self.max_speed {
            return false;
        }
        self.max_speed = false;
        true
    }

    pub fn apply(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::RotateClockwise => self.rotate_clockwise(),
            Command::RotateCounterClockwise => self.rotate_counter_clockwise(),
            Command::MaxFallingSpeed => self.set_max_falling_speed(),
            Command::NormalFallingSpeed => self.set_normal_falling_speed(),
        }
    }

    // -------------------------------------------------------------------------
    // Floating pieces
    // -------------------------------------------------------------------------

    fn enter_floating(&mut self) {
        self.set_state(GridState::FloatingPieces);
        self.float_half_step = false;
        self.lift_floaters();
        if self.floating.is_empty() {
            self.detect_chains();
        }
    }

    /// Bottom-up: anything resting on an empty cell (or on a piece lifted this scan) floats.
    fn lift_floaters(&mut self) {
        for x in 0..GRID_WIDTH {
            for y in (0..GRID_HEIGHT - 1).rev() {
                let i = cell_index(x, y);
                if self.board[i].is_some() && self.board[cell_index(x, y + 1)].is_none() {
                    if let Some(id) = self.board[i].take() {
                        self.floating.push(FloatingAmoeba {
                            id,
                            x,
                            y: y as i32,
                        });
                    }
                }
            }
        }
    }

    fn update_floating(&mut self, elapsed_ms: u32) {
        if !self.step_due(elapsed_ms, self.config.floating_falling_time_ms) {
            return;
        }
        if !self.float_half_step {
            self.float_half_step = true;
            return;
        }
        self.float_half_step = false;
        self.drop_floaters_one_row();
        self.lift_floaters();
        self.refresh_neighbours();
        if self.floating.is_empty() {
            self.detect_chains();
        }
    }

    fn drop_floaters_one_row(&mut self) {
        let mut floaters = mem::take(&mut self.floating);
        // Lowest first, so each piece moves into a cell its lower neighbour just left.
        floaters.sort_by(|a, b| b.y.cmp(&a.y));

        for f in floaters {
            let ny = f.y + 1;
            if ny < 0 {
                self.floating.push(FloatingAmoeba { y: ny, ..f });
                continue;
            }
            let target = cell_index(f.x, ny as usize);
            if self.board[target].is_none() {
                self.board[target] = Some(f.id);
            } else if f.y >= 0 {
                self.board[cell_index(f.x, f.y as usize)] = Some(f.id);
            } else {
                // Ghost stuck above a full column.
                trace!("ghost in column {} discarded", f.x);
                self.arena.remove(f.id);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Chains
    // -------------------------------------------------------------------------

    fn detect_chains(&mut self) {
        let colours = self.colours();
        let groups = find_groups(|i| colours[i]);

        let mut removed = 0u32;
        for g in groups.iter().filter(|g| g.len() >= MIN_GROUP_SIZE) {
            removed += g.len() as u32;
            trace!(
                "{:?} group of {} with {} contact ghosts",
                g.colour,
                g.len(),
                g.contact_ghosts.len()
            );
            for &i in g.cells.iter().chain(&g.contact_ghosts) {
                self.mark_dying(i);
            }
            let (x, y) = g.centroid();
            self.labels.push(ChainLabel {
                x,
                y,
                step: self.step_chain + 1,
                remaining_ms: self.config.chain_label_time_ms,
            });
        }

        if removed > 0 {
            let pass = chain_step_score(removed, self.step_chain);
            self.score += pass;
            self.step_chain += 1;
            self.max_step_chain = self.max_step_chain.max(self.step_chain);

            let ghosts = ghosts_for_score(pass);
            let cancelled = ghosts.min(self.waiting_ghosts);
            self.waiting_ghosts -= cancelled;
            self.opponent_ghosts = self.opponent_ghosts.saturating_add(ghosts - cancelled);
            debug!(
                "chain step {}: removed={} pass={} ghosts={} cancelled={}",
                self.step_chain, removed, pass, ghosts, cancelled
            );

            self.blink_timer_ms = 0;
            self.set_state(GridState::PiecesDying);
            return;
        }

        if self.overflow_occupied() {
            info!("grid filled: score={} max_chain={}", self.score, self.max_step_chain);
            self.set_state(GridState::Filled);
        } else if self.waiting_ghosts > 0 {
            self.make_ghosts_fall();
        } else {
            self.set_state(GridState::QueueShifting);
        }
    }

    fn mark_dying(&mut self, i: usize) {
        let Some(id) = self.board[i] else {
            return;
        };
        if let Some(a) = self.arena.get_mut(id) {
            if !a.is_dying() {
                a.mark_dying();
                self.dying.push(i);
            }
        }
    }

    fn update_dying(&mut self, elapsed_ms: u32) {
        self.blink_timer_ms = self.blink_timer_ms.saturating_add(elapsed_ms);
        let toggles = self.blink_timer_ms / self.config.blink_time_ms;
        self.blink_timer_ms %= self.config.blink_time_ms;
        if toggles % 2 == 1 {
            for &i in &self.dying {
                if let Some(a) = self.board[i].and_then(|id| self.arena.get_mut(id)) {
                    a.toggle_visible();
                }
            }
        }

        self.state_timer_ms = self.state_timer_ms.saturating_add(elapsed_ms);
        if self.state_timer_ms < self.config.dying_time_ms {
            return;
        }
        for i in mem::take(&mut self.dying) {
            if let Some(id) = self.board[i].take() {
                self.arena.remove(id);
            }
        }
        self.refresh_neighbours();
        self.enter_floating();
    }

    // -------------------------------------------------------------------------
    // Ghosts
    // -------------------------------------------------------------------------

    /// Saturates at the waiting-ghost cap.
    pub fn increment_waiting_ghosts(&mut self, n: u32) {
        self.waiting_ghosts = self.waiting_ghosts.saturating_add(n).min(MAX_WAITING_GHOSTS);
    }

    /// Ghosts earned for the opponent since the last call.
    pub fn take_opponent_ghosts(&mut self) -> u32 {
        mem::take(&mut self.opponent_ghosts)
    }

    fn make_ghosts_fall(&mut self) {
        let mut remaining = mem::take(&mut self.waiting_ghosts);
        debug!("dropping {} ghosts", remaining);

        let mut row = 0i32;
        while remaining > 0 {
            let mut columns: [usize; GRID_WIDTH] = std::array::from_fn(|x| x);
            columns.shuffle(&mut self.rng);
            let n = (remaining as usize).min(GRID_WIDTH);
            for &x in &columns[..n] {
                let id = self.arena.insert(Amoeba::new(Colour::Ghost));
                self.floating.push(FloatingAmoeba { id, x, y: -1 - row });
            }
            remaining -= n as u32;
            row += 1;
        }
        self.enter_floating();
    }

    // -------------------------------------------------------------------------
    // Queue
    // -------------------------------------------------------------------------

    fn update_queue_shift(&mut self, elapsed_ms: u32) {
        self.state_timer_ms = self.state_timer_ms.saturating_add(elapsed_ms);
        if self.state_timer_ms < self.config.queue_shift_time_ms {
            return;
        }
        self.state_timer_ms = self.config.queue_shift_time_ms;

        // Waits here until the generator delivers.
        let Some(refill) = self.backlog.pop_front() else {
            return;
        };
        let Some(next) = self.queue.pop_front() else {
            self.backlog.push_front(refill);
            return;
        };
        self.queue.push_back(refill);
        self.spawn(next);
        if self.state == GridState::FallingPair {
            self.new_falling_pair = true;
            self.serial += 1;
        }
    }

    fn spawn(&mut self, (main, satellite): QueuedPair) {
        let (x, y) = (SPAWN_COLUMN as i32, SPAWN_ROW as i32);
        let pair = FallingPair {
            main,
            satellite,
            x,
            y,
            orientation: Orientation::Top,
            half_step: false,
        };
        if !pair.cells().iter().all(|&(cx, cy)| self.is_free(cx, cy)) {
            info!("spawn blocked: score={}", self.score);
            self.arena.remove(main);
            self.arena.remove(satellite);
            self.set_state(GridState::Filled);
            return;
        }

        self.falling = Some(pair);
        self.max_speed = false;
        self.rotation_left_ms = 0;
        self.silhouette_timer_ms = 0;
        self.step_chain = 0;
        self.set_state(GridState::FallingPair);
    }

    // -------------------------------------------------------------------------
    // Setup
    // -------------------------------------------------------------------------

    /// Place a settled amoeba for puzzles and tests. Refuses occupied cells, the falling
    /// pair's cells and the empty colour.
    pub fn place_amoeba(&mut self, x: usize, y: usize, colour: Colour) -> bool {
        let Some(i) = checked_index(x as i32, y as i32) else {
            return false;
        };
        if colour.is_empty() || self.board[i].is_some() {
            return false;
        }
        if let Some(pair) = self.falling {
            let (x, y) = (x as i32, y as i32);
            if pair.cells().iter().any(|&(cx, cy)| {
                cx == x && (cy == y || (pair.half_step && cy + 1 == y))
            }) {
                return false;
            }
        }
        self.board[i] = Some(self.arena.insert(Amoeba::new(colour)));
        self.refresh_neighbours();
        true
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    #[inline]
    pub fn grid_state(&self) -> GridState {
        self.state
    }

    /// Colour snapshot of the settled board (falling and floating pieces excluded).
    pub fn state(&self) -> GridStatus {
        GridStatus::from_cells(self.colours())
    }

    fn colours(&self) -> [Colour; GRID_CELLS] {
        let mut out = [Colour::None; GRID_CELLS];
        for (i, slot) in self.board.iter().enumerate() {
            if let Some(a) = slot.and_then(|id| self.arena.get(id)) {
                out[i] = a.colour();
            }
        }
        out
    }

    fn refresh_neighbours(&mut self) {
        let colours = self.colours();
        for i in 0..GRID_CELLS {
            let mask = neighbour_mask(|j| colours[j], i);
            if let Some(a) = self.board[i].and_then(|id| self.arena.get_mut(id)) {
                a.set_neighbours(mask);
            }
        }
    }

    #[inline]
    fn overflow_occupied(&self) -> bool {
        self.board[cell_index(OVERFLOW_COLUMN, OVERFLOW_ROW)].is_some()
    }

    /// `Colour::None` outside the board.
    pub fn colour_at(&self, x: i32, y: i32) -> Colour {
        self.amoeba_at(x, y).map_or(Colour::None, Amoeba::colour)
    }

    pub fn amoeba_at(&self, x: i32, y: i32) -> Option<&Amoeba> {
        checked_index(x, y)
            .and_then(|i| self.board[i])
            .and_then(|id| self.arena.get(id))
    }

    fn view(&self, id: AmoebaId, x: f32, y: f32) -> Option<AmoebaView> {
        self.arena.get(id).map(|a| AmoebaView {
            id,
            colour: a.colour(),
            neighbours: a.neighbours(),
            x,
            y,
            visible: a.is_visible(),
            dying: a.is_dying(),
        })
    }

    pub fn board_amoebas(&self) -> Vec<AmoebaView> {
        self.board
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                let (x, y) = cell_coords(i);
                slot.and_then(|id| self.view(id, x as f32, y as f32))
            })
            .collect()
    }

    pub fn floating_amoebas(&self) -> Vec<AmoebaView> {
        let offset = if self.float_half_step { 0.5 } else { 0.0 };
        self.floating
            .iter()
            .filter_map(|f| self.view(f.id, f.x as f32, f.y as f32 + offset))
            .collect()
    }

    /// Main first, then satellite.
    pub fn falling_amoebas(&self) -> Vec<AmoebaView> {
        let Some(pair) = self.falling else {
            return Vec::new();
        };
        let offset = if pair.half_step { 0.5 } else { 0.0 };
        let (sx, sy) = pair.satellite_pos();
        [(pair.main, pair.x, pair.y), (pair.satellite, sx, sy)]
            .into_iter()
            .filter_map(|(id, x, y)| self.view(id, x as f32, y as f32 + offset))
            .collect()
    }

    pub fn falling_pair(&self) -> Option<FallingPairView> {
        let pair = self.falling?;
        let main = self.arena.get(pair.main)?.colour();
        let satellite = self.arena.get(pair.satellite)?.colour();
        Some(FallingPairView {
            main,
            satellite,
            main_x: pair.x,
            main_y: pair.y,
            orientation: pair.orientation,
            half_step: pair.half_step,
            rotating: self.rotation_left_ms > 0,
        })
    }

    /// Next and following pair colours (main, satellite).
    pub fn queued_pairs(&self) -> Vec<(Colour, Colour)> {
        self.queue
            .iter()
            .filter_map(|&(m, s)| Some((self.arena.get(m)?.colour(), self.arena.get(s)?.colour())))
            .collect()
    }

    #[inline]
    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    #[inline]
    pub fn waiting_ghosts(&self) -> u32 {
        self.waiting_ghosts
    }

    pub fn waiting_ghost_icons(&self) -> GhostIcons {
        GhostIcons {
            big: self.waiting_ghosts / GHOSTS_PER_BIG_ICON,
            small: self.waiting_ghosts % GHOSTS_PER_BIG_ICON,
        }
    }

    #[inline]
    pub fn chain_labels(&self) -> &[ChainLabel] {
        &self.labels
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[inline]
    pub fn step_chain(&self) -> u32 {
        self.step_chain
    }

    #[inline]
    pub fn max_step_chain(&self) -> u32 {
        self.max_step_chain
    }

    pub fn is_max_speed(&self) -> bool {
        self.max_speed
    }

    pub fn silhouette_frame(&self) -> u8 {
        let frame = self.silhouette_timer_ms / self.config.silhouette_frame_time_ms;
        (frame % u32::from(SILHOUETTE_FRAMES)) as u8
    }

    /// 0.0 right after a rotation, 1.0 once the rotation window has elapsed.
    pub fn rotation_progress(&self) -> f32 {
        if self.config.rotation_time_ms == 0 {
            return 1.0;
        }
        1.0 - self.rotation_left_ms as f32 / self.config.rotation_time_ms as f32
    }

    pub fn queue_shift_progress(&self) -> f32 {
        if self.state != GridState::QueueShifting {
            return 0.0;
        }
        if self.config.queue_shift_time_ms == 0 {
            return 1.0;
        }
        (self.state_timer_ms as f32 / self.config.queue_shift_time_ms as f32).min(1.0)
    }

    #[inline]
    pub fn is_filled(&self) -> bool {
        self.state == GridState::Filled
    }

    /// True only during the tick that brought a new pair into play.
    #[inline]
    pub fn has_new_falling_pair(&self) -> bool {
        self.new_falling_pair
    }

    /// Counts pairs promoted from the queue (the initial pair is serial 0).
    #[inline]
    pub fn falling_pair_serial(&self) -> u64 {
        self.serial
    }

    /// Amoebas held by the grid's arena.
    #[inline]
    pub fn amoeba_count(&self) -> usize {
        self.arena.len()
    }

    /// Every id referenced from the board, falling pair, floating list, queue and backlog.
    pub fn live_amoeba_ids(&self) -> Vec<AmoebaId> {
        let mut ids: Vec<AmoebaId> = self.board.iter().flatten().copied().collect();
        if let Some(pair) = self.falling {
            ids.extend([pair.main, pair.satellite]);
        }
        ids.extend(self.floating.iter().map(|f| f.id));
        for &(m, s) in self.queue.iter().chain(&self.backlog) {
            ids.extend([m, s]);
        }
        ids
    }

    /// Board with the falling pair in lowercase and floating pieces as `*`.
    pub fn render_ascii(&self) -> String {
        let mut rows = [[Colour::None.glyph(); GRID_WIDTH]; GRID_HEIGHT];
        for (i, slot) in self.board.iter().enumerate() {
            if let Some(a) = slot.and_then(|id| self.arena.get(id)) {
                let (x, y) = cell_coords(i);
                rows[y][x] = if a.is_visible() { a.colour().glyph() } else { ' ' };
            }
        }
        for f in &self.floating {
            if f.y >= 0 {
                rows[f.y as usize][f.x] = '*';
            }
        }
        if let Some(pair) = self.falling {
            let (sx, sy) = pair.satellite_pos();
            for (id, x, y) in [(pair.main, pair.x, pair.y), (pair.satellite, sx, sy)] {
                let Some(a) = self.arena.get(id) else {
                    continue;
                };
                if checked_index(x, y).is_some() {
                    rows[y as usize][x as usize] = a.colour().glyph().to_ascii_lowercase();
                }
            }
        }

        let mut s = format!(
            "score={} chain={} ghosts={} state={:?}\n",
            self.score, self.max_step_chain, self.waiting_ghosts, self.state
        );
        for row in rows {
            s.push('|');
            s.extend(row);
            s.push_str("|\n");
        }
        s.push('+');
        s.push_str(&"-".repeat(GRID_WIDTH));
        s.push_str("+\n");
        s
    }
}

impl PairSink for Grid {
    /// Buffers the pair; the fourth buffered pair starts the game.
    fn add_new_pair(&mut self, main: Colour, satellite: Colour) {
        let m = self.arena.insert(Amoeba::new(main));
        let s = self.arena.insert(Amoeba::new(satellite));
        self.backlog.push_back((m, s));

        if self.state != GridState::AwaitingInitialFill || self.backlog.len() < INITIAL_PAIRS {
            return;
        }
        let Some(first) = self.backlog.pop_front() else {
            return;
        };
        for _ in 0..QUEUE_LEN {
            if let Some(p) = self.backlog.pop_front() {
                self.queue.push_back(p);
            }
        }
        self.spawn(first);
    }
}
