// engine/src/session/training.rs
#![forbid(unsafe_code)]

use log::{debug, info};
use rand::prelude::*;

use crate::engine::{
    ConfigError, Grid, GridConfig, Level, LevelTable, PairGenerator, PairSink, INITIAL_PAIRS,
};
use crate::policy::Controller;

/// Single-grid practice: speed follows the level, the level follows the score, and random
/// ghost drops stand in for an opponent.
pub struct Training {
    grid: Grid,
    controller: Box<dyn Controller>,
    generator: PairGenerator,
    levels: LevelTable,
    level: usize,
    // Ghost injection.
    rng: StdRng,
    ticks: u64,
    ghosts_injected: u64,
    ghosts_sent: u64,
}

impl Training {
    pub fn new(
        seed: u64,
        controller: Box<dyn Controller>,
        config: GridConfig,
    ) -> Result<Self, ConfigError> {
        let mut grid = Grid::with_config(config, seed.wrapping_add(1))?;
        let mut generator = PairGenerator::new(seed);
        generator.generate(INITIAL_PAIRS, &mut [&mut grid as &mut dyn PairSink]);

        let levels = LevelTable::default();
        grid.set_falling_time_ms(levels.get(0).falling_time_ms);

        Ok(Self {
            grid,
            controller,
            generator,
            levels,
            level: 0,
            rng: StdRng::seed_from_u64(seed.wrapping_add(2)),
            ticks: 0,
            ghosts_injected: 0,
            ghosts_sent: 0,
        })
    }

    /// Returns false once the grid is filled.
    pub fn update(&mut self, elapsed_ms: u32) -> bool {
        if self.grid.is_filled() {
            return false;
        }
        self.ticks += 1;
        self.controller.update(elapsed_ms, &mut self.grid);
        self.grid.update(elapsed_ms);
        self.ghosts_sent += u64::from(self.grid.take_opponent_ghosts());

        if self.grid.has_new_falling_pair() {
            self.generator
                .generate(1, &mut [&mut self.grid as &mut dyn PairSink]);
            self.advance_level();
            self.inject_ghosts();
        }

        if self.grid.is_filled() {
            info!(
                "training over: level={} score={} ticks={}",
                self.level + 1,
                self.grid.score(),
                self.ticks
            );
            return false;
        }
        true
    }

    fn advance_level(&mut self) {
        let reached = self.levels.index_for_score(self.grid.score());
        if reached <= self.level {
            return;
        }
        self.level = reached;
        let level = self.levels.get(reached);
        info!("level {} (falling {}ms)", reached + 1, level.falling_time_ms);
        self.grid.set_falling_time_ms(level.falling_time_ms);
    }

    fn inject_ghosts(&mut self) {
        let level = self.current_level();
        if level.max_ghosts == 0 || !self.rng.gen_bool(f64::from(level.ghost_probability)) {
            return;
        }
        let n = self.rng.gen_range(level.min_ghosts..=level.max_ghosts);
        debug!("training injects {} ghosts", n);
        self.ghosts_injected += u64::from(n);
        self.grid.increment_waiting_ghosts(n);
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// 0-based.
    #[inline]
    pub fn level_index(&self) -> usize {
        self.level
    }

    pub fn current_level(&self) -> Level {
        self.levels.get(self.level)
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn ghosts_injected(&self) -> u64 {
        self.ghosts_injected
    }

    #[inline]
    pub fn ghosts_sent(&self) -> u64 {
        self.ghosts_sent
    }
}
