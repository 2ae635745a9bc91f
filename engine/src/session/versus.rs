// engine/src/session/versus.rs
#![forbid(unsafe_code)]

use log::{debug, info};

use crate::engine::{ConfigError, Grid, GridConfig, PairGenerator, PairSink, INITIAL_PAIRS};
use crate::policy::Controller;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    #[inline]
    fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchOutcome {
    InProgress,
    Winner(Side),
    /// Both grids filled on the same tick.
    Draw,
}

/**
 * Two grids fed by one pair generator, exchanging ghosts.
 *
 * Both grids always see the same pair sequence. A pair is generated for every grid whenever
 * one of them brings a falling pair into play that no grid had reached before, so each
 * backlog stays stocked without the leader running dry.
 */
pub struct Match {
    grids: [Grid; 2],
    controllers: [Box<dyn Controller>; 2],
    generator: PairGenerator,
    lead_serial: u64,
    outcome: MatchOutcome,
    ticks: u64,
    elapsed_ms: u64,
    ghosts_sent: [u64; 2],
}

impl Match {
    pub fn new(
        seed: u64,
        left: Box<dyn Controller>,
        right: Box<dyn Controller>,
        config: GridConfig,
    ) -> Result<Self, ConfigError> {
        let mut grids = [
            Grid::with_config(config, seed.wrapping_add(1))?,
            Grid::with_config(config, seed.wrapping_add(2))?,
        ];
        let mut generator = PairGenerator::new(seed);
        {
            let [l, r] = &mut grids;
            let mut sinks: [&mut dyn PairSink; 2] = [l, r];
            generator.generate(INITIAL_PAIRS, &mut sinks);
        }

        Ok(Self {
            grids,
            controllers: [left, right],
            generator,
            lead_serial: 0,
            outcome: MatchOutcome::InProgress,
            ticks: 0,
            elapsed_ms: 0,
            ghosts_sent: [0; 2],
        })
    }

    pub fn update(&mut self, elapsed_ms: u32) -> MatchOutcome {
        if self.outcome != MatchOutcome::InProgress {
            return self.outcome;
        }
        self.ticks += 1;
        self.elapsed_ms += u64::from(elapsed_ms);

        for (controller, grid) in self.controllers.iter_mut().zip(self.grids.iter_mut()) {
            controller.update(elapsed_ms, grid);
            grid.update(elapsed_ms);
        }

        for side in Side::BOTH {
            let sent = self.grids[side.index()].take_opponent_ghosts();
            if sent > 0 {
                debug!("{:?} sends {} ghosts", side, sent);
                self.ghosts_sent[side.index()] += u64::from(sent);
                self.grids[side.opponent().index()].increment_waiting_ghosts(sent);
            }
        }

        let lead = self
            .grids
            .iter()
            .map(Grid::falling_pair_serial)
            .max()
            .unwrap_or(0);
        if lead > self.lead_serial {
            let [l, r] = &mut self.grids;
            let mut sinks: [&mut dyn PairSink; 2] = [l, r];
            self.generator
                .generate((lead - self.lead_serial) as usize, &mut sinks);
            self.lead_serial = lead;
        }

        self.outcome = match (self.grids[0].is_filled(), self.grids[1].is_filled()) {
            (true, true) => MatchOutcome::Draw,
            (true, false) => MatchOutcome::Winner(Side::Right),
            (false, true) => MatchOutcome::Winner(Side::Left),
            (false, false) => MatchOutcome::InProgress,
        };
        if self.outcome != MatchOutcome::InProgress {
            info!(
                "match over after {} ticks: {:?} (scores {} / {})",
                self.ticks,
                self.outcome,
                self.grids[0].score(),
                self.grids[1].score()
            );
        }
        self.outcome
    }

    #[inline]
    pub fn grid(&self, side: Side) -> &Grid {
        &self.grids[side.index()]
    }

    /// Direct grid access for fixtures and scripted play.
    #[inline]
    pub fn grid_mut(&mut self, side: Side) -> &mut Grid {
        &mut self.grids[side.index()]
    }

    pub fn controller_name(&self, side: Side) -> String {
        self.controllers[side.index()].name()
    }

    #[inline]
    pub fn outcome(&self) -> MatchOutcome {
        self.outcome
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    #[inline]
    pub fn ghosts_sent(&self, side: Side) -> u64 {
        self.ghosts_sent[side.index()]
    }

    #[inline]
    pub fn generated_pairs(&self) -> u64 {
        self.generator.generated()
    }
}
