// amoebax_cli/src/rollout/stats.rs
#![forbid(unsafe_code)]

use std::time::Instant;

use amoebax_engine::{Match, MatchOutcome, Side};

use super::sinks::ReportRow;

#[derive(Clone, Debug)]
pub struct RolloutStats {
    pub matches_done: u64,
    /// Indexed by side: left, right.
    pub wins: [u64; 2],
    pub draws: u64,
    /// Matches stopped at the tick limit with both grids alive.
    pub timeouts: u64,

    pub ticks_sum: u64,
    pub ticks_max: u64,

    pub score_sum: [u64; 2],
    pub best_score: u64,
    pub best_chain: u32,
    pub ghosts_sent: [u64; 2],

    t0: Instant,
}

fn ratio(num: f64, den: u64) -> f64 {
    if den > 0 {
        num / den as f64
    } else {
        0.0
    }
}

fn slot(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
    }
}

impl RolloutStats {
    pub fn new() -> Self {
        Self {
            matches_done: 0,
            wins: [0; 2],
            draws: 0,
            timeouts: 0,
            ticks_sum: 0,
            ticks_max: 0,
            score_sum: [0; 2],
            best_score: 0,
            best_chain: 0,
            ghosts_sent: [0; 2],
            t0: Instant::now(),
        }
    }

    /// Call once per finished (or abandoned) match.
    pub fn on_match_end(&mut self, m: &Match) {
        self.matches_done += 1;
        match m.outcome() {
            MatchOutcome::Winner(side) => self.wins[slot(side)] += 1,
            MatchOutcome::Draw => self.draws += 1,
            MatchOutcome::InProgress => self.timeouts += 1,
        }

        self.ticks_sum += m.ticks();
        self.ticks_max = self.ticks_max.max(m.ticks());

        for side in Side::BOTH {
            let g = m.grid(side);
            self.score_sum[slot(side)] += g.score();
            self.best_score = self.best_score.max(g.score());
            self.best_chain = self.best_chain.max(g.max_step_chain());
            self.ghosts_sent[slot(side)] += m.ghosts_sent(side);
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.t0.elapsed().as_secs_f64()
    }

    pub fn matches_per_sec(&self) -> f64 {
        let dt = self.elapsed_secs();
        if dt > 0.0 {
            self.matches_done as f64 / dt
        } else {
            0.0
        }
    }

    pub fn avg_ticks(&self) -> f64 {
        ratio(self.ticks_sum as f64, self.matches_done)
    }

    pub fn avg_score(&self, side: Side) -> f64 {
        ratio(self.score_sum[slot(side)] as f64, self.matches_done)
    }

    pub fn report_row(&self, matches_total: u64) -> ReportRow {
        ReportRow {
            matches_done: self.matches_done,
            matches_total,
            mps: self.matches_per_sec(),
            left_wins: self.wins[0],
            right_wins: self.wins[1],
            draws: self.draws,
            timeouts: self.timeouts,
            avg_ticks: self.avg_ticks(),
            avg_score_left: self.avg_score(Side::Left),
            avg_score_right: self.avg_score(Side::Right),
            best_chain: self.best_chain,
            ghosts_left: self.ghosts_sent[0],
            ghosts_right: self.ghosts_sent[1],
        }
    }

    pub fn live_msg(&self) -> String {
        format!(
            "m/s={:.2} L={} R={} draw={} t/o={} avgTicks={:.0} chain={}",
            self.matches_per_sec(),
            self.wins[0],
            self.wins[1],
            self.draws,
            self.timeouts,
            self.avg_ticks(),
            self.best_chain,
        )
    }

    pub fn final_report(&self, left: &str, right: &str) -> FinalReport {
        FinalReport {
            left: left.to_string(),
            right: right.to_string(),
            matches: self.matches_done,
            elapsed_s: self.elapsed_secs(),
            matches_per_s: self.matches_per_sec(),
            left_wins: self.wins[0],
            right_wins: self.wins[1],
            draws: self.draws,
            timeouts: self.timeouts,
            avg_ticks: self.avg_ticks(),
            max_ticks: self.ticks_max,
            avg_score_left: self.avg_score(Side::Left),
            avg_score_right: self.avg_score(Side::Right),
            best_score: self.best_score,
            best_chain: self.best_chain,
            ghosts_left: self.ghosts_sent[0],
            ghosts_right: self.ghosts_sent[1],
        }
    }
}

#[derive(Clone, Debug)]
pub struct FinalReport {
    pub left: String,
    pub right: String,

    pub matches: u64,
    pub elapsed_s: f64,
    pub matches_per_s: f64,

    pub left_wins: u64,
    pub right_wins: u64,
    pub draws: u64,
    pub timeouts: u64,

    pub avg_ticks: f64,
    pub max_ticks: u64,

    pub avg_score_left: f64,
    pub avg_score_right: f64,
    pub best_score: u64,
    pub best_chain: u32,

    pub ghosts_left: u64,
    pub ghosts_right: u64,
}
