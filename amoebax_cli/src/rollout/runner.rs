// amoebax_cli/src/rollout/runner.rs
#![forbid(unsafe_code)]

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use amoebax_engine::{AiKind, AiPlayer, GridConfig, Match, MatchOutcome, Side};

use super::sinks::RolloutSink;
use super::stats::{FinalReport, RolloutStats};

/// Fixed internal cadence (in ticks) for progress-bar live message updates.
const LIVE_EVERY: u64 = 2_000;

#[derive(Clone, Debug)]
pub struct RunnerConfig {
    // ---------------- core rollout ----------------
    pub matches: u64,
    /// Base seed; match `i` uses base_seed + i.
    pub base_seed: u64,
    pub left: AiKind,
    pub right: AiKind,
    pub grid: GridConfig,

    /// Simulated milliseconds per tick.
    pub tick_ms: u32,
    /// A match still running after this many ticks counts as a timeout.
    pub max_ticks: u64,

    // ---------------- output ----------------
    /// 0 = final summary only
    /// 1 = progress bar
    /// 2 = progress bar + periodic table (via sink)
    pub verbosity: u8,
    /// Table row every N matches (verbosity 2 only). 0 disables it.
    pub report_every: u64,

    // ---------------- rendering ----------------
    /// If Some(ms): render both boards every tick; sleep ms between frames (0 = no sleep).
    pub render_ms: Option<u64>,
}

pub struct Runner {
    cfg: RunnerConfig,
    sink: Box<dyn RolloutSink>,
}

fn render(m: &Match) -> String {
    let left = m.grid(Side::Left).render_ascii();
    let right = m.grid(Side::Right).render_ascii();
    let mut out = format!(
        "tick={} score {} / {} ghosts waiting {} / {}\n",
        m.ticks(),
        m.grid(Side::Left).score(),
        m.grid(Side::Right).score(),
        m.grid(Side::Left).waiting_ghosts(),
        m.grid(Side::Right).waiting_ghosts(),
    );
    for (l, r) in left.lines().zip(right.lines()) {
        out.push_str(l);
        out.push_str("    ");
        out.push_str(r);
        out.push('\n');
    }
    out
}

impl Runner {
    pub fn new(cfg: RunnerConfig, sink: Box<dyn RolloutSink>) -> Self {
        Self { cfg, sink }
    }

    fn new_match(&self, match_id: u64) -> Result<Match> {
        let seed = self.cfg.base_seed.wrapping_add(match_id);
        // Players get their own streams so swapping sides does not replay the same jitter.
        let left = AiPlayer::new(self.cfg.left, seed.wrapping_mul(31).wrapping_add(1));
        let right = AiPlayer::new(self.cfg.right, seed.wrapping_mul(31).wrapping_add(2));
        Match::new(seed, Box::new(left), Box::new(right), self.cfg.grid)
            .with_context(|| format!("creating match {match_id}"))
    }

    pub fn run(&mut self) -> Result<FinalReport> {
        let cfg = self.cfg.clone();

        // Progress bar is UI only; runner logic does not depend on it.
        let pb = if cfg.verbosity >= 1 {
            let pb = ProgressBar::new(cfg.matches);
            pb.set_style(
                ProgressStyle::with_template(
                    "{bar:40.cyan/blue} {pos:>7}/{len:<7}  {percent:>3}%  {elapsed_precise}  {msg}",
                )
                .context("progress bar template")?
                .progress_chars("=>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut stats = RolloutStats::new();
        let mut total_ticks: u64 = 0;

        for match_id in 0..cfg.matches {
            let mut m = self.new_match(match_id)?;
            debug!(
                "match {} starts: {} vs {}",
                match_id,
                m.controller_name(Side::Left),
                m.controller_name(Side::Right)
            );

            while m.outcome() == MatchOutcome::InProgress && m.ticks() < cfg.max_ticks {
                m.update(cfg.tick_ms);
                total_ticks += 1;

                if let Some(ms) = cfg.render_ms {
                    print!("{}", render(&m));
                    if ms > 0 {
                        thread::sleep(Duration::from_millis(ms));
                    }
                }

                if total_ticks % LIVE_EVERY == 0 {
                    if let Some(ref pb) = pb {
                        pb.set_message(stats.live_msg());
                    }
                }
            }

            if m.outcome() == MatchOutcome::InProgress {
                info!("match {} hit the tick limit ({})", match_id, cfg.max_ticks);
            }
            stats.on_match_end(&m);

            if let Some(ref pb) = pb {
                pb.inc(1);
                pb.set_message(stats.live_msg());
            }

            if cfg.render_ms.is_some() {
                println!(
                    "=== match {} over: {:?} after {} ticks ===",
                    match_id,
                    m.outcome(),
                    m.ticks()
                );
            }

            if cfg.verbosity == 2
                && cfg.report_every > 0
                && stats.matches_done % cfg.report_every == 0
            {
                let row = stats.report_row(cfg.matches);
                self.sink.on_report_row(&row, pb.as_ref());
            }
        }

        if let Some(pb) = pb {
            pb.finish_with_message("done");
        }

        Ok(stats.final_report(&cfg.left.to_string(), &cfg.right.to_string()))
    }
}
