// amoebax_cli/src/main.rs
#![forbid(unsafe_code)]

mod config;
mod rollout;

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;

use amoebax_engine::{AiKind, GridConfig};

use crate::config::FileConfig;
use crate::rollout::{NoopSink, RolloutSink, Runner, RunnerConfig, TableSink};

#[derive(Parser, Debug)]
#[command(name = "amoebax_cli")]
struct Args {
    // ---------------- rollout sizing ----------------
    /// Matches to play.
    #[arg(long, default_value_t = 20)]
    matches: u64,

    /// Base RNG seed (match i uses base_seed + i). If omitted, a fixed default is used.
    #[arg(long)]
    seed: Option<u64>,

    /// Left player: dumb | simple | simple-full | anticipatory | anticipatory-2 | advanced
    #[arg(long)]
    left: Option<String>,

    /// Right player, same choices as --left.
    #[arg(long)]
    right: Option<String>,

    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 16)]
    tick_ms: u32,

    /// Ticks after which a running match is abandoned as a timeout.
    #[arg(long, default_value_t = 200_000)]
    max_ticks: u64,

    /// Zero-length animations (only outcomes matter; much faster rollouts).
    #[arg(long)]
    instant: bool,

    /// TOML file with [grid] timing overrides and [players] defaults.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    // ---------------- visualization ----------------
    /**
     * Render both boards as ASCII every tick; value is sleep in ms (e.g. 16).
     * Omit to disable rendering.
     */
    #[arg(long, value_name = "ms")]
    render: Option<u64>,

    // ---------------- output / reporting ----------------
    /// Verbosity: 0=silent (final summary only), 1=progress bar, 2=progress bar + periodic table.
    #[arg(long, default_value_t = 1)]
    verbosity: u8,

    /// Print a table row every N matches (only used with --verbosity 2).
    #[arg(long, default_value_t = 5)]
    report_every: u64,
}

fn parse_kind(value: &str, side: &str) -> Result<AiKind> {
    value
        .parse::<AiKind>()
        .with_context(|| format!("--{side} {value:?}"))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    ensure!(args.tick_ms > 0, "--tick-ms must be > 0");

    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    // Flags win over the file; the file wins over built-in defaults.
    let left = args
        .left
        .as_deref()
        .or(file.players.left.as_deref())
        .unwrap_or("advanced");
    let right = args
        .right
        .as_deref()
        .or(file.players.right.as_deref())
        .unwrap_or("simple");

    let grid = if args.instant {
        GridConfig::instant()
    } else {
        file.grid
    };

    let cfg = RunnerConfig {
        matches: args.matches,
        base_seed: args.seed.unwrap_or(12345),
        left: parse_kind(left, "left")?,
        right: parse_kind(right, "right")?,
        grid,
        tick_ms: args.tick_ms,
        max_ticks: args.max_ticks,
        verbosity: args.verbosity,
        report_every: args.report_every,
        render_ms: args.render,
    };

    let sink: Box<dyn RolloutSink> = if cfg.verbosity >= 2 && cfg.report_every > 0 {
        Box::new(TableSink::new(20))
    } else {
        Box::new(NoopSink)
    };

    let mut runner = Runner::new(cfg, sink);
    let report = runner.run()?;

    // Final one-line summary (useful for logs / grep).
    println!(
        "DONE: left={} right={} matches={} elapsed={:.3}s matches/s={:.2} left_wins={} right_wins={} draws={} timeouts={} avg_ticks={:.1} max_ticks={} avg_score_left={:.1} avg_score_right={:.1} best_score={} best_chain={} ghosts_left={} ghosts_right={}",
        report.left,
        report.right,
        report.matches,
        report.elapsed_s,
        report.matches_per_s,
        report.left_wins,
        report.right_wins,
        report.draws,
        report.timeouts,
        report.avg_ticks,
        report.max_ticks,
        report.avg_score_left,
        report.avg_score_right,
        report.best_score,
        report.best_chain,
        report.ghosts_left,
        report.ghosts_right,
    );
    Ok(())
}
