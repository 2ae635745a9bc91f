// amoebax_cli/src/rollout/sinks.rs
#![forbid(unsafe_code)]

use indicatif::ProgressBar;

/// One periodic row emitted by the runner.
///
/// Transport struct: runner/stats compute fields, sinks only format/emit.
#[derive(Clone, Debug)]
pub struct ReportRow {
    pub matches_done: u64,
    pub matches_total: u64,
    pub mps: f64,

    pub left_wins: u64,
    pub right_wins: u64,
    pub draws: u64,
    pub timeouts: u64,

    pub avg_ticks: f64,
    pub avg_score_left: f64,
    pub avg_score_right: f64,

    /// Longest chain seen on either side so far.
    pub best_chain: u32,
    pub ghosts_left: u64,
    pub ghosts_right: u64,
}

/// Sink interface for periodic reporting.
pub trait RolloutSink {
    fn on_report_row(&mut self, row: &ReportRow, pb: Option<&ProgressBar>);
}

#[derive(Default)]
pub struct NoopSink;

impl RolloutSink for NoopSink {
    fn on_report_row(&mut self, _row: &ReportRow, _pb: Option<&ProgressBar>) {}
}

/// Human-readable periodic table sink.
///
/// Cadence (every N matches) is handled by Runner. This sink prints whenever called.
pub struct TableSink {
    header_every: u64,
    rows_printed: u64,
}

impl TableSink {
    const DEFAULT_HEADER_EVERY: u64 = 20;

    /// If `header_every == 0`, a reasonable default is used.
    pub fn new(header_every: u64) -> Self {
        Self {
            header_every: if header_every == 0 {
                Self::DEFAULT_HEADER_EVERY
            } else {
                header_every
            },
            rows_printed: 0,
        }
    }

    fn header_line(&self) -> String {
        // Keep widths aligned with row_line().
        format!(
            "{:>15} {:>8} {:>6} {:>6} {:>6} {:>6} {:>9} {:>9} {:>9} {:>6} {:>8} {:>8}",
            "match/total",
            "m/s",
            "L",
            "R",
            "draw",
            "t/o",
            "avgTicks",
            "scoreL",
            "scoreR",
            "chain",
            "ghostsL",
            "ghostsR",
        )
    }

    fn sep_line(&self) -> String {
        "-".repeat(self.header_line().len())
    }

    fn row_line(&self, r: &ReportRow) -> String {
        format!(
            "{:>7}/{:<7} {:>8.2} {:>6} {:>6} {:>6} {:>6} {:>9.1} {:>9.1} {:>9.1} {:>6} {:>8} {:>8}",
            r.matches_done,
            r.matches_total,
            r.mps,
            r.left_wins,
            r.right_wins,
            r.draws,
            r.timeouts,
            r.avg_ticks,
            r.avg_score_left,
            r.avg_score_right,
            r.best_chain,
            r.ghosts_left,
            r.ghosts_right,
        )
    }
}

impl RolloutSink for TableSink {
    fn on_report_row(&mut self, row: &ReportRow, pb: Option<&ProgressBar>) {
        let mut lines: Vec<String> = Vec::new();

        if self.rows_printed % self.header_every == 0 {
            lines.push(self.header_line());
            lines.push(self.sep_line());
        }

        lines.push(self.row_line(row));
        self.rows_printed += 1;

        match pb {
            Some(pb) => lines.into_iter().for_each(|l| pb.println(l)),
            None => lines.into_iter().for_each(|l| println!("{l}")),
        }
    }
}
