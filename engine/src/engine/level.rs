// engine/src/engine/level.rs
#![forbid(unsafe_code)]

/// Difficulty parameters of one training level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Level {
    /// Fall time per half cell.
    pub falling_time_ms: u32,
    /// Chance of a ghost injection each time a new pair comes into play.
    pub ghost_probability: f32,
    /// Inclusive ghost count range of one injection.
    pub min_ghosts: u32,
    pub max_ghosts: u32,
    /// Score needed to reach this level.
    pub score_threshold: u64,
}

const fn level(
    falling_time_ms: u32,
    ghost_probability: f32,
    min_ghosts: u32,
    max_ghosts: u32,
    score_threshold: u64,
) -> Level {
    Level {
        falling_time_ms,
        ghost_probability,
        min_ghosts,
        max_ghosts,
        score_threshold,
    }
}

const DEFAULT_LEVELS: [Level; 10] = [
    level(200, 0.00, 0, 0, 0),
    level(180, 0.05, 1, 2, 500),
    level(165, 0.08, 1, 3, 1_500),
    level(150, 0.10, 1, 4, 3_000),
    level(135, 0.12, 2, 5, 5_000),
    level(120, 0.15, 2, 6, 8_000),
    level(105, 0.18, 3, 6, 12_000),
    level(90, 0.22, 3, 8, 17_000),
    level(75, 0.26, 4, 10, 23_000),
    level(60, 0.30, 6, 12, 30_000),
];

/// Score-ordered levels; the first level always starts at score 0.
#[derive(Clone, Debug)]
pub struct LevelTable {
    levels: Vec<Level>,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self {
            levels: DEFAULT_LEVELS.to_vec(),
        }
    }
}

impl LevelTable {
    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// 0-based index; clamped to the last level.
    pub fn get(&self, index: usize) -> Level {
        self.levels[index.min(self.levels.len() - 1)]
    }

    /// Highest level whose threshold `score` has reached.
    pub fn index_for_score(&self, score: u64) -> usize {
        self.levels
            .iter()
            .rposition(|l| score >= l.score_threshold)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_monotonic() {
        let t = LevelTable::default();
        assert_eq!(t.len(), 10);
        for w in DEFAULT_LEVELS.windows(2) {
            assert!(w[0].score_threshold < w[1].score_threshold);
            assert!(w[0].falling_time_ms > w[1].falling_time_ms);
            assert!(w[1].min_ghosts <= w[1].max_ghosts);
        }
    }

    #[test]
    fn score_maps_to_level() {
        let t = LevelTable::default();
        assert_eq!(t.index_for_score(0), 0);
        assert_eq!(t.index_for_score(499), 0);
        assert_eq!(t.index_for_score(500), 1);
        assert_eq!(t.index_for_score(u64::MAX), 9);
        assert_eq!(t.get(42).falling_time_ms, 60);
    }
}
