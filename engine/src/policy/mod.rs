// engine/src/policy/mod.rs
#![forbid(unsafe_code)]

mod base;
mod human;
mod player;
mod score;
mod search;
mod variants;

/**
 * Curated policy public API.
 *
 * Internal implementation modules remain private; only stable policy entrypoints are re-exported.
 */
pub use base::Controller;
pub use human::{HumanController, Key, KeyEvent};
pub use player::{AiPlayer, AiState};
pub use score::{advanced_score, first_step_score, in_danger, simple_score, DANGER_HEIGHT, FILLED_PENALTY};
pub use search::{find_best_move, is_reachable};
pub use variants::{
    Aggressivity, AiKind, AiPolicy, Anticipation, ParseAiKindError, ScoreFormula,
};
