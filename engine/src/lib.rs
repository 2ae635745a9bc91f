// engine/src/lib.rs
#![forbid(unsafe_code)]

pub mod engine;
pub mod policy;
pub mod session;

// Re-export the bits most callers need:
pub use engine::{Colour, Command, Grid, GridConfig, GridState, GridStatus, Move, PairGenerator};
pub use policy::{AiKind, AiPlayer, Controller};
pub use session::{Match, MatchOutcome, Side};
