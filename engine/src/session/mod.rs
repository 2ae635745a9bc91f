// engine/src/session/mod.rs
#![forbid(unsafe_code)]

mod training;
mod versus;

pub use training::Training;
pub use versus::{Match, MatchOutcome, Side};
