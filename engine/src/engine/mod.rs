// engine/src/engine/mod.rs
#![forbid(unsafe_code)]

mod amoeba;
mod arena;
mod command;
mod config;
mod constants;
mod generator;
mod grid;
mod groups;
mod labels;
mod level;
mod pair;
mod status;

/**
 * Curated engine public API.
 *
 * Internal implementation modules remain private; only stable items are re-exported here.
 */
pub use amoeba::{Amoeba, Colour, NeighbourState};
pub use arena::AmoebaId;
pub use command::Command;
pub use config::{ConfigError, GridConfig};
pub use constants::{
    chain_step_score, ghosts_for_score, FIRST_VISIBLE_HEIGHT, GRID_CELLS, GRID_HEIGHT, GRID_WIDTH,
    INITIAL_PAIRS, MAX_WAITING_GHOSTS, MIN_GROUP_SIZE, OVERFLOW_COLUMN, OVERFLOW_ROW, QUEUE_LEN,
    SPAWN_COLUMN, SPAWN_ROW, VISIBLE_HEIGHT,
};
pub use generator::{PairGenerator, PairSink};
pub use grid::{AmoebaView, GhostIcons, Grid, GridState, GHOSTS_PER_BIG_ICON, SILHOUETTE_FRAMES};
pub use labels::ChainLabel;
pub use level::{Level, LevelTable};
pub use pair::{FallingPairView, Move, Orientation};
pub use status::{GridStatus, PositionResult, StatusParseError};
