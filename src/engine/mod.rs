//! Engine module: the 4x4 grid, directional shift/merge, tile spawning and
//! win/loss detection.
//!
//! - `Grid` is the plain value state with pure queries and `shifted`.
//! - `BoardEngine` owns a grid, the score and an RNG, and applies moves in place.
//! - Compaction and the direction transforms live in `ops`.

mod game;
mod ops;
pub mod state;

pub use game::BoardEngine;
pub use state::{
    Direction, Grid, InvalidExponent, ParseDirectionError, Tile, FOUR_ONE_IN, MAX_EXPONENT, SIZE,
    WIN_EXPONENT,
};
