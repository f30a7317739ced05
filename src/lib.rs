//! engine-2048: the 2048 board-state engine
//!
//! This crate provides:
//! - A 4x4 `Grid` of exponent tiles with pure queries and `shifted` (`engine` module)
//! - `BoardEngine`, which owns a grid, the running score and a seedable RNG
//! - Simple move policies and a `play_out` driver (`policy` module)
//! - A file-backed best-score record for hosts that want one (`high_score` module)
//!
//! Quick start:
//! ```
//! use engine_2048::engine::{BoardEngine, Direction};
//!
//! // Deterministic game with a seeded RNG
//! let mut game = BoardEngine::from_seed(42);
//! game.shift(Direction::Left);
//! game.shift(Direction::Up);
//! assert!(!game.check_won());
//! println!("{}\nscore: {}", game.grid(), game.score());
//! ```
//!
//! Full loop with a built-in policy:
//! ```
//! use engine_2048::engine::BoardEngine;
//! use engine_2048::policy::{play_out, PolicyKind};
//!
//! let mut game = BoardEngine::from_seed(7);
//! let mut policy = PolicyKind::Greedy.build(7);
//! let moves = play_out(&mut game, policy.as_mut(), Some(10));
//! assert_eq!(moves, 10);
//! ```
//!
pub mod engine;
pub mod high_score;
pub mod policy;

/// Install the `tracing` subscriber used by the binaries: `RUST_LOG` filter
/// (default `info`), formatted to stderr.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}
