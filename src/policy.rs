//! Move sources for headless play.
//!
//! A policy looks at the grid and proposes the next direction; `None` ends the
//! game from the driver's point of view. Policies never touch the engine's RNG,
//! so an engine seed alone fixes where tiles spawn.

use std::convert::Infallible;

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{BoardEngine, Direction, Grid};

pub trait Policy {
    fn next_move(&mut self, grid: &Grid) -> Option<Direction>;
}

/// Directions that change `grid`, with the points each would earn.
pub fn legal_moves(grid: &Grid) -> Vec<(Direction, u64)> {
    Direction::ALL
        .iter()
        .filter_map(|&dir| {
            let (moved, gained) = grid.shifted(dir);
            (moved != *grid).then_some((dir, gained))
        })
        .collect()
}

/// Uniform choice among the moves that change the board.
#[derive(Debug, Clone)]
pub struct RandomPolicy<R = StdRng> {
    rng: R,
}

impl RandomPolicy<StdRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl<R: Rng> RandomPolicy<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Policy for RandomPolicy<R> {
    fn next_move(&mut self, grid: &Grid) -> Option<Direction> {
        legal_moves(grid).choose(&mut self.rng).map(|&(dir, _)| dir)
    }
}

/// Takes the move with the biggest immediate merge score; ties go to the
/// earliest direction in [`Direction::ALL`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPolicy;

impl Policy for GreedyPolicy {
    fn next_move(&mut self, grid: &Grid) -> Option<Direction> {
        let mut best: Option<(Direction, u64)> = None;
        for (dir, gained) in legal_moves(grid) {
            if best.map_or(true, |(_, g)| gained > g) {
                best = Some((dir, gained));
            }
        }
        best.map(|(dir, _)| dir)
    }
}

/// Replays a fixed list of moves, then stops.
#[derive(Debug, Clone)]
pub struct ScriptedPolicy {
    moves: std::vec::IntoIter<Direction>,
}

impl ScriptedPolicy {
    pub fn new(moves: Vec<Direction>) -> Self {
        Self { moves: moves.into_iter() }
    }
}

impl Policy for ScriptedPolicy {
    fn next_move(&mut self, _grid: &Grid) -> Option<Direction> {
        self.moves.next()
    }
}

/// Built-in policies selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Random,
    Greedy,
}

impl PolicyKind {
    /// Instantiate the policy; `seed` feeds the random policy's own RNG.
    pub fn build(self, seed: u64) -> Box<dyn Policy + Send> {
        match self {
            PolicyKind::Random => Box::new(RandomPolicy::from_seed(seed)),
            PolicyKind::Greedy => Box::new(GreedyPolicy),
        }
    }
}

/// Drive `engine` with `policy` until the game is lost, the policy gives up,
/// or `max_moves` moves have been made. Returns the number of moves made.
pub fn play_out<R: Rng, P: Policy + ?Sized>(
    engine: &mut BoardEngine<R>,
    policy: &mut P,
    max_moves: Option<u64>,
) -> u64 {
    let result = play_out_with(engine, policy, max_moves, |_, _, _| Ok::<(), Infallible>(()));
    match result {
        Ok(moves) => moves,
        Err(never) => match never {},
    }
}

/// [`play_out`] with a hook run after every move, given the engine, the move
/// and the number of moves made so far. An error from the hook ends the game
/// and is returned.
pub fn play_out_with<R, P, F, E>(
    engine: &mut BoardEngine<R>,
    policy: &mut P,
    max_moves: Option<u64>,
    mut on_move: F,
) -> Result<u64, E>
where
    R: Rng,
    P: Policy + ?Sized,
    F: FnMut(&BoardEngine<R>, Direction, u64) -> Result<(), E>,
{
    let mut moves = 0u64;
    while !engine.check_lost() && max_moves.map_or(true, |cap| moves < cap) {
        let Some(dir) = policy.next_move(engine.grid()) else { break };
        engine.shift(dir);
        moves += 1;
        on_move(engine, dir, moves)?;
    }
    debug!(moves, score = engine.score(), lost = engine.check_lost(), "game finished");
    Ok(moves)
}
