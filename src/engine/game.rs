use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, trace};

use super::state::{Direction, Grid, Tile, WIN_EXPONENT};

/// One game of 2048: the grid, the running score and the tile generator.
///
/// The engine is mutated in place by [`BoardEngine::shift`]. A new game is a
/// new engine; there is no in-place reset.
///
/// ```
/// use engine_2048::engine::{BoardEngine, Direction};
/// let mut game = BoardEngine::from_seed(42);
/// assert_eq!(game.grid().count_empty(), 14);
/// game.shift(Direction::Left);
/// assert!(!game.check_lost());
/// ```
#[derive(Debug, Clone)]
pub struct BoardEngine<R = StdRng> {
    grid: Grid,
    previous: Grid,
    score: u64,
    rng: R,
}

impl BoardEngine<StdRng> {
    /// Start a game with an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Start a reproducible game.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for BoardEngine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> BoardEngine<R> {
    /// Start a game drawing every random choice from `rng`: two tiles on an empty grid.
    pub fn with_rng(mut rng: R) -> Self {
        let mut grid = Grid::EMPTY;
        grid.spawn_random_tile(&mut rng);
        grid.spawn_random_tile(&mut rng);
        debug!(?grid, "new game");
        Self { grid, previous: grid, score: 0, rng }
    }

    /// Adopt an existing position with a zero score. Nothing is spawned.
    pub fn with_grid(grid: Grid, rng: R) -> Self {
        Self { grid, previous: grid, score: 0, rng }
    }

    /// Slide and merge toward `direction`, then spawn one tile if the board changed.
    ///
    /// A move that changes nothing is silent: no spawn, no score, no error.
    pub fn shift(&mut self, direction: Direction) {
        let before = self.grid;
        let (after, gained) = before.shifted(direction);
        if after == before {
            trace!(%direction, "no-op shift");
            return;
        }
        self.previous = before;
        self.grid = after;
        self.score += gained;
        let spawned = self.grid.spawn_random_tile(&mut self.rng);
        debug!(%direction, gained, score = self.score, ?spawned, "shift");
    }

    /// True once any cell holds a 2048 tile. Play may continue.
    pub fn check_won(&self) -> bool {
        self.grid.contains_exponent(WIN_EXPONENT)
    }

    /// True when the grid is full and no two neighbouring tiles match.
    ///
    /// An empty cell anywhere means a move is still possible.
    pub fn check_lost(&self) -> bool {
        self.grid.is_full() && !self.grid.has_adjacent_pair()
    }
}

impl<R> BoardEngine<R> {
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The grid as it was before the last move that changed the board.
    #[inline]
    pub fn previous(&self) -> &Grid {
        &self.previous
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Highest tile on the board.
    #[inline]
    pub fn highest_tile(&self) -> Option<Tile> {
        self.grid.max_tile()
    }
}
