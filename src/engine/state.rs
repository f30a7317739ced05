use rand::Rng;
use std::fmt;
use std::str::FromStr;

use super::ops;
use serde::{Deserialize, Serialize};

/// Side length of the (square) board.
pub const SIZE: usize = 4;

/// Exponent of the winning tile: 2^11 = 2048.
pub const WIN_EXPONENT: u8 = 11;

/// Highest exponent a tile can hold: sixteen cells fed with fours top out at 2^17.
pub const MAX_EXPONENT: u8 = 17;

/// A spawned tile is a four once in `FOUR_ONE_IN` draws, otherwise a two.
pub const FOUR_ONE_IN: u32 = 10;

pub(crate) type Row = [Option<Tile>; SIZE];
pub(crate) type Cells = [Row; SIZE];

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Map one of the `w a s d` keys (any case) to a direction.
    pub fn from_key(key: char) -> Option<Direction> {
        match key.to_ascii_lowercase() {
            'w' => Some(Direction::Up),
            'a' => Some(Direction::Left),
            's' => Some(Direction::Down),
            'd' => Some(Direction::Right),
            _ => None,
        }
    }

    /// Parse a key string such as `"wwasd"` into a move list. Whitespace is skipped.
    ///
    /// ```
    /// use engine_2048::engine::Direction;
    /// let moves = Direction::parse_sequence("w a\ns d").unwrap();
    /// assert_eq!(moves, vec![Direction::Up, Direction::Left, Direction::Down, Direction::Right]);
    /// ```
    pub fn parse_sequence(keys: &str) -> Result<Vec<Direction>, ParseDirectionError> {
        keys.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| Direction::from_key(c).ok_or_else(|| ParseDirectionError(c.to_string())))
            .collect()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        };
        f.write_str(name)
    }
}

/// Returned when a token names no direction.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown direction {0:?} (expected up/down/left/right or w/a/s/d)")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "w" => Ok(Direction::Up),
            "down" | "s" => Ok(Direction::Down),
            "left" | "a" => Ok(Direction::Left),
            "right" | "d" => Ok(Direction::Right),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// A tile stored as its exponent: `pow` 1 is a 2, `pow` 11 is 2048.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tile {
    pow: u8,
}

/// Returned when an exponent cannot be a tile.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidExponent {
    #[error("tile exponent must be at least 1")]
    Zero,
    #[error("tile exponent {0} exceeds the maximum of {MAX_EXPONENT}")]
    OutOfRange(u8),
}

impl Tile {
    pub const TWO: Tile = Tile { pow: 1 };
    pub const FOUR: Tile = Tile { pow: 2 };

    /// Build a tile from its exponent.
    ///
    /// Panics unless `1 <= pow <= MAX_EXPONENT`; use `Tile::try_from` for untrusted input.
    pub const fn new(pow: u8) -> Tile {
        assert!(pow >= 1, "tile exponent must be at least 1");
        assert!(pow <= MAX_EXPONENT, "tile exponent exceeds MAX_EXPONENT");
        Tile { pow }
    }

    #[inline]
    pub fn pow(self) -> u8 {
        self.pow
    }

    /// Displayed value, `2^pow`.
    #[inline]
    pub fn value(self) -> u64 {
        1u64 << self.pow
    }

    /// Whether this tile can still absorb an equal neighbour.
    #[inline]
    pub(crate) fn can_promote(self) -> bool {
        self.pow < MAX_EXPONENT
    }

    #[inline]
    pub(crate) fn promote(&mut self) {
        debug_assert!(self.can_promote());
        self.pow += 1;
    }
}

impl TryFrom<u8> for Tile {
    type Error = InvalidExponent;

    fn try_from(pow: u8) -> Result<Self, Self::Error> {
        match pow {
            0 => Err(InvalidExponent::Zero),
            p if p > MAX_EXPONENT => Err(InvalidExponent::OutOfRange(p)),
            p => Ok(Tile { pow: p }),
        }
    }
}

impl From<Tile> for u8 {
    fn from(t: Tile) -> Self {
        t.pow
    }
}

/// The 4x4 board: each cell is empty or holds one tile.
///
/// `Grid` is a plain value. Copying it copies every tile, so no two cells
/// (or two grids) ever share a tile.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Grid(pub(crate) Cells);

impl Grid {
    /// A constant empty grid.
    pub const EMPTY: Grid = Grid([[None; SIZE]; SIZE]);

    /// Build a grid from exponents, row-major; 0 marks an empty cell.
    ///
    /// Panics on an exponent above [`MAX_EXPONENT`]; see [`Grid::try_from_exponents`].
    ///
    /// ```
    /// use engine_2048::engine::Grid;
    /// let g = Grid::from_exponents([[1, 1, 2, 2], [0; 4], [0; 4], [0; 4]]);
    /// assert_eq!(g.count_empty(), 12);
    /// ```
    pub fn from_exponents(exps: [[u8; SIZE]; SIZE]) -> Self {
        match Grid::try_from_exponents(exps) {
            Ok(grid) => grid,
            Err(e) => panic!("{e}"),
        }
    }

    /// Like [`Grid::from_exponents`], rejecting exponents above [`MAX_EXPONENT`].
    pub fn try_from_exponents(exps: [[u8; SIZE]; SIZE]) -> Result<Self, InvalidExponent> {
        let mut cells = [[None; SIZE]; SIZE];
        for (r, row) in exps.iter().enumerate() {
            for (c, &pow) in row.iter().enumerate() {
                cells[r][c] = match Tile::try_from(pow) {
                    Ok(tile) => Some(tile),
                    Err(InvalidExponent::Zero) => None,
                    Err(e) => return Err(e),
                };
            }
        }
        Ok(Grid(cells))
    }

    /// Inverse of [`Grid::from_exponents`].
    pub fn to_exponents(&self) -> [[u8; SIZE]; SIZE] {
        let mut exps = [[0u8; SIZE]; SIZE];
        for (r, row) in self.0.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                exps[r][c] = cell.map_or(0, Tile::pow);
            }
        }
        exps
    }

    /// Tile at `(row, col)`. Panics when out of range, like slice indexing.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        self.0[row][col]
    }

    /// Borrow the rows.
    #[inline]
    pub fn rows(&self) -> &[[Option<Tile>; SIZE]; SIZE] {
        &self.0
    }

    /// Iterate over cells in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = Option<Tile>> + '_ {
        self.0.iter().flat_map(|row| row.iter().copied())
    }

    /// Count the number of empty cells.
    pub fn count_empty(&self) -> usize {
        self.tiles().filter(Option::is_none).count()
    }

    /// True when every cell holds a tile.
    pub fn is_full(&self) -> bool {
        self.tiles().all(|t| t.is_some())
    }

    /// True if two 4-neighbour cells hold tiles of equal exponent that can still merge.
    pub fn has_adjacent_pair(&self) -> bool {
        for r in 0..SIZE {
            for c in 0..SIZE {
                let Some(tile) = self.0[r][c] else { continue };
                if !tile.can_promote() {
                    continue;
                }
                if c + 1 < SIZE && self.0[r][c + 1] == Some(tile) {
                    return true;
                }
                if r + 1 < SIZE && self.0[r + 1][c] == Some(tile) {
                    return true;
                }
            }
        }
        false
    }

    /// True if any cell holds a tile with exponent `pow`.
    pub fn contains_exponent(&self, pow: u8) -> bool {
        self.tiles().flatten().any(|t| t.pow() == pow)
    }

    /// Highest tile on the grid, if any.
    pub fn max_tile(&self) -> Option<Tile> {
        self.tiles().flatten().max()
    }

    /// Return the grid after sliding/merging in `direction` (no random insert),
    /// together with the points those merges earn.
    ///
    /// ```
    /// use engine_2048::engine::{Direction, Grid};
    /// let g = Grid::from_exponents([[1, 1, 2, 2], [0; 4], [0; 4], [0; 4]]);
    /// let (moved, gained) = g.shifted(Direction::Left);
    /// assert_eq!(moved.to_exponents()[0], [2, 3, 0, 0]);
    /// assert_eq!(gained, 12);
    /// ```
    pub fn shifted(&self, direction: Direction) -> (Grid, u64) {
        let mut cells = self.0;
        let gained = ops::shift_cells(&mut cells, direction);
        (Grid(cells), gained)
    }

    /// Insert a random 2 (90%) or 4 (10%) tile into a random empty cell, using the provided RNG.
    ///
    /// Returns the `(row, col)` that was filled, or `None` on a full grid.
    ///
    /// ```
    /// use engine_2048::engine::Grid;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let mut g = Grid::EMPTY;
    /// g.spawn_random_tile(&mut rng);
    /// g.spawn_random_tile(&mut rng);
    /// assert_eq!(g.count_empty(), 14);
    /// ```
    pub fn spawn_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(usize, usize)> {
        ops::spawn(&mut self.0, rng)
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({:?})", self.to_exponents())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for (r, row) in self.0.iter().enumerate() {
            if r > 0 {
                writeln!(f, "-------------------------------")?;
            }
            let cells: Vec<String> = row.iter().map(|cell| ops::format_val(*cell)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

impl TryFrom<[[u8; SIZE]; SIZE]> for Grid {
    type Error = InvalidExponent;

    fn try_from(exps: [[u8; SIZE]; SIZE]) -> Result<Self, Self::Error> {
        Grid::try_from_exponents(exps)
    }
}
