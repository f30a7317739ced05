use rand::Rng;
use tracing::trace;

use super::state::{Cells, Direction, Row, Tile, FOUR_ONE_IN, SIZE};

/// Slide/merge every row of `cells` toward `direction`, returning the points earned.
///
/// The board is reoriented so `direction` becomes `Left`, each row is compacted,
/// and the same transform is applied again to restore the original frame.
pub(crate) fn shift_cells(cells: &mut Cells, direction: Direction) -> u64 {
    reorient(cells, direction);
    let gained = cells.iter_mut().map(compress).sum();
    reorient(cells, direction);
    gained
}

/// Self-inverse transform mapping `direction` onto `Left`.
///
/// - `Up`: transpose about the main diagonal.
/// - `Down`: transpose about the anti-diagonal.
/// - `Right`: mirror every row.
/// - `Left`: identity.
pub(crate) fn reorient(cells: &mut Cells, direction: Direction) {
    match direction {
        Direction::Left => {}
        Direction::Up => {
            for r in 1..SIZE {
                for c in 0..r {
                    swap_cells(cells, (r, c), (c, r));
                }
            }
        }
        Direction::Down => {
            for r in 0..SIZE {
                for c in 0..(SIZE - 1 - r) {
                    swap_cells(cells, (r, c), (SIZE - 1 - c, SIZE - 1 - r));
                }
            }
        }
        Direction::Right => {
            for row in cells.iter_mut() {
                row.reverse();
            }
        }
    }
}

#[inline]
fn swap_cells(cells: &mut Cells, a: (usize, usize), b: (usize, usize)) {
    let tmp = cells[a.0][a.1];
    cells[a.0][a.1] = cells[b.0][b.1];
    cells[b.0][b.1] = tmp;
}

/// Remove the gaps between tiles, keeping their order.
pub(crate) fn shorten(row: &mut Row) {
    let mut write = 0;
    for read in 0..SIZE {
        if let Some(tile) = row[read].take() {
            row[write] = Some(tile);
            write += 1;
        }
    }
}

/// Compact a row toward index 0: shorten, merge equal neighbours once, shorten again.
///
/// A merged tile is never re-examined in the same pass, so `[2, 2, 2, 2]`
/// becomes `[4, 4, _, _]`. Tiles at `MAX_EXPONENT` do not merge.
pub(crate) fn compress(row: &mut Row) -> u64 {
    shorten(row);
    let mut gained = 0;
    let mut i = 0;
    while i + 1 < SIZE {
        match (row[i], row[i + 1]) {
            (Some(mut left), Some(right)) if left == right && left.can_promote() => {
                left.promote();
                row[i] = Some(left);
                row[i + 1] = None;
                gained += left.value();
                i += 2;
            }
            _ => i += 1,
        }
    }
    shorten(row);
    gained
}

/// Fill the `n`-th empty cell (row-major) with a fresh tile, `n` uniform over the empty cells.
pub(crate) fn spawn<R: Rng + ?Sized>(cells: &mut Cells, rng: &mut R) -> Option<(usize, usize)> {
    let empty = cells.iter().flatten().filter(|c| c.is_none()).count();
    if empty == 0 {
        return None;
    }
    let index = rng.gen_range(0..empty);
    let tile = generate_random_tile(rng);
    let (r, c) = (0..SIZE * SIZE)
        .map(|i| (i / SIZE, i % SIZE))
        .filter(|&(r, c)| cells[r][c].is_none())
        .nth(index)?;
    cells[r][c] = Some(tile);
    trace!(row = r, col = c, pow = tile.pow(), "spawn");
    Some((r, c))
}

pub(crate) fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    if rng.gen_range(0..FOUR_ONE_IN) < FOUR_ONE_IN - 1 {
        Tile::TWO
    } else {
        Tile::FOUR
    }
}

pub(crate) fn format_val(cell: Option<Tile>) -> String {
    match cell {
        None => String::from("       "),
        Some(tile) => format!("{:^7}", tile.value()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::state::{Grid, MAX_EXPONENT};
    use rand::{rngs::StdRng, SeedableRng};

    fn row(exps: [u8; SIZE]) -> Row {
        exps.map(|p| Tile::try_from(p).ok())
    }

    fn exps(row: &Row) -> [u8; SIZE] {
        row.map(|c| c.map_or(0, Tile::pow))
    }

    fn random_cells(rng: &mut StdRng) -> Cells {
        let mut cells = [[None; SIZE]; SIZE];
        for cell in cells.iter_mut().flatten() {
            let pow: u8 = rng.gen_range(0..12);
            *cell = Tile::try_from(pow).ok();
        }
        cells
    }

    #[test]
    fn it_shorten() {
        let mut r = row([0, 1, 0, 2]);
        shorten(&mut r);
        assert_eq!(exps(&r), [1, 2, 0, 0]);
        let mut r = row([0, 0, 0, 0]);
        shorten(&mut r);
        assert_eq!(exps(&r), [0, 0, 0, 0]);
    }

    #[test]
    fn top_tiles_do_not_merge() {
        let top = MAX_EXPONENT;
        let mut r = row([top, top, 0, 0]);
        assert_eq!(compress(&mut r), 0);
        assert_eq!(exps(&r), [top, top, 0, 0]);

        let mut r = row([0, top - 1, top - 1, top]);
        assert_eq!(compress(&mut r), Tile::new(top).value());
        assert_eq!(exps(&r), [top, top, 0, 0]);
    }

    #[test]
    fn shifting_a_grid_of_top_tiles_is_a_no_op() {
        let grid = Grid::from_exponents([[MAX_EXPONENT; SIZE]; SIZE]);
        for dir in Direction::ALL {
            assert_eq!(grid.shifted(dir), (grid, 0), "{dir}");
        }
    }

    #[test]
    fn it_compress() {
        let cases: [([u8; 4], [u8; 4], u64); 7] = [
            ([0, 0, 0, 0], [0, 0, 0, 0], 0),
            ([1, 2, 1, 2], [1, 2, 1, 2], 0),
            ([1, 1, 2, 2], [2, 3, 0, 0], 4 + 8),
            ([1, 0, 0, 1], [2, 0, 0, 0], 4),
            ([1, 1, 1, 1], [2, 2, 0, 0], 8),
            ([0, 2, 2, 2], [3, 2, 0, 0], 8),
            ([3, 2, 2, 0], [3, 3, 0, 0], 8),
        ];
        for (input, expected, points) in cases {
            let mut r = row(input);
            assert_eq!(compress(&mut r), points, "points for {input:?}");
            assert_eq!(exps(&r), expected, "row for {input:?}");
        }
    }

    #[test]
    fn reorient_is_self_inverse() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let original = random_cells(&mut rng);
            for dir in Direction::ALL {
                let mut cells = original;
                reorient(&mut cells, dir);
                reorient(&mut cells, dir);
                assert_eq!(cells, original, "{dir} applied twice");
            }
        }
    }

    #[test]
    fn reorient_maps_cells() {
        let numbered = Grid::from_exponents([[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 14, 15, 0]]);

        let mut up = numbered.0;
        reorient(&mut up, Direction::Up);
        assert_eq!(Grid(up).to_exponents()[0], [1, 5, 9, 13]);

        let mut down = numbered.0;
        reorient(&mut down, Direction::Down);
        assert_eq!(Grid(down).to_exponents()[0], [0, 12, 8, 4]);

        let mut right = numbered.0;
        reorient(&mut right, Direction::Right);
        assert_eq!(Grid(right).to_exponents()[3], [0, 15, 14, 13]);
    }

    #[test]
    fn test_move_left() {
        let g = Grid::from_exponents([[1, 2, 3, 4], [1, 3, 3, 2], [2, 0, 0, 2], [1, 0, 0, 2]]);
        let (moved, _) = g.shifted(Direction::Left);
        assert_eq!(moved.to_exponents(), [[1, 2, 3, 4], [1, 4, 2, 0], [3, 0, 0, 0], [1, 2, 0, 0]]);
    }

    #[test]
    fn test_move_right() {
        let g = Grid::from_exponents([[1, 2, 3, 4], [1, 3, 3, 2], [2, 0, 0, 2], [1, 0, 0, 2]]);
        let (moved, _) = g.shifted(Direction::Right);
        assert_eq!(moved.to_exponents(), [[1, 2, 3, 4], [0, 1, 4, 2], [0, 0, 0, 3], [0, 0, 1, 2]]);
    }

    #[test]
    fn test_move_up() {
        let g = Grid::from_exponents([[1, 1, 2, 1], [2, 3, 0, 0], [3, 3, 0, 0], [4, 2, 2, 2]]);
        let (moved, gained) = g.shifted(Direction::Up);
        assert_eq!(moved.to_exponents(), [[1, 1, 3, 1], [2, 4, 0, 2], [3, 2, 0, 0], [4, 0, 0, 0]]);
        assert_eq!(gained, 16 + 8);
    }

    #[test]
    fn test_move_down() {
        let g = Grid::from_exponents([[1, 1, 2, 1], [2, 3, 0, 0], [3, 3, 0, 0], [4, 2, 2, 2]]);
        let (moved, _) = g.shifted(Direction::Down);
        assert_eq!(moved.to_exponents(), [[1, 0, 0, 0], [2, 1, 0, 0], [3, 4, 0, 1], [4, 2, 3, 2]]);
    }

    #[test]
    fn it_spawn_fills_every_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut cells = [[None; SIZE]; SIZE];
        for _ in 0..SIZE * SIZE {
            assert!(spawn(&mut cells, &mut rng).is_some());
        }
        assert!(cells.iter().flatten().all(|c| matches!(c.map(Tile::pow), Some(1 | 2))));
        assert_eq!(spawn(&mut cells, &mut rng), None);
    }

    #[test]
    fn spawn_lands_on_the_only_empty_cell() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut full = Grid::from_exponents([[3; 4]; 4]).0;
        full[2][1] = None;
        assert_eq!(spawn(&mut full, &mut rng), Some((2, 1)));
    }

    #[test]
    fn four_spawn_rate_is_about_ten_percent() {
        let mut rng = StdRng::seed_from_u64(2048);
        let n = 10_000;
        let fours = (0..n)
            .filter(|_| generate_random_tile(&mut rng) == Tile::FOUR)
            .count();
        let rate = fours as f64 / n as f64;
        assert!((rate - 0.1).abs() < 0.015, "four rate {rate}");
    }

    #[test]
    fn it_format_val() {
        assert_eq!(format_val(None), "       ");
        assert_eq!(format_val(Some(Tile::TWO)), "   2   ");
        assert_eq!(format_val(Some(Tile::new(11))), " 2048  ");
    }
}
