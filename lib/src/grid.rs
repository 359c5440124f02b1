//! The square toroidal grid.

use crate::{
    cells::{CellValue, Coord, State, DEAD},
    error::Error,
    rules::{Rule, TransitionTable},
};
use rand::Rng;
use std::fmt::{self, Display, Formatter, Write};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Offsets of the eight cells in the Moore neighborhood.
const NBHD: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A square grid of cells whose edges wrap around.
///
/// Cells are stored row by row. Row `y` is followed by row `y + 1`,
/// and row `size - 1` is adjacent to row `0`; the same holds for columns.
///
/// The neighbors of a cell are found by wrapping each of the eight offsets
/// around the torus. On grids smaller than `3x3`, this means some
/// neighbors are counted more than once, and on a `1x1` grid all eight
/// neighbors are the cell itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")
)]
pub struct Grid {
    /// Width and height.
    size: usize,

    /// States of all cells, row-major.
    cells: Vec<State>,
}

impl Grid {
    /// Creates a grid of dead cells.
    ///
    /// Returns an error if `size` is zero, or too large for the grid to fit
    /// in memory.
    pub fn dead(size: usize) -> Result<Self, Error> {
        let mut cells = Grid::buffer(size)?;
        cells.resize(size * size, DEAD);
        Ok(Grid { size, cells })
    }

    /// An empty buffer with room for `size * size` cells.
    fn buffer(size: usize) -> Result<Vec<State>, Error> {
        let too_large = Error::InvalidDimension {
            rows: size,
            cols: size,
        };
        if size == 0 {
            return Err(Error::InvalidDimension { rows: 0, cols: 0 });
        }
        let len = size.checked_mul(size).ok_or_else(|| too_large.clone())?;
        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| too_large)?;
        Ok(cells)
    }

    /// Creates a grid from rows of values.
    ///
    /// Any nonzero value is read as a living cell (see [`CellValue`]).
    /// Returns an error if the rows do not form a non-empty square.
    pub fn from_rows<T: CellValue, R: AsRef<[T]>>(rows: &[R]) -> Result<Self, Error> {
        let size = rows.len();
        let mut cells = Grid::buffer(size)?;
        for row in rows {
            let row = row.as_ref();
            if row.len() != size {
                return Err(Error::InvalidDimension {
                    rows: size,
                    cols: row.len(),
                });
            }
            cells.extend(row.iter().map(CellValue::to_state));
        }
        Ok(Grid { size, cells })
    }

    /// Creates a grid where each cell is alive with probability `density`.
    pub fn random<R: Rng + ?Sized>(size: usize, density: f64, rng: &mut R) -> Result<Self, Error> {
        if !(0.0..=1.0).contains(&density) {
            return Err(Error::InvalidDensity(density));
        }
        let mut grid = Grid::dead(size)?;
        for cell in grid.cells.iter_mut() {
            *cell = State::from(rng.gen_bool(density));
        }
        Ok(grid)
    }

    /// Width and height of the grid.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Gets the state of a cell.
    pub fn get_cell(&self, (x, y): Coord) -> Result<State, Error> {
        self.index((x, y)).map(|i| self.cells[i])
    }

    /// Sets the state of a cell.
    pub fn set_cell(&mut self, (x, y): Coord, state: State) -> Result<(), Error> {
        let i = self.index((x, y))?;
        self.cells[i] = state;
        Ok(())
    }

    /// Gets the state of a cell, wrapping the coordinates around the torus.
    #[inline]
    pub fn wrapped(&self, x: isize, y: isize) -> State {
        let n = self.size as isize;
        let x = x.rem_euclid(n) as usize;
        let y = y.rem_euclid(n) as usize;
        self.cells[y * self.size + x]
    }

    fn index(&self, (x, y): Coord) -> Result<usize, Error> {
        if x < self.size && y < self.size {
            Ok(y * self.size + x)
        } else {
            Err(Error::OutOfBounds {
                x,
                y,
                size: self.size,
            })
        }
    }

    /// Number of living cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|s| s.is_alive()).count()
    }

    /// Iterates over the rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[State]> + '_ {
        self.cells.chunks(self.size)
    }

    /// The grid as rows of `0` and `1`.
    ///
    /// This is the form handed to a renderer, which may treat any value
    /// above `0.5` as alive.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.rows()
            .map(|row| row.iter().map(|&s| u8::from(s)).collect())
            .collect()
    }

    /// Number of living cells among the eight neighbors of a cell.
    pub fn alive_neighbors(&self, (x, y): Coord) -> Result<u8, Error> {
        self.index((x, y))?;
        let (x, y) = (x as isize, y as isize);
        Ok(NBHD
            .iter()
            .map(|&(dx, dy)| self.wrapped(x + dx, y + dy).0)
            .sum())
    }

    /// Counts the living neighbors of every cell, in a single pass
    /// over the grid.
    ///
    /// The result is row-major, like the cells.
    pub fn neighbor_counts(&self) -> Vec<u8> {
        let n = self.size;
        let mut counts = vec![0; n * n];
        let count_row = |(y, row): (usize, &mut [u8])| {
            let up = &self.cells[(y + n - 1) % n * n..][..n];
            let mid = &self.cells[y * n..][..n];
            let down = &self.cells[(y + 1) % n * n..][..n];
            for (x, count) in row.iter_mut().enumerate() {
                let left = (x + n - 1) % n;
                let right = (x + 1) % n;
                *count = up[left].0
                    + up[x].0
                    + up[right].0
                    + mid[left].0
                    + mid[right].0
                    + down[left].0
                    + down[x].0
                    + down[right].0;
            }
        };

        #[cfg(feature = "parallel")]
        counts.par_chunks_mut(n).enumerate().for_each(count_row);
        #[cfg(not(feature = "parallel"))]
        counts.chunks_mut(n).enumerate().for_each(count_row);

        counts
    }

    /// The grid in the next generation.
    pub fn step(&self, rule: &Rule) -> Grid {
        self.step_with(&TransitionTable::new(rule))
    }

    /// The grid in the next generation, with a precomputed table.
    ///
    /// All counts are taken from `self` before any new state is written,
    /// and the new states go into a fresh grid.
    pub(crate) fn step_with(&self, table: &TransitionTable) -> Grid {
        let counts = self.neighbor_counts();

        #[cfg(feature = "parallel")]
        let cells = self
            .cells
            .par_iter()
            .zip(counts.par_iter())
            .map(|(&state, &count)| table.next_state(state, count))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let cells = self
            .cells
            .iter()
            .zip(counts.iter())
            .map(|(&state, &count)| table.next_state(state, count))
            .collect();

        Grid {
            size: self.size,
            cells,
        }
    }

    /// Displays the grid in a mix of
    /// [Plaintext](https://conwaylife.com/wiki/Plaintext) and
    /// [RLE](https://conwaylife.com/wiki/Rle) format.
    ///
    /// * **Dead** cells are represented by `.`;
    /// * **Living** cells are represented by `o`;
    /// * Each line but the last is ended with `$`, the last with `!`.
    pub fn rle(&self, rule: &Rule) -> String {
        let mut str = String::new();
        let _ = writeln!(str, "x = {}, y = {}, rule = {}", self.size, self.size, rule);
        for (y, row) in self.rows().enumerate() {
            str.extend(row.iter().map(|&s| if s.is_alive() { 'o' } else { '.' }));
            str.push(if y == self.size - 1 { '!' } else { '$' });
            str.push('\n');
        }
        str
    }

    /// Places living cells given by their positions into a square grid.
    ///
    /// `size` defaults to the larger side of the pattern.
    #[cfg(feature = "read-rle")]
    fn from_positions(
        positions: Vec<(i64, i64)>,
        width: usize,
        height: usize,
        size: Option<usize>,
    ) -> Result<Self, Error> {
        let size = size.unwrap_or_else(|| width.max(height));
        if width > size || height > size {
            return Err(Error::InvalidPattern(format!(
                "a {}x{} pattern does not fit in a {}x{} grid",
                width, height, size, size
            )));
        }
        let mut grid = Grid::dead(size)?;
        for (x, y) in positions {
            if x < 0 || y < 0 {
                return Err(Error::InvalidPattern(format!(
                    "negative position ({}, {})",
                    x, y
                )));
            }
            grid.set_cell((x as usize, y as usize), crate::cells::ALIVE)?;
        }
        Ok(grid)
    }

    /// Reads a pattern in [Plaintext](https://conwaylife.com/wiki/Plaintext)
    /// format, placed at the top-left corner of a `size x size` grid.
    #[cfg(feature = "read-rle")]
    pub fn from_plaintext(input: &str, size: Option<usize>) -> Result<Self, Error> {
        use ca_formats::plaintext::Plaintext;

        let plaintext = Plaintext::new(input).map_err(|e| Error::InvalidPattern(e.to_string()))?;
        let positions = plaintext
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Error::InvalidPattern(e.to_string()))?;
        let (width, height) = bounding_box(&positions);
        Grid::from_positions(positions, width, height, size)
    }

    /// Reads a pattern in [RLE](https://conwaylife.com/wiki/Rle) format,
    /// placed at the top-left corner of a `size x size` grid.
    ///
    /// The `x` and `y` of the header, when present, are taken as the size
    /// of the pattern.
    #[cfg(feature = "read-rle")]
    pub fn from_rle(input: &str, size: Option<usize>) -> Result<Self, Error> {
        use ca_formats::rle::Rle;

        let rle = Rle::new(input).map_err(|e| Error::InvalidPattern(e.to_string()))?;
        let header = match rle.header_data() {
            Some(h) => Some((
                usize::try_from(h.x).map_err(|e| Error::InvalidPattern(e.to_string()))?,
                usize::try_from(h.y).map_err(|e| Error::InvalidPattern(e.to_string()))?,
            )),
            None => None,
        };
        let positions = rle
            .map(|cell| cell.map(|c| c.position))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Error::InvalidPattern(e.to_string()))?;
        let (width, height) = bounding_box(&positions);
        let (width, height) = match header {
            Some((x, y)) => (x.max(width), y.max(height)),
            None => (width, height),
        };
        Grid::from_positions(positions, width, height, size)
    }
}

/// Width and height of the smallest box at the origin holding all positions.
#[cfg(feature = "read-rle")]
fn bounding_box(positions: &[(i64, i64)]) -> (usize, usize) {
    positions.iter().fold((1, 1), |(w, h), &(x, y)| {
        (w.max(x.max(0) as usize + 1), h.max(y.max(0) as usize + 1))
    })
}

/// Displays the grid in [Plaintext](https://conwaylife.com/wiki/Plaintext)
/// format.
///
/// * **Dead** cells are represented by `.`;
/// * **Living** cells are represented by `o`.
impl Display for Grid {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for row in self.rows() {
            for &state in row {
                f.write_char(if state.is_alive() { 'o' } else { '.' })?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<Vec<u8>>> for Grid {
    type Error = Error;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Grid::from_rows(&rows)
    }
}

impl From<Grid> for Vec<Vec<u8>> {
    fn from(grid: Grid) -> Self {
        grid.to_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::ALIVE;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn not_square() {
        let rows: &[&[u8]] = &[&[0, 1, 0], &[1, 1]];
        assert_eq!(
            Grid::from_rows(rows),
            Err(Error::InvalidDimension { rows: 2, cols: 3 })
        );
        let empty: &[Vec<u8>] = &[];
        assert_eq!(
            Grid::from_rows(empty),
            Err(Error::InvalidDimension { rows: 0, cols: 0 })
        );
        assert!(Grid::dead(0).is_err());
    }

    #[test]
    fn corner_wraps() -> Result<(), Error> {
        let mut grid = Grid::dead(5)?;
        for coord in [(4, 4), (0, 4), (4, 0), (1, 4), (4, 1)] {
            grid.set_cell(coord, ALIVE)?;
        }
        assert_eq!(grid.alive_neighbors((0, 0))?, 5);
        assert_eq!(grid.neighbor_counts()[0], 5);
        Ok(())
    }

    #[test]
    fn counts_match_single_cell_lookup() -> Result<(), Error> {
        let mut rng = StdRng::seed_from_u64(42);
        let grid = Grid::random(7, 0.4, &mut rng)?;
        let counts = grid.neighbor_counts();
        for y in 0..7 {
            for x in 0..7 {
                assert_eq!(counts[y * 7 + x], grid.alive_neighbors((x, y))?);
            }
        }
        Ok(())
    }

    #[test]
    fn does_not_count_itself() -> Result<(), Error> {
        let mut grid = Grid::dead(4)?;
        grid.set_cell((1, 1), ALIVE)?;
        assert_eq!(grid.alive_neighbors((1, 1))?, 0);
        assert_eq!(grid.alive_neighbors((2, 2))?, 1);
        Ok(())
    }

    #[test]
    fn tiny_torus() -> Result<(), Error> {
        let grid = Grid::from_rows(&[[1u8]])?;
        assert_eq!(grid.neighbor_counts(), vec![8]);
        Ok(())
    }

    #[test]
    fn too_large() {
        for size in [usize::MAX / 2, 1 << 32, 1 << 40] {
            assert_eq!(
                Grid::dead(size),
                Err(Error::InvalidDimension {
                    rows: size,
                    cols: size
                })
            );
        }
        let mut rng = StdRng::seed_from_u64(0);
        assert!(Grid::random(usize::MAX, 0.5, &mut rng).is_err());
    }

    #[test]
    fn out_of_bounds() -> Result<(), Error> {
        let mut grid = Grid::dead(3)?;
        assert_eq!(
            grid.set_cell((3, 0), ALIVE),
            Err(Error::OutOfBounds { x: 3, y: 0, size: 3 })
        );
        assert!(grid.get_cell((0, 5)).is_err());
        Ok(())
    }

    #[test]
    fn invalid_density() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            Grid::random(3, 1.5, &mut rng),
            Err(Error::InvalidDensity(1.5))
        );
    }

    #[test]
    fn display() -> Result<(), Error> {
        let grid = Grid::from_rows(&[[0u8, 1, 0], [0, 1, 0], [0, 1, 0]])?;
        assert_eq!(grid.to_string(), ".o.\n.o.\n.o.\n");
        assert_eq!(
            grid.rle(&Rule::conway()),
            "x = 3, y = 3, rule = B3/S23\n\
             .o.$\n\
             .o.$\n\
             .o.!\n"
        );
        Ok(())
    }

    #[cfg(feature = "read-rle")]
    #[test]
    fn read_rle() -> Result<(), Error> {
        let glider = Grid::from_rle("x = 3, y = 3, rule = B3/S23\nbo$2bo$3o!", Some(5))?;
        assert_eq!(glider.size(), 5);
        assert_eq!(glider.population(), 5);
        assert_eq!(glider.get_cell((1, 0))?, ALIVE);
        assert_eq!(glider.get_cell((0, 2))?, ALIVE);
        assert!(Grid::from_rle("x = 3, y = 3\n3o!", Some(2)).is_err());
        assert_eq!(
            Grid::from_rle("x = 100000000000, y = 1\no!", None),
            Err(Error::InvalidDimension {
                rows: 100000000000,
                cols: 100000000000
            })
        );
        Ok(())
    }

    #[cfg(feature = "read-rle")]
    #[test]
    fn read_plaintext() -> Result<(), Error> {
        let blinker = Grid::from_plaintext("!Name: Blinker\n...\nOOO\n...\n", None)?;
        assert_eq!(blinker.size(), 3);
        assert_eq!(blinker.population(), 3);
        assert_eq!(blinker.get_cell((2, 1))?, ALIVE);
        let padded = Grid::from_plaintext(".O\nO.\n", Some(4))?;
        assert_eq!(padded.size(), 4);
        assert_eq!(padded.get_cell((1, 0))?, ALIVE);
        assert_eq!(padded.get_cell((0, 1))?, ALIVE);
        Ok(())
    }
}
