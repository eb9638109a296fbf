use life_common::Density;
use rand::Rng;
use rayon::prelude::*;

/// Offsets of the eight cells surrounding a cell, as (row, col) deltas.
#[rustfmt::skip]
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// The Life transition rule: survival on 2 or 3 neighbours, birth on exactly 3.
#[inline(always)]
pub fn next_state(alive: bool, live_neighbors: u8) -> bool {
    matches!((alive, live_neighbors), (true, 2) | (true, 3) | (false, 3))
}

/// A fixed-size toroidal field of cells, stored row-major.
///
/// Rows and columns wrap: row `height - 1` is adjacent to row `0`, and likewise for
/// columns, so every cell has exactly eight neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates an all-dead grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Creates a grid with the given `(row, col)` cells alive. Coordinates wrap.
    pub fn with_live_cells(width: usize, height: usize, live: &[(usize, usize)]) -> Self {
        let mut grid = Self::new(width, height);
        for &(row, col) in live {
            grid.set(row % height, col % width, true);
        }
        grid
    }

    /// Fills a fresh grid, each cell alive with probability `density`, using the
    /// thread-local generator. Not reproducible between calls.
    pub fn populate(width: usize, height: usize, density: Density) -> Self {
        Self::populate_with(width, height, density, &mut rand::rng())
    }

    /// Same as [`Grid::populate`] with an explicit generator.
    pub fn populate_with<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        density: Density,
        rng: &mut R,
    ) -> Self {
        let mut grid = Self::new(width, height);
        grid.fill_random(density, rng);
        grid
    }

    /// Overwrites every cell with an independent Bernoulli(`density`) draw.
    pub fn fill_random<R: Rng + ?Sized>(&mut self, density: Density, rng: &mut R) {
        let p = density.get();
        for cell in self.cells.iter_mut() {
            *cell = rng.random_bool(p);
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.width + col]
    }

    pub fn set(&mut self, row: usize, col: usize, alive: bool) {
        self.cells[row * self.width + col] = alive;
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Counts live cells among the eight toroidal neighbours of `(row, col)`.
    pub fn live_neighbors(&self, row: usize, col: usize) -> u8 {
        let (h, w) = (self.height as isize, self.width as isize);
        let mut count = 0;
        for (dr, dc) in NEIGHBOR_OFFSETS {
            let r = (row as isize + dr).rem_euclid(h) as usize;
            let c = (col as isize + dc).rem_euclid(w) as usize;
            if self.get(r, c) {
                count += 1;
            }
        }
        count
    }

    /// Computes the next generation into a newly allocated grid.
    /// `self` is left untouched.
    pub fn step(&self) -> Grid {
        let mut next = Grid::new(self.width, self.height);
        self.step_into(&mut next);
        next
    }

    /// Writes the next generation into `next`, which must have the same dimensions.
    ///
    /// Reads only from `self` and writes only to `next`, so every neighbour count
    /// sees the previous generation. Rows are computed in parallel.
    pub fn step_into(&self, next: &mut Grid) {
        assert_eq!(
            (self.width, self.height),
            (next.width, next.height),
            "step_into requires grids of equal dimensions"
        );
        if self.width == 0 {
            return;
        }
        next.cells
            .par_chunks_mut(self.width)
            .enumerate()
            .for_each(|(row, out_row)| {
                for (col, out) in out_row.iter_mut().enumerate() {
                    *out = next_state(self.get(row, col), self.live_neighbors(row, col));
                }
            });
    }
}
