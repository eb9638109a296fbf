use serde::{Deserialize, Serialize};

/// An immutable copy of the grid at one generation, handed to displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Generations stepped since the grid was last populated.
    pub generation: u64,
    pub width: usize,
    pub height: usize,
    /// Row-major cell states, `width * height` entries.
    cells: Vec<bool>,
    /// Number of live cells, counted once when the snapshot is taken.
    pub live_cells: usize,
}

impl Snapshot {
    pub fn new(generation: u64, width: usize, height: usize, cells: Vec<bool>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        let live_cells = cells.iter().filter(|&&alive| alive).count();
        Self {
            generation,
            width,
            height,
            cells,
            live_cells,
        }
    }

    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.width + col]
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Iterates over `(row, col)` of every live cell.
    pub fn live_positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &alive)| alive)
            .map(move |(idx, _)| (idx / width, idx % width))
    }

    /// Fraction of the grid that is alive, in `[0, 1]`.
    pub fn population_ratio(&self) -> f64 {
        let total = self.width * self.height;
        if total == 0 {
            return 0.0;
        }
        self.live_cells as f64 / total as f64
    }
}
