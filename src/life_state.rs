use crate::grid::Grid;
use life_common::{Density, Snapshot};
use rand::Rng;

/// Holds the authoritative grid as a pair of equally sized buffers.
///
/// `current` is the published generation; `next` is scratch space the following
/// generation is written into before the two are swapped. Neither buffer is ever
/// resized or reallocated after construction.
#[derive(Debug)] // Not Clone: snapshots are the way to share grid contents
pub struct LifeState {
    // --- Ping-Pong Buffers ---
    current: Grid,
    next: Grid,
    /// Generations stepped since the last populate.
    generation: u64,
}

impl LifeState {
    /// Allocates both buffers, all cells dead.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            current: Grid::new(width, height),
            next: Grid::new(width, height),
            generation: 0,
        }
    }

    pub fn current(&self) -> &Grid {
        &self.current
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Repopulates at `density` with the thread-local generator.
    pub fn populate(&mut self, density: Density) {
        self.populate_with(density, &mut rand::rng());
    }

    /// Fills the back buffer with a fresh random population and makes it current.
    /// Resets the generation counter.
    pub fn populate_with<R: Rng + ?Sized>(&mut self, density: Density, rng: &mut R) {
        self.next.fill_random(density, rng);
        self.swap_buffers();
        self.generation = 0;
    }

    /// Advances one generation: `current` is read, `next` is written, then swapped.
    pub fn step(&mut self) {
        self.current.step_into(&mut self.next);
        self.swap_buffers();
        self.generation += 1;
    }

    /// Copies the current generation out for a display.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.generation,
            self.current.width(),
            self.current.height(),
            self.current.cells().to_vec(),
        )
    }

    /// Swaps the current and next buffers.
    fn swap_buffers(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }
}
