//! Conway's Game of Life on a fixed-size torus: the grid engine and the
//! coordinator that drives it from a dedicated simulation thread.

pub mod coordinator;
pub mod display;
pub mod grid;
pub mod life_state;

pub use coordinator::{Coordinator, CoordinatorSettings, Mode};
pub use display::{ChannelDisplay, Display, NullDisplay};
pub use grid::{next_state, Grid};
pub use life_state::LifeState;
