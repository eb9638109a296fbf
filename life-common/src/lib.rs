pub mod color;
pub mod config;
pub mod density;
pub mod snapshot;
pub mod surface;

// Re-export key types for easier use by dependent crates
pub use color::{parse_color, Rgba8};
pub use config::{DisplayConfig, GridConfig, LifeConfig, PopulationConfig, TimingConfig};
pub use density::Density;
pub use snapshot::Snapshot;
pub use surface::{CellRect, SurfaceLayout};
