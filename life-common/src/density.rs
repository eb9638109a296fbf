use serde::{Deserialize, Serialize};

/// Probability that a cell starts alive when the grid is repopulated.
///
/// Always a finite value in `[0, 1]`: construction clamps out-of-range input and
/// maps NaN to zero, so a `Density` can be handed straight to a Bernoulli draw.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Density(f64);

impl Density {
    pub const ZERO: Density = Density(0.0);
    pub const FULL: Density = Density(1.0);

    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Density(0.0)
        } else {
            Density(value.clamp(0.0, 1.0))
        }
    }

    /// Converts a slider percentage (e.g. `15` for 15%) into a density.
    pub fn from_percent(percent: u32) -> Self {
        Self::new(f64::from(percent) / 100.0)
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Nearest whole percentage, for seeding percentage-based controls.
    pub fn to_percent(self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

impl Default for Density {
    fn default() -> Self {
        Density(0.15)
    }
}

impl From<f64> for Density {
    fn from(value: f64) -> Self {
        Density::new(value)
    }
}

impl From<Density> for f64 {
    fn from(density: Density) -> Self {
        density.0
    }
}
