use crate::density::Density;
use crate::surface::SurfaceLayout;
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// Grid dimensions, fixed for the lifetime of the process
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GridConfig {
    #[serde(default = "default_grid_width")]
    pub width: usize,
    #[serde(default = "default_grid_height")]
    pub height: usize,
}

// Random population settings
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PopulationConfig {
    /// Density used for the initial population and as the slider's starting value.
    #[serde(default = "default_density")]
    pub default_density: f64,
    /// Upper bound of the density slider, in percent.
    #[serde(default = "default_max_density_percent")]
    pub max_density_percent: u32,
}

// Pacing of continuous runs
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TimingConfig {
    #[serde(default = "default_run_interval_ms")]
    pub run_interval_ms: u64,
}

// How the grid is drawn
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    /// Pixels per cell.
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Border between the surface edge and the first cell, in pixels.
    #[serde(default = "default_inset")]
    pub inset: i32,
    #[serde(default = "default_cell_color")]
    pub cell_color: String,
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default = "default_window_title")]
    pub window_title: String,
}

// Main configuration structure, loaded from config.toml.
// Every section may be omitted; missing keys take the defaults below.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct LifeConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub population: PopulationConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            width: default_grid_width(),
            height: default_grid_height(),
        }
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        PopulationConfig {
            default_density: default_density(),
            max_density_percent: default_max_density_percent(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            run_interval_ms: default_run_interval_ms(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            scale: default_scale(),
            inset: default_inset(),
            cell_color: default_cell_color(),
            background_color: default_background_color(),
            window_title: default_window_title(),
        }
    }
}

impl LifeConfig {
    /// Loads the configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config in '{}': {}", path_ref.display(), e))
    }

    /// Like [`LifeConfig::load`], but a missing file yields the built-in defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        if !path_ref.exists() {
            info!("No config file at '{}', using defaults.", path_ref.display());
            return Ok(Self::default());
        }
        Self::load(path_ref)
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: LifeConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid.width == 0 || self.grid.height == 0 {
            anyhow::bail!(
                "grid dimensions must be positive (got {}x{}).",
                self.grid.width,
                self.grid.height
            );
        }
        if !(0.0..=1.0).contains(&self.population.default_density) {
            anyhow::bail!(
                "default_density must be within [0, 1] (got {}).",
                self.population.default_density
            );
        }
        if self.population.max_density_percent > 100 {
            anyhow::bail!("max_density_percent must not exceed 100.");
        }
        if self.timing.run_interval_ms == 0 {
            anyhow::bail!("run_interval_ms must be greater than 0.");
        }
        if !(self.display.scale > 0.0) {
            anyhow::bail!("display scale must be positive.");
        }
        if self.display.inset < 0 {
            anyhow::bail!("display inset must not be negative.");
        }
        Ok(())
    }

    pub fn default_density(&self) -> Density {
        Density::new(self.population.default_density)
    }

    pub fn run_interval(&self) -> Duration {
        Duration::from_millis(self.timing.run_interval_ms)
    }

    pub fn surface_layout(&self) -> SurfaceLayout {
        SurfaceLayout::new(
            self.grid.width,
            self.grid.height,
            self.display.scale,
            self.display.inset,
        )
    }
}

fn default_grid_width() -> usize {
    150
}

fn default_grid_height() -> usize {
    150
}

fn default_density() -> f64 {
    0.15
}

fn default_max_density_percent() -> u32 {
    50
}

fn default_run_interval_ms() -> u64 {
    100
}

fn default_scale() -> f32 {
    6.0
}

fn default_inset() -> i32 {
    1
}

fn default_cell_color() -> String {
    "red".to_string()
}

fn default_background_color() -> String {
    "blue".to_string()
}

fn default_window_title() -> String {
    "Deep Dive: Conway's Game of Life".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = LifeConfig::from_toml_str("").unwrap();
        assert_eq!(config, LifeConfig::default());
        assert_eq!(config.grid.width, 150);
        assert_eq!(config.run_interval(), Duration::from_millis(100));
        assert_eq!(config.default_density().to_percent(), 15);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = LifeConfig::from_toml_str(
            r#"
            [grid]
            width = 40

            [display]
            cell_color = "lime"
            "#,
        )
        .unwrap();
        assert_eq!(config.grid.width, 40);
        assert_eq!(config.grid.height, 150);
        assert_eq!(config.display.cell_color, "lime");
        assert_eq!(config.display.background_color, "blue");
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(LifeConfig::from_toml_str("[grid]\nwidth = 0").is_err());
        assert!(LifeConfig::from_toml_str("[population]\ndefault_density = 1.5").is_err());
        assert!(LifeConfig::from_toml_str("[timing]\nrun_interval_ms = 0").is_err());
        assert!(LifeConfig::from_toml_str("[display]\nscale = 0.0").is_err());
        assert!(LifeConfig::from_toml_str("[grid\nwidth = 3").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = LifeConfig::load_or_default("definitely/not/here/config.toml").unwrap();
        assert_eq!(config, LifeConfig::default());
        assert!(LifeConfig::load("definitely/not/here/config.toml").is_err());
    }
}
