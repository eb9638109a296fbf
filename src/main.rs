use anyhow::Result;
use eframe::egui;
use log::{debug, info};

use life_common::LifeConfig;

mod ui;

use ui::LifeApp;

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    info!("Starting Game of Life...");

    // --- Load Configuration ---
    let config = LifeConfig::load_or_default("config.toml")?;
    debug!("Configuration: {:#?}", config);

    let (canvas_w, canvas_h) = config.surface_layout().canvas_size();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([canvas_w as f32 + 32.0, canvas_h as f32 + 120.0])
            .with_resizable(false),
        ..Default::default()
    };

    // The coordinator is created inside the app, once the egui context exists,
    // so published snapshots can request repaints.
    let title = config.display.window_title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| match LifeApp::new(cc, config) {
            Ok(app) => Box::new(app) as Box<dyn eframe::App>,
            Err(err) => Box::new(ui::StartupError::new(err)),
        }),
    )
    .map_err(|e| anyhow::anyhow!("Window system failed: {}", e))?;

    info!("Game of Life closed.");
    Ok(())
}
