// ui.rs - Window, controls, and the on-screen surface

use anyhow::Result;
use eframe::egui;
use egui::{Color32, Stroke, Vec2};
use life_common::{parse_color, Density, LifeConfig, Rgba8, Snapshot, SurfaceLayout};
use life_engine::{Coordinator, CoordinatorSettings, Display, Mode};
use log::{error, info};
use std::sync::{Arc, Mutex, PoisonError};

const RESET_BUTTON: &str = "Reset";
const STEP_BUTTON: &str = "Step";
const RUN_BUTTON_UNSELECTED: &str = "Run!";
const RUN_BUTTON_SELECTED: &str = "Stop!";
const DENSITY_LABEL: &str = "Density";

fn to_color32(c: Rgba8) -> Color32 {
    Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3])
}

/// The on-screen display: keeps the last published field and asks egui for a
/// repaint whenever a new one arrives from the simulation thread.
#[derive(Clone)]
struct Surface {
    field: Arc<Mutex<Arc<Snapshot>>>,
    ctx: egui::Context,
}

impl Surface {
    fn new(ctx: egui::Context, width: usize, height: usize) -> Self {
        let blank = Snapshot::new(0, width, height, vec![false; width * height]);
        Self {
            field: Arc::new(Mutex::new(Arc::new(blank))),
            ctx,
        }
    }

    fn field(&self) -> Arc<Snapshot> {
        Arc::clone(&self.field.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Display for Surface {
    fn set_field(&mut self, snapshot: Arc<Snapshot>) {
        *self.field.lock().unwrap_or_else(PoisonError::into_inner) = snapshot;
        self.ctx.request_repaint();
    }
}

pub struct LifeApp {
    coordinator: Coordinator,
    surface: Surface,
    layout: SurfaceLayout,
    cell_color: Color32,
    background: Color32,
    density_percent: u32,
    max_density_percent: u32,
    running: bool,
}

impl LifeApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: LifeConfig) -> Result<Self> {
        let layout = config.surface_layout();
        let surface = Surface::new(cc.egui_ctx.clone(), layout.width, layout.height);
        let coordinator =
            Coordinator::spawn(CoordinatorSettings::from_config(&config), surface.clone())?;

        let max_density_percent = config.population.max_density_percent;
        info!(
            "Window ready: {}x{} cells at {} px per cell.",
            layout.width, layout.height, layout.scale
        );
        Ok(Self {
            coordinator,
            surface,
            layout,
            cell_color: to_color32(parse_color(&config.display.cell_color)),
            background: to_color32(parse_color(&config.display.background_color)),
            density_percent: config.default_density().to_percent().min(max_density_percent),
            max_density_percent,
            running: false,
        })
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        // Reset and Step stay disabled while running and while a request is in flight.
        let busy = matches!(self.coordinator.mode(), Mode::Populating | Mode::Stepping);
        let idle_controls = !self.running && !busy;

        ui.horizontal(|ui| {
            ui.label(DENSITY_LABEL);
            let slider = egui::Slider::new(&mut self.density_percent, 0..=self.max_density_percent)
                .suffix("%");
            if ui.add(slider).changed() {
                self.coordinator
                    .set_density(Density::from_percent(self.density_percent));
            }

            ui.separator();

            if ui.add_enabled(idle_controls, egui::Button::new(RESET_BUTTON)).clicked() {
                self.coordinator.request_populate();
            }
            if ui.add_enabled(idle_controls, egui::Button::new(STEP_BUTTON)).clicked() {
                self.coordinator.request_step();
            }

            let run_text = if self.running { RUN_BUTTON_SELECTED } else { RUN_BUTTON_UNSELECTED };
            if ui.add_enabled(!busy, egui::Button::new(run_text)).clicked() {
                self.running = !self.running;
                self.coordinator.set_running(self.running);
            }
        });
    }

    fn status(&self, ui: &mut egui::Ui, field: &Snapshot) {
        ui.horizontal(|ui| {
            ui.label(format!("Generation: {}", field.generation));
            ui.separator();
            ui.label(format!("Live cells: {}", field.live_cells));
            ui.separator();
            ui.label(format!("Population: {:.1}%", field.population_ratio() * 100.0));
        });
    }

    fn draw_field(&self, ui: &mut egui::Ui, field: &Snapshot) {
        let (canvas_w, canvas_h) = self.layout.canvas_size();
        let (response, painter) =
            ui.allocate_painter(Vec2::new(canvas_w as f32, canvas_h as f32), egui::Sense::hover());
        let origin = response.rect.min;

        painter.rect_filled(response.rect, 0.0, self.background);
        painter.rect_stroke(response.rect, 0.0, Stroke::new(1.0, Color32::GRAY));

        for (row, col) in field.live_positions() {
            let cell = self.layout.cell_rect(row, col);
            let (cx, cy) = cell.center();
            let radius = cell.width.min(cell.height) as f32 / 2.0;
            painter.circle_filled(origin + Vec2::new(cx, cy), radius, self.cell_color);
        }
    }
}

impl eframe::App for LifeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let field = self.surface.field();

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(6.0);
            self.controls(ui);
            self.status(ui, &field);
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_field(ui, &field);
        });
    }
}

/// Shown instead of the simulation when the coordinator could not start.
pub struct StartupError {
    message: String,
}

impl StartupError {
    pub fn new(err: anyhow::Error) -> Self {
        error!("Failed to start simulation: {:#}", err);
        Self {
            message: format!("{:#}", err),
        }
    }
}

impl eframe::App for StartupError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Could not start the simulation");
            ui.label(self.message.as_str());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_keeps_latest_field() {
        let mut surface = Surface::new(egui::Context::default(), 3, 2);
        assert_eq!(surface.field().live_cells, 0);
        let snapshot = Arc::new(Snapshot::new(5, 3, 2, vec![true; 6]));
        surface.set_field(Arc::clone(&snapshot));
        assert_eq!(surface.field(), snapshot);
    }

    #[test]
    fn colors_convert_straight_through() {
        assert_eq!(to_color32([255, 0, 0, 255]), Color32::from_rgb(255, 0, 0));
    }
}
