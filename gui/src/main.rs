use std::time::{Duration, Instant};

use anyhow::Context;
use eframe::egui;
use eframe::egui::{ScrollArea, Ui};
use eframe::run_native;
use life_engine::{grid_extent, Color, Config, Grid, Rect, Renderer, Simulation, Surface};

const WINDOW_SIZE: [f32; 2] = [1280.0, 800.0];

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::from_env().context("invalid configuration")?;

    run_native(
        "Game of Life GUI",
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default().with_inner_size(WINDOW_SIZE),
            ..Default::default()
        },
        Box::new(|cc| Ok(Box::new(GuiOfLife::new(cc, config)))),
    )
    .map_err(|err| anyhow::anyhow!("eframe: {err}"))
}

fn color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}

/// Paints into a region of the egui window. Surface coordinates are relative
/// to the region's top-left corner.
struct EguiSurface {
    painter: egui::Painter,
    rect: egui::Rect,
    size: [f32; 2],
}

impl EguiSurface {
    /// Reports the grid's extent rather than `rect`'s so every cell gets drawn.
    fn for_grid(painter: egui::Painter, rect: egui::Rect, grid: &Grid, cell_size: f32) -> Self {
        EguiSurface {
            painter,
            rect,
            size: grid_extent(grid, cell_size),
        }
    }

    fn to_screen(&self, rect: Rect) -> egui::Rect {
        egui::Rect::from_min_max(
            self.rect.min + egui::vec2(rect.min[0], rect.min[1]),
            self.rect.min + egui::vec2(rect.max[0], rect.max[1]),
        )
    }
}

impl Surface for EguiSurface {
    fn width(&self) -> f32 {
        self.size[0]
    }

    fn height(&self) -> f32 {
        self.size[1]
    }

    fn clear(&mut self, color: Color) {
        self.painter.rect_filled(self.rect, 0.0, color32(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rounding = rect.width() / 4f32;
        self.painter.rect_filled(self.to_screen(rect), rounding, color32(color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        self.painter
            .rect_stroke(self.to_screen(rect), 0.0, egui::Stroke::new(1.0, color32(color)));
    }
}

struct GuiOfLife {
    simulation: Simulation,
    background: Color,
    grid_line: Color,
}

impl GuiOfLife {
    fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        Self {
            simulation: Simulation::new(&config, Instant::now()),
            background: config.background,
            grid_line: config.grid_line,
        }
    }

    fn controls(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            let label = if self.simulation.is_paused() { "Resume" } else { "Pause" };
            if ui.button(label).clicked() {
                self.simulation.toggle_pause();
            }
            if ui.button("Step").clicked() {
                self.simulation.step();
            }
            if ui.button("Randomize").clicked() {
                self.simulation.randomize();
            }
            if ui.button("Clear").clicked() {
                self.simulation.clear();
            }

            ui.separator();

            let (min_period, max_period) = self.simulation.tick_period_range();
            let mut millis = self.simulation.tick_period().as_millis() as u64;
            let speed = egui::Slider::new(&mut millis, min_period.as_millis() as u64..=max_period.as_millis() as u64)
                .logarithmic(true)
                .suffix(" ms")
                .text("per generation");
            if ui.add(speed).changed() {
                self.simulation.set_tick_period(Duration::from_millis(millis));
            }

            let (min_size, max_size) = self.simulation.cell_size_range();
            let mut cell_size = self.simulation.cell_size();
            let zoom = egui::Slider::new(&mut cell_size, min_size..=max_size)
                .logarithmic(true)
                .suffix(" px")
                .text("per cell");
            if ui.add(zoom).changed() {
                self.simulation.set_cell_size(cell_size);
            }
        });

        ui.label(format!(
            "Generation {} | {} live cells{}",
            self.simulation.generation(),
            self.simulation.live_cells(),
            if self.simulation.is_paused() { " | paused" } else { "" }
        ));
    }

    fn create_grid(&mut self, ui: &mut Ui) {
        let cell_size = self.simulation.cell_size();
        let grid = self.simulation.grid();

        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(cell_size * grid.columns() as f32, cell_size * grid.rows() as f32),
            egui::Sense::click(),
        );

        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let local = pointer - rect.min;
                self.simulation.toggle_at_pixel([local.x, local.y]);
            }
        }

        let surface = EguiSurface::for_grid(ui.painter_at(rect), rect, self.simulation.grid(), cell_size);
        let mut renderer = Renderer::new(surface).with_colors(self.background, self.grid_line);
        self.simulation.render(&mut renderer);
    }
}

/// A focused widget gets Space for itself.
fn space_toggles_pause(ctx: &egui::Context) -> bool {
    ctx.memory(|m| m.focused().is_none()) && ctx.input(|i| i.key_pressed(egui::Key::Space))
}

impl eframe::App for GuiOfLife {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.simulation.tick(now);

        if space_toggles_pause(ctx) {
            self.simulation.toggle_pause();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Game of Life");
            self.controls(ui);
            ScrollArea::both().show(ui, |ui| {
                self.create_grid(ui);
            });
        });

        if let Some(wait) = self.simulation.time_until_next_tick(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("window closed at generation {}", self.simulation.generation());
        self.simulation.stop();
    }
}
