use std::time::{Duration, Instant};

use rand::Rng;

use crate::config::Config;
use crate::grid::Grid;
use crate::render::{self, Color, Renderer, Surface};
use crate::ticker::{Speed, Ticker};

const ZOOM_FACTOR: f32 = 2.0;
const SPEED_FACTOR: u32 = 2;

/// One interactive session: the grid plus everything the user can adjust
/// around it. Frontends own one of these and feed it input and time.
pub struct Simulation {
    grid: Grid,
    paused: bool,
    generation: u64,
    cell_size: f32,
    min_cell_size: f32,
    max_cell_size: f32,
    min_tick_period: Duration,
    max_tick_period: Duration,
    cell_color: Color,
    random_density: f64,
    ticker: Ticker,
}

impl Simulation {
    /// Expects a config that passed [`Config::validate`].
    pub fn new(config: &Config, now: Instant) -> Self {
        log::info!(
            "starting {}x{} simulation, {}px cells, {:?} per generation",
            config.rows,
            config.columns,
            config.cell_size,
            config.tick_period
        );
        Simulation {
            grid: Grid::new(config.rows, config.columns),
            paused: false,
            generation: 0,
            cell_size: config.cell_size,
            min_cell_size: config.min_cell_size,
            max_cell_size: config.max_cell_size,
            min_tick_period: config.min_tick_period,
            max_tick_period: config.max_tick_period,
            cell_color: config.cell_color,
            random_density: config.random_density,
            ticker: Ticker::new(Speed::new(config.tick_period), now),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn live_cells(&self) -> usize {
        self.grid.live_cells()
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn cell_color(&self) -> Color {
        self.cell_color
    }

    pub fn set_cell_color(&mut self, color: Color) {
        self.cell_color = color;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Handle to the tick period, shared with the running ticker.
    pub fn speed(&self) -> Speed {
        self.ticker.speed().clone()
    }

    pub fn tick_period(&self) -> Duration {
        self.ticker.speed().period()
    }

    pub fn tick_period_range(&self) -> (Duration, Duration) {
        (self.min_tick_period, self.max_tick_period)
    }

    pub fn cell_size_range(&self) -> (f32, f32) {
        (self.min_cell_size, self.max_cell_size)
    }

    /// Time left before the next tick fires, for scheduling a wake-up.
    pub fn time_until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.ticker.time_until_next(now)
    }

    /// Drive the timer. Returns true when a generation was advanced and the
    /// grid needs repainting. While paused the timer keeps firing but nothing
    /// advances.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.ticker.poll(now) || self.paused {
            return false;
        }
        self.advance();
        true
    }

    /// Advance exactly one generation, paused or not.
    pub fn step(&mut self) {
        self.advance();
        log::debug!("stepped to generation {}", self.generation);
    }

    fn advance(&mut self) {
        self.grid.advance_generation();
        self.generation += 1;
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.paused);
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::info!("{} at generation {}", if paused { "paused" } else { "resumed" }, self.generation);
        }
        self.paused = paused;
    }

    pub fn toggle_cell(&mut self, row: isize, column: isize) {
        self.grid.toggle_cell(row, column);
    }

    /// Toggle the cell under a surface pixel at the current zoom.
    pub fn toggle_at_pixel(&mut self, point: [f32; 2]) {
        let position = render::position_at(point, self.cell_size);
        self.grid.toggle_cell(position.row, position.column);
    }

    /// Non-finite sizes are ignored.
    pub fn set_cell_size(&mut self, cell_size: f32) {
        if !cell_size.is_finite() {
            log::warn!("ignoring cell size {cell_size}");
            return;
        }
        let clamped = cell_size.clamp(self.min_cell_size, self.max_cell_size);
        if clamped != self.cell_size {
            log::debug!("cell size {} -> {}", self.cell_size, clamped);
            self.cell_size = clamped;
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_cell_size(self.cell_size * ZOOM_FACTOR);
    }

    pub fn zoom_out(&mut self) {
        self.set_cell_size(self.cell_size / ZOOM_FACTOR);
    }

    pub fn set_tick_period(&mut self, period: Duration) {
        let clamped = period.clamp(self.min_tick_period, self.max_tick_period);
        let speed = self.ticker.speed();
        if clamped != speed.period() {
            log::debug!("tick period {:?} -> {:?}", speed.period(), clamped);
            speed.set_period(clamped);
        }
    }

    pub fn speed_up(&mut self) {
        self.set_tick_period(self.tick_period() / SPEED_FACTOR);
    }

    pub fn slow_down(&mut self) {
        self.set_tick_period(self.tick_period() * SPEED_FACTOR);
    }

    pub fn randomize(&mut self) {
        self.randomize_with(&mut rand::rng());
    }

    pub fn randomize_with<R: Rng>(&mut self, rng: &mut R) {
        self.grid.randomize_with(rng, self.random_density);
        self.generation = 0;
        log::info!("randomized grid, {} live cells", self.grid.live_cells());
    }

    pub fn clear(&mut self) {
        self.grid.clear();
        self.generation = 0;
        log::info!("cleared grid");
    }

    /// Stop the timer for good. Used when the host is shutting down.
    pub fn stop(&mut self) {
        self.ticker.cancel();
    }

    pub fn render<S: Surface>(&self, renderer: &mut Renderer<S>) {
        renderer.render(&self.grid, self.cell_size, self.cell_color);
    }
}
