use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use life_engine::{grid_extent, Color, Config, Rect, Renderer, Simulation};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowAttributes, WindowId};

mod gpu;
mod overlay;

use gpu::{State, Vertex};
use overlay::{shader_color, text_pixel_height, text_pixel_width, Canvas};

const UI_HEIGHT: f32 = 90.0;
const BUTTON_WIDTH: f32 = 180.0;
const BUTTON_HEIGHT: f32 = 44.0;
const BUTTON_PADDING: f32 = 24.0;
const BUTTON_VERTICAL_OFFSET: f32 = 12.0;
const TEXT_SCALE_HEADING: f32 = 6.0;
const TEXT_SCALE_STATUS: f32 = 4.0;
const TEXT_SCALE_BUTTON: f32 = 3.0;
const HEADER_COLOR: Color = Color::rgb(0x26, 0x26, 0x33);
const TEXT_COLOR: Color = Color::rgb(0xE6, 0xE6, 0xF2);
const BUTTON_COLOR: Color = Color::rgb(0x40, 0x54, 0x8C);
const BUTTON_HOVER_COLOR: Color = Color::rgb(0x59, 0x73, 0xBF);

struct GameOfLifeApp {
    simulation: Simulation,
    background: Color,
    grid_line: Color,
    window_size: PhysicalSize<u32>,
    cursor_position: Option<[f32; 2]>,
    vertices: Vec<Vertex>,
}

impl GameOfLifeApp {
    fn new(config: &Config, window_size: PhysicalSize<u32>) -> Self {
        Self {
            simulation: Simulation::new(config, Instant::now()),
            background: config.background,
            grid_line: config.grid_line,
            window_size,
            cursor_position: None,
            vertices: Vec::with_capacity(config.rows * config.columns * 6),
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.window_size = size;
    }

    fn update(&mut self) {
        self.simulation.tick(Instant::now());
    }

    fn handle_click(&mut self, position: [f32; 2]) {
        if self.button_rect().contains(position) {
            self.simulation.randomize();
        } else if position[1] >= UI_HEIGHT {
            self.simulation.toggle_at_pixel([position[0], position[1] - UI_HEIGHT]);
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        match &event.logical_key {
            Key::Named(NamedKey::Space) => self.simulation.toggle_pause(),
            Key::Named(NamedKey::ArrowUp) => self.simulation.speed_up(),
            Key::Named(NamedKey::ArrowDown) => self.simulation.slow_down(),
            _ if key_matches(event, "R") => self.simulation.randomize(),
            _ if key_matches(event, "C") => self.simulation.clear(),
            _ if key_matches(event, "N") => self.simulation.step(),
            _ if key_matches(event, "+") || key_matches(event, "=") => self.simulation.zoom_in(),
            _ if key_matches(event, "-") => self.simulation.zoom_out(),
            _ => {}
        }
    }

    fn handle_scroll(&mut self, lines: f32) {
        if lines > 0.0 {
            self.simulation.zoom_in();
        } else if lines < 0.0 {
            self.simulation.zoom_out();
        }
    }

    fn button_rect(&self) -> Rect {
        let width = self.window_size.width.max(1) as f32;
        Rect {
            min: [width - BUTTON_PADDING - BUTTON_WIDTH, BUTTON_PADDING + BUTTON_VERTICAL_OFFSET],
            max: [width - BUTTON_PADDING, BUTTON_PADDING + BUTTON_VERTICAL_OFFSET + BUTTON_HEIGHT],
        }
    }

    fn status_text(&self) -> String {
        let state = if self.simulation.is_paused() { "PAUSED" } else { "RUNNING" };
        format!("{state} {}", self.simulation.generation())
    }

    fn build_frame(&mut self, srgb: bool) -> &[Vertex] {
        self.vertices.clear();

        let width = self.window_size.width.max(1) as f32;
        let height = self.window_size.height.max(1) as f32;
        let button_rect = self.button_rect();
        let hovered = self.cursor_position.map(|pos| button_rect.contains(pos)).unwrap_or(false);
        let status = self.status_text();

        let extent = grid_extent(self.simulation.grid(), self.simulation.cell_size());
        let mut canvas = Canvas::new(&mut self.vertices, [width, height], srgb);

        let mut renderer =
            Renderer::new(canvas.region(UI_HEIGHT, extent)).with_colors(self.background, self.grid_line);
        self.simulation.render(&mut renderer);
        drop(renderer);

        let header = Rect {
            min: [0.0, 0.0],
            max: [width, UI_HEIGHT],
        };
        canvas.push_rect(header, HEADER_COLOR);

        let title = "Game of Life";
        let title_height = text_pixel_height(TEXT_SCALE_HEADING);
        let title_y = (UI_HEIGHT - title_height) * 0.5;
        canvas.draw_text(title, [BUTTON_PADDING, title_y], TEXT_SCALE_HEADING, TEXT_COLOR);

        let status_x = BUTTON_PADDING * 2.0 + text_pixel_width(title, TEXT_SCALE_HEADING);
        let status_y = title_y + title_height - text_pixel_height(TEXT_SCALE_STATUS);
        canvas.draw_text(&status, [status_x, status_y], TEXT_SCALE_STATUS, TEXT_COLOR);

        canvas.push_rect(button_rect, if hovered { BUTTON_HOVER_COLOR } else { BUTTON_COLOR });
        let button_text = "Randomize";
        let text_width = text_pixel_width(button_text, TEXT_SCALE_BUTTON);
        let text_height = text_pixel_height(TEXT_SCALE_BUTTON);
        let origin_x = button_rect.min[0] + (button_rect.width() - text_width) * 0.5;
        let origin_y = button_rect.min[1] + (button_rect.height() - text_height) * 0.5;
        canvas.draw_text(button_text, [origin_x, origin_y], TEXT_SCALE_BUTTON, TEXT_COLOR);

        &self.vertices
    }
}

fn key_matches(event: &KeyEvent, target: &str) -> bool {
    match &event.logical_key {
        Key::Character(text) => text.eq_ignore_ascii_case(target),
        _ => false,
    }
}

struct VulkanApp {
    config: Config,
    window_attrs: WindowAttributes,
    window: Option<Arc<Window>>,
    window_id: Option<WindowId>,
    state: Option<State>,
    app: Option<GameOfLifeApp>,
    last_cursor: [f32; 2],
    frame_count: u32,
    last_fps_log: Instant,
    startup_error: Option<anyhow::Error>,
}

impl VulkanApp {
    fn new(config: Config) -> Self {
        let attrs = Window::default_attributes()
            .with_title("Game of Life - Vulkan")
            .with_inner_size(PhysicalSize::new(1280, 720));
        Self {
            config,
            window_attrs: attrs,
            window: None,
            window_id: None,
            state: None,
            app: None,
            last_cursor: [0.0, 0.0],
            frame_count: 0,
            last_fps_log: Instant::now(),
            startup_error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window = event_loop
            .create_window(self.window_attrs.clone())
            .context("failed to create window")?;
        let window = Arc::new(window);
        let window_id = window.id();

        let state = pollster::block_on(State::new(window.clone())).context("failed to create GPU state")?;
        let app = GameOfLifeApp::new(&self.config, state.size);
        window.request_redraw();

        self.window = Some(window);
        self.window_id = Some(window_id);
        self.state = Some(state);
        self.app = Some(app);
        Ok(())
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler<()> for VulkanApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.start(event_loop) {
            self.startup_error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if Some(window_id) != self.window_id {
            return;
        }
        match event {
            WindowEvent::CloseRequested => {
                if let Some(app) = self.app.as_mut() {
                    app.simulation.stop();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(state) = self.state.as_mut() {
                    state.resize(size);
                }
                if let Some(app) = self.app.as_mut() {
                    app.resize(size);
                }
                self.request_redraw();
            }
            WindowEvent::ScaleFactorChanged { mut inner_size_writer, .. } => {
                if let Some(state) = self.state.as_ref() {
                    let size = PhysicalSize::new(state.config.width, state.config.height);
                    let _ = inner_size_writer.request_inner_size(size);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.last_cursor = [position.x as f32, position.y as f32];
                if let Some(app) = self.app.as_mut() {
                    app.cursor_position = Some(self.last_cursor);
                }
            }
            WindowEvent::CursorLeft { .. } => {
                if let Some(app) = self.app.as_mut() {
                    app.cursor_position = None;
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left && state == ElementState::Released {
                    if let Some(app) = self.app.as_mut() {
                        app.handle_click(self.last_cursor);
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32,
                };
                if let Some(app) = self.app.as_mut() {
                    app.handle_scroll(lines);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let Some(app) = self.app.as_mut() {
                        app.handle_key(&event);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if let (Some(state), Some(app)) = (self.state.as_mut(), self.app.as_mut()) {
                    app.update();
                    let clear = shader_color(app.background, state.srgb);
                    let vertices = app.build_frame(state.srgb);
                    if let Err(err) = state.render(vertices, clear) {
                        match err {
                            wgpu::SurfaceError::Lost => state.resize(state.size),
                            wgpu::SurfaceError::OutOfMemory => {
                                log::error!("out of GPU memory, exiting");
                                event_loop.exit();
                            }
                            other => log::warn!("skipping frame: {other}"),
                        }
                    } else {
                        self.frame_count += 1;
                        let elapsed = self.last_fps_log.elapsed();
                        if elapsed >= Duration::from_secs(1) {
                            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
                            log::info!("fps: {:.1}", fps);
                            self.frame_count = 0;
                            self.last_fps_log = Instant::now();
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.request_redraw();
        event_loop.set_control_flow(ControlFlow::Poll);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::from_env().context("invalid configuration")?;
    let event_loop = EventLoop::new()?;
    let mut app = VulkanApp::new(config);
    event_loop.run_app(&mut app)?;
    match app.startup_error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
