use anyhow::{Context, Result};
use arrowex_core::Point;
use arrowex_experiment::{
    dispatch, write_summary, ControllerEvent, ExperimentConfig, JsonLinesSink, TickInput,
    TrialController, TrialSink, VisualizationOutcome,
};
use arrowex_render::{load_font, ChartView, SkiaRenderer};
use arrowex_timing::{HighPrecisionTimer, TickPacer, Timer};
use pixels::{Pixels, SurfaceTexture};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

/// Output locations and session options chosen on the command line
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub results: PathBuf,
    pub summary: PathBuf,
    pub chart: PathBuf,
    pub seed: Option<u64>,
    pub font: Option<PathBuf>,
}

pub struct App {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    controller: TrialController<StdRng>,
    renderer: SkiaRenderer,
    timer: HighPrecisionTimer,
    pacer: TickPacer,
    sink: JsonLinesSink,
    chart: ChartView,
    summary: PathBuf,
    pointer: Point,
    clicks: Vec<Point>,
    should_exit: bool,
}

impl App {
    pub fn new(config: ExperimentConfig, options: AppOptions) -> Result<Self> {
        let rng = match options.seed {
            Some(seed) => {
                info!(seed, "using seeded schedule");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        };

        let mut renderer = SkiaRenderer::new(config.screen_width, config.screen_height)?;
        match &options.font {
            Some(path) => renderer = renderer.with_font(load_font(path)?),
            None => warn!("no --font given, buttons are drawn without labels"),
        }

        let sink = JsonLinesSink::create(&options.results)?;
        let pacer = TickPacer::new(config.tick_rate_hz);
        let controller = TrialController::new(config, rng);
        info!(
            rounds = controller.total_rounds(),
            results = %options.results.display(),
            "writing results"
        );

        Ok(Self {
            window: None,
            pixels: None,
            controller,
            renderer,
            timer: HighPrecisionTimer::new(),
            pacer,
            sink,
            chart: ChartView::new(options.chart),
            summary: options.summary,
            pointer: Point::default(),
            clicks: Vec::new(),
            should_exit: false,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        info!("Click START to begin a round, ESC to exit");
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (width, height) = self.renderer.size();
        let window_attributes = Window::default_attributes()
            .with_title("Arrow Motion Task")
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let physical_size = window.inner_size();
        info!(
            width = physical_size.width,
            height = physical_size.height,
            scale = window.scale_factor(),
            "window created"
        );

        let surface_texture =
            SurfaceTexture::new(physical_size.width, physical_size.height, window.clone());
        let pixels = Pixels::new(width, height, surface_texture)
            .context("Failed to create pixel buffer")?;

        window.request_redraw();
        self.pixels = Some(pixels);
        self.window = Some(window);
        Ok(())
    }

    fn frame(&mut self) -> Result<()> {
        let input = TickInput {
            pointer: self.pointer,
            clicks: std::mem::take(&mut self.clicks),
        };
        let events = self.controller.tick_with(&self.timer, &input);
        if let Some(VisualizationOutcome::Rendered(path)) =
            dispatch(&events, &mut self.sink, &mut self.chart)
        {
            info!(path = %path.display(), "kinematics chart ready");
        }
        if events
            .iter()
            .any(|e| matches!(e, ControllerEvent::SessionCompleted { .. }))
        {
            self.write_summary();
        }

        let Some(pixels) = self.pixels.as_mut() else {
            return Ok(());
        };
        let scene = self.controller.scene();
        let stats = self
            .renderer
            .render_frame(&scene, pixels.frame_mut(), &mut self.timer)?;
        pixels.render().context("Failed to present frame")?;
        tracing::trace!(
            draw_ms = stats.draw.as_secs_f64() * 1e3,
            copy_ms = stats.copy.as_secs_f64() * 1e3,
            arrows = stats.arrows,
            "frame"
        );

        self.pacer.wait(&self.timer);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
        Ok(())
    }

    fn write_summary(&self) {
        let records = self.controller.records();
        match write_summary(&self.summary, &records) {
            Ok(()) => info!(path = %self.summary.display(), rounds = records.len(), "summary written"),
            Err(e) => error!("failed to write summary: {e:#}"),
        }
    }

    fn cursor_moved(&mut self, x: f64, y: f64) {
        let Some(pixels) = &self.pixels else {
            return;
        };
        let (px, py) = pixels
            .window_pos_to_pixel((x as f32, y as f32))
            .unwrap_or_else(|pos| pixels.clamp_pixel_pos(pos));
        self.pointer = Point::new(px as f64, py as f64);
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                error!("Failed to resize surface: {e}");
            }
        }
        debug!(width = new_size.width, height = new_size.height, "surface resized");
    }

    fn cleanup_and_exit(&mut self, event_loop: &ActiveEventLoop) {
        if self.controller.current_trial().is_some() {
            info!(
                round = self.controller.round_index() + 1,
                "exiting mid-round, discarding unfinished trial"
            );
        }
        if let Err(e) = self.sink.flush() {
            error!("failed to flush results: {e:#}");
        }

        let stats = self.timer.frame_stats();
        info!(
            frames = stats.frames,
            avg_ms = stats.average_frame_time_ns / 1e6,
            jitter_ms = stats.jitter_ns / 1e6,
            overruns = self.pacer.overruns(),
            "session closed"
        );

        self.should_exit = true;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                error!("Failed to create window and surface: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.cleanup_and_exit(event_loop),
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.frame() {
                    error!("frame failed: {e:#}");
                    self.cleanup_and_exit(event_loop);
                }
            }
            WindowEvent::CursorMoved { position, .. } => self.cursor_moved(position.x, position.y),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.clicks.push(self.pointer),
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() => {
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                    self.cleanup_and_exit(event_loop);
                }
            }
            WindowEvent::Resized(size) => self.handle_resize(size),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
        }
    }
}
