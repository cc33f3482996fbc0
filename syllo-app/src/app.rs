use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use pixels::{Pixels, SurfaceTexture};
use syllo_core::SessionEvent;
use syllo_experiment::{CsvRecordStore, TrialController};
use syllo_render::{ImageLoader, Presentation, SkiaRenderer};
use syllo_timing::{HighPrecisionTimer, Timer};
use tracing::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{Fullscreen, Window, WindowId},
};

use crate::cli::Args;
use crate::input::{KeyInput, decode_key};

type Controller = TrialController<HighPrecisionTimer, ImageLoader, CsvRecordStore>;

pub struct App {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    renderer: Option<SkiaRenderer>,
    controller: Controller,
    font: Vec<u8>,
    fullscreen: bool,
    title: String,
    /// Participant id typed so far.
    entry: String,
    last_redraw_ns: Option<u64>,
    failure: Option<anyhow::Error>,
}

impl App {
    pub fn new(args: Args) -> Result<Self> {
        let config = args.experiment_config();
        let font = std::fs::read(&args.font)
            .with_context(|| format!("reading font {}", args.font.display()))?;
        let store = CsvRecordStore::new(config.records_path.clone());
        let controller = TrialController::new(config, HighPrecisionTimer::new(), ImageLoader, store)
            .context("loading instruction image")?;
        let title = controller.window_title();

        Ok(Self {
            window: None,
            pixels: None,
            renderer: None,
            controller,
            font,
            fullscreen: args.fullscreen,
            title,
            entry: String::new(),
            last_redraw_ns: None,
            failure: None,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        info!(
            os = std::env::consts::OS,
            arch = std::env::consts::ARCH,
            start_delay = ?self.controller.config.start_delay,
            "starting event loop"
        );

        event_loop.run_app(&mut self)?;
        self.log_timing();

        match self.failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (width, height) = self.controller.config.screen_size;

        let mut window_attributes = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(false);
        if self.fullscreen {
            let monitor = event_loop
                .primary_monitor()
                .or_else(|| event_loop.available_monitors().next());
            window_attributes = window_attributes.with_fullscreen(Some(Fullscreen::Borderless(monitor)));
        }

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let physical_size = window.inner_size();
        info!(
            width = physical_size.width,
            height = physical_size.height,
            scale_factor = window.scale_factor(),
            "window created"
        );

        // The buffer keeps the configured size; pixels scales it onto the surface.
        let surface_texture =
            SurfaceTexture::new(physical_size.width, physical_size.height, window.clone());
        self.pixels = Some(Pixels::new(width, height, surface_texture)?);
        self.renderer = Some(SkiaRenderer::new(
            width,
            height,
            self.font.clone(),
            Presentation::default(),
        )?);

        window.request_redraw();
        self.window = Some(window);

        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let now = self.controller.timer().now();
        if let Some(last) = self.last_redraw_ns.replace(now) {
            let interval = Duration::from_nanos(now.saturating_sub(last));
            self.controller.timer_mut().record_frame(interval);
        }

        let (Some(pixels), Some(renderer)) = (self.pixels.as_mut(), self.renderer.as_mut()) else {
            return Ok(());
        };

        let entry = self
            .controller
            .state()
            .accepts_text_entry()
            .then_some(self.entry.as_str());
        let frame = self.controller.present();
        let stats = renderer.render_frame(&frame, entry, pixels.frame_mut())?;
        pixels.render()?;

        debug!(
            draw_ms = stats.draw.as_secs_f64() * 1e3,
            copy_ms = stats.copy.as_secs_f64() * 1e3,
            total_ms = stats.total.as_secs_f64() * 1e3,
            "frame rendered"
        );
        Ok(())
    }

    fn handle_input(&mut self, key: PhysicalKey) -> Result<()> {
        let PhysicalKey::Code(code) = key else {
            return Ok(());
        };
        let entering_id = self.controller.state().accepts_text_entry();
        let Some(input) = decode_key(code, entering_id) else {
            return Ok(());
        };

        match input {
            KeyInput::Type(c) => self.entry.push(c),
            KeyInput::Erase => {
                self.entry.pop();
            }
            KeyInput::SubmitEntry => {
                let submitted = SessionEvent::SubmitId(self.entry.clone());
                if self.controller.handle_event(submitted)? {
                    self.entry.clear();
                }
            }
            KeyInput::Event(event) => {
                self.controller.handle_event(event)?;
            }
        }

        self.sync_title();
        Ok(())
    }

    fn sync_title(&mut self) {
        let title = self.controller.window_title();
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
    }

    fn quit(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(e) = self.controller.handle_event(SessionEvent::Quit) {
            self.fail(event_loop, e.into());
            return;
        }
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: anyhow::Error) {
        error!(error = %e, "session aborted");
        self.failure.get_or_insert(e);
        event_loop.exit();
    }

    fn log_timing(&self) {
        let cadence = self.controller.timer().frame_stats();
        if cadence.samples > 0 {
            info!(
                samples = cadence.samples,
                average_ms = cadence.average_frame_time_ns / 1e6,
                jitter_ms = cadence.jitter_ns / 1e6,
                fps = cadence.effective_fps,
                "frame cadence"
            );
        }
        if let Some(renderer) = &self.renderer {
            let cost = renderer.render_stats();
            info!(
                samples = cost.samples,
                average_ms = cost.average_frame_time_ns / 1e6,
                max_ms = cost.max_frame_time_ns / 1e6,
                "render cost"
            );
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                self.fail(event_loop, e.context("creating window and surface"));
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.quit(event_loop),
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    self.fail(event_loop, e);
                    return;
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() && !event.repeat => {
                if let Err(e) = self.handle_input(event.physical_key) {
                    self.fail(event_loop, e);
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(pixels) = &mut self.pixels {
                    if let Err(e) = pixels.resize_surface(size.width, size.height) {
                        warn!(error = %e, "failed to resize surface");
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.controller.is_finished() {
            event_loop.exit();
        }
    }
}
