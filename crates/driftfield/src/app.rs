//! The main simulation and render loop.

use driftfield_config::{Config, LoopMode, WindowConfig};
use driftfield_core::{Rgb, WindowFlags};
use driftfield_scene::{Bounds, ParticleField, SpeedRange, colors_at};
use rand::Rng;
use tracing::{debug, info};

use crate::backend::{BackendError, GraphicsBackend, Renderer};
use crate::events::EventPump;

/// What the loop draws each frame.
#[derive(Debug)]
enum Scene<R> {
    /// Drifting particles over a color-cycling background.
    Animated(ParticleField<R>),
    /// Nothing but a black frame.
    Minimal,
}

/// Lifecycle phase of the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Built, backend not yet started or window not yet created.
    Starting,
    Running,
    ShuttingDown,
}

#[derive(Debug, Clone, Copy)]
struct LoopState {
    phase: Phase,
    /// Backend ticks at the start of the previous frame.
    last_tick_ms: u64,
}

/// Drives the backend: drain events, tick the field, draw, present.
#[derive(Debug)]
pub struct MainLoop<R> {
    window: WindowConfig,
    scene: Scene<R>,
    pump: EventPump,
    state: LoopState,
    /// Frames presented so far.
    frames: u64,
}

impl<R: Rng> MainLoop<R> {
    /// Build the loop and, in animated mode, populate the particle field.
    pub fn new(config: &Config, rng: R) -> Self {
        let scene = match config.mode {
            LoopMode::Animated => {
                let p = &config.particles;
                Scene::Animated(ParticleField::initialize(
                    p.count,
                    Bounds::new(config.window.width as f32, config.window.height as f32),
                    p.half_size,
                    SpeedRange::new(p.min_speed, p.max_speed),
                    rng,
                ))
            }
            LoopMode::Minimal => Scene::Minimal,
        };

        Self {
            window: config.window.clone(),
            scene,
            pump: EventPump::new(),
            state: LoopState {
                phase: Phase::Starting,
                last_tick_ms: 0,
            },
            frames: 0,
        }
    }

    /// Run the application's main loop until a stop event or a backend
    /// failure.
    ///
    /// The backend is shut down before returning whenever `init` succeeded,
    /// and the window and renderer are destroyed whenever they were created.
    pub fn run<B: GraphicsBackend>(&mut self, backend: &mut B) -> Result<(), BackendError> {
        backend.init()?;
        info!("backend initialized");

        let result = self.run_window(backend);

        backend.quit();
        info!("backend shut down");
        result
    }

    fn run_window<B: GraphicsBackend>(&mut self, backend: &mut B) -> Result<(), BackendError> {
        let window = &self.window;
        let (handle, mut renderer) = backend.create_window_and_renderer(
            &window.title,
            window.width,
            window.height,
            WindowFlags {
                resizable: window.resizable,
            },
        )?;
        info!(
            title = %window.title,
            width = window.width,
            height = window.height,
            "window and renderer created"
        );

        self.state = LoopState {
            phase: Phase::Running,
            last_tick_ms: backend.ticks(),
        };
        let mut result = Ok(());
        while self.state.phase == Phase::Running {
            if let Err(err) = self.frame(backend, &mut renderer) {
                result = Err(err);
                break;
            }
        }
        self.state.phase = Phase::ShuttingDown;
        info!(frames = self.frames, "shutting down");

        backend.destroy_window(handle);
        info!("window destroyed");
        backend.destroy_renderer(renderer);
        info!("renderer destroyed");
        result
    }

    /// Run a single frame.
    fn frame<B: GraphicsBackend>(
        &mut self,
        backend: &mut B,
        renderer: &mut B::Renderer,
    ) -> Result<(), BackendError> {
        if !self.pump.drain(backend) {
            self.state.phase = Phase::ShuttingDown;
            return Ok(());
        }

        let now = backend.ticks();
        let dt = now.saturating_sub(self.state.last_tick_ms) as f32 / 1000.0;
        self.state.last_tick_ms = now;

        match &mut self.scene {
            Scene::Animated(field) => {
                field.tick(dt);
                let colors = colors_at(now as f64 / 1000.0);

                renderer.set_draw_color(colors.background)?;
                renderer.clear()?;
                renderer.set_draw_color(colors.foreground)?;
                renderer.fill_rects(field.rects())?;
                renderer.set_draw_color(colors.point.rgb())?;
                renderer.draw_points(field.points())?;
            }
            Scene::Minimal => {
                renderer.set_draw_color(Rgb::BLACK)?;
                renderer.clear()?;
            }
        }
        renderer.present()?;

        self.frames += 1;
        debug!(frame = self.frames, dt, "frame presented");
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The particle field, in animated mode.
    pub fn field(&self) -> Option<&ParticleField<R>> {
        match &self.scene {
            Scene::Animated(field) => Some(field),
            Scene::Minimal => None,
        }
    }
}
