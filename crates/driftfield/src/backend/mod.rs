//! Graphics backend abstraction.
//!
//! The main loop only talks to these traits. [`terminal::TerminalBackend`]
//! implements them on top of ratatui and crossterm.

pub mod terminal;

use std::fmt;
use std::io;

use driftfield_core::{Event, FPoint, FRect, Rgb, WindowFlags};
use thiserror::Error;

/// Errors reported by a graphics backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Backend start-up or window/renderer creation failed.
    #[error("{stage} failed: {message}")]
    Initialization {
        stage: &'static str,
        message: String,
    },
    /// A draw or present call failed after initialization.
    #[error("render call failed: {0}")]
    Render(#[from] io::Error),
}

impl BackendError {
    pub fn initialization(stage: &'static str, err: impl fmt::Display) -> Self {
        Self::Initialization {
            stage,
            message: err.to_string(),
        }
    }
}

/// Drawing surface attached to a window.
///
/// Calls record into a back buffer; nothing is visible until [`present`].
///
/// [`present`]: Renderer::present
pub trait Renderer {
    /// Set the opaque color used by subsequent clear/fill/draw calls.
    fn set_draw_color(&mut self, color: Rgb) -> Result<(), BackendError>;

    /// Fill the whole target with the draw color.
    fn clear(&mut self) -> Result<(), BackendError>;

    fn fill_rects(&mut self, rects: &[FRect]) -> Result<(), BackendError>;

    fn draw_points(&mut self, points: &[FPoint]) -> Result<(), BackendError>;

    /// Show the back buffer. May block to pace the frame rate.
    fn present(&mut self) -> Result<(), BackendError>;
}

/// Windowing, input and timing services.
pub trait GraphicsBackend {
    type Window;
    type Renderer: Renderer;

    fn init(&mut self) -> Result<(), BackendError>;

    /// Shut the backend down. Only called after a successful [`init`].
    ///
    /// [`init`]: GraphicsBackend::init
    fn quit(&mut self);

    fn create_window_and_renderer(
        &mut self,
        title: &str,
        width: u32,
        height: u32,
        flags: WindowFlags,
    ) -> Result<(Self::Window, Self::Renderer), BackendError>;

    /// Next queued input event, without blocking.
    fn poll_event(&mut self) -> Option<Event>;

    /// Monotonic milliseconds since [`init`](GraphicsBackend::init).
    fn ticks(&self) -> u64;

    fn destroy_window(&mut self, window: Self::Window);

    fn destroy_renderer(&mut self, renderer: Self::Renderer);
}
