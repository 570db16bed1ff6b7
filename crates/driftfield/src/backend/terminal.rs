//! Terminal graphics backend built on ratatui and crossterm.
//!
//! The window's width and height become the logical coordinate space of a
//! ratatui [`Canvas`] that is stretched over the whole terminal. Draw calls
//! are buffered as layers and painted in submission order on present.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{SetTitle, supports_keyboard_enhancement},
};
use driftfield_core::{Event, FPoint, FRect, Rgb, Scancode, WindowFlags};
use ratatui::{
    DefaultTerminal,
    style::Color,
    symbols::Marker,
    widgets::canvas::{Canvas, Painter, Points, Shape},
};
use tracing::{debug, error, warn};

use super::{BackendError, GraphicsBackend, Renderer};

/// Backend that draws into the terminal's alternate screen.
pub struct TerminalBackend {
    /// Terminal between `init` and renderer creation.
    terminal: Option<DefaultTerminal>,
    /// Whether the terminal reports key release events.
    key_releases: bool,
    /// Set once terminal input fails; no further events are read.
    input_failed: bool,
    started: Instant,
    frame_interval: Duration,
}

impl TerminalBackend {
    /// Create a backend whose present call paces to `target_fps`.
    pub fn new(target_fps: u32) -> Self {
        Self {
            terminal: None,
            key_releases: false,
            input_failed: false,
            started: Instant::now(),
            frame_interval: Duration::from_secs(1) / target_fps.max(1),
        }
    }

    /// Read the next event through `poll` and `read`.
    ///
    /// An input failure is reported once as [`Event::Quit`]; afterwards the
    /// queue reads as empty.
    fn next_event(
        &mut self,
        poll: impl FnOnce() -> io::Result<bool>,
        read: impl FnOnce() -> io::Result<TermEvent>,
    ) -> Option<Event> {
        if self.input_failed {
            return None;
        }
        let event = poll().and_then(|ready| if ready { read().map(Some) } else { Ok(None) });
        match event {
            Ok(event) => event.map(|event| map_event(event, self.key_releases)),
            Err(err) => {
                error!(%err, "terminal input failed, stopping");
                self.input_failed = true;
                Some(Event::Quit)
            }
        }
    }
}

/// The terminal window. Holds the title it was created with.
#[derive(Debug)]
pub struct TerminalWindow {
    title: String,
}

impl GraphicsBackend for TerminalBackend {
    type Window = TerminalWindow;
    type Renderer = TerminalRenderer;

    fn init(&mut self) -> Result<(), BackendError> {
        let terminal =
            ratatui::try_init().map_err(|err| BackendError::initialization("terminal init", err))?;

        // Without release reporting every key press is treated as a
        // completed keystroke, see `map_key_event`.
        self.key_releases = matches!(supports_keyboard_enhancement(), Ok(true))
            && execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .is_ok();
        debug!(key_releases = self.key_releases, "keyboard enhancement");

        self.terminal = Some(terminal);
        self.input_failed = false;
        self.started = Instant::now();
        Ok(())
    }

    fn quit(&mut self) {
        if self.key_releases {
            if let Err(err) = execute!(io::stdout(), PopKeyboardEnhancementFlags) {
                warn!(%err, "failed to pop keyboard enhancement flags");
            }
            self.key_releases = false;
        }
        self.terminal = None;
        ratatui::restore();
    }

    fn create_window_and_renderer(
        &mut self,
        title: &str,
        width: u32,
        height: u32,
        flags: WindowFlags,
    ) -> Result<(TerminalWindow, TerminalRenderer), BackendError> {
        let terminal = self.terminal.take().ok_or_else(|| {
            BackendError::initialization("window creation", "terminal is not initialized")
        })?;
        execute!(io::stdout(), SetTitle(title))
            .map_err(|err| BackendError::initialization("window creation", err))?;
        // The canvas always stretches over the terminal, so the window
        // follows terminal resizes whether or not it asked to.
        debug!(resizable = flags.resizable, "terminal window created");

        let window = TerminalWindow {
            title: title.to_string(),
        };
        let renderer = TerminalRenderer {
            terminal,
            width: f64::from(width),
            height: f64::from(height),
            draw_color: Rgb::BLACK,
            clear_color: Rgb::BLACK,
            layers: Vec::new(),
            frame_interval: self.frame_interval,
            next_frame: Instant::now(),
        };
        Ok((window, renderer))
    }

    fn poll_event(&mut self) -> Option<Event> {
        self.next_event(|| event::poll(Duration::ZERO), event::read)
    }

    fn ticks(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn destroy_window(&mut self, window: TerminalWindow) {
        debug!(title = %window.title, "terminal window destroyed");
    }

    fn destroy_renderer(&mut self, renderer: TerminalRenderer) {
        drop(renderer);
    }
}

/// Translate a crossterm event into a backend event.
fn map_event(event: TermEvent, key_releases: bool) -> Event {
    match event {
        TermEvent::Key(key) => map_key_event(key, key_releases),
        _ => Event::Other,
    }
}

/// Translate a key event.
///
/// Raw mode swallows SIGINT, so Ctrl-C stands in for closing the window.
fn map_key_event(key: KeyEvent, key_releases: bool) -> Event {
    if key.kind == KeyEventKind::Press
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return Event::Quit;
    }

    let released = match key.kind {
        KeyEventKind::Release => true,
        KeyEventKind::Press => !key_releases,
        KeyEventKind::Repeat => false,
    };
    if !released {
        return Event::Other;
    }

    let scancode = match key.code {
        KeyCode::Esc => Scancode::Escape,
        KeyCode::Char(c) => Scancode::Char(c),
        _ => Scancode::Other,
    };
    Event::KeyUp { scancode }
}

/// A buffered draw call.
#[derive(Debug)]
enum Layer {
    Rects { color: Color, rects: Vec<FRect> },
    Points { color: Color, coords: Vec<(f64, f64)> },
}

/// Renderer that paints buffered layers onto a ratatui canvas.
pub struct TerminalRenderer {
    terminal: DefaultTerminal,
    /// Logical width of the window.
    width: f64,
    /// Logical height of the window.
    height: f64,
    draw_color: Rgb,
    clear_color: Rgb,
    layers: Vec<Layer>,
    frame_interval: Duration,
    next_frame: Instant,
}

impl TerminalRenderer {
    /// Sleep until the next frame is due.
    fn wait_for_next_frame(&mut self) {
        let now = Instant::now();
        if let Some(wait) = self.next_frame.checked_duration_since(now) {
            thread::sleep(wait);
        }
        self.next_frame = self.next_frame.max(now) + self.frame_interval;
    }
}

impl Renderer for TerminalRenderer {
    fn set_draw_color(&mut self, color: Rgb) -> Result<(), BackendError> {
        self.draw_color = color;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), BackendError> {
        self.clear_color = self.draw_color;
        self.layers.clear();
        Ok(())
    }

    fn fill_rects(&mut self, rects: &[FRect]) -> Result<(), BackendError> {
        self.layers.push(Layer::Rects {
            color: self.draw_color.into(),
            rects: rects.to_vec(),
        });
        Ok(())
    }

    fn draw_points(&mut self, points: &[FPoint]) -> Result<(), BackendError> {
        let height = self.height;
        self.layers.push(Layer::Points {
            color: self.draw_color.into(),
            coords: points.iter().map(|p| to_canvas(*p, height)).collect(),
        });
        Ok(())
    }

    fn present(&mut self) -> Result<(), BackendError> {
        let Self {
            terminal,
            width,
            height,
            clear_color,
            layers,
            ..
        } = self;
        let (width, height) = (*width, *height);

        terminal.draw(|frame| {
            let canvas = Canvas::default()
                .background_color((*clear_color).into())
                .marker(Marker::HalfBlock)
                .x_bounds([0.0, width])
                .y_bounds([0.0, height])
                .paint(|ctx| {
                    for layer in layers.iter() {
                        match layer {
                            Layer::Rects { color, rects } => ctx.draw(&FilledRects {
                                rects,
                                color: *color,
                                width,
                                height,
                            }),
                            Layer::Points { color, coords } => ctx.draw(&Points {
                                coords,
                                color: *color,
                            }),
                        }
                        ctx.layer();
                    }
                });
            frame.render_widget(canvas, frame.area());
        })?;
        layers.clear();

        self.wait_for_next_frame();
        Ok(())
    }
}

/// Window coordinates (y down) to canvas coordinates (y up).
fn to_canvas(point: FPoint, height: f64) -> (f64, f64) {
    (f64::from(point.x), height - f64::from(point.y))
}

/// Solid rectangles in window coordinates.
struct FilledRects<'a> {
    rects: &'a [FRect],
    color: Color,
    width: f64,
    height: f64,
}

impl Shape for FilledRects<'_> {
    fn draw(&self, painter: &mut Painter) {
        for rect in self.rects {
            let (left, top) = to_canvas(FPoint::new(rect.x, rect.y), self.height);
            let right = left + f64::from(rect.w);
            let bottom = top - f64::from(rect.h);

            // Clip to the canvas; fully off-screen rectangles map to None.
            let Some((x0, y0)) = painter.get_point(left.max(0.0), top.min(self.height)) else {
                continue;
            };
            let Some((x1, y1)) = painter.get_point(right.min(self.width), bottom.max(0.0)) else {
                continue;
            };

            for y in y0..=y1 {
                for x in x0..=x1 {
                    painter.paint(x, y, self.color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new_with_kind(code, modifiers, kind)
    }

    #[test]
    fn test_escape_release_is_key_up() {
        let event = map_key_event(
            key(KeyCode::Esc, KeyModifiers::NONE, KeyEventKind::Release),
            true,
        );
        assert_eq!(
            event,
            Event::KeyUp {
                scancode: Scancode::Escape
            }
        );
    }

    #[test]
    fn test_press_is_other_when_releases_reported() {
        let event = map_key_event(
            key(KeyCode::Esc, KeyModifiers::NONE, KeyEventKind::Press),
            true,
        );
        assert_eq!(event, Event::Other);
    }

    #[test]
    fn test_press_is_key_up_without_release_reporting() {
        let event = map_key_event(
            key(KeyCode::Char('a'), KeyModifiers::NONE, KeyEventKind::Press),
            false,
        );
        assert_eq!(
            event,
            Event::KeyUp {
                scancode: Scancode::Char('a')
            }
        );
    }

    #[test]
    fn test_repeat_is_ignored() {
        let event = map_key_event(
            key(KeyCode::Esc, KeyModifiers::NONE, KeyEventKind::Repeat),
            false,
        );
        assert_eq!(event, Event::Other);
    }

    #[test]
    fn test_ctrl_c_is_quit() {
        for key_releases in [true, false] {
            let event = map_key_event(
                key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press),
                key_releases,
            );
            assert_eq!(event, Event::Quit);
        }
    }

    #[test]
    fn test_non_key_events_are_other() {
        assert_eq!(map_event(TermEvent::Resize(80, 24), false), Event::Other);
        assert_eq!(map_event(TermEvent::FocusLost, true), Event::Other);
    }

    #[test]
    fn test_to_canvas_flips_y() {
        assert_eq!(to_canvas(FPoint::new(10.0, 0.0), 720.0), (10.0, 720.0));
        assert_eq!(to_canvas(FPoint::new(0.0, 720.0), 720.0), (0.0, 0.0));
    }

    #[test]
    fn test_ready_event_is_mapped() {
        let mut backend = TerminalBackend::new(60);
        let event = backend.next_event(
            || Ok(true),
            || Ok(TermEvent::Key(key(KeyCode::Esc, KeyModifiers::NONE, KeyEventKind::Press))),
        );
        assert_eq!(
            event,
            Some(Event::KeyUp {
                scancode: Scancode::Escape
            })
        );
        assert_eq!(
            backend.next_event(|| Ok(false), || panic!("read without a ready event")),
            None
        );
    }

    #[test]
    fn test_poll_failure_stops_once() {
        let mut backend = TerminalBackend::new(60);
        let event = backend.next_event(
            || Err(io::Error::other("tty gone")),
            || panic!("read after a failed poll"),
        );
        assert_eq!(event, Some(Event::Quit));

        // The queue reads as empty afterwards so a drain pass terminates.
        assert_eq!(
            backend.next_event(|| Err(io::Error::other("tty gone")), || panic!("read")),
            None
        );
        assert_eq!(
            backend.next_event(|| panic!("poll after failure"), || panic!("read")),
            None
        );
    }

    #[test]
    fn test_read_failure_stops() {
        let mut backend = TerminalBackend::new(60);
        let event = backend.next_event(|| Ok(true), || Err(io::Error::other("bad input")));
        assert_eq!(event, Some(Event::Quit));
        assert_eq!(backend.next_event(|| Ok(true), || panic!("read")), None);
    }

    /// Paint `rects` of a 100x50 window onto a 10x5 cell buffer, one canvas
    /// point per cell, and return the painted cells.
    fn painted_cells(rects: &[FRect]) -> Vec<(u16, u16)> {
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        Canvas::default()
            .marker(Marker::Block)
            .x_bounds([0.0, 100.0])
            .y_bounds([0.0, 50.0])
            .paint(|ctx| {
                ctx.draw(&FilledRects {
                    rects,
                    color: Color::Red,
                    width: 100.0,
                    height: 50.0,
                })
            })
            .render(area, &mut buf);

        let mut painted = Vec::new();
        for y in 0..area.height {
            for x in 0..area.width {
                if buf[(x, y)].symbol() != " " {
                    painted.push((x, y));
                }
            }
        }
        painted
    }

    #[test]
    fn test_rect_clipped_at_top_left() {
        let rect = FRect {
            x: -5.0,
            y: -5.0,
            w: 20.0,
            h: 20.0,
        };
        assert_eq!(painted_cells(&[rect]), vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_rect_clipped_at_right_edge() {
        let rect = FRect {
            x: 90.0,
            y: 15.0,
            w: 30.0,
            h: 13.0,
        };
        assert_eq!(painted_cells(&[rect]), vec![(8, 1), (9, 1), (8, 2), (9, 2)]);
    }

    #[test]
    fn test_offscreen_rects_paint_nothing() {
        let rects = [
            FRect {
                x: 150.0,
                y: 10.0,
                w: 5.0,
                h: 5.0,
            },
            FRect {
                x: 10.0,
                y: -30.0,
                w: 5.0,
                h: 5.0,
            },
            FRect {
                x: 10.0,
                y: 60.0,
                w: 5.0,
                h: 5.0,
            },
        ];
        assert!(painted_cells(&rects).is_empty());
    }
}
