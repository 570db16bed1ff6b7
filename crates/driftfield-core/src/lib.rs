//! Core types shared across the driftfield crates.

use ratatui::style::Color;

/// A color with floating point channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Per-channel complement (`1 - c`).
    pub fn inverted(self) -> Self {
        Self::new(1.0 - self.r, 1.0 - self.g, 1.0 - self.b)
    }

    /// Perceptual brightness using Rec. 709 weights.
    pub fn luma(self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color::Rgb(channel(rgb.r), channel(rgb.g), channel(rgb.b))
    }
}

/// A point in window coordinates (y grows downward).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FPoint {
    pub x: f32,
    pub y: f32,
}

impl FPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in window coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl FRect {
    /// Square of side `2 * half_size` centered on `center`.
    pub fn centered(center: FPoint, half_size: f32) -> Self {
        Self {
            x: center.x - half_size,
            y: center.y - half_size,
            w: 2.0 * half_size,
            h: 2.0 * half_size,
        }
    }
}

/// Physical key identifier carried by keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scancode {
    Escape,
    Char(char),
    Other,
}

/// Input events delivered by a graphics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The user asked to close the window.
    Quit,
    /// A key was released.
    KeyUp { scancode: Scancode },
    /// Anything the demo does not react to.
    Other,
}

/// Window creation flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowFlags {
    pub resizable: bool,
}
