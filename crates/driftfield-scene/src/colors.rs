//! Time-driven scene colors.

use std::f64::consts::PI;

use driftfield_core::Rgb;

/// Luma at or below which points are drawn black.
const POINT_LUMA_THRESHOLD: f32 = 0.5;

/// Color of the single-pixel points drawn on top of the rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointColor {
    Black,
    White,
}

impl PointColor {
    /// Pick the point color that contrasts with a background.
    pub fn contrasting(background: Rgb) -> Self {
        if background.luma() <= POINT_LUMA_THRESHOLD {
            PointColor::Black
        } else {
            PointColor::White
        }
    }

    pub fn rgb(self) -> Rgb {
        match self {
            PointColor::Black => Rgb::BLACK,
            PointColor::White => Rgb::WHITE,
        }
    }
}

/// Colors used to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneColors {
    pub background: Rgb,
    /// Per-channel complement of the background.
    pub foreground: Rgb,
    pub point: PointColor,
}

/// Scene colors at `t` seconds.
///
/// Each background channel follows `0.5 + 0.5 * sin(t + phase)` with the
/// three phases 120 degrees apart, so the hue cycles with a period of `2π`
/// seconds.
pub fn colors_at(t: f64) -> SceneColors {
    let channel = |phase: f64| (0.5 + 0.5 * (t + phase).sin()) as f32;
    let background = Rgb::new(channel(0.0), channel(PI * 2.0 / 3.0), channel(PI * 4.0 / 3.0));

    SceneColors {
        background,
        foreground: background.inverted(),
        point: PointColor::contrasting(background),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn sample_times() -> impl Iterator<Item = f64> {
        (0..2000).map(|i| i as f64 * 0.01 - 5.0)
    }

    #[test]
    fn test_colors_at_zero() {
        let colors = colors_at(0.0);
        let expected_g = (0.5 + 0.5 * (2.0 * PI / 3.0).sin()) as f32;
        let expected_b = (0.5 + 0.5 * (4.0 * PI / 3.0).sin()) as f32;
        assert!((colors.background.r - 0.5).abs() < EPSILON);
        assert!((colors.background.g - expected_g).abs() < EPSILON);
        assert!((colors.background.b - expected_b).abs() < EPSILON);
    }

    #[test]
    fn test_foreground_is_complement() {
        for t in sample_times() {
            let colors = colors_at(t);
            assert!((colors.foreground.r - (1.0 - colors.background.r)).abs() < EPSILON);
            assert!((colors.foreground.g - (1.0 - colors.background.g)).abs() < EPSILON);
            assert!((colors.foreground.b - (1.0 - colors.background.b)).abs() < EPSILON);
        }
    }

    #[test]
    fn test_point_color_follows_luma() {
        for t in sample_times() {
            let colors = colors_at(t);
            let dark = colors.background.luma() <= 0.5;
            assert_eq!(dark, colors.point == PointColor::Black, "t = {t}");
        }
    }

    #[test]
    fn test_channels_stay_in_unit_range() {
        for t in sample_times() {
            let bg = colors_at(t).background;
            for c in [bg.r, bg.g, bg.b] {
                assert!((0.0..=1.0).contains(&c));
            }
        }
    }

    #[test]
    fn test_period_is_two_pi() {
        let a = colors_at(1.25);
        let b = colors_at(1.25 + 2.0 * PI);
        assert!((a.background.r - b.background.r).abs() < 1e-5);
        assert!((a.background.g - b.background.g).abs() < 1e-5);
        assert!((a.background.b - b.background.b).abs() < 1e-5);
    }

    #[test]
    fn test_contrasting_point_color() {
        assert_eq!(PointColor::contrasting(Rgb::new(0.4, 0.4, 0.4)), PointColor::Black);
        assert_eq!(PointColor::contrasting(Rgb::new(0.9, 0.9, 0.9)), PointColor::White);
        // Green dominates luma.
        assert_eq!(PointColor::contrasting(Rgb::new(0.0, 1.0, 0.0)), PointColor::White);
        assert_eq!(PointColor::contrasting(Rgb::new(1.0, 0.0, 1.0)), PointColor::Black);
    }
}
