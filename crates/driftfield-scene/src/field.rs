//! Particle field simulation (stateful).

use driftfield_core::{FPoint, FRect};
use rand::Rng;

/// Window area particles move through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether a particle at `position` has left the window and must respawn.
    pub fn wraps(&self, position: FPoint) -> bool {
        position.x >= self.width || position.y >= self.height
    }
}

/// Inclusive range of particle speeds in pixels per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedRange {
    pub min: f32,
    pub max: f32,
}

impl SpeedRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

/// A single moving point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: FPoint,
    /// Pixels per second, applied to both axes.
    pub speed: f32,
}

/// A fixed population of particles drifting diagonally across the window.
///
/// Positions, speeds and rectangles are stored in index-aligned vectors so
/// the renderer can borrow the point and rectangle slices directly.
#[derive(Debug)]
pub struct ParticleField<R> {
    positions: Vec<FPoint>,
    speeds: Vec<f32>,
    rects: Vec<FRect>,
    bounds: Bounds,
    half_size: f32,
    speed_range: SpeedRange,
    rng: R,
}

impl<R: Rng> ParticleField<R> {
    /// Create `n` particles at random positions with random speeds.
    ///
    /// # Panics
    ///
    /// Panics if `bounds` has a non-positive dimension or `speed_range` is
    /// inverted, as no sample can be drawn from an empty range.
    pub fn initialize(
        n: usize,
        bounds: Bounds,
        half_size: f32,
        speed_range: SpeedRange,
        rng: R,
    ) -> Self {
        let mut field = Self::with_capacity(n, bounds, half_size, speed_range, rng);
        for _ in 0..n {
            let position = FPoint::new(
                field.rng.gen_range(0.0..bounds.width),
                field.rng.gen_range(0.0..bounds.height),
            );
            let speed = field.sample_speed();
            field.push(Particle { position, speed });
        }
        field
    }

    /// Create a field from explicit particles.
    ///
    /// Speeds outside `speed_range` are clamped into it.
    pub fn from_particles(
        particles: impl IntoIterator<Item = Particle>,
        bounds: Bounds,
        half_size: f32,
        speed_range: SpeedRange,
        rng: R,
    ) -> Self {
        let particles = particles.into_iter();
        let mut field =
            Self::with_capacity(particles.size_hint().0, bounds, half_size, speed_range, rng);
        for particle in particles {
            let speed = particle.speed.clamp(speed_range.min, speed_range.max);
            field.push(Particle { speed, ..particle });
        }
        field
    }

    /// Advance every particle by `dt` seconds.
    ///
    /// A particle that reaches the right or bottom edge re-enters from the
    /// top or the left edge (chosen by coin flip, not by the edge it crossed)
    /// with a freshly sampled speed. Overflow distance is discarded.
    pub fn tick(&mut self, dt: f32) {
        for i in 0..self.positions.len() {
            let distance = dt * self.speeds[i];
            let mut position = self.positions[i];
            position.x += distance;
            position.y += distance;

            if self.bounds.wraps(position) {
                position = self.respawn_position();
                self.speeds[i] = self.sample_speed();
            }

            self.positions[i] = position;
            self.rects[i] = FRect::centered(position, self.half_size);
        }
    }

    fn respawn_position(&mut self) -> FPoint {
        if self.rng.gen_bool(0.5) {
            FPoint::new(self.rng.gen_range(0.0..self.bounds.width), 0.0)
        } else {
            FPoint::new(0.0, self.rng.gen_range(0.0..self.bounds.height))
        }
    }

    fn sample_speed(&mut self) -> f32 {
        self.rng.gen_range(self.speed_range.min..=self.speed_range.max)
    }
}

impl<R> ParticleField<R> {
    fn with_capacity(
        n: usize,
        bounds: Bounds,
        half_size: f32,
        speed_range: SpeedRange,
        rng: R,
    ) -> Self {
        Self {
            positions: Vec::with_capacity(n),
            speeds: Vec::with_capacity(n),
            rects: Vec::with_capacity(n),
            bounds,
            half_size,
            speed_range,
            rng,
        }
    }

    fn push(&mut self, particle: Particle) {
        self.positions.push(particle.position);
        self.speeds.push(particle.speed);
        self.rects.push(FRect::centered(particle.position, self.half_size));
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Particle at `index`, if any.
    pub fn particle(&self, index: usize) -> Option<Particle> {
        Some(Particle {
            position: *self.positions.get(index)?,
            speed: self.speeds[index],
        })
    }

    /// Particle centers, drawn as single points.
    pub fn points(&self) -> &[FPoint] {
        &self.positions
    }

    /// Squares around each particle, index-aligned with [`Self::points`].
    pub fn rects(&self) -> &[FRect] {
        &self.rects
    }

    pub fn speeds(&self) -> &[f32] {
        &self.speeds
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}
