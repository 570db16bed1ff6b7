//! Scene simulation for driftfield.
//!
//! This crate holds the stateful particle field, which advances every frame
//! and respawns particles that leave the window, and the stateless color
//! schedule computed from elapsed time alone.

mod colors;
mod field;

pub use colors::{PointColor, SceneColors, colors_at};
pub use field::{Bounds, Particle, ParticleField, SpeedRange};
