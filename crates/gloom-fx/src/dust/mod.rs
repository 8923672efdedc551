//! Camera-relative parallax dust.
//!
//! A bounded pool of motes lives in camera space (x right, y up, z forward).
//! Each frame the pool is resized to a density-derived count, advanced under
//! the camera motion sample, projected with a pinhole model, culled or
//! recycled, and drawn as alpha-blended squares.
//!
//! Intended usage:
//! - call [`ParallaxParticleField::update`] once per world frame
//! - then [`ParallaxParticleField::draw`] before any post overlay
//!
//! Particles are never freed individually; leaving the depth range or the
//! screen resamples the position in place.

mod field;
mod particle;

pub use field::{DustConfig, ParallaxParticleField};
pub use particle::{CameraMotion, DustParticle, Projection};
