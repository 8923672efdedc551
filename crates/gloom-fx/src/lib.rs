//! Gloom frame effects.
//!
//! Frame-boundary layer for a host-owned 2D renderer: procedural overlays
//! (vignette, film grain, scanlines), a camera-relative parallax dust field,
//! and a sleep + spin frame limiter, composed by [`frame::FrameOrchestrator`].
//!
//! The renderer is reached only through [`render::Canvas`];
//! [`render::SoftwareCanvas`] is a CPU implementation.

pub mod coords;
pub mod dust;
pub mod frame;
pub mod logging;
pub mod overlay;
pub mod paint;
pub mod render;
pub mod time;

pub use frame::{EffectLevels, EffectsConfig, FrameError, FrameOrchestrator, FrameReport, FrameState};
