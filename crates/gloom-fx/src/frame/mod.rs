//! Frame-boundary composition.
//!
//! [`FrameOrchestrator`] brackets the host's scene draw:
//! - `begin_frame` starts the timer and pulls effect settings from an
//!   [`EffectsConfig`]
//! - the host draws its scene and calls `mark_world_frame` if it drew the world
//! - `end_frame_present` composites dust, grain, scanlines and vignette in that
//!   order, presents, then paces to the target rate
//!
//! Discrete setting levels map to overlay parameters through the fixed tables
//! in [`levels`].

mod config;
mod error;
pub mod levels;
mod orchestrator;

pub use config::{EffectLevels, EffectsConfig};
pub use error::FrameError;
pub use orchestrator::{FrameOrchestrator, FrameReport, FrameState};
