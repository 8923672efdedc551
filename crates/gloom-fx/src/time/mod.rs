//! Time subsystem.
//!
//! Frame timing and pacing without coupling to a runtime.
//! Intended usage:
//! - one `FrameTimer` per render loop
//! - call `begin_frame()` at the top of the frame to obtain `FrameTime`
//! - call `end_frame_and_pace(target_fps)` after presenting

mod frame_timer;
mod scoped;

pub use frame_timer::{FrameTime, FrameTimer, PacePlan};
pub use scoped::ScopedTimer;
