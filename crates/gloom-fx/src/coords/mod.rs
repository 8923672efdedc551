//! Coordinate and geometry types shared by the overlays, the dust field and
//! the render seam.
//!
//! Canonical screen space:
//! - physical pixels of the render target
//! - origin top-left
//! - +X right, +Y down
//!
//! Camera space (dust only) is +X right, +Y up, +Z forward and lives in `glam::Vec3`.

mod rect;
mod viewport;

pub use glam::Vec2;
pub use rect::{PixelSpan, Rect};
pub use viewport::Viewport;

/// Clamps to `[0, 1]`; NaN maps to 0.
#[inline]
pub fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
