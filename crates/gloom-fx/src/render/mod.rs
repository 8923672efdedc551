//! Render seam.
//!
//! The host owns the 2D renderer. Overlays and the dust field only borrow it
//! for the duration of a call through the [`Canvas`] trait, mirroring a
//! classic streaming-texture renderer (create, lock, copy, fill, present).
//!
//! Convention:
//! - textures are RGBA8 straight alpha (`paint::Color`), rows may be padded
//! - texture copies always stretch the whole texture over the whole target
//! - geometry is in target pixels (top-left origin, +Y down)

mod canvas;
mod error;
mod software;

pub use canvas::{BlendMode, Canvas, TextureId, TextureLock};
pub use error::CanvasError;
pub use software::{CanvasStats, SoftwareCanvas};
