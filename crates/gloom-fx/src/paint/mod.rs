//! Color model shared by the overlays, the dust field and the render seam.
//!
//! Scope:
//! - 8-bit straight-alpha RGBA, which is also the texel layout of every texture
//! - channel arithmetic used by blending and tinting

pub mod color;

pub use color::{Color, mul_channel, unit_to_byte};
