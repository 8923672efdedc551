//! Procedural screen-space overlays.
//!
//! Each overlay owns one streaming texture filled by a CPU generator and
//! stretched over the whole target at draw time:
//! - [`VignetteOverlay`]: half resolution, modulate blend, tint as color mod
//! - [`GrainOverlay`]: one third resolution (64 px floor), alpha blend,
//!   regenerated on a frame cadence
//! - [`ScanlineOverlay`]: full resolution, modulate blend
//!
//! Shared lifecycle:
//! - `init` allocates and builds; on allocation failure the overlay stays
//!   inert until a later successful `init`
//! - setters clamp, and mark the texture dirty only when the stored value
//!   actually changes
//! - `render` rebuilds lazily; a failed rebuild skips the draw and retries
//!   on the next call
//! - `destroy` releases the texture

mod grain;
mod scanline;
mod texture;
mod vignette;

pub use grain::{GrainNoise, GrainOverlay, GrainParams};
pub use scanline::{ScanlineOverlay, ScanlineParams};
pub use vignette::{VignetteOverlay, VignetteParams, VignetteShape};

pub(crate) use crate::coords::clamp_unit;
pub(crate) use crate::paint::unit_to_byte;

/// Stores `v` into `slot` and reports whether the value changed.
#[inline]
pub(crate) fn store<T: PartialEq>(slot: &mut T, v: T) -> bool {
    if *slot == v {
        false
    } else {
        *slot = v;
        true
    }
}
