use thiserror::Error;

use super::TextureId;

/// Failures reported by a [`Canvas`](super::Canvas) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    /// Requested texture has a zero-sized axis.
    #[error("texture size {width}x{height} is empty")]
    EmptyTexture { width: u32, height: u32 },

    /// Backend could not allocate the texture.
    #[error("texture allocation failed: {0}")]
    AllocationFailed(String),

    /// Backend refused to map the texture for writing.
    #[error("texture {0:?} could not be locked")]
    LockFailed(TextureId),

    /// Handle does not name a live texture.
    #[error("unknown texture {0:?}")]
    UnknownTexture(TextureId),

    /// Locked buffer rows are shorter than a texture row.
    #[error("row pitch {pitch} is smaller than {min} bytes")]
    BadPitch { pitch: usize, min: usize },
}
