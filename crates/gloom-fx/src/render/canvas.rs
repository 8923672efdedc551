use crate::coords::{Rect, Viewport};
use crate::paint::{Color, mul_channel};

use super::CanvasError;

/// Opaque handle to a texture owned by a [`Canvas`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureId(u32);

impl TextureId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// How a source color is combined with the color already in the target.
///
/// Channel math is on `[0, 1]` values stored as bytes, with `sa` the source alpha:
/// - `None`:     `dst = src`
/// - `Blend`:    `dst = src * sa + dst * (1 - sa)`
/// - `Add`:      `dst = dst + src * sa` (saturating)
/// - `Modulate`: `dst = dst * src` (alpha ignored)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BlendMode {
    None,
    Blend,
    Add,
    Modulate,
}

impl BlendMode {
    /// Combines `src` over `dst`.
    pub fn apply(self, dst: Color, src: Color) -> Color {
        match self {
            BlendMode::None => src,
            BlendMode::Blend => {
                let sa = src.a;
                let inv = 255 - sa;
                let mix = |s: u8, d: u8| -> u8 {
                    ((u16::from(s) * u16::from(sa) + u16::from(d) * u16::from(inv) + 127) / 255) as u8
                };
                Color {
                    r: mix(src.r, dst.r),
                    g: mix(src.g, dst.g),
                    b: mix(src.b, dst.b),
                    a: sa.saturating_add(mul_channel(dst.a, inv)),
                }
            }
            BlendMode::Add => {
                let sa = src.a;
                Color {
                    r: dst.r.saturating_add(mul_channel(src.r, sa)),
                    g: dst.g.saturating_add(mul_channel(src.g, sa)),
                    b: dst.b.saturating_add(mul_channel(src.b, sa)),
                    a: dst.a,
                }
            }
            BlendMode::Modulate => dst.modulate(src),
        }
    }
}

/// Write access to a locked texture.
///
/// Rows are `pitch` bytes apart; only the first `width * 4` bytes of a row
/// belong to the image. Dropping the lock unlocks the texture.
pub struct TextureLock<'a> {
    pixels: &'a mut [u8],
    pitch: usize,
    width: u32,
    height: u32,
}

impl<'a> TextureLock<'a> {
    /// Wraps a mapped pixel buffer.
    ///
    /// Fails if a row is shorter than `width * 4` bytes or the buffer cannot
    /// hold `height` rows.
    pub fn new(pixels: &'a mut [u8], pitch: usize, width: u32, height: u32) -> Result<Self, CanvasError> {
        let row_bytes = width as usize * 4;
        if pitch < row_bytes {
            return Err(CanvasError::BadPitch { pitch, min: row_bytes });
        }
        let needed = match height {
            0 => 0,
            h => pitch * (h as usize - 1) + row_bytes,
        };
        if pixels.len() < needed {
            return Err(CanvasError::BadPitch { pitch, min: needed });
        }
        Ok(Self { pixels, pitch, width, height })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Texels of row `y`, padding excluded.
    ///
    /// # Panics
    /// If `y >= height`.
    pub fn row_mut(&mut self, y: u32) -> &mut [Color] {
        assert!(y < self.height, "row {y} out of range (height {})", self.height);
        let start = y as usize * self.pitch;
        let end = start + self.width as usize * 4;
        bytemuck::cast_slice_mut(&mut self.pixels[start..end])
    }

    /// Calls `f(y, row)` for every row, top to bottom.
    pub fn for_each_row(&mut self, mut f: impl FnMut(u32, &mut [Color])) {
        for y in 0..self.height {
            f(y, self.row_mut(y));
        }
    }
}

/// Host-owned 2D renderer as seen by the effects layer.
///
/// Implementations own every texture they create; handles stay valid until
/// `destroy_texture` or until the canvas itself is dropped.
pub trait Canvas {
    /// Size of the render target in pixels.
    fn output_size(&self) -> Viewport;

    /// Fills the whole target with `color` (no blending).
    fn clear(&mut self, color: Color);

    /// Allocates a streaming texture. Contents are unspecified until written.
    fn create_texture(&mut self, width: u32, height: u32) -> Result<TextureId, CanvasError>;

    /// Releases a texture. Unknown handles are ignored.
    fn destroy_texture(&mut self, texture: TextureId);

    /// Maps a texture for writing.
    fn lock_texture(&mut self, texture: TextureId) -> Result<TextureLock<'_>, CanvasError>;

    /// Draws `texture` stretched over the whole target.
    ///
    /// Texel color channels are multiplied by `color_mod` before blending.
    fn copy_texture(&mut self, texture: TextureId, blend: BlendMode, color_mod: Color) -> Result<(), CanvasError>;

    /// Fills `rect` with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Color, blend: BlendMode);

    /// Shows the finished frame.
    fn present(&mut self);
}
