//! CPU reference implementation of [`Canvas`].
//!
//! Intended usage:
//! - headless tests and benches of the effects layer
//! - hosts without a 2D renderer of their own upload the front buffer
//!   after `present`
//!
//! Texture rows are padded to `row_align` bytes so overlay generators are
//! always exercised against a pitch wider than the image.

use crate::coords::{Rect, Viewport};
use crate::paint::Color;

use super::{BlendMode, Canvas, CanvasError, TextureId, TextureLock};

/// Default texture row alignment in bytes.
pub const DEFAULT_ROW_ALIGN: usize = 256;

/// Operation counters, mostly for tests.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CanvasStats {
    pub textures_created: u64,
    pub textures_destroyed: u64,
    pub locks: u64,
    pub copies: u64,
    pub fills: u64,
    pub presents: u64,
}

#[derive(Debug)]
struct SoftTexture {
    width: u32,
    height: u32,
    pitch: usize,
    bytes: Vec<u8>,
}

impl SoftTexture {
    #[inline]
    fn texel(&self, x: u32, y: u32) -> Color {
        let i = y as usize * self.pitch + x as usize * 4;
        Color::rgba(self.bytes[i], self.bytes[i + 1], self.bytes[i + 2], self.bytes[i + 3])
    }
}

/// Software render target with a back buffer, a presented front buffer, and
/// a slab of streaming textures.
#[derive(Debug)]
pub struct SoftwareCanvas {
    size: Viewport,
    back: Vec<Color>,
    front: Vec<Color>,
    textures: Vec<Option<SoftTexture>>,
    row_align: usize,
    fail_allocations: u32,
    fail_locks: u32,
    stats: CanvasStats,
}

impl SoftwareCanvas {
    /// Creates a black canvas of `width x height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        let size = Viewport::new(width, height);
        let n = width as usize * height as usize;
        Self {
            size,
            back: vec![Color::BLACK; n],
            front: vec![Color::BLACK; n],
            textures: Vec::new(),
            row_align: DEFAULT_ROW_ALIGN,
            fail_allocations: 0,
            fail_locks: 0,
            stats: CanvasStats::default(),
        }
    }

    /// Sets the row alignment used for textures created from now on.
    /// Values below 4 are raised to 4.
    pub fn with_row_alignment(mut self, align: usize) -> Self {
        self.row_align = align.max(4);
        self
    }

    /// Resizes both buffers and clears them to black. Textures are kept.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = Viewport::new(width, height);
        let n = width as usize * height as usize;
        self.back.clear();
        self.back.resize(n, Color::BLACK);
        self.front.clear();
        self.front.resize(n, Color::BLACK);
    }

    /// The next `n` texture allocations fail.
    pub fn fail_next_allocations(&mut self, n: u32) {
        self.fail_allocations = n;
    }

    /// The next `n` texture locks fail.
    pub fn fail_next_locks(&mut self, n: u32) {
        self.fail_locks = n;
    }

    #[inline]
    pub fn stats(&self) -> CanvasStats {
        self.stats
    }

    /// Number of textures currently alive.
    pub fn live_textures(&self) -> usize {
        self.textures.iter().filter(|t| t.is_some()).count()
    }

    /// Size of a live texture.
    pub fn texture_size(&self, texture: TextureId) -> Option<Viewport> {
        self.texture(texture).map(|t| Viewport::new(t.width, t.height))
    }

    /// Reads one texel of a live texture.
    pub fn texel(&self, texture: TextureId, x: u32, y: u32) -> Option<Color> {
        let t = self.texture(texture)?;
        (x < t.width && y < t.height).then(|| t.texel(x, y))
    }

    /// Back buffer pixel (the frame being drawn).
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|i| self.back[i])
    }

    /// Front buffer pixel (the last presented frame).
    pub fn front_pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|i| self.front[i])
    }

    /// Back buffer for direct drawing, row-major without padding.
    #[inline]
    pub fn back_buffer_mut(&mut self) -> &mut [Color] {
        &mut self.back
    }

    /// Last presented frame as tightly packed RGBA8 bytes.
    #[inline]
    pub fn front_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.front)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.size.width && y < self.size.height)
            .then(|| y as usize * self.size.width as usize + x as usize)
    }

    fn texture(&self, texture: TextureId) -> Option<&SoftTexture> {
        self.textures.get(texture.raw() as usize)?.as_ref()
    }

    fn padded_pitch(&self, width: u32) -> usize {
        let row = width as usize * 4;
        row.div_ceil(self.row_align) * self.row_align
    }
}

impl Canvas for SoftwareCanvas {
    #[inline]
    fn output_size(&self) -> Viewport {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.back.fill(color);
    }

    fn create_texture(&mut self, width: u32, height: u32) -> Result<TextureId, CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::EmptyTexture { width, height });
        }
        if self.fail_allocations > 0 {
            self.fail_allocations -= 1;
            return Err(CanvasError::AllocationFailed(format!("injected failure for {width}x{height}")));
        }

        let pitch = self.padded_pitch(width);
        let tex = SoftTexture {
            width,
            height,
            pitch,
            bytes: vec![0; pitch * height as usize],
        };

        // Reuse the first free slot so ids stay small across rebuilds.
        let slot = match self.textures.iter().position(Option::is_none) {
            Some(i) => {
                self.textures[i] = Some(tex);
                i
            }
            None => {
                self.textures.push(Some(tex));
                self.textures.len() - 1
            }
        };
        self.stats.textures_created += 1;
        Ok(TextureId::from_raw(slot as u32))
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        if let Some(slot) = self.textures.get_mut(texture.raw() as usize) {
            if slot.take().is_some() {
                self.stats.textures_destroyed += 1;
            }
        }
    }

    fn lock_texture(&mut self, texture: TextureId) -> Result<TextureLock<'_>, CanvasError> {
        if self.fail_locks > 0 {
            self.fail_locks -= 1;
            return Err(CanvasError::LockFailed(texture));
        }
        let tex = self
            .textures
            .get_mut(texture.raw() as usize)
            .and_then(Option::as_mut)
            .ok_or(CanvasError::UnknownTexture(texture))?;
        self.stats.locks += 1;
        TextureLock::new(&mut tex.bytes, tex.pitch, tex.width, tex.height)
    }

    fn copy_texture(&mut self, texture: TextureId, blend: BlendMode, color_mod: Color) -> Result<(), CanvasError> {
        let Viewport { width: w, height: h } = self.size;
        let tex = self
            .textures
            .get(texture.raw() as usize)
            .and_then(Option::as_ref)
            .ok_or(CanvasError::UnknownTexture(texture))?;

        let modulate = !color_mod.is_white();
        for y in 0..h {
            // Nearest sample: target pixel `p` reads texel `p * tex / target`.
            let ty = (u64::from(y) * u64::from(tex.height) / u64::from(h)) as u32;
            let row = &mut self.back[y as usize * w as usize..(y as usize + 1) * w as usize];
            for (x, dst) in row.iter_mut().enumerate() {
                let tx = (x as u64 * u64::from(tex.width) / u64::from(w)) as u32;
                let mut src = tex.texel(tx, ty);
                if modulate {
                    src = src.modulate(color_mod);
                }
                *dst = blend.apply(*dst, src);
            }
        }
        self.stats.copies += 1;
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, blend: BlendMode) {
        let Some(span) = rect.pixel_span(self.size) else {
            return;
        };
        let w = self.size.width as usize;
        for y in span.y0..span.y1 {
            let base = y as usize * w;
            for dst in &mut self.back[base + span.x0 as usize..base + span.x1 as usize] {
                *dst = blend.apply(*dst, color);
            }
        }
        self.stats.fills += 1;
    }

    fn present(&mut self) {
        self.front.copy_from_slice(&self.back);
        self.stats.presents += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_texture(canvas: &mut SoftwareCanvas, w: u32, h: u32, c: Color) -> TextureId {
        let id = canvas.create_texture(w, h).unwrap();
        let mut lock = canvas.lock_texture(id).unwrap();
        lock.for_each_row(|_, row| row.fill(c));
        id
    }

    // ── textures ──────────────────────────────────────────────────────────

    #[test]
    fn rows_are_padded_to_alignment() {
        let mut c = SoftwareCanvas::new(8, 8);
        let id = c.create_texture(3, 2).unwrap();
        let lock = c.lock_texture(id).unwrap();
        assert_eq!(lock.pitch(), DEFAULT_ROW_ALIGN);
    }

    #[test]
    fn empty_texture_is_rejected() {
        let mut c = SoftwareCanvas::new(8, 8);
        assert_eq!(c.create_texture(0, 4), Err(CanvasError::EmptyTexture { width: 0, height: 4 }));
    }

    #[test]
    fn destroyed_slots_are_reused() {
        let mut c = SoftwareCanvas::new(8, 8);
        let a = c.create_texture(2, 2).unwrap();
        let _b = c.create_texture(2, 2).unwrap();
        c.destroy_texture(a);
        assert_eq!(c.live_textures(), 1);
        let again = c.create_texture(4, 4).unwrap();
        assert_eq!(again, a);
        assert_eq!(c.texture_size(again), Some(Viewport::new(4, 4)));
    }

    #[test]
    fn destroy_twice_counts_once() {
        let mut c = SoftwareCanvas::new(8, 8);
        let a = c.create_texture(2, 2).unwrap();
        c.destroy_texture(a);
        c.destroy_texture(a);
        assert_eq!(c.stats().textures_destroyed, 1);
    }

    #[test]
    fn injected_failures_are_consumed() {
        let mut c = SoftwareCanvas::new(8, 8);
        c.fail_next_allocations(1);
        assert!(matches!(c.create_texture(2, 2), Err(CanvasError::AllocationFailed(_))));
        let id = c.create_texture(2, 2).unwrap();

        c.fail_next_locks(1);
        assert!(matches!(c.lock_texture(id), Err(CanvasError::LockFailed(_))));
        assert!(c.lock_texture(id).is_ok());
    }

    // ── copy ──────────────────────────────────────────────────────────────

    #[test]
    fn copy_stretches_nearest() {
        let mut c = SoftwareCanvas::new(4, 4);
        let id = c.create_texture(2, 1).unwrap();
        {
            let mut lock = c.lock_texture(id).unwrap();
            let row = lock.row_mut(0);
            row[0] = Color::gray(10);
            row[1] = Color::gray(20);
        }
        c.copy_texture(id, BlendMode::None, Color::WHITE).unwrap();
        assert_eq!(c.pixel(0, 3), Some(Color::gray(10)));
        assert_eq!(c.pixel(1, 0), Some(Color::gray(10)));
        assert_eq!(c.pixel(2, 0), Some(Color::gray(20)));
        assert_eq!(c.pixel(3, 3), Some(Color::gray(20)));
    }

    #[test]
    fn copy_applies_color_mod_before_blend() {
        let mut c = SoftwareCanvas::new(2, 2);
        c.clear(Color::gray(200));
        let id = solid_texture(&mut c, 1, 1, Color::WHITE);
        c.copy_texture(id, BlendMode::Modulate, Color::rgb(255, 128, 0)).unwrap();
        assert_eq!(c.pixel(1, 1), Some(Color::rgb(200, 100, 0)));
    }

    #[test]
    fn copy_of_unknown_texture_fails() {
        let mut c = SoftwareCanvas::new(2, 2);
        let bogus = TextureId::from_raw(7);
        assert_eq!(
            c.copy_texture(bogus, BlendMode::Blend, Color::WHITE),
            Err(CanvasError::UnknownTexture(bogus))
        );
    }

    // ── fill / present ────────────────────────────────────────────────────

    #[test]
    fn fill_rect_is_clipped() {
        let mut c = SoftwareCanvas::new(4, 4);
        c.fill_rect(Rect::new(2.0, 2.0, 10.0, 10.0), Color::WHITE, BlendMode::None);
        assert_eq!(c.pixel(1, 1), Some(Color::BLACK));
        assert_eq!(c.pixel(3, 3), Some(Color::WHITE));
    }

    #[test]
    fn present_publishes_back_buffer() {
        let mut c = SoftwareCanvas::new(2, 2);
        c.clear(Color::gray(50));
        assert_eq!(c.front_pixel(0, 0), Some(Color::BLACK));
        c.present();
        assert_eq!(c.front_pixel(0, 0), Some(Color::gray(50)));
        assert_eq!(c.front_bytes().len(), 16);
    }
}
