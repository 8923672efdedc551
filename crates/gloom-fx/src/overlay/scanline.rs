use crate::coords::Viewport;
use crate::paint::Color;
use crate::render::{BlendMode, Canvas, CanvasError, TextureLock};

use super::texture::OverlayTexture;
use super::{clamp_unit, store, unit_to_byte};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScanlineParams {
    /// Fraction of brightness removed on darkened rows, `[0, 1]`.
    pub darkness: f32,
    /// Every `spacing`-th row is darkened, starting at row 0. At least 1.
    pub spacing: u32,
    pub enabled: bool,
}

impl Default for ScanlineParams {
    fn default() -> Self {
        Self {
            darkness: 0.18,
            spacing: 2,
            enabled: true,
        }
    }
}

impl ScanlineParams {
    pub fn clamped(self) -> Self {
        Self {
            darkness: clamp_unit(self.darkness),
            spacing: self.spacing.max(1),
            ..self
        }
    }

    /// Texel for row `y`.
    #[inline]
    pub fn row_texel(&self, y: u32) -> Color {
        if y % self.spacing.max(1) == 0 {
            Color::gray(unit_to_byte(1.0 - self.darkness))
        } else {
            Color::WHITE
        }
    }
}

/// Full-resolution row mask multiplied over the target.
#[derive(Debug)]
pub struct ScanlineOverlay {
    params: ScanlineParams,
    texture: OverlayTexture,
}

impl Default for ScanlineOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanlineOverlay {
    pub fn new() -> Self {
        Self {
            params: ScanlineParams::default(),
            texture: OverlayTexture::new("scanline rebuild"),
        }
    }

    pub fn init(
        &mut self,
        canvas: &mut dyn Canvas,
        width: u32,
        height: u32,
        params: ScanlineParams,
    ) -> Result<(), CanvasError> {
        let target = Viewport::new(width, height);
        if !target.is_valid() {
            self.texture.release(canvas);
            return Err(CanvasError::EmptyTexture { width, height });
        }
        self.params = params.clamped();
        self.texture.allocate(canvas, target)?;
        let params = self.params;
        self.texture.refresh(canvas, |lock| paint(&params, lock));
        Ok(())
    }

    pub fn destroy(&mut self, canvas: &mut dyn Canvas) {
        self.texture.release(canvas);
    }

    #[inline]
    pub fn params(&self) -> ScanlineParams {
        self.params
    }

    pub fn set_params(&mut self, params: ScanlineParams) {
        self.set_darkness(params.darkness);
        self.set_spacing(params.spacing);
        self.set_enabled(params.enabled);
    }

    pub fn set_darkness(&mut self, v: f32) {
        if store(&mut self.params.darkness, clamp_unit(v)) {
            self.texture.mark_dirty();
        }
    }

    pub fn set_spacing(&mut self, rows: u32) {
        if store(&mut self.params.spacing, rows.max(1)) {
            self.texture.mark_dirty();
        }
    }

    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.params.enabled = enabled;
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.texture.is_ready()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.texture.is_dirty()
    }

    #[inline]
    pub fn rebuild_count(&self) -> u64 {
        self.texture.rebuilds()
    }

    #[inline]
    pub fn texture_size(&self) -> Viewport {
        self.texture.size()
    }

    pub fn render(&mut self, canvas: &mut dyn Canvas) -> bool {
        if !self.params.enabled || !self.texture.is_ready() {
            return false;
        }
        let params = self.params;
        self.texture
            .draw(canvas, BlendMode::Modulate, Color::WHITE, |lock| paint(&params, lock))
    }
}

fn paint(params: &ScanlineParams, lock: &mut TextureLock<'_>) {
    lock.for_each_row(|y, row| row.fill(params.row_texel(y)));
}
