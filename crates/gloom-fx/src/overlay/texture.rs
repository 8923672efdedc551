use crate::coords::Viewport;
use crate::paint::Color;
use crate::render::{BlendMode, Canvas, CanvasError, TextureId, TextureLock};
use crate::time::ScopedTimer;

/// Backing texture plus dirty/rebuild bookkeeping shared by all overlays.
#[derive(Debug)]
pub(crate) struct OverlayTexture {
    label: &'static str,
    id: Option<TextureId>,
    size: Viewport,
    dirty: bool,
    rebuilds: u64,
    // Set while rebuilds keep failing; limits logging to one line per streak.
    failing: bool,
    timer_level: log::Level,
}

impl OverlayTexture {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            id: None,
            size: Viewport::default(),
            dirty: true,
            rebuilds: 0,
            failing: false,
            timer_level: log::Level::Debug,
        }
    }

    /// Reports rebuild timings at `level` (per-frame generators use trace).
    pub fn with_timer_level(mut self, level: log::Level) -> Self {
        self.timer_level = level;
        self
    }

    /// Replaces the backing texture with a fresh one of `size`.
    ///
    /// Any previous texture is released first, so a failure leaves the
    /// overlay without a texture.
    pub fn allocate(&mut self, canvas: &mut dyn Canvas, size: Viewport) -> Result<(), CanvasError> {
        self.release(canvas);
        let id = canvas.create_texture(size.width, size.height)?;
        self.id = Some(id);
        self.size = size;
        self.dirty = true;
        self.failing = false;
        Ok(())
    }

    pub fn release(&mut self, canvas: &mut dyn Canvas) {
        if let Some(id) = self.id.take() {
            canvas.destroy_texture(id);
        }
        self.size = Viewport::default();
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.id.is_some()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    #[inline]
    pub fn size(&self) -> Viewport {
        self.size
    }

    /// Regenerates the texture through `fill` if dirty.
    ///
    /// Returns `true` if the texture is up to date afterwards. A failed lock
    /// leaves the dirty flag set.
    pub fn refresh(&mut self, canvas: &mut dyn Canvas, fill: impl FnOnce(&mut TextureLock<'_>)) -> bool {
        let Some(id) = self.id else {
            return false;
        };
        if !self.dirty {
            return true;
        }

        let _t = ScopedTimer::new(self.label).at_level(self.timer_level);
        match canvas.lock_texture(id) {
            Ok(mut lock) => {
                fill(&mut lock);
                self.dirty = false;
                self.rebuilds += 1;
                if self.failing {
                    log::debug!("{}: rebuild recovered", self.label);
                    self.failing = false;
                }
                true
            }
            Err(e) => {
                if !self.failing {
                    log::debug!("{}: rebuild failed ({e}); retrying next frame", self.label);
                    self.failing = true;
                }
                false
            }
        }
    }

    /// Refreshes if needed, then stretches the texture over the target.
    ///
    /// Returns whether anything was drawn.
    pub fn draw(
        &mut self,
        canvas: &mut dyn Canvas,
        blend: BlendMode,
        color_mod: Color,
        fill: impl FnOnce(&mut TextureLock<'_>),
    ) -> bool {
        if !self.refresh(canvas, fill) {
            return false;
        }
        let Some(id) = self.id else {
            return false;
        };
        match canvas.copy_texture(id, blend, color_mod) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("{}: copy failed ({e})", self.label);
                false
            }
        }
    }
}
