use gloom_fx::coords::{Rect, Viewport};
use gloom_fx::paint::Color;
use gloom_fx::render::{BlendMode, Canvas, CanvasError, SoftwareCanvas, TextureId, TextureLock};

use crate::gpu::{Gpu, SurfaceErrorAction};

/// Software canvas whose `present` also puts the frame on screen.
///
/// Built per frame around borrowed state; drawing goes to the software
/// canvas, presenting uploads its front buffer through [`Gpu`].
pub struct WindowCanvas<'a, 'w> {
    soft: &'a mut SoftwareCanvas,
    gpu: &'a mut Gpu<'w>,
    fatal: bool,
}

impl<'a, 'w> WindowCanvas<'a, 'w> {
    pub fn new(soft: &'a mut SoftwareCanvas, gpu: &'a mut Gpu<'w>) -> Self {
        Self { soft, gpu, fatal: false }
    }

    /// The surface reported an unrecoverable error during `present`.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }
}

impl Canvas for WindowCanvas<'_, '_> {
    fn output_size(&self) -> Viewport {
        self.soft.output_size()
    }

    fn clear(&mut self, color: Color) {
        self.soft.clear(color);
    }

    fn create_texture(&mut self, width: u32, height: u32) -> Result<TextureId, CanvasError> {
        self.soft.create_texture(width, height)
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.soft.destroy_texture(texture);
    }

    fn lock_texture(&mut self, texture: TextureId) -> Result<TextureLock<'_>, CanvasError> {
        self.soft.lock_texture(texture)
    }

    fn copy_texture(&mut self, texture: TextureId, blend: BlendMode, color_mod: Color) -> Result<(), CanvasError> {
        self.soft.copy_texture(texture, blend, color_mod)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, blend: BlendMode) {
        self.soft.fill_rect(rect, color, blend);
    }

    fn present(&mut self) {
        self.soft.present();
        let size = self.soft.output_size();
        if let Err(err) = self.gpu.present_rgba(self.soft.front_bytes(), size.width, size.height) {
            match self.gpu.handle_surface_error(err.clone()) {
                SurfaceErrorAction::Fatal => {
                    log::error!("surface lost for good: {err}");
                    self.fatal = true;
                }
                action => log::debug!("present skipped ({action:?}): {err}"),
            }
        }
    }
}
