use glam::Vec2;

use crate::coords::Viewport;
use crate::paint::Color;
use crate::render::{BlendMode, Canvas, CanvasError, TextureLock};

use super::texture::OverlayTexture;
use super::{clamp_unit, store, unit_to_byte};

/// Tunable vignette parameters.
///
/// Clamp rationale:
/// - `strength`, `radius`, `softness` are fractions in `[0, 1]`
/// - `tint` is applied as a color mod at draw time and never rebuilds
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VignetteParams {
    pub strength: f32,
    pub radius: f32,
    pub softness: f32,
    pub tint: Color,
    pub enabled: bool,
}

impl Default for VignetteParams {
    fn default() -> Self {
        Self {
            strength: 0.5,
            radius: 0.65,
            softness: 0.32,
            tint: Color::WHITE,
            enabled: true,
        }
    }
}

impl VignetteParams {
    pub fn clamped(self) -> Self {
        Self {
            strength: clamp_unit(self.strength),
            radius: clamp_unit(self.radius),
            softness: clamp_unit(self.softness),
            ..self
        }
    }
}

/// Closed-form attenuation of a vignette over a texture of a given size.
///
/// `f(r) = clamp(1 - strength * smoothstep(t))`, `t = clamp((r - inner) / soft)`,
/// with `r` the distance from the texture center,
/// `inner = radius * min(w, h) / 2` and `soft = max(1, softness * min(w, h) / 2)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VignetteShape {
    center: Vec2,
    inner: f32,
    soft: f32,
    strength: f32,
}

impl VignetteShape {
    pub fn new(params: &VignetteParams, size: Viewport) -> Self {
        let p = params.clamped();
        let half_min = size.min_dim() as f32 * 0.5;
        Self {
            // Center of the texel grid, so a texel at the middle sits at r = 0
            // for odd sizes and at r < 1 for even sizes.
            center: Vec2::new(
                (size.width.max(1) - 1) as f32 * 0.5,
                (size.height.max(1) - 1) as f32 * 0.5,
            ),
            inner: p.radius * half_min,
            soft: (p.softness * half_min).max(1.0),
            strength: p.strength,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Attenuation factor at distance `r` from the center, in `[0, 1]`.
    pub fn attenuation_at(&self, r: f32) -> f32 {
        let t = clamp_unit((r - self.inner) / self.soft);
        let s = t * t * (3.0 - 2.0 * t);
        clamp_unit(1.0 - self.strength * s)
    }

    /// Attenuation factor of texel `(x, y)`.
    #[inline]
    pub fn attenuation(&self, x: u32, y: u32) -> f32 {
        self.attenuation_at(Vec2::new(x as f32, y as f32).distance(self.center))
    }

    /// Texel value stored in the backing texture for `(x, y)`.
    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> Color {
        Color::gray(unit_to_byte(self.attenuation(x, y)))
    }
}

/// Darkens the screen edges by modulating with a radial falloff texture.
#[derive(Debug)]
pub struct VignetteOverlay {
    params: VignetteParams,
    texture: OverlayTexture,
}

impl Default for VignetteOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl VignetteOverlay {
    /// Backing texture is this fraction of the target on each axis.
    pub const RESOLUTION_DIVISOR: u32 = 2;

    pub fn new() -> Self {
        Self {
            params: VignetteParams::default(),
            texture: OverlayTexture::new("vignette rebuild"),
        }
    }

    /// Allocates a half-resolution texture for a `width x height` target and
    /// builds it.
    pub fn init(
        &mut self,
        canvas: &mut dyn Canvas,
        width: u32,
        height: u32,
        params: VignetteParams,
    ) -> Result<(), CanvasError> {
        let target = Viewport::new(width, height);
        if !target.is_valid() {
            self.texture.release(canvas);
            return Err(CanvasError::EmptyTexture { width, height });
        }
        self.params = params.clamped();
        self.texture.allocate(canvas, target.reduced(Self::RESOLUTION_DIVISOR, 1))?;
        self.rebuild(canvas);
        Ok(())
    }

    pub fn destroy(&mut self, canvas: &mut dyn Canvas) {
        self.texture.release(canvas);
    }

    #[inline]
    pub fn params(&self) -> VignetteParams {
        self.params
    }

    pub fn set_params(&mut self, params: VignetteParams) {
        self.set_strength(params.strength);
        self.set_radius(params.radius);
        self.set_softness(params.softness);
        self.set_tint(params.tint);
        self.set_enabled(params.enabled);
    }

    pub fn set_strength(&mut self, v: f32) {
        if store(&mut self.params.strength, clamp_unit(v)) {
            self.texture.mark_dirty();
        }
    }

    pub fn set_radius(&mut self, v: f32) {
        if store(&mut self.params.radius, clamp_unit(v)) {
            self.texture.mark_dirty();
        }
    }

    pub fn set_softness(&mut self, v: f32) {
        if store(&mut self.params.softness, clamp_unit(v)) {
            self.texture.mark_dirty();
        }
    }

    /// Tint is a draw-time color mod; the texture is untouched.
    #[inline]
    pub fn set_tint(&mut self, tint: Color) {
        self.params.tint = tint;
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

    /// Number of successful texture rebuilds since construction.
    #[inline]
    pub fn rebuild_count(&self) -> u64 {
        self.texture.rebuilds()
    }

    #[inline]
    pub fn texture_size(&self) -> Viewport {
        self.texture.size()
    }

    /// Attenuation shape for the current parameters and texture size.
    pub fn shape(&self) -> VignetteShape {
        VignetteShape::new(&self.params, self.texture.size())
    }

    /// Draws the vignette over the target. Returns whether it was drawn.
    pub fn render(&mut self, canvas: &mut dyn Canvas) -> bool {
        if !self.params.enabled || !self.texture.is_ready() {
            return false;
        }
        let shape = self.shape();
        self.texture
            .draw(canvas, BlendMode::Modulate, self.params.tint, |lock| paint(&shape, lock))
    }

    fn rebuild(&mut self, canvas: &mut dyn Canvas) -> bool {
        let shape = self.shape();
        self.texture.refresh(canvas, |lock| paint(&shape, lock))
    }
}

fn paint(shape: &VignetteShape, lock: &mut TextureLock<'_>) {
    lock.for_each_row(|y, row| {
        for (x, px) in row.iter_mut().enumerate() {
            *px = shape.texel(x as u32, y);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SoftwareCanvas;

    fn ready(w: u32, h: u32) -> (SoftwareCanvas, VignetteOverlay) {
        let mut canvas = SoftwareCanvas::new(w, h);
        let mut v = VignetteOverlay::new();
        v.init(&mut canvas, w, h, VignetteParams::default()).unwrap();
        (canvas, v)
    }

    // ── shape ─────────────────────────────────────────────────────────────

    #[test]
    fn center_is_unattenuated_for_any_params() {
        let steps = [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0];
        for &strength in &steps {
            for &radius in &steps {
                for &softness in &steps {
                    let p = VignetteParams { strength, radius, softness, ..Default::default() };
                    for size in [Viewport::new(160, 128), Viewport::new(3, 3), Viewport::new(1, 1)] {
                        let shape = VignetteShape::new(&p, size);
                        assert_eq!(shape.attenuation_at(0.0), 1.0, "{p:?} {size:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn attenuation_is_monotonic_in_distance() {
        let shape = VignetteShape::new(&VignetteParams::default(), Viewport::new(200, 100));
        let mut prev = 1.0;
        for i in 0..200 {
            let f = shape.attenuation_at(i as f32);
            assert!(f <= prev + 1e-6);
            prev = f;
        }
        // Well outside the falloff band the factor bottoms out at 1 - strength.
        assert!((shape.attenuation_at(1000.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_softness_still_has_a_one_pixel_band() {
        let p = VignetteParams { strength: 1.0, radius: 0.5, softness: 0.0, ..Default::default() };
        let shape = VignetteShape::new(&p, Viewport::new(100, 100));
        // inner = 25, soft = 1
        assert_eq!(shape.attenuation_at(25.0), 1.0);
        assert!((shape.attenuation_at(25.5) - 0.5).abs() < 1e-6);
        assert_eq!(shape.attenuation_at(26.0), 0.0);
    }

    // ── overlay ───────────────────────────────────────────────────────────

    #[test]
    fn init_uses_half_resolution() {
        let (_, v) = ready(320, 256);
        assert_eq!(v.texture_size(), Viewport::new(160, 128));
        assert_eq!(v.rebuild_count(), 1);
        assert!(!v.is_dirty());
    }

    #[test]
    fn setters_clamp() {
        let mut v = VignetteOverlay::new();
        v.set_strength(3.0);
        v.set_radius(-1.0);
        v.set_softness(f32::NAN);
        let p = v.params();
        assert_eq!((p.strength, p.radius, p.softness), (1.0, 0.0, 0.0));
    }

    #[test]
    fn same_value_does_not_dirty() {
        let (mut canvas, mut v) = ready(64, 64);
        v.set_strength(0.5);
        v.render(&mut canvas);
        v.set_strength(0.5);
        v.render(&mut canvas);
        assert_eq!(v.rebuild_count(), 1);

        v.set_strength(0.7);
        v.set_strength(0.7);
        v.render(&mut canvas);
        v.render(&mut canvas);
        assert_eq!(v.rebuild_count(), 2);
    }

    #[test]
    fn out_of_range_write_of_clamped_value_does_not_dirty() {
        let (mut canvas, mut v) = ready(64, 64);
        v.set_strength(1.0);
        v.render(&mut canvas);
        assert_eq!(v.rebuild_count(), 2);

        v.set_strength(7.0);
        assert!(!v.is_dirty());
        assert_eq!(v.params().strength, 1.0);
    }

    #[test]
    fn tint_change_does_not_dirty() {
        let (_, mut v) = ready(64, 64);
        v.set_tint(Color::rgb(255, 200, 150));
        assert!(!v.is_dirty());
    }

    #[test]
    fn tint_modulates_draw() {
        let (mut canvas, mut v) = ready(64, 64);
        canvas.clear(Color::WHITE);
        v.set_tint(Color::rgb(255, 128, 0));
        assert!(v.render(&mut canvas));
        assert_eq!(canvas.pixel(32, 32), Some(Color::rgb(255, 128, 0)));
    }

    #[test]
    fn disabled_overlay_draws_nothing() {
        let (mut canvas, mut v) = ready(64, 64);
        v.set_enabled(false);
        assert!(!v.render(&mut canvas));
        assert_eq!(canvas.stats().copies, 0);
    }

    #[test]
    fn allocation_failure_leaves_overlay_inert_until_reinit() {
        let mut canvas = SoftwareCanvas::new(64, 64);
        let mut v = VignetteOverlay::new();
        canvas.fail_next_allocations(1);
        assert!(v.init(&mut canvas, 64, 64, VignetteParams::default()).is_err());
        assert!(!v.render(&mut canvas));

        v.init(&mut canvas, 64, 64, VignetteParams::default()).unwrap();
        assert!(v.render(&mut canvas));
    }

    #[test]
    fn zero_sized_target_is_rejected() {
        let mut canvas = SoftwareCanvas::new(4, 4);
        let mut v = VignetteOverlay::new();
        assert!(v.init(&mut canvas, 0, 10, VignetteParams::default()).is_err());
        assert!(!v.is_ready());
    }

    #[test]
    fn destroy_releases_texture() {
        let (mut canvas, mut v) = ready(64, 64);
        v.destroy(&mut canvas);
        assert_eq!(canvas.live_textures(), 0);
        assert!(!v.render(&mut canvas));
    }
}
