use crate::coords::Viewport;
use crate::paint::Color;
use crate::render::{BlendMode, Canvas, CanvasError, TextureLock};

use super::texture::OverlayTexture;
use super::{clamp_unit, store, unit_to_byte};

/// Tunable film grain parameters.
///
/// Clamp rationale:
/// - `intensity` in `[0, 1]` scales texel alpha only
/// - `update_every` is at least 1 (regenerate every frame)
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GrainParams {
    pub intensity: f32,
    pub update_every: u32,
    pub enabled: bool,
}

impl Default for GrainParams {
    fn default() -> Self {
        Self {
            intensity: 0.1,
            update_every: 2,
            enabled: true,
        }
    }
}

impl GrainParams {
    pub fn clamped(self) -> Self {
        Self {
            intensity: clamp_unit(self.intensity),
            update_every: self.update_every.max(1),
            ..self
        }
    }
}

/// Linear congruential noise stream (Numerical Recipes constants).
///
/// The same seed always yields the same sequence, so a grain texture is a
/// pure function of `(seed, size, intensity)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GrainNoise {
    state: u32,
}

impl GrainNoise {
    const MUL: u32 = 1_664_525;
    const INC: u32 = 1_013_904_223;

    pub fn new(seed: u32) -> Self {
        Self {
            state: Self::MUL.wrapping_mul(seed.wrapping_add(1)).wrapping_add(Self::INC),
        }
    }

    /// Next 8-bit sample (top byte of the state).
    #[inline]
    pub fn next_byte(&mut self) -> u8 {
        self.state = Self::MUL.wrapping_mul(self.state).wrapping_add(Self::INC);
        (self.state >> 24) as u8
    }

    /// Next grain texel: mid-gray luminance within `[64, 191]` and the given alpha.
    #[inline]
    pub fn next_texel(&mut self, alpha: u8) -> Color {
        // Halve the deviation from mid-gray to keep grain subtle.
        let n = i32::from(self.next_byte());
        let c = (128 + (n - 128) / 2) as u8;
        Color::gray(c).with_alpha(alpha)
    }
}

/// Alpha-blended noise layer regenerated on a fixed frame cadence.
#[derive(Debug)]
pub struct GrainOverlay {
    params: GrainParams,
    texture: OverlayTexture,
    seed: u32,
}

impl Default for GrainOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl GrainOverlay {
    pub const RESOLUTION_DIVISOR: u32 = 3;
    /// Minimum backing texture size on each axis.
    pub const MIN_TEXTURE_DIM: u32 = 64;

    pub fn new() -> Self {
        Self {
            params: GrainParams::default(),
            texture: OverlayTexture::new("grain rebuild").with_timer_level(log::Level::Trace),
            seed: 0,
        }
    }

    pub fn init(
        &mut self,
        canvas: &mut dyn Canvas,
        width: u32,
        height: u32,
        params: GrainParams,
    ) -> Result<(), CanvasError> {
        let target = Viewport::new(width, height);
        if !target.is_valid() {
            self.texture.release(canvas);
            return Err(CanvasError::EmptyTexture { width, height });
        }
        self.params = params.clamped();
        self.texture.allocate(
            canvas,
            target.reduced(Self::RESOLUTION_DIVISOR, Self::MIN_TEXTURE_DIM),
        )?;
        let (seed, alpha) = (self.seed, self.alpha());
        self.texture.refresh(canvas, |lock| paint(seed, alpha, lock));
        Ok(())
    }

    pub fn destroy(&mut self, canvas: &mut dyn Canvas) {
        self.texture.release(canvas);
    }

    #[inline]
    pub fn params(&self) -> GrainParams {
        self.params
    }

    pub fn set_params(&mut self, params: GrainParams) {
        self.set_intensity(params.intensity);
        self.set_update_every(params.update_every);
        self.set_enabled(params.enabled);
    }

    pub fn set_intensity(&mut self, v: f32) {
        if store(&mut self.params.intensity, clamp_unit(v)) {
            self.texture.mark_dirty();
        }
    }

    /// Cadence only affects when the next regeneration happens.
    pub fn set_update_every(&mut self, frames: u32) {
        self.params.update_every = frames.max(1);
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

    /// Seed of the noise currently in (or pending for) the texture.
    #[inline]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Draws grain for frame `frame_index`. Returns whether it was drawn.
    ///
    /// Every `update_every`-th frame the noise is re-seeded from the frame
    /// index and regenerated; in between the previous texture is reused.
    pub fn render(&mut self, canvas: &mut dyn Canvas, frame_index: u64) -> bool {
        if !self.params.enabled || !self.texture.is_ready() {
            return false;
        }
        if frame_index % u64::from(self.params.update_every) == 0 {
            // Truncation is fine; the seed only needs to vary between updates.
            self.seed = frame_index as u32;
            self.texture.mark_dirty();
        }
        let (seed, alpha) = (self.seed, self.alpha());
        self.texture
            .draw(canvas, BlendMode::Blend, Color::WHITE, |lock| paint(seed, alpha, lock))
    }

    #[inline]
    fn alpha(&self) -> u8 {
        unit_to_byte(self.params.intensity)
    }
}

fn paint(seed: u32, alpha: u8, lock: &mut TextureLock<'_>) {
    let mut noise = GrainNoise::new(seed);
    lock.for_each_row(|_, row| {
        for px in row.iter_mut() {
            *px = noise.next_texel(alpha);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SoftwareCanvas;

    fn ready(w: u32, h: u32, params: GrainParams) -> (SoftwareCanvas, GrainOverlay) {
        let mut canvas = SoftwareCanvas::new(w, h);
        let mut g = GrainOverlay::new();
        g.init(&mut canvas, w, h, params).unwrap();
        (canvas, g)
    }

    // ── noise ─────────────────────────────────────────────────────────────

    #[test]
    fn noise_is_deterministic_per_seed() {
        let mut a = GrainNoise::new(42);
        let mut b = GrainNoise::new(42);
        let mut c = GrainNoise::new(43);
        let sa: Vec<u8> = (0..32).map(|_| a.next_byte()).collect();
        let sb: Vec<u8> = (0..32).map(|_| b.next_byte()).collect();
        let sc: Vec<u8> = (0..32).map(|_| c.next_byte()).collect();
        assert_eq!(sa, sb);
        assert_ne!(sa, sc);
    }

    #[test]
    fn texel_luminance_stays_near_mid_gray() {
        let mut n = GrainNoise::new(7);
        for _ in 0..4096 {
            let t = n.next_texel(30);
            assert!((64..=191).contains(&t.r));
            assert_eq!(t.r, t.g);
            assert_eq!(t.a, 30);
        }
    }

    // ── overlay ───────────────────────────────────────────────────────────

    #[test]
    fn texture_is_one_third_with_floor() {
        let (_, g) = ready(960, 544, GrainParams::default());
        assert_eq!(g.texture_size(), Viewport::new(320, 181));

        let (_, g) = ready(120, 300, GrainParams::default());
        assert_eq!(g.texture_size(), Viewport::new(64, 100));
    }

    #[test]
    fn regenerates_on_cadence() {
        let params = GrainParams { update_every: 3, ..Default::default() };
        let (mut canvas, mut g) = ready(96, 96, params);
        let base = g.rebuild_count();
        for frame in 1..=9u64 {
            assert!(g.render(&mut canvas, frame));
        }
        // Frames 3, 6, 9.
        assert_eq!(g.rebuild_count(), base + 3);
        assert_eq!(g.seed(), 9);
    }

    #[test]
    fn intensity_scales_alpha_only() {
        let lo = GrainParams { intensity: 0.1, ..Default::default() };
        let hi = GrainParams { intensity: 0.8, ..Default::default() };
        let (c1, g1) = ready(96, 96, lo);
        let (c2, g2) = ready(96, 96, hi);

        let id = crate::render::TextureId::from_raw(0);
        for (x, y) in [(0, 0), (5, 9), (31, 31)] {
            let a = c1.texel(id, x, y).unwrap();
            let b = c2.texel(id, x, y).unwrap();
            assert_eq!((a.r, a.g, a.b), (b.r, b.g, b.b));
            assert_eq!(a.a, 26);
            assert_eq!(b.a, 204);
        }
        assert_eq!(g1.seed(), g2.seed());
    }

    #[test]
    fn intensity_change_dirties_but_cadence_change_does_not() {
        let (_, mut g) = ready(96, 96, GrainParams::default());
        g.set_update_every(5);
        assert!(!g.is_dirty());
        g.set_intensity(0.1);
        assert!(!g.is_dirty());
        g.set_intensity(0.2);
        assert!(g.is_dirty());
    }

    #[test]
    fn zero_cadence_is_clamped_to_every_frame() {
        let mut g = GrainOverlay::new();
        g.set_update_every(0);
        assert_eq!(g.params().update_every, 1);
    }

    #[test]
    fn failed_regeneration_retries_with_pending_seed() {
        let params = GrainParams { update_every: 4, ..Default::default() };
        let (mut canvas, mut g) = ready(96, 96, params);
        canvas.fail_next_locks(1);
        assert!(!g.render(&mut canvas, 4));
        assert!(g.is_dirty());
        // Frame 5 is off-cadence but the pending rebuild still happens.
        assert!(g.render(&mut canvas, 5));
        assert!(!g.is_dirty());
        assert_eq!(g.seed(), 4);
    }

    #[test]
    fn zero_intensity_leaves_scene_untouched() {
        let params = GrainParams { intensity: 0.0, ..Default::default() };
        let (mut canvas, mut g) = ready(96, 96, params);
        canvas.clear(Color::rgb(10, 200, 30));
        g.render(&mut canvas, 0);
        assert_eq!(canvas.pixel(50, 50), Some(Color::rgb(10, 200, 30)));
    }
}
