use std::time::Duration;

use crate::coords::Viewport;
use crate::dust::{CameraMotion, ParallaxParticleField};
use crate::overlay::{
    GrainOverlay, GrainParams, ScanlineOverlay, ScanlineParams, VignetteOverlay, VignetteParams,
};
use crate::render::Canvas;
use crate::time::{FrameTime, FrameTimer};

use super::levels;
use super::{EffectLevels, EffectsConfig, FrameError};

/// Lifecycle of a [`FrameOrchestrator`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameState {
    Uninit,
    Ready,
}

/// What `end_frame_present` did.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Dust squares drawn (0 when dust was skipped).
    pub dust_drawn: usize,
    pub grain: bool,
    pub scanlines: bool,
    pub vignette: bool,
    /// Time spent pacing after present.
    pub paced: Duration,
}

/// Owns the overlays, the dust field and the frame timer of one render loop.
///
/// Not global: hosts create as many as they need and pass the renderer and
/// configuration into each call.
#[derive(Debug)]
pub struct FrameOrchestrator {
    state: FrameState,
    size: Viewport,
    timer: FrameTimer,
    frame: Option<FrameTime>,
    target_fps: i32,
    motion: CameraMotion,
    world_drawn: bool,
    dust_enabled: bool,
    vignette: VignetteOverlay,
    grain: GrainOverlay,
    scanline: ScanlineOverlay,
    dust: ParallaxParticleField,
}

impl Default for FrameOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameOrchestrator {
    pub const DEFAULT_TARGET_FPS: i32 = 60;
    pub const DEFAULT_DUST_SEED: u64 = 0x6d6f_7465;

    pub fn new() -> Self {
        Self::with_dust(ParallaxParticleField::with_seed(Self::DEFAULT_DUST_SEED))
    }

    /// Uses a custom dust field (seed, constants).
    pub fn with_dust(dust: ParallaxParticleField) -> Self {
        Self {
            state: FrameState::Uninit,
            size: Viewport::default(),
            timer: FrameTimer::new(),
            frame: None,
            target_fps: Self::DEFAULT_TARGET_FPS,
            motion: CameraMotion::ZERO,
            world_drawn: false,
            dust_enabled: true,
            vignette: VignetteOverlay::new(),
            grain: GrainOverlay::new(),
            scanline: ScanlineOverlay::new(),
            dust,
        }
    }

    /// Builds the overlays for a `width x height` target and enters `Ready`.
    ///
    /// An overlay whose texture cannot be allocated is logged and left
    /// inert; only an empty target is an error.
    pub fn init(&mut self, canvas: &mut dyn Canvas, width: u32, height: u32) -> Result<(), FrameError> {
        let size = Viewport::new(width, height);
        if !size.is_valid() {
            return Err(FrameError::EmptyTarget { width, height });
        }

        if let Err(e) = self.vignette.init(canvas, width, height, self.vignette.params()) {
            log::warn!("vignette disabled: {e}");
        }
        if let Err(e) = self.grain.init(canvas, width, height, self.grain.params()) {
            log::warn!("film grain disabled: {e}");
        }
        if let Err(e) = self.scanline.init(canvas, width, height, self.scanline.params()) {
            log::warn!("scanlines disabled: {e}");
        }

        if self.size != size {
            self.dust.clear();
        }
        self.size = size;
        if self.state != FrameState::Ready {
            // Time spent before init is not a frame delta.
            self.timer.reset();
            log::info!("frame effects ready at {width}x{height}");
        }
        self.state = FrameState::Ready;
        Ok(())
    }

    /// Rebuilds every overlay for a new render size.
    pub fn resize(&mut self, canvas: &mut dyn Canvas, width: u32, height: u32) -> Result<(), FrameError> {
        if self.size == Viewport::new(width, height) && self.state == FrameState::Ready {
            return Ok(());
        }
        log::debug!("frame effects resize to {width}x{height}");
        self.init(canvas, width, height)
    }

    /// Releases every texture and returns to `Uninit`.
    pub fn shutdown(&mut self, canvas: &mut dyn Canvas) {
        self.vignette.destroy(canvas);
        self.grain.destroy(canvas);
        self.scanline.destroy(canvas);
        self.dust.clear();
        self.frame = None;
        if self.state == FrameState::Ready {
            log::info!("frame effects shut down");
        }
        self.state = FrameState::Uninit;
        self.size = Viewport::default();
    }

    /// Starts the frame: timer, world flag, and a fresh pull of `config`.
    pub fn begin_frame(&mut self, config: &dyn EffectsConfig) -> FrameTime {
        let frame = self.timer.begin_frame();
        self.frame = Some(frame);
        self.world_drawn = false;
        self.apply_config(config);
        frame
    }

    /// Composites the effects over the host's scene, presents, and paces.
    ///
    /// Order: dust (only after `mark_world_frame` and with dust enabled),
    /// grain, scanlines, vignette, present, pacing.
    pub fn end_frame_present(&mut self, canvas: &mut dyn Canvas) -> FrameReport {
        let mut report = FrameReport::default();

        if self.state == FrameState::Ready {
            let (dt, frame_index) = self.frame.map_or((0.0, 0), |f| (f.dt, f.frame_index));

            if self.world_drawn && self.dust_enabled {
                self.dust.update(self.size, dt, self.motion);
                report.dust_drawn = self.dust.draw(canvas);
            }
            report.grain = self.grain.render(canvas, frame_index);
            report.scanlines = self.scanline.render(canvas);
            report.vignette = self.vignette.render(canvas);
        }

        canvas.present();
        report.paced = self.timer.end_frame_and_pace(self.target_fps);
        report
    }

    /// Frame rate cap; `<= 0` disables pacing.
    #[inline]
    pub fn set_target_fps(&mut self, fps: i32) {
        self.target_fps = fps;
    }

    #[inline]
    pub fn target_fps(&self) -> i32 {
        self.target_fps
    }

    /// Stores the camera motion used by the next dust update.
    ///
    /// The sample persists across frames until replaced; pass zeros on
    /// screens where dust should stop drifting.
    #[inline]
    pub fn set_camera_motion(&mut self, lateral: f32, forward: f32, yaw_rate: f32) {
        self.motion = CameraMotion::new(lateral, forward, yaw_rate);
    }

    #[inline]
    pub fn camera_motion(&self) -> CameraMotion {
        self.motion
    }

    /// Records that the 3D world was drawn this frame (gates dust).
    #[inline]
    pub fn mark_world_frame(&mut self) {
        self.world_drawn = true;
    }

    /// Writes vignette level `level` (0 turns it off) and applies it now.
    pub fn set_vignette_level(&mut self, config: &mut dyn EffectsConfig, level: i32) {
        let level = level.clamp(levels::MIN_LEVEL, levels::MAX_LEVEL);
        let next = EffectLevels {
            vignette_enabled: level > 0,
            vignette_strength: level,
            vignette_radius: level,
            vignette_softness: level,
            ..EffectLevels::read(config)
        };
        config.set_levels(next);
        self.apply_config(config);
    }

    /// Writes film grain level `level` (0 turns it off) and applies it now.
    pub fn set_film_grain_level(&mut self, config: &mut dyn EffectsConfig, level: i32) {
        let level = level.clamp(levels::MIN_LEVEL, levels::MAX_LEVEL);
        let next = EffectLevels {
            film_grain: level > 0,
            film_grain_intensity: level,
            ..EffectLevels::read(config)
        };
        config.set_levels(next);
        self.apply_config(config);
    }

    /// Writes scanline level `level` (0 turns them off) and applies it now.
    pub fn set_scanline_level(&mut self, config: &mut dyn EffectsConfig, level: i32) {
        let level = level.clamp(levels::MIN_LEVEL, levels::MAX_LEVEL);
        let next = EffectLevels {
            scanlines: level > 0,
            scanline_intensity: level,
            ..EffectLevels::read(config)
        };
        config.set_levels(next);
        self.apply_config(config);
    }

    pub fn set_particle_dust_enabled(&mut self, config: &mut dyn EffectsConfig, on: bool) {
        config.set_particle_dust(on);
        self.apply_config(config);
    }

    #[inline]
    pub fn state(&self) -> FrameState {
        self.state
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.state == FrameState::Ready
    }

    #[inline]
    pub fn size(&self) -> Viewport {
        self.size
    }

    #[inline]
    pub fn dust_enabled(&self) -> bool {
        self.dust_enabled
    }

    #[inline]
    pub fn vignette(&self) -> &VignetteOverlay {
        &self.vignette
    }

    #[inline]
    pub fn grain(&self) -> &GrainOverlay {
        &self.grain
    }

    #[inline]
    pub fn scanline(&self) -> &ScanlineOverlay {
        &self.scanline
    }

    #[inline]
    pub fn dust(&self) -> &ParallaxParticleField {
        &self.dust
    }

    /// Direct overlay access for hosts that tune parameters beyond the
    /// level tables.
    #[inline]
    pub fn vignette_mut(&mut self) -> &mut VignetteOverlay {
        &mut self.vignette
    }

    #[inline]
    pub fn dust_mut(&mut self) -> &mut ParallaxParticleField {
        &mut self.dust
    }

    fn apply_config(&mut self, config: &dyn EffectsConfig) {
        self.vignette.set_params(VignetteParams {
            strength: levels::vignette_strength(config.vignette_strength()),
            radius: levels::vignette_radius(config.vignette_radius()),
            softness: levels::vignette_softness(config.vignette_softness()),
            tint: levels::warmth_tint(config.vignette_warmth()),
            enabled: config.vignette_enabled(),
        });
        self.grain.set_params(GrainParams {
            intensity: levels::grain_intensity(config.film_grain_intensity()),
            update_every: levels::GRAIN_UPDATE_EVERY,
            enabled: config.film_grain(),
        });
        self.scanline.set_params(ScanlineParams {
            darkness: levels::scanline_darkness(config.scanline_intensity()),
            spacing: levels::SCANLINE_SPACING,
            enabled: config.scanlines(),
        });

        let dust = config.particle_dust();
        if dust != self.dust_enabled {
            log::debug!("particle dust {}", if dust { "on" } else { "off" });
            self.dust_enabled = dust;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;
    use crate::render::SoftwareCanvas;

    fn ready(w: u32, h: u32) -> (SoftwareCanvas, FrameOrchestrator) {
        let mut canvas = SoftwareCanvas::new(w, h);
        let mut fx = FrameOrchestrator::new();
        fx.set_target_fps(0);
        fx.init(&mut canvas, w, h).unwrap();
        (canvas, fx)
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn starts_uninit() {
        let fx = FrameOrchestrator::new();
        assert_eq!(fx.state(), FrameState::Uninit);
        assert_eq!(fx.target_fps(), 60);
    }

    #[test]
    fn init_rejects_empty_target() {
        let mut canvas = SoftwareCanvas::new(4, 4);
        let mut fx = FrameOrchestrator::new();
        assert_eq!(
            fx.init(&mut canvas, 0, 4),
            Err(FrameError::EmptyTarget { width: 0, height: 4 })
        );
        assert!(!fx.is_ready());
    }

    #[test]
    fn init_survives_overlay_allocation_failure() {
        let mut canvas = SoftwareCanvas::new(64, 64);
        let mut fx = FrameOrchestrator::new();
        canvas.fail_next_allocations(1);
        fx.init(&mut canvas, 64, 64).unwrap();
        assert!(fx.is_ready());
        assert!(!fx.vignette().is_ready());
        assert!(fx.grain().is_ready());
        assert!(fx.scanline().is_ready());
    }

    #[test]
    fn first_frame_after_init_ignores_time_before_init() {
        let mut canvas = SoftwareCanvas::new(16, 16);
        let mut fx = FrameOrchestrator::new();
        std::thread::sleep(Duration::from_millis(60));
        fx.init(&mut canvas, 16, 16).unwrap();
        let frame = fx.begin_frame(&EffectLevels::default());
        assert!(frame.dt < 0.05, "{}", frame.dt);
    }

    #[test]
    fn shutdown_releases_all_textures() {
        let (mut canvas, mut fx) = ready(64, 64);
        assert_eq!(canvas.live_textures(), 3);
        fx.shutdown(&mut canvas);
        assert_eq!(canvas.live_textures(), 0);
        assert_eq!(fx.state(), FrameState::Uninit);
    }

    #[test]
    fn resize_rebuilds_for_new_size() {
        let (mut canvas, mut fx) = ready(64, 64);
        canvas.resize(128, 96);
        fx.resize(&mut canvas, 128, 96).unwrap();
        assert_eq!(fx.vignette().texture_size(), Viewport::new(64, 48));
        assert_eq!(canvas.live_textures(), 3);
    }

    // ── config pull ───────────────────────────────────────────────────────

    #[test]
    fn begin_frame_pulls_config() {
        let (_, mut fx) = ready(64, 64);
        let cfg = EffectLevels {
            vignette_strength: 4,
            film_grain: true,
            film_grain_intensity: 3,
            vignette_warmth: 100,
            particle_dust: false,
            ..Default::default()
        };
        fx.begin_frame(&cfg);
        assert_eq!(fx.vignette().params().strength, 0.90);
        assert_eq!(fx.vignette().params().tint, levels::WARM_TINT);
        assert!(fx.grain().params().enabled);
        assert_eq!(fx.grain().params().intensity, 0.15);
        assert!(!fx.dust_enabled());
    }

    #[test]
    fn config_is_not_read_outside_begin_frame() {
        let (mut canvas, mut fx) = ready(64, 64);
        let mut cfg = EffectLevels::default();
        fx.begin_frame(&cfg);
        cfg.vignette_strength = 4;
        fx.end_frame_present(&mut canvas);
        assert_eq!(fx.vignette().params().strength, levels::vignette_strength(2));
    }

    #[test]
    fn level_setters_write_through_and_apply() {
        let (_, mut fx) = ready(64, 64);
        let mut cfg = EffectLevels::default();
        fx.set_scanline_level(&mut cfg, 3);
        assert!(cfg.scanlines);
        assert_eq!(cfg.scanline_intensity, 3);
        assert!(fx.scanline().params().enabled);
        assert_eq!(fx.scanline().params().darkness, levels::SCANLINE_DARKNESS[3]);

        fx.set_film_grain_level(&mut cfg, 0);
        assert!(!cfg.film_grain);
        assert!(!fx.grain().params().enabled);

        fx.set_vignette_level(&mut cfg, 9);
        assert_eq!(cfg.vignette_strength, 4);
    }

    // ── end of frame ──────────────────────────────────────────────────────

    #[test]
    fn dust_needs_world_frame() {
        let (mut canvas, mut fx) = ready(320, 256);
        let cfg = EffectLevels::default();

        fx.begin_frame(&cfg);
        let r = fx.end_frame_present(&mut canvas);
        assert_eq!(r.dust_drawn, 0);
        assert!(fx.dust().is_empty());

        fx.begin_frame(&cfg);
        fx.mark_world_frame();
        let r = fx.end_frame_present(&mut canvas);
        assert!(r.dust_drawn > 0);

        // The flag resets each frame.
        fx.begin_frame(&cfg);
        let r = fx.end_frame_present(&mut canvas);
        assert_eq!(r.dust_drawn, 0);
    }

    #[test]
    fn camera_motion_persists() {
        let (mut canvas, mut fx) = ready(64, 64);
        fx.set_camera_motion(1.0, 2.0, 0.5);
        fx.begin_frame(&EffectLevels::default());
        fx.end_frame_present(&mut canvas);
        assert_eq!(fx.camera_motion(), CameraMotion::new(1.0, 2.0, 0.5));
    }

    #[test]
    fn uninit_still_presents() {
        let mut canvas = SoftwareCanvas::new(8, 8);
        let mut fx = FrameOrchestrator::new();
        fx.set_target_fps(0);
        canvas.clear(Color::WHITE);
        fx.begin_frame(&EffectLevels::default());
        let r = fx.end_frame_present(&mut canvas);
        assert!(!r.vignette);
        assert_eq!(canvas.front_pixel(0, 0), Some(Color::WHITE));
    }

    #[test]
    fn uncapped_does_not_pace() {
        let (mut canvas, mut fx) = ready(32, 32);
        fx.begin_frame(&EffectLevels::default());
        assert_eq!(fx.end_frame_present(&mut canvas).paced, Duration::ZERO);
    }
}
