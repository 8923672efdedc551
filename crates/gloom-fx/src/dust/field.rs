use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::coords::{Rect, Viewport, clamp_unit};
use crate::paint::{Color, unit_to_byte};
use crate::render::{BlendMode, Canvas};

use super::{CameraMotion, DustParticle, Projection};

/// Constants of the dust simulation.
///
/// Distances are camera-space units, rates are per second, sizes are pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DustConfig {
    pub near_z: f32,
    pub far_z: f32,
    /// Focal length as a fraction of the target width.
    pub focal_fraction: f32,
    /// Screen area at which `density * density_constant` particles are spawned.
    pub baseline_area: f32,
    pub density_constant: f32,
    pub min_count: usize,
    pub max_count: usize,
    pub lateral_scale: f32,
    pub forward_scale: f32,
    pub yaw_scale: f32,
    /// Maximum per-particle angular jitter, radians per second.
    pub jitter: f32,
    pub wobble_amplitude: f32,
    pub wobble_speed: f32,
    pub size_constant: f32,
    pub min_size: f32,
    pub max_size: f32,
    /// Off-screen slack before a particle is culled, pixels.
    pub cull_margin: f32,
    /// Fraction of the depth range, measured from the far plane, used for
    /// far respawns.
    pub far_band: f32,
    /// Spawn wedge width relative to the visible frustum.
    pub wedge_spread: f32,
    pub color: Color,
}

impl Default for DustConfig {
    fn default() -> Self {
        Self {
            near_z: 0.5,
            far_z: 12.0,
            focal_fraction: 0.9,
            baseline_area: 960.0 * 544.0,
            density_constant: 220.0,
            min_count: 12,
            max_count: 300,
            lateral_scale: 1.5,
            forward_scale: 2.0,
            yaw_scale: 1.0,
            jitter: 0.05,
            wobble_amplitude: 0.03,
            wobble_speed: 0.9,
            size_constant: 0.035,
            min_size: 1.0,
            max_size: 28.0,
            cull_margin: 32.0,
            far_band: 0.15,
            wedge_spread: 1.15,
            color: Color::rgb(255, 236, 200),
        }
    }
}

impl DustConfig {
    /// Repairs inconsistent values so sampling ranges are never empty.
    ///
    /// Non-finite constants fall back to their defaults.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let finite = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };
        let near_z = if self.near_z.is_finite() && self.near_z > 0.0 { self.near_z } else { 0.5 };
        let far_z = if self.far_z.is_finite() && self.far_z > near_z { self.far_z } else { near_z * 24.0 };
        let min_count = self.min_count.max(1);
        let min_size = finite(self.min_size, d.min_size).max(0.0);
        Self {
            near_z,
            far_z,
            min_count,
            max_count: self.max_count.max(min_count),
            min_size,
            max_size: finite(self.max_size, d.max_size).max(min_size),
            focal_fraction: finite(self.focal_fraction, d.focal_fraction),
            baseline_area: finite(self.baseline_area, d.baseline_area),
            density_constant: finite(self.density_constant, d.density_constant),
            lateral_scale: finite(self.lateral_scale, d.lateral_scale),
            forward_scale: finite(self.forward_scale, d.forward_scale),
            yaw_scale: finite(self.yaw_scale, d.yaw_scale),
            jitter: finite(self.jitter, d.jitter).abs().min(std::f32::consts::PI),
            wobble_amplitude: finite(self.wobble_amplitude, d.wobble_amplitude),
            wobble_speed: finite(self.wobble_speed, d.wobble_speed),
            size_constant: finite(self.size_constant, d.size_constant),
            far_band: clamp_unit(self.far_band),
            cull_margin: finite(self.cull_margin, d.cull_margin).max(0.0),
            wedge_spread: finite(self.wedge_spread, d.wedge_spread),
            color: self.color,
        }
    }

    /// Density-derived pool size for a target of `viewport`, clamped to
    /// `[min_count, max_count]`.
    pub fn target_count(&self, density: f32, viewport: Viewport) -> usize {
        let raw = clamp_unit(density) * (viewport.area() / self.baseline_area) * self.density_constant;
        if !raw.is_finite() {
            return self.min_count;
        }
        (raw.round().max(0.0) as usize).clamp(self.min_count, self.max_count)
    }

    #[inline]
    pub fn focal(&self, viewport: Viewport) -> f32 {
        self.focal_fraction * viewport.width as f32
    }
}

/// Camera-relative dust simulation with a recycled particle pool.
#[derive(Debug)]
pub struct ParallaxParticleField {
    config: DustConfig,
    density: f32,
    pool: Vec<DustParticle>,
    rng: StdRng,
    time: f32,
    respawns: u64,
}

impl ParallaxParticleField {
    pub fn new(config: DustConfig, seed: u64) -> Self {
        let config = config.sanitized();
        Self {
            pool: Vec::with_capacity(config.max_count),
            config,
            density: 0.25,
            rng: StdRng::seed_from_u64(seed),
            time: 0.0,
            respawns: 0,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(DustConfig::default(), seed)
    }

    #[inline]
    pub fn config(&self) -> &DustConfig {
        &self.config
    }

    #[inline]
    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn set_density(&mut self, density: f32) {
        self.density = clamp_unit(density);
    }

    #[inline]
    pub fn particles(&self) -> &[DustParticle] {
        &self.pool
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Total respawns (depth exits and far culls) since construction.
    #[inline]
    pub fn respawn_count(&self) -> u64 {
        self.respawns
    }

    /// Drops every particle; the next update repopulates the pool.
    pub fn clear(&mut self) {
        self.pool.clear();
        self.time = 0.0;
    }

    #[inline]
    pub fn target_count(&self, viewport: Viewport) -> usize {
        self.config.target_count(self.density, viewport)
    }

    /// Advances the simulation by `dt` seconds under `motion`.
    pub fn update(&mut self, viewport: Viewport, dt: f32, motion: CameraMotion) {
        if !viewport.is_valid() {
            return;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let motion = motion.sanitized();
        self.time += dt;

        self.resize_pool(viewport);

        let Self { config, pool, rng, time, respawns, .. } = self;
        let cfg = *config;
        let yaw = motion.yaw_rate * cfg.yaw_scale * dt;
        let shift = Vec2::new(motion.lateral * cfg.lateral_scale, motion.forward * cfg.forward_scale) * dt;
        let screen = viewport.rect();
        let keep = screen.inflate(cfg.cull_margin);
        let nudge_zone = screen.inflate(cfg.cull_margin * 4.0);

        for p in pool.iter_mut() {
            // Turning right swings the world left around the camera.
            let jitter = rng.random_range(-cfg.jitter..=cfg.jitter) * dt;
            let xz = Vec2::from_angle(yaw + jitter).rotate(Vec2::new(p.pos.x, p.pos.z)) - shift;
            p.pos.x = xz.x;
            p.pos.z = xz.y;

            if p.pos.z < cfg.near_z || p.pos.z > cfg.far_z {
                let exited_far = p.pos.z > cfg.far_z;
                respawn(p, &cfg, rng, viewport, exited_far);
                *respawns += 1;
            }

            p.projection = project(p, &cfg, viewport, *time);
            let center = p.projection.center;
            if !keep.contains(center) {
                if nudge_zone.contains(center) {
                    p.pos.x *= 0.85;
                    p.pos.y *= 0.85;
                } else {
                    respawn(p, &cfg, rng, viewport, true);
                    *respawns += 1;
                }
                p.projection = project(p, &cfg, viewport, *time);
            }

            // Centers in the margin still count only if the square covers a pixel.
            let proj = &mut p.projection;
            proj.visible = keep.contains(proj.center)
                && Rect::square_at(proj.center, proj.size).pixel_span(viewport).is_some();
        }
    }

    /// Draws visible particles as alpha-blended squares. Returns how many
    /// were drawn.
    pub fn draw(&self, canvas: &mut dyn Canvas) -> usize {
        let mut drawn = 0;
        for p in &self.pool {
            let proj = p.projection;
            if !proj.visible || proj.alpha <= 0.0 {
                continue;
            }
            let color = self.config.color.with_alpha(unit_to_byte(proj.alpha));
            canvas.fill_rect(Rect::square_at(proj.center, proj.size), color, BlendMode::Blend);
            drawn += 1;
        }
        drawn
    }

    fn resize_pool(&mut self, viewport: Viewport) {
        let target = self.target_count(viewport);
        if target < self.pool.len() {
            self.pool.truncate(target);
            return;
        }
        while self.pool.len() < target {
            let mut p = DustParticle::default();
            respawn(&mut p, &self.config, &mut self.rng, viewport, false);
            p.projection = project(&p, &self.config, viewport, self.time);
            self.pool.push(p);
        }
    }
}

/// Resamples `p` inside the forward wedge. `at_far` restricts depth to the
/// far band; otherwise depth is uniform over the whole range.
fn respawn(p: &mut DustParticle, cfg: &DustConfig, rng: &mut StdRng, viewport: Viewport, at_far: bool) {
    let z_lo = if at_far {
        cfg.far_z - cfg.far_band * (cfg.far_z - cfg.near_z)
    } else {
        cfg.near_z
    };
    let z = rng.random_range(z_lo..=cfg.far_z);

    // Half-extent of the visible frustum at depth z, widened by the spread.
    let focal = cfg.focal(viewport).max(f32::EPSILON);
    let half_w = viewport.width as f32 * 0.5 / focal * z * cfg.wedge_spread;
    let half_h = viewport.height as f32 * 0.5 / focal * z * cfg.wedge_spread;

    p.pos = Vec3::new(
        rng.random_range(-1.0..=1.0) * half_w,
        rng.random_range(-1.0..=1.0) * half_h,
        z,
    );
    p.base_size = rng.random_range(0.6..=1.4);
    p.base_alpha = rng.random_range(0.25..=0.7);
    p.seed = rng.random_range(0.0..=std::f32::consts::TAU);
}

fn project(p: &DustParticle, cfg: &DustConfig, viewport: Viewport, time: f32) -> Projection {
    let focal = cfg.focal(viewport);
    let z = p.pos.z.max(cfg.near_z);
    let wobble = p.wobble(time, cfg.wobble_amplitude, cfg.wobble_speed);
    let x = p.pos.x + wobble.x;
    let y = p.pos.y + wobble.y;

    let center = Vec2::new(
        viewport.width as f32 * 0.5 + x * focal / z,
        viewport.height as f32 * 0.5 - y * focal / z,
    );
    let size = (p.base_size * cfg.size_constant * focal / z).clamp(cfg.min_size, cfg.max_size);
    // Fade out within one near-plane depth of the near plane.
    let fade = clamp_unit((z - cfg.near_z) / cfg.near_z);

    Projection {
        center,
        size,
        alpha: p.base_alpha * fade,
        visible: false,
    }
}
