use glam::{Vec2, Vec3};

/// Camera motion sample driving parallax.
///
/// Rates are per second; the field scales them by the frame delta.
/// - `lateral`: sideways camera movement (+ right)
/// - `forward`: camera movement along view (+ forward)
/// - `yaw_rate`: camera turn rate in radians per second (+ right)
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CameraMotion {
    pub lateral: f32,
    pub forward: f32,
    pub yaw_rate: f32,
}

impl CameraMotion {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(lateral: f32, forward: f32, yaw_rate: f32) -> Self {
        Self { lateral, forward, yaw_rate }
    }

    /// Non-finite components read as zero.
    #[inline]
    pub fn sanitized(self) -> Self {
        let f = |v: f32| if v.is_finite() { v } else { 0.0 };
        Self::new(f(self.lateral), f(self.forward), f(self.yaw_rate))
    }
}

/// Screen-space footprint of a particle after projection.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Projection {
    /// Square center in target pixels.
    pub center: Vec2,
    /// Side length in pixels.
    pub size: f32,
    /// Opacity in `[0, 1]` after near-plane fade.
    pub alpha: f32,
    /// Inside the drawable area this frame.
    pub visible: bool,
}

/// One mote of dust.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct DustParticle {
    /// Camera-space position.
    pub pos: Vec3,
    /// Size multiplier, roughly `[0.6, 1.4]`.
    pub base_size: f32,
    /// Peak opacity in `[0, 1]`.
    pub base_alpha: f32,
    /// Wobble phase in radians.
    pub seed: f32,
    /// Result of the last projection.
    pub projection: Projection,
}

impl DustParticle {
    /// Stateless wobble offset at `time` seconds.
    #[inline]
    pub fn wobble(&self, time: f32, amplitude: f32, speed: f32) -> Vec2 {
        let phase = time * speed + self.seed;
        Vec2::new(phase.sin(), (phase * 0.73 + self.seed * 1.31).cos()) * amplitude
    }
}
