//! Stand-in world: a checkered floor and ceiling receding into fog.
//!
//! The camera integrates the same motion rates the dust field receives, so
//! the parallax reads against something that moves consistently.

use gloom_fx::coords::Viewport;
use gloom_fx::dust::CameraMotion;
use gloom_fx::paint::Color;

const FLOOR_A: Color = Color::rgb(92, 78, 62);
const FLOOR_B: Color = Color::rgb(64, 54, 44);
const CEILING_A: Color = Color::rgb(40, 38, 46);
const CEILING_B: Color = Color::rgb(30, 28, 34);
const FOG: Color = Color::rgb(12, 10, 14);

/// Tiles per world unit.
const TILE_SCALE: f32 = 1.0;
/// Distance where fog is total.
const FOG_DISTANCE: f32 = 14.0;
/// Horizontal field of view factor (half-width at distance 1).
const FOV: f32 = 0.66;

#[derive(Debug, Clone, Default)]
pub struct DemoScene {
    x: f32,
    z: f32,
    yaw: f32,
}

impl DemoScene {
    /// Advances the camera by `dt` seconds of `motion`.
    pub fn step(&mut self, dt: f32, motion: CameraMotion) {
        let m = motion.sanitized();
        self.yaw += m.yaw_rate * dt;
        let (sin, cos) = self.yaw.sin_cos();
        self.x += (cos * m.lateral + sin * m.forward) * dt;
        self.z += (cos * m.forward - sin * m.lateral) * dt;
    }

    /// Draws the scene into a `size`-shaped row-major pixel buffer.
    pub fn draw(&self, pixels: &mut [Color], size: Viewport) {
        if !size.is_valid() || pixels.len() < size.width as usize * size.height as usize {
            return;
        }

        let (w, h) = (size.width as usize, size.height as usize);
        let horizon = h as f32 * 0.5;
        let (sin, cos) = self.yaw.sin_cos();

        for (y, row) in pixels.chunks_exact_mut(w).take(h).enumerate() {
            let offset = y as f32 + 0.5 - horizon;
            if offset.abs() < 0.5 {
                row.fill(FOG);
                continue;
            }

            // Row distance for a plane one unit above or below the eye.
            let depth = horizon / offset.abs();
            let fog = (depth / FOG_DISTANCE).min(1.0);
            let (a, b) = if offset > 0.0 { (FLOOR_A, FLOOR_B) } else { (CEILING_A, CEILING_B) };

            for (x, px) in row.iter_mut().enumerate() {
                let sx = ((x as f32 + 0.5) / w as f32 * 2.0 - 1.0) * FOV * depth;
                let wx = self.x + cos * sx + sin * depth;
                let wz = self.z + cos * depth - sin * sx;
                let tile = ((wx * TILE_SCALE).floor() as i64 + (wz * TILE_SCALE).floor() as i64) & 1;
                let base = if tile == 0 { a } else { b };
                *px = base.lerp(FOG, fog);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizon_fades_to_fog_and_foreground_is_lit() {
        let size = Viewport::new(64, 48);
        let mut pixels = vec![Color::TRANSPARENT; 64 * 48];
        DemoScene::default().draw(&mut pixels, size);

        let bottom = pixels[47 * 64 + 32];
        assert!(bottom == FLOOR_A.lerp(FOG, bottom_fog(48)) || bottom == FLOOR_B.lerp(FOG, bottom_fog(48)));
        let near_horizon = pixels[24 * 64 + 32];
        assert!(near_horizon.r < bottom.r);
    }

    fn bottom_fog(h: u32) -> f32 {
        let horizon = h as f32 * 0.5;
        let depth = horizon / (h as f32 - 0.5 - horizon);
        (depth / FOG_DISTANCE).min(1.0)
    }

    #[test]
    fn walking_forward_moves_along_view() {
        let mut scene = DemoScene::default();
        scene.step(1.0, CameraMotion::new(0.0, 2.0, 0.0));
        assert!((scene.z - 2.0).abs() < 1e-5);
        assert!(scene.x.abs() < 1e-5);
    }

    #[test]
    fn short_buffer_is_left_alone() {
        let mut pixels = vec![Color::WHITE; 10];
        DemoScene::default().draw(&mut pixels, Viewport::new(64, 48));
        assert!(pixels.iter().all(|&c| c == Color::WHITE));
    }
}
