//! Discrete setting levels and their overlay parameter tables.
//!
//! Every effect has five levels, `0..=4`. Level 0 is "off" for the setters
//! but still maps through the tables like any other level. Out-of-range
//! levels clamp to the nearest end before lookup; there is no interpolation
//! between entries.

use crate::paint::Color;

pub const MIN_LEVEL: i32 = 0;
pub const MAX_LEVEL: i32 = 4;

pub const VIGNETTE_STRENGTH: [f32; 5] = [0.00, 0.25, 0.50, 0.70, 0.90];
pub const VIGNETTE_RADIUS: [f32; 5] = [0.85, 0.75, 0.65, 0.55, 0.45];
pub const VIGNETTE_SOFTNESS: [f32; 5] = [0.16, 0.24, 0.32, 0.40, 0.48];
pub const GRAIN_INTENSITY: [f32; 5] = [0.00, 0.06, 0.10, 0.15, 0.20];
pub const SCANLINE_DARKNESS: [f32; 5] = [0.00, 0.10, 0.18, 0.26, 0.35];

/// Grain is regenerated every this many frames.
pub const GRAIN_UPDATE_EVERY: u32 = 2;
/// Every this many rows is a scanline.
pub const SCANLINE_SPACING: u32 = 2;

pub const WARMTH_MIN: i32 = -100;
pub const WARMTH_MAX: i32 = 100;
pub const COOL_TINT: Color = Color::rgb(190, 215, 255);
pub const WARM_TINT: Color = Color::rgb(255, 214, 170);

/// Table index for `level`, clamped to `0..=4`.
#[inline]
pub fn index(level: i32) -> usize {
    level.clamp(MIN_LEVEL, MAX_LEVEL) as usize
}

#[inline]
pub fn vignette_strength(level: i32) -> f32 {
    VIGNETTE_STRENGTH[index(level)]
}

#[inline]
pub fn vignette_radius(level: i32) -> f32 {
    VIGNETTE_RADIUS[index(level)]
}

#[inline]
pub fn vignette_softness(level: i32) -> f32 {
    VIGNETTE_SOFTNESS[index(level)]
}

#[inline]
pub fn grain_intensity(level: i32) -> f32 {
    GRAIN_INTENSITY[index(level)]
}

#[inline]
pub fn scanline_darkness(level: i32) -> f32 {
    SCANLINE_DARKNESS[index(level)]
}

/// Tint for a warmth in `-100..=100` (clamped).
///
/// Interpolates linearly from [`COOL_TINT`] at -100 through white at 0 to
/// [`WARM_TINT`] at 100, so neutral warmth leaves the scene untinted.
pub fn warmth_tint(warmth: i32) -> Color {
    let w = warmth.clamp(WARMTH_MIN, WARMTH_MAX);
    if w >= 0 {
        Color::WHITE.lerp(WARM_TINT, w as f32 / WARMTH_MAX as f32)
    } else {
        Color::WHITE.lerp(COOL_TINT, w as f32 / WARMTH_MIN as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_clamp_before_lookup() {
        assert_eq!(vignette_strength(-3), VIGNETTE_STRENGTH[0]);
        assert_eq!(vignette_strength(99), VIGNETTE_STRENGTH[4]);
        assert_eq!(grain_intensity(i32::MIN), 0.0);
    }

    #[test]
    fn level_two_matches_reference_vignette() {
        assert_eq!(vignette_strength(2), 0.50);
        assert_eq!(vignette_radius(2), 0.65);
        assert_eq!(vignette_softness(2), 0.32);
    }

    #[test]
    fn tables_are_monotonic() {
        for w in VIGNETTE_STRENGTH.windows(2) {
            assert!(w[0] < w[1]);
        }
        for w in VIGNETTE_RADIUS.windows(2) {
            assert!(w[0] > w[1]);
        }
        for w in GRAIN_INTENSITY.windows(2) {
            assert!(w[0] < w[1]);
        }
        for w in SCANLINE_DARKNESS.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn warmth_endpoints() {
        assert_eq!(warmth_tint(0), Color::WHITE);
        assert_eq!(warmth_tint(100), WARM_TINT);
        assert_eq!(warmth_tint(-100), COOL_TINT);
        assert_eq!(warmth_tint(500), WARM_TINT);
    }

    #[test]
    fn warmth_is_linear_per_side() {
        // Halfway to warm: blue channel 255 -> 170 at t = 0.5.
        assert_eq!(warmth_tint(50).b, 213);
        assert_eq!(warmth_tint(50).r, 255);
        assert_eq!(warmth_tint(-50).r, 223);
    }
}
