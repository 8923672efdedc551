use serde::{Deserialize, Serialize};

use gloom_fx::EffectLevels;
use gloom_fx::frame::levels;

/// Effect settings as stored on disk.
///
/// Missing keys take their defaults, so older files keep loading.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsSettings {
    pub vignette: bool,
    pub vignette_strength: i32,
    pub vignette_radius: i32,
    pub vignette_softness: i32,
    /// `-100` (cool) ..= `100` (warm).
    pub vignette_warmth: i32,
    pub film_grain: bool,
    pub film_grain_intensity: i32,
    pub scanlines: bool,
    pub scanline_intensity: i32,
    pub particle_dust: bool,
}

impl Default for EffectsSettings {
    fn default() -> Self {
        EffectLevels::default().into()
    }
}

impl EffectsSettings {
    /// Levels into `0..=4`, warmth into `-100..=100`.
    pub fn clamped(self) -> Self {
        let level = |v: i32| v.clamp(levels::MIN_LEVEL, levels::MAX_LEVEL);
        Self {
            vignette_strength: level(self.vignette_strength),
            vignette_radius: level(self.vignette_radius),
            vignette_softness: level(self.vignette_softness),
            vignette_warmth: self.vignette_warmth.clamp(levels::WARMTH_MIN, levels::WARMTH_MAX),
            film_grain_intensity: level(self.film_grain_intensity),
            scanline_intensity: level(self.scanline_intensity),
            ..self
        }
    }
}

impl From<EffectLevels> for EffectsSettings {
    fn from(l: EffectLevels) -> Self {
        Self {
            vignette: l.vignette_enabled,
            vignette_strength: l.vignette_strength,
            vignette_radius: l.vignette_radius,
            vignette_softness: l.vignette_softness,
            vignette_warmth: l.vignette_warmth,
            film_grain: l.film_grain,
            film_grain_intensity: l.film_grain_intensity,
            scanlines: l.scanlines,
            scanline_intensity: l.scanline_intensity,
            particle_dust: l.particle_dust,
        }
    }
}

impl From<EffectsSettings> for EffectLevels {
    fn from(s: EffectsSettings) -> Self {
        Self {
            vignette_enabled: s.vignette,
            vignette_strength: s.vignette_strength,
            vignette_radius: s.vignette_radius,
            vignette_softness: s.vignette_softness,
            vignette_warmth: s.vignette_warmth,
            film_grain: s.film_grain,
            film_grain_intensity: s.film_grain_intensity,
            scanlines: s.scanlines,
            scanline_intensity: s.scanline_intensity,
            particle_dust: s.particle_dust,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipping_values() {
        let s = EffectsSettings::default();
        assert!(s.vignette);
        assert_eq!((s.vignette_strength, s.vignette_radius, s.vignette_softness), (2, 2, 1));
        assert_eq!(s.vignette_warmth, 0);
        assert!(!s.film_grain && !s.scanlines);
        assert_eq!((s.film_grain_intensity, s.scanline_intensity), (1, 1));
        assert!(s.particle_dust);
    }

    #[test]
    fn clamped_limits_every_level() {
        let s = EffectsSettings {
            vignette_strength: 9,
            vignette_radius: -2,
            vignette_warmth: -400,
            film_grain_intensity: 5,
            scanline_intensity: i32::MAX,
            ..Default::default()
        }
        .clamped();
        assert_eq!(s.vignette_strength, 4);
        assert_eq!(s.vignette_radius, 0);
        assert_eq!(s.vignette_warmth, -100);
        assert_eq!(s.film_grain_intensity, 4);
        assert_eq!(s.scanline_intensity, 4);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let s: EffectsSettings = toml::from_str("film_grain = true\nvignette_warmth = 40\n").unwrap();
        assert!(s.film_grain);
        assert_eq!(s.vignette_warmth, 40);
        assert_eq!(s.vignette_strength, 2);
    }

    #[test]
    fn toml_round_trip() {
        let s = EffectsSettings { scanlines: true, scanline_intensity: 3, ..Default::default() };
        let text = toml::to_string_pretty(&s).unwrap();
        assert_eq!(toml::from_str::<EffectsSettings>(&text).unwrap(), s);
    }
}
