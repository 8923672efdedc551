//! Menu-facing adapters over the effect settings.
//!
//! The options menu shows warmth as a `0..=10` slider and as a single
//! warm/cool toggle.

use gloom_fx::EffectsConfig;
use gloom_fx::frame::levels::{WARMTH_MAX, WARMTH_MIN};

pub const SLIDER_MAX: i32 = 10;
/// Slider position at or above which the toggle reads as warm.
pub const WARM_THRESHOLD: i32 = 6;
pub const WARM_SLIDER: i32 = 8;
pub const COOL_SLIDER: i32 = 3;

/// Warmth `-100..=100` to slider `0..=10` (truncating).
#[inline]
pub fn warmth_to_slider(warmth: i32) -> i32 {
    (warmth.clamp(WARMTH_MIN, WARMTH_MAX) - WARMTH_MIN) / 20
}

/// Slider `0..=10` to warmth in steps of 20.
#[inline]
pub fn slider_to_warmth(slider: i32) -> i32 {
    slider.clamp(0, SLIDER_MAX) * 20 + WARMTH_MIN
}

pub fn warmth_slider(config: &dyn EffectsConfig) -> i32 {
    warmth_to_slider(config.vignette_warmth())
}

pub fn set_warmth_slider(config: &mut dyn EffectsConfig, slider: i32) {
    config.set_vignette_warmth(slider_to_warmth(slider));
}

pub fn warm_toggle(config: &dyn EffectsConfig) -> bool {
    warmth_slider(config) >= WARM_THRESHOLD
}

/// On selects slider 8 (+60), off slider 3 (-40).
pub fn set_warm_toggle(config: &mut dyn EffectsConfig, warm: bool) {
    set_warmth_slider(config, if warm { WARM_SLIDER } else { COOL_SLIDER });
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloom_fx::EffectLevels;

    #[test]
    fn slider_mapping() {
        assert_eq!(warmth_to_slider(-100), 0);
        assert_eq!(warmth_to_slider(0), 5);
        assert_eq!(warmth_to_slider(100), 10);
        assert_eq!(warmth_to_slider(19), 5);
        assert_eq!(warmth_to_slider(500), 10);
        assert_eq!(slider_to_warmth(0), -100);
        assert_eq!(slider_to_warmth(8), 60);
        assert_eq!(slider_to_warmth(42), 100);
    }

    #[test]
    fn toggle_threshold() {
        let mut cfg = EffectLevels::default();
        assert!(!warm_toggle(&cfg));
        set_warm_toggle(&mut cfg, true);
        assert_eq!(cfg.vignette_warmth, 60);
        assert!(warm_toggle(&cfg));
        set_warm_toggle(&mut cfg, false);
        assert_eq!(cfg.vignette_warmth, -40);
        assert!(!warm_toggle(&cfg));
    }
}
