//! Original `KEY=value` settings format (`config_effects.txt`).

use std::fmt::Write as _;

use crate::EffectsSettings;

/// Parses the original format on top of the defaults.
///
/// Unknown keys and malformed lines are skipped; values are clamped.
pub fn parse_legacy(text: &str) -> EffectsSettings {
    let mut s = EffectsSettings::default();
    for line in text.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let Ok(v) = value.trim().parse::<i32>() else {
            log::debug!("legacy settings: skipping `{line}`");
            continue;
        };
        match key.trim() {
            "VIGNETTE" => s.vignette = v != 0,
            "V_STRENGTH" => s.vignette_strength = v,
            "V_RADIUS" => s.vignette_radius = v,
            "V_SOFTNESS" => s.vignette_softness = v,
            "V_WARMTH" => s.vignette_warmth = v,
            "GRAIN" => s.film_grain = v != 0,
            "GRAIN_I" => s.film_grain_intensity = v,
            "SCAN" => s.scanlines = v != 0,
            "SCAN_I" => s.scanline_intensity = v,
            "DUST" => s.particle_dust = v != 0,
            _ => {}
        }
    }
    s.clamped()
}

/// Renders settings in the original format, one key per line.
pub fn write_legacy(s: &EffectsSettings) -> String {
    let b = |on: bool| i32::from(on);
    let mut out = String::new();
    for (key, value) in [
        ("VIGNETTE", b(s.vignette)),
        ("V_STRENGTH", s.vignette_strength),
        ("V_RADIUS", s.vignette_radius),
        ("V_SOFTNESS", s.vignette_softness),
        ("V_WARMTH", s.vignette_warmth),
        ("GRAIN", b(s.film_grain)),
        ("GRAIN_I", s.film_grain_intensity),
        ("SCAN", b(s.scanlines)),
        ("SCAN_I", s.scanline_intensity),
        ("DUST", b(s.particle_dust)),
    ] {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{key}={value}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_original_file() {
        let text = "VIGNETTE=0\nV_STRENGTH=3\nV_WARMTH=-60\nGRAIN=1\nGRAIN_I=7\nSCAN=1\n";
        let s = parse_legacy(text);
        assert!(!s.vignette);
        assert_eq!(s.vignette_strength, 3);
        assert_eq!(s.vignette_warmth, -60);
        assert!(s.film_grain);
        assert_eq!(s.film_grain_intensity, 4);
        assert!(s.scanlines);
        assert_eq!(s.scanline_intensity, 1);
    }

    #[test]
    fn skips_garbage_lines() {
        let s = parse_legacy("# comment\nV_RADIUS=abc\nBOGUS=3\nV_RADIUS = 4\n");
        assert_eq!(s.vignette_radius, 4);
    }

    #[test]
    fn written_text_parses_back() {
        let s = EffectsSettings { vignette_warmth: 20, scanlines: true, particle_dust: false, ..Default::default() };
        let text = write_legacy(&s);
        assert!(text.starts_with("VIGNETTE=1\nV_STRENGTH=2\n"));
        assert_eq!(parse_legacy(&text), s);
    }
}
