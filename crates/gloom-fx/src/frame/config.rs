/// Effect settings as seen by the frame orchestrator.
///
/// Levels are raw integers; the orchestrator clamps them when it maps them
/// through [`levels`](super::levels). Getters are called once per
/// `begin_frame`, setters only from the explicit level setters.
pub trait EffectsConfig {
    fn vignette_enabled(&self) -> bool;
    fn vignette_strength(&self) -> i32;
    fn vignette_radius(&self) -> i32;
    fn vignette_softness(&self) -> i32;
    /// Cool/warm tint bias in `-100..=100`.
    fn vignette_warmth(&self) -> i32;
    fn film_grain(&self) -> bool;
    fn film_grain_intensity(&self) -> i32;
    fn scanlines(&self) -> bool;
    fn scanline_intensity(&self) -> i32;
    fn particle_dust(&self) -> bool;

    fn set_vignette_enabled(&mut self, on: bool);
    fn set_vignette_strength(&mut self, level: i32);
    fn set_vignette_radius(&mut self, level: i32);
    fn set_vignette_softness(&mut self, level: i32);
    fn set_vignette_warmth(&mut self, warmth: i32);
    fn set_film_grain(&mut self, on: bool);
    fn set_film_grain_intensity(&mut self, level: i32);
    fn set_scanlines(&mut self, on: bool);
    fn set_scanline_intensity(&mut self, level: i32);
    fn set_particle_dust(&mut self, on: bool);

    /// Writes every value in one go.
    ///
    /// The default goes through the single setters; stores that persist
    /// override it to save once.
    fn set_levels(&mut self, levels: EffectLevels) {
        self.set_vignette_enabled(levels.vignette_enabled);
        self.set_vignette_strength(levels.vignette_strength);
        self.set_vignette_radius(levels.vignette_radius);
        self.set_vignette_softness(levels.vignette_softness);
        self.set_vignette_warmth(levels.vignette_warmth);
        self.set_film_grain(levels.film_grain);
        self.set_film_grain_intensity(levels.film_grain_intensity);
        self.set_scanlines(levels.scanlines);
        self.set_scanline_intensity(levels.scanline_intensity);
        self.set_particle_dust(levels.particle_dust);
    }
}

/// Plain in-memory settings.
///
/// Defaults: vignette on at strength 2 / radius 2 / softness 1, neutral
/// warmth, grain and scanlines off at level 1, dust on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EffectLevels {
    pub vignette_enabled: bool,
    pub vignette_strength: i32,
    pub vignette_radius: i32,
    pub vignette_softness: i32,
    pub vignette_warmth: i32,
    pub film_grain: bool,
    pub film_grain_intensity: i32,
    pub scanlines: bool,
    pub scanline_intensity: i32,
    pub particle_dust: bool,
}

impl Default for EffectLevels {
    fn default() -> Self {
        Self {
            vignette_enabled: true,
            vignette_strength: 2,
            vignette_radius: 2,
            vignette_softness: 1,
            vignette_warmth: 0,
            film_grain: false,
            film_grain_intensity: 1,
            scanlines: false,
            scanline_intensity: 1,
            particle_dust: true,
        }
    }
}

impl EffectLevels {
    /// Snapshot of any config.
    pub fn read(config: &dyn EffectsConfig) -> Self {
        Self {
            vignette_enabled: config.vignette_enabled(),
            vignette_strength: config.vignette_strength(),
            vignette_radius: config.vignette_radius(),
            vignette_softness: config.vignette_softness(),
            vignette_warmth: config.vignette_warmth(),
            film_grain: config.film_grain(),
            film_grain_intensity: config.film_grain_intensity(),
            scanlines: config.scanlines(),
            scanline_intensity: config.scanline_intensity(),
            particle_dust: config.particle_dust(),
        }
    }
}

impl EffectsConfig for EffectLevels {
    fn vignette_enabled(&self) -> bool {
        self.vignette_enabled
    }
    fn vignette_strength(&self) -> i32 {
        self.vignette_strength
    }
    fn vignette_radius(&self) -> i32 {
        self.vignette_radius
    }
    fn vignette_softness(&self) -> i32 {
        self.vignette_softness
    }
    fn vignette_warmth(&self) -> i32 {
        self.vignette_warmth
    }
    fn film_grain(&self) -> bool {
        self.film_grain
    }
    fn film_grain_intensity(&self) -> i32 {
        self.film_grain_intensity
    }
    fn scanlines(&self) -> bool {
        self.scanlines
    }
    fn scanline_intensity(&self) -> i32 {
        self.scanline_intensity
    }
    fn particle_dust(&self) -> bool {
        self.particle_dust
    }

    fn set_vignette_enabled(&mut self, on: bool) {
        self.vignette_enabled = on;
    }
    fn set_vignette_strength(&mut self, level: i32) {
        self.vignette_strength = level;
    }
    fn set_vignette_radius(&mut self, level: i32) {
        self.vignette_radius = level;
    }
    fn set_vignette_softness(&mut self, level: i32) {
        self.vignette_softness = level;
    }
    fn set_vignette_warmth(&mut self, warmth: i32) {
        self.vignette_warmth = warmth;
    }
    fn set_film_grain(&mut self, on: bool) {
        self.film_grain = on;
    }
    fn set_film_grain_intensity(&mut self, level: i32) {
        self.film_grain_intensity = level;
    }
    fn set_scanlines(&mut self, on: bool) {
        self.scanlines = on;
    }
    fn set_scanline_intensity(&mut self, level: i32) {
        self.scanline_intensity = level;
    }
    fn set_particle_dust(&mut self, on: bool) {
        self.particle_dust = on;
    }

    fn set_levels(&mut self, levels: EffectLevels) {
        *self = levels;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_snapshots_any_config() {
        let src = EffectLevels {
            vignette_warmth: -30,
            scanlines: true,
            scanline_intensity: 3,
            ..Default::default()
        };
        let cfg: &dyn EffectsConfig = &src;
        assert_eq!(EffectLevels::read(cfg), src);
    }

    #[test]
    fn set_levels_replaces_everything() {
        let mut cfg = EffectLevels::default();
        let next = EffectLevels {
            vignette_enabled: false,
            film_grain: true,
            film_grain_intensity: 4,
            particle_dust: false,
            ..Default::default()
        };
        cfg.set_levels(next);
        assert_eq!(cfg, next);
    }
}
