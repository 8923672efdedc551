use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use gloom_fx::{EffectLevels, EffectsConfig};
use gloom_fx::frame::levels;

use crate::{EffectsSettings, SettingsError, parse_legacy, write_legacy};

/// On-disk encoding, chosen from the file extension.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SettingsFormat {
    Toml,
    /// Original `KEY=value` lines.
    Legacy,
}

impl SettingsFormat {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("txt") => SettingsFormat::Legacy,
            _ => SettingsFormat::Toml,
        }
    }
}

/// Effect settings bound to a file.
///
/// Setters from [`EffectsConfig`] clamp, then save immediately when autosave
/// is on. Save failures inside setters are logged, not returned.
#[derive(Debug)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    format: SettingsFormat,
    settings: EffectsSettings,
    autosave: bool,
    saves: u64,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::in_memory(EffectsSettings::default())
    }
}

impl SettingsStore {
    /// Store without a backing file; saves are no-ops.
    pub fn in_memory(settings: EffectsSettings) -> Self {
        Self {
            path: None,
            format: SettingsFormat::Toml,
            settings: settings.clamped(),
            autosave: false,
            saves: 0,
        }
    }

    /// Loads `path`, or starts from defaults if it does not exist.
    ///
    /// Autosave is on for file-backed stores.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let format = SettingsFormat::for_path(&path);

        let settings = match fs::read_to_string(&path) {
            Ok(text) => {
                let s = match format {
                    SettingsFormat::Toml => toml::from_str::<EffectsSettings>(&text)
                        .map_err(|source| SettingsError::Parse { path: path.clone(), source })?,
                    SettingsFormat::Legacy => parse_legacy(&text),
                };
                log::info!("effect settings loaded from {}", path.display());
                s.clamped()
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("no settings at {}; using defaults", path.display());
                EffectsSettings::default()
            }
            Err(source) => return Err(SettingsError::Read { path, source }),
        };

        Ok(Self {
            path: Some(path),
            format,
            settings,
            autosave: true,
            saves: 0,
        })
    }

    /// Writes the current settings to the backing file.
    pub fn save(&mut self) -> Result<(), SettingsError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let text = match self.format {
            SettingsFormat::Toml => toml::to_string_pretty(&self.settings)?,
            SettingsFormat::Legacy => write_legacy(&self.settings),
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| SettingsError::Write { path: path.clone(), source })?;
        }
        fs::write(path, text).map_err(|source| SettingsError::Write { path: path.clone(), source })?;
        self.saves += 1;
        log::debug!("effect settings saved to {}", path.display());
        Ok(())
    }

    #[inline]
    pub fn settings(&self) -> EffectsSettings {
        self.settings
    }

    /// Replaces every value at once (clamped), saving once.
    pub fn replace(&mut self, settings: EffectsSettings) {
        self.settings = settings.clamped();
        self.autosave_now();
    }

    #[inline]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[inline]
    pub fn format(&self) -> SettingsFormat {
        self.format
    }

    #[inline]
    pub fn autosave(&self) -> bool {
        self.autosave
    }

    pub fn set_autosave(&mut self, on: bool) {
        self.autosave = on;
    }

    /// Successful saves since construction.
    #[inline]
    pub fn save_count(&self) -> u64 {
        self.saves
    }

    fn update(&mut self, f: impl FnOnce(&mut EffectsSettings)) {
        f(&mut self.settings);
        self.settings = self.settings.clamped();
        self.autosave_now();
    }

    fn autosave_now(&mut self) {
        if !self.autosave {
            return;
        }
        if let Err(e) = self.save() {
            log::warn!("{e}");
        }
    }
}

impl EffectsConfig for SettingsStore {
    fn vignette_enabled(&self) -> bool {
        self.settings.vignette
    }
    fn vignette_strength(&self) -> i32 {
        self.settings.vignette_strength
    }
    fn vignette_radius(&self) -> i32 {
        self.settings.vignette_radius
    }
    fn vignette_softness(&self) -> i32 {
        self.settings.vignette_softness
    }
    fn vignette_warmth(&self) -> i32 {
        self.settings.vignette_warmth
    }
    fn film_grain(&self) -> bool {
        self.settings.film_grain
    }
    fn film_grain_intensity(&self) -> i32 {
        self.settings.film_grain_intensity
    }
    fn scanlines(&self) -> bool {
        self.settings.scanlines
    }
    fn scanline_intensity(&self) -> i32 {
        self.settings.scanline_intensity
    }
    fn particle_dust(&self) -> bool {
        self.settings.particle_dust
    }

    fn set_vignette_enabled(&mut self, on: bool) {
        self.update(|s| s.vignette = on);
    }
    fn set_vignette_strength(&mut self, level: i32) {
        self.update(|s| s.vignette_strength = level);
    }
    fn set_vignette_radius(&mut self, level: i32) {
        self.update(|s| s.vignette_radius = level);
    }
    fn set_vignette_softness(&mut self, level: i32) {
        self.update(|s| s.vignette_softness = level);
    }
    fn set_vignette_warmth(&mut self, warmth: i32) {
        self.update(|s| s.vignette_warmth = warmth.clamp(levels::WARMTH_MIN, levels::WARMTH_MAX));
    }
    fn set_film_grain(&mut self, on: bool) {
        self.update(|s| s.film_grain = on);
    }
    fn set_film_grain_intensity(&mut self, level: i32) {
        self.update(|s| s.film_grain_intensity = level);
    }
    fn set_scanlines(&mut self, on: bool) {
        self.update(|s| s.scanlines = on);
    }
    fn set_scanline_intensity(&mut self, level: i32) {
        self.update(|s| s.scanline_intensity = level);
    }
    fn set_particle_dust(&mut self, on: bool) {
        self.update(|s| s.particle_dust = on);
    }

    fn set_levels(&mut self, levels: EffectLevels) {
        self.replace(levels.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(SettingsFormat::for_path(Path::new("a/config_effects.txt")), SettingsFormat::Legacy);
        assert_eq!(SettingsFormat::for_path(Path::new("a/effects.TXT")), SettingsFormat::Legacy);
        assert_eq!(SettingsFormat::for_path(Path::new("effects.toml")), SettingsFormat::Toml);
        assert_eq!(SettingsFormat::for_path(Path::new("effects")), SettingsFormat::Toml);
    }

    #[test]
    fn in_memory_setters_clamp_and_never_save() {
        let mut store = SettingsStore::default();
        store.set_vignette_strength(12);
        store.set_vignette_warmth(-1000);
        assert_eq!(store.vignette_strength(), 4);
        assert_eq!(store.vignette_warmth(), -100);
        assert_eq!(store.save_count(), 0);
    }
}
