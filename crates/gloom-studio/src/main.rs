//! Preview window for the Gloom frame effects.
//!
//! Usage: `gloom-studio [settings-file]`. A `.txt` path uses the legacy
//! `KEY=value` format; anything else is TOML.

mod app;
mod canvas;
mod controls;
mod gpu;
mod scene;

use std::path::PathBuf;

use anyhow::{Context, Result};
use gloom_fx::logging::{LoggingConfig, init_logging};
use gloom_settings::{EffectsSettings, SettingsError, SettingsStore};

use crate::app::{Studio, StudioConfig};
use crate::gpu::GpuInit;

const DEFAULT_SETTINGS: &str = "gloom_effects.toml";

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS));

    let store = match SettingsStore::load(&path) {
        Ok(store) => store,
        Err(e @ SettingsError::Parse { .. }) => {
            // Keep the broken file untouched; nothing is saved this session.
            log::warn!("{e}; running with defaults");
            SettingsStore::in_memory(EffectsSettings::default())
        }
        Err(e) => return Err(e).context("failed to load effect settings"),
    };

    Studio::run(StudioConfig::default(), GpuInit::default(), store)
}
