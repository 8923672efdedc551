//! Persisted effect settings.
//!
//! [`SettingsStore`] holds an [`EffectsSettings`] loaded from disk and
//! implements [`gloom_fx::EffectsConfig`], so it can be handed straight to
//! the frame orchestrator. Every setter clamps and, with autosave on, writes
//! the file back immediately.
//!
//! Files ending in `.txt` are read and written in the original `KEY=value`
//! format; everything else is TOML.

mod error;
mod legacy;
pub mod menu;
mod settings;
mod store;

pub use error::SettingsError;
pub use legacy::{parse_legacy, write_legacy};
pub use settings::EffectsSettings;
pub use store::{SettingsFormat, SettingsStore};
