use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// `env_logger` filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Check the initial tab query for ordering before loading it
    pub verify_initial_order: bool,
    /// Re-query the host after the model diverges from it
    pub reload_on_divergence: bool,
    /// Focus the window of a tab created through create-after
    pub focus_window_after_create: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            verify_initial_order: true,
            reload_on_divergence: true,
            focus_window_after_create: true,
        }
    }
}

impl AppSettings {
    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tabliner").join("settings.toml"))
    }

    /// Load settings from the default location, or return defaults if the file doesn't exist
    pub fn load() -> Self {
        Self::settings_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from `path`, falling back to defaults when missing or unparsable
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        std::fs::read_to_string(path)
            .ok()
            .and_then(|content| match toml::from_str(&content) {
                Ok(settings) => Some(settings),
                Err(err) => {
                    log::warn!("ignoring unparsable settings {}: {err}", path.display());
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Save settings to `path`
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize settings")?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}
