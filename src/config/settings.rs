//! Recorder settings, defaults and TOML persistence.
//!
//! The struct implements `Serialize`, `Deserialize`, `Default` and `Clone`
//! so it can be round-tripped through `settings.toml` and handed to the UI.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::AppPaths;

// ---------------------------------------------------------------------------
// RecorderConfig
// ---------------------------------------------------------------------------

/// Top-level recorder configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use micrec::config::RecorderConfig;
///
/// // Load (returns Default when file is missing)
/// let config = RecorderConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Directory where recordings are saved.
    pub output_dir: PathBuf,

    /// Input device name — `None` means the system default.
    pub input_device: Option<String>,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            input_device: None,
        }
    }
}

impl RecorderConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(RecorderConfig::default())` when the file does not exist
    /// yet (first-run scenario) so callers never need to special-case a
    /// missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = RecorderConfig {
            output_dir: PathBuf::from("/tmp/recordings"),
            input_device: Some("USB Mic".into()),
        };
        original.save_to(&path).expect("save");

        let loaded = RecorderConfig::load_from(&path).expect("load");
        assert_eq!(original.output_dir, loaded.output_dir);
        assert_eq!(original.input_device, loaded.input_device);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = RecorderConfig::load_from(&path).expect("should not error");
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(config.input_device.is_none());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("settings.toml");

        RecorderConfig::default().save_to(&path).expect("save");
        assert!(path.exists());
    }
}
