//! Configuration management for skein.
//!
//! Loads configuration from ${SKEIN_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::thread::session::ViewMode;

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
/// To update, edit default_config.toml directly.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Merges user config values into the default template.
///
/// This ensures new comments/sections from the template are always present,
/// while preserving user's customized values.
fn merge_with_template(user_config: &str) -> Result<String> {
    use toml_edit::DocumentMut;

    let mut doc: DocumentMut = default_config_template()
        .parse()
        .context("Failed to parse default config template")?;

    let user_doc: DocumentMut = user_config.parse().context("Failed to parse user config")?;

    merge_items(doc.as_table_mut(), user_doc.as_table());

    Ok(doc.to_string())
}

/// Recursively merges items from source table into target table.
fn merge_items(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, value) in source.iter() {
        match value {
            Item::Value(v) => {
                target[key] = Item::Value(v.clone());
            }
            Item::Table(src_table) => {
                if let Some(Item::Table(target_table)) = target.get_mut(key) {
                    merge_items(target_table, src_table);
                } else {
                    target[key] = Item::Table(src_table.clone());
                }
            }
            Item::ArrayOfTables(src_arr) => {
                target[key] = Item::ArrayOfTables(src_arr.clone());
            }
            Item::None => {}
        }
    }
}

pub mod paths {
    //! Path resolution for skein configuration directories.
    //!
    //! SKEIN_HOME resolution order:
    //! 1. SKEIN_HOME environment variable (if set)
    //! 2. ~/.config/skein (default)

    use std::path::PathBuf;

    /// Returns the skein home directory.
    ///
    /// Checks SKEIN_HOME env var first, falls back to ~/.config/skein
    pub fn skein_home() -> PathBuf {
        if let Ok(home) = std::env::var("SKEIN_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("skein"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        skein_home().join("config.toml")
    }
}

/// Thread service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the companion thread service.
    pub base_url: String,
    /// Request timeout in seconds (0 disables).
    pub timeout_secs: u32,
}

impl ServiceConfig {
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.timeout_secs)))
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: Config::DEFAULT_BASE_URL.to_string(),
            timeout_secs: Config::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Thread surface settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadConfig {
    /// Default layout for a freshly opened thread.
    pub default_view_mode: ViewMode,
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Thread service connection settings.
    pub service: ServiceConfig,

    /// Thread surface settings.
    pub thread: ThreadConfig,
}

impl Config {
    const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
    const DEFAULT_TIMEOUT_SECS: u32 = 30;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Saves only the default view mode to the config file.
    ///
    /// Creates the file if it doesn't exist.
    /// Preserves existing fields and comments using toml_edit.
    pub fn save_view_mode(mode: ViewMode) -> Result<()> {
        Self::save_view_mode_to(&paths::config_path(), mode)
    }

    /// Saves only the default view mode to a specific config file path.
    ///
    /// Creates the file with the default template if it doesn't exist.
    /// If the file exists, merges user values into the latest template.
    pub fn save_view_mode_to(path: &Path, mode: ViewMode) -> Result<()> {
        use toml_edit::{value, DocumentMut};

        let contents = if path.exists() {
            let user_config = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            merge_with_template(&user_config)?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["thread"]["default_view_mode"] = value(mode.as_tag());

        Self::write_config(path, &doc.to_string())
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    /// Config loading: missing file returns defaults.
    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.service.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.service.timeout_secs, 30);
        assert_eq!(config.thread.default_view_mode, ViewMode::Full);
    }

    /// Config loading: partial config merges with defaults.
    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(
            &config_path,
            "[service]\nbase_url = \"https://appview.example\"\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.service.base_url, "https://appview.example");
        assert_eq!(config.service.timeout_secs, 30);
        assert_eq!(config.thread.default_view_mode, ViewMode::Full);
    }

    /// Config init: creates file with defaults, creates parent dirs.
    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        assert!(config_path.exists());
        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# skein Configuration"));
        assert!(contents.contains("default_view_mode = \"full\""));
    }

    /// Config init: fails if file exists (no silent overwrite).
    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "").unwrap();

        let result = Config::init(&config_path);
        assert!(result.is_err());
    }

    /// Timeout: zero disables timeout.
    #[test]
    fn test_timeout_zero_disables() {
        let config = Config {
            service: ServiceConfig {
                timeout_secs: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(config.service.timeout(), None);
    }

    /// View mode: loaded from config file.
    #[test]
    fn test_view_mode_loads_from_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "[thread]\ndefault_view_mode = \"linear\"\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.thread.default_view_mode, ViewMode::Linear);
    }

    /// save_view_mode: creates new config file with template if missing.
    #[test]
    fn test_save_view_mode_creates_file_with_template() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        Config::save_view_mode_to(&config_path, ViewMode::Linear).unwrap();

        assert!(config_path.exists());

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.thread.default_view_mode, ViewMode::Linear);

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# skein Configuration"));
        assert!(contents.contains("# Request timeout"));
    }

    /// save_view_mode: preserves other fields in existing config.
    #[test]
    fn test_save_view_mode_preserves_other_fields() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(
            &config_path,
            "[service]\nbase_url = \"https://appview.example\"\ntimeout_secs = 5\n",
        )
        .unwrap();

        Config::save_view_mode_to(&config_path, ViewMode::Linear).unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.thread.default_view_mode, ViewMode::Linear);
        assert_eq!(config.service.base_url, "https://appview.example"); // preserved
        assert_eq!(config.service.timeout_secs, 5); // preserved
    }

    /// save_view_mode: roundtrip - save and reload works correctly.
    #[test]
    fn test_save_view_mode_roundtrip() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        Config::save_view_mode_to(&config_path, ViewMode::Linear).unwrap();
        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.thread.default_view_mode, ViewMode::Linear);

        Config::save_view_mode_to(&config_path, ViewMode::Full).unwrap();
        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.thread.default_view_mode, ViewMode::Full);
    }
}
