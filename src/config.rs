//! Overtype settings.
//!
//! Settings are read from the `[overtype]` table of a TOML document supplied
//! by the host's [`SettingsSource`]. Missing keys take their defaults.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Cursor shapes a host can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorStyle {
    #[default]
    Line,
    Block,
    Underline,
    LineThin,
    BlockOutline,
    UnderlineThin,
}

/// One immutable snapshot of the overtype settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Track the mode per editor instead of one global mode (default: false)
    pub per_editor: bool,
    /// Apply overtype to paste as well as typing (default: false)
    pub paste: bool,
    /// Cursor shown in insert mode (default: line)
    pub default_cursor_style: CursorStyle,
    /// Cursor shown in overtype mode (default: block)
    pub overtype_cursor_style: CursorStyle,
    /// Use "INS"/"OVR" rather than "Insert"/"Overtype" (default: true)
    pub abbreviated_status: bool,
    /// Overrides the insert-mode label
    pub insert_label: Option<String>,
    /// Overrides the overtype-mode label
    pub overtype_label: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            per_editor: false,
            paste: false,
            default_cursor_style: CursorStyle::Line,
            overtype_cursor_style: CursorStyle::Block,
            abbreviated_status: true,
            insert_label: None,
            overtype_label: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    overtype: Config,
}

impl Config {
    /// Parse the `[overtype]` table of a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let file: SettingsFile = toml::from_str(content)?;
        Ok(file.overtype)
    }
}

/// Where settings come from. Implemented by the host.
pub trait SettingsSource {
    /// The current settings document as TOML text.
    fn read_settings(&self) -> Result<String, ConfigError>;
}

/// Settings stored in a TOML file. A missing file means "all defaults".
#[derive(Debug, Clone)]
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.config/overtype/settings.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/overtype/settings.toml"))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SettingsSource for FileSettings {
    fn read_settings(&self) -> Result<String, ConfigError> {
        if !self.path.exists() {
            return Ok(String::new());
        }
        std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl SettingsSource for String {
    fn read_settings(&self) -> Result<String, ConfigError> {
        Ok(self.clone())
    }
}

/// The current configuration snapshot plus the ability to reload it.
#[derive(Debug, Default)]
pub struct Configuration {
    current: Config,
}

impl Configuration {
    /// Load settings, falling back to defaults if they cannot be read.
    pub fn load(source: &dyn SettingsSource) -> Self {
        let mut configuration = Self::default();
        if let Err(e) = configuration.reload(source) {
            warn!("Failed to load overtype settings: {}, using defaults", e);
        }
        configuration
    }

    pub fn current(&self) -> &Config {
        &self.current
    }

    /// Re-read settings. Returns whether any tracked value changed.
    ///
    /// On error the previous snapshot stays in effect.
    pub fn reload(&mut self, source: &dyn SettingsSource) -> Result<bool, ConfigError> {
        let content = source.read_settings()?;
        let next = Config::from_toml(&content)?;
        let changed = next != self.current;
        if changed {
            debug!(?next, "overtype settings changed");
            self.current = next;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(s: &str) -> String {
        s.to_string()
    }

    #[test]
    fn test_empty_document_gives_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
        assert_eq!(
            Config::from_toml("[editor]\ntab_width = 4\n").unwrap(),
            Config::default()
        );
    }

    #[test]
    fn test_parse_all_keys() {
        let config = Config::from_toml(
            r#"
            [overtype]
            per_editor = true
            paste = true
            default_cursor_style = "underline-thin"
            overtype_cursor_style = "block-outline"
            abbreviated_status = false
            insert_label = "ins"
            overtype_label = "ovr"
            "#,
        )
        .unwrap();
        assert!(config.per_editor);
        assert!(config.paste);
        assert_eq!(config.default_cursor_style, CursorStyle::UnderlineThin);
        assert_eq!(config.overtype_cursor_style, CursorStyle::BlockOutline);
        assert!(!config.abbreviated_status);
        assert_eq!(config.insert_label.as_deref(), Some("ins"));
        assert_eq!(config.overtype_label.as_deref(), Some("ovr"));
    }

    #[test]
    fn test_bad_cursor_style_is_error() {
        let err = Config::from_toml("[overtype]\ndefault_cursor_style = \"wide\"\n");
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_reload_reports_change() {
        let mut configuration = Configuration::load(&settings(""));
        assert!(!configuration.reload(&settings("")).unwrap());
        assert!(configuration.reload(&settings("[overtype]\npaste = true\n")).unwrap());
        assert!(configuration.current().paste);
        assert!(!configuration.reload(&settings("[overtype]\npaste = true\n")).unwrap());
    }

    #[test]
    fn test_reload_error_keeps_snapshot() {
        let mut configuration = Configuration::load(&settings("[overtype]\nper_editor = true\n"));
        assert!(configuration.reload(&settings("[overtype\n")).is_err());
        assert!(configuration.current().per_editor);
    }

    #[test]
    fn test_missing_file_is_default() {
        let source = FileSettings::new("/nonexistent/overtype/settings.toml");
        assert_eq!(source.read_settings().unwrap(), "");
    }
}
