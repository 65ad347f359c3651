//! Picker configuration files.
//!
//! A picker is described by a JSON document listing its colors and the
//! components stacked in its window. Native builds read it from a path or
//! the user's config directory, web builds from localStorage.

use prism_ui::{Channel, Color, ColorSet, ComponentOptions};
use serde::{Deserialize, Serialize};

use crate::error::{PickerError, Result};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show lifecycle transitions and lock contention
    Debug,
    /// Show all log messages including dropped input
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }

    pub fn to_level(&self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// One color entry: a hex string or explicit HSV(A).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorEntry {
    Hex(String),
    Hsva {
        h: f32,
        s: f32,
        v: f32,
        #[serde(default = "default_alpha")]
        a: f32,
    },
}

fn default_alpha() -> f32 {
    1.0
}

impl ColorEntry {
    pub fn to_color(&self) -> Result<Color> {
        match self {
            ColorEntry::Hex(hex) => Ok(Color::from_hex(hex)?),
            ColorEntry::Hsva { h, s, v, a } => Ok(Color::from_hsva(*h, *s, *v, *a)),
        }
    }
}

/// Picker configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerConfig {
    /// Version of the configuration file format
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub log_level: LogLevel,

    #[serde(default = "default_colors")]
    pub colors: Vec<ColorEntry>,

    /// Color edited by components without their own `activeIndex`
    #[serde(default)]
    pub active_index: usize,

    #[serde(default = "default_components")]
    pub components: Vec<ComponentOptions>,

    /// Vertical space between stacked components
    #[serde(default = "default_gap")]
    pub gap: f32,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_colors() -> Vec<ColorEntry> {
    vec![ColorEntry::Hex("#ffffff".to_string())]
}

fn default_components() -> Vec<ComponentOptions> {
    vec![
        ComponentOptions::wheel(),
        ComponentOptions::slider(Channel::Value),
    ]
}

fn default_gap() -> f32 {
    12.0
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            log_level: LogLevel::default(),
            colors: default_colors(),
            active_index: 0,
            components: default_components(),
            gap: default_gap(),
        }
    }
}

impl PickerConfig {
    /// Key used for localStorage in WASM builds.
    #[cfg(target_arch = "wasm32")]
    const LOCALSTORAGE_KEY: &'static str = "prism_config";

    /// Serialize configuration to pretty-printed JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(PickerError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Build the color collection, with the configured color active.
    ///
    /// An out-of-range `activeIndex` falls back to the first color.
    pub fn color_set(&self) -> Result<ColorSet> {
        let colors = self
            .colors
            .iter()
            .map(ColorEntry::to_color)
            .collect::<Result<Vec<_>>>()?;
        let mut set = ColorSet::new(colors);
        if !set.set_active(self.active_index) {
            log::warn!(
                "Active color {} out of range ({} colors), using 0",
                self.active_index,
                set.len()
            );
        }
        Ok(set)
    }

    /// Get the default filename for config files.
    pub fn default_filename() -> &'static str {
        "prism-config.json"
    }

    /// Read a configuration file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Get the default config file path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("prism").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("prism")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be parsed.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {:?}", path);
                Some(config)
            }
            Err(e) => {
                log::warn!("Failed to load config from {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the default path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<()> {
        let path = Self::default_path().ok_or_else(|| {
            PickerError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, self.to_json()?)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Try to load configuration from localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn load_from_local_storage() -> Option<Self> {
        let window = web_sys::window()?;
        let storage = window.local_storage().ok()??;

        match storage.get_item(Self::LOCALSTORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from localStorage");
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config from localStorage: {}", e);
                    None
                }
            },
            Ok(None) => {
                log::debug!("No config found in localStorage");
                None
            }
            Err(e) => {
                log::warn!("Failed to read from localStorage: {:?}", e);
                None
            }
        }
    }

    /// Save configuration to localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn save_to_local_storage(&self) -> Result<()> {
        let window = web_sys::window()
            .ok_or_else(|| PickerError::StorageError("No window object available".to_string()))?;

        let storage = window
            .local_storage()
            .map_err(|e| PickerError::StorageError(format!("localStorage access error: {:?}", e)))?
            .ok_or_else(|| PickerError::StorageError("localStorage not available".to_string()))?;

        let json = self.to_json()?;

        storage
            .set_item(Self::LOCALSTORAGE_KEY, &json)
            .map_err(|e| {
                PickerError::StorageError(format!("Failed to save to localStorage: {:?}", e))
            })?;

        log::info!("Saved configuration to localStorage");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_ui::ComponentKind;

    #[test]
    fn test_defaults() {
        let config = PickerConfig::from_json("{}").unwrap();
        assert_eq!(config, PickerConfig::default());
        assert_eq!(config.components.len(), 2);
        assert_eq!(config.components[0].component, ComponentKind::Wheel);
        assert_eq!(config.components[1].slider_type, Channel::Value);
        assert_eq!(config.gap, 12.0);
    }

    #[test]
    fn test_full_document() {
        let config = PickerConfig::from_json(
            r##"{
                "version": 1,
                "logLevel": "debug",
                "colors": ["#ff0000", { "h": 120, "s": 50, "v": 80 }],
                "activeIndex": 1,
                "components": [
                    { "component": "box" },
                    { "sliderType": "kelvin", "activeIndex": 0 }
                ],
                "gap": 4
            }"##,
        )
        .unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(
            config.colors[1],
            ColorEntry::Hsva {
                h: 120.0,
                s: 50.0,
                v: 80.0,
                a: 1.0
            }
        );
        assert_eq!(config.components[1].active_index, Some(0));

        let set = config.color_set().unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.active_index(), 1);
        assert_eq!(set.get(0).unwrap().to_hex(), "#ff0000");
    }

    #[test]
    fn test_version_too_new() {
        let err = PickerConfig::from_json(r#"{ "version": 99 }"#).unwrap_err();
        assert!(matches!(
            err,
            PickerError::VersionTooNew {
                file_version: 99,
                supported_version: CONFIG_VERSION
            }
        ));
    }

    #[test]
    fn test_bad_color_is_reported() {
        let config = PickerConfig::from_json(r##"{ "colors": ["#12"] }"##).unwrap();
        assert!(matches!(config.color_set(), Err(PickerError::Color(_))));
    }

    #[test]
    fn test_active_index_out_of_range_falls_back() {
        let config = PickerConfig::from_json(r#"{ "activeIndex": 5 }"#).unwrap();
        assert_eq!(config.color_set().unwrap().active_index(), 0);
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = PickerConfig {
            log_level: LogLevel::Trace,
            gap: 20.0,
            ..PickerConfig::default()
        };
        let json = config.to_json().unwrap();
        assert!(json.contains("\"logLevel\": \"trace\""));
        assert_eq!(PickerConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::Trace.to_level(), log::Level::Trace);
    }
}
