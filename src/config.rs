use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::color::Rgb;
use crate::error::Result;

/// Compiled-in defaults, validated by `build.rs`.
const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub font: FontConfig,
    pub colors: ColorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Body text size in half-points (`\fs`)
    pub base_size: u32,
    /// Font `\f0`
    pub body: String,
    /// Font `\f1`, used by code spans
    pub mono: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            base_size: 20,
            body: "Arial".to_string(),
            mono: "Courier New".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ColorsConfig {
    /// Default font color as `#RRGGBB`; black when unset
    pub default: Option<String>,
    /// Write one color table line per distinct color instead of per marker
    pub collapse_duplicates: bool,
}

impl ColorsConfig {
    /// Parsed default color, if one is configured.
    pub fn default_color(&self) -> Result<Option<Rgb>> {
        self.default.as_deref().map(str::parse::<Rgb>).transpose()
    }
}

impl Config {
    /// The configuration shipped in `default_config.toml`.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Parse config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load config from a TOML file, or return defaults if not found.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Self::compiled_default()
            }),
            Err(_) => Self::compiled_default(),
        }
    }
}
