//! Configuration schema types for `tileview.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::compose::ComposeOptions;

/// Largest accepted extraction scale factor
pub const MAX_SCALE: u32 = 128;

/// Largest accepted sprite spacing or strip margin, in pixels
pub const MAX_GAP: u32 = 4096;

/// Game installation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CddaConfig {
    /// Game root directory (the one containing `gfx/`)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub root: Option<PathBuf>,
}

/// Tile extraction settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractConfig {
    /// Horizontal gap between composed sprites
    #[serde(default = "default_spacing")]
    pub spacing: u32,
    /// Border around the composed strip
    #[serde(default = "default_margin")]
    pub margin: u32,
    /// Integer nearest-neighbour scale factor
    #[serde(default = "default_scale")]
    pub scale: u32,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { spacing: default_spacing(), margin: default_margin(), scale: default_scale() }
    }
}

impl ExtractConfig {
    pub fn compose_options(&self) -> ComposeOptions {
        ComposeOptions { spacing: self.spacing, margin: self.margin }
    }
}

fn default_spacing() -> u32 {
    20
}

fn default_margin() -> u32 {
    10
}

fn default_scale() -> u32 {
    1
}

/// Tile search settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    #[serde(default)]
    pub case_sensitive: bool,
}

/// Complete `tileview.toml` contents. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TileviewConfig {
    #[serde(default)]
    pub cdda: CddaConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "extract.scale")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tileview.toml: '{}' {}", self.field, self.message)
    }
}

impl TileviewConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.extract.scale == 0 || self.extract.scale > MAX_SCALE {
            errors.push(ConfigValidationError {
                field: "extract.scale".to_string(),
                message: format!("must be between 1 and {}", MAX_SCALE),
            });
        }

        for (field, value) in [("extract.spacing", self.extract.spacing), ("extract.margin", self.extract.margin)] {
            if value > MAX_GAP {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: format!("must be at most {}", MAX_GAP),
                });
            }
        }

        if let Some(root) = &self.cdda.root {
            if root.as_os_str().is_empty() {
                errors.push(ConfigValidationError {
                    field: "cdda.root".to_string(),
                    message: "must be a non-empty path".to_string(),
                });
            }
        }

        errors
    }
}
