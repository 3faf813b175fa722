//! Configuration loading and discovery for `tileview.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::TileviewConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Name of the configuration file
pub const CONFIG_FILE: &str = "tileview.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse tileview.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub cdda_root: Option<PathBuf>,
    pub spacing: Option<u32>,
    pub margin: Option<u32>,
    pub scale: Option<u32>,
    pub case_sensitive: Option<bool>,
}

/// Find tileview.toml by walking up from the current working directory, then
/// falling back to `$XDG_CONFIG_HOME/tileview/tileview.toml`.
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find tileview.toml in the XDG config directory.
///
/// Checks XDG_CONFIG_HOME/tileview/tileview.toml or ~/.config/tileview/tileview.toml
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("tileview").join(CONFIG_FILE);
    config_path.exists().then_some(config_path)
}

/// Find tileview.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// An explicit path must exist. Without one, the discovered file is used, or the
/// defaults when none is found.
pub fn load_config(path: Option<&Path>) -> Result<TileviewConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(TileviewConfig::default()),
    }
}

fn load_config_file(path: &Path) -> Result<TileviewConfig, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let contents = fs::read_to_string(path)?;
    let mut config: TileviewConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    // A relative game root is relative to the config file
    if let (Some(root), Some(dir)) = (config.cdda.root.as_ref(), path.parent()) {
        config.cdda.root = Some(resolve_path(dir, root));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration. CLI arguments take precedence.
pub fn merge_cli_overrides(config: &mut TileviewConfig, overrides: &CliOverrides) {
    if let Some(ref root) = overrides.cdda_root {
        config.cdda.root = Some(root.clone());
    }
    if let Some(spacing) = overrides.spacing {
        config.extract.spacing = spacing;
    }
    if let Some(margin) = overrides.margin {
        config.extract.margin = margin;
    }
    if let Some(scale) = overrides.scale {
        config.extract.scale = scale;
    }
    if let Some(case_sensitive) = overrides.case_sensitive {
        config.search.case_sensitive = case_sensitive;
    }
}

/// Resolve a path relative to `base`. Absolute paths are returned unchanged.
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
