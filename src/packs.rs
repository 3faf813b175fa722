//! Graphics pack discovery inside a game installation
//!
//! A game directory keeps its tilesets under `gfx/<pack>/tile_config.json`.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory under the game root holding graphics packs
pub const GFX_DIR: &str = "gfx";
/// Tileset document name inside a pack
pub const TILE_CONFIG: &str = "tile_config.json";

#[derive(Debug, Error)]
pub enum PackError {
    #[error("Could not find 'gfx' folder in {}", .0.display())]
    NoGfxDir(PathBuf),
    #[error("Could not find tile_config.json in {}", .0.display())]
    NoTileConfig(PathBuf),
    #[error("Failed to list {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A graphics pack directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphicsPack {
    pub name: String,
    pub path: PathBuf,
    /// Whether the pack has a `tile_config.json`
    pub has_config: bool,
}

/// List the graphics packs of a game installation, sorted by name.
pub fn discover(game_root: &Path) -> Result<Vec<GraphicsPack>, PackError> {
    let gfx = game_root.join(GFX_DIR);
    if !gfx.is_dir() {
        return Err(PackError::NoGfxDir(game_root.to_path_buf()));
    }

    let entries = fs::read_dir(&gfx).map_err(|source| PackError::Io { path: gfx.clone(), source })?;
    let mut packs: Vec<GraphicsPack> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            let has_config = path.join(TILE_CONFIG).is_file();
            Some(GraphicsPack { name, path, has_config })
        })
        .collect();
    packs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(packs)
}

/// Path of `pack`'s tileset document, checking that it exists.
pub fn config_path(game_root: &Path, pack: &str) -> Result<PathBuf, PackError> {
    let pack_dir = game_root.join(GFX_DIR).join(pack);
    let path = pack_dir.join(TILE_CONFIG);
    if path.is_file() {
        Ok(path)
    } else {
        Err(PackError::NoTileConfig(pack_dir))
    }
}
