//! Tileview - resolve `tile_config.json` tilesets into sprite-sheet regions
//!
//! This library provides functionality to:
//! - Assign every sprite sheet its range of the global sprite index space
//! - Resolve tile identifiers to the sheet cells that draw them
//! - Compose and export the sprites of a tile as PNG
//! - Discover graphics packs in a game installation

pub mod cli;
pub mod compose;
pub mod config;
pub mod error;
pub mod image_source;
pub mod models;
pub mod output;
pub mod packs;
pub mod resolver;
pub mod sheet_index;
pub mod tileset;
