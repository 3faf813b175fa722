//! Loading a tileset document into an immutable snapshot
//!
//! A load runs both passes (sheet indexing, then tile resolution) and returns a fresh
//! [`Tileset`]. [`Session`] holds the current snapshot and replaces it only when a new
//! load succeeds, so a failed load leaves the previous state untouched.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Diagnostic, LoadError};
use crate::image_source::{DirImageSource, ImageSource};
use crate::models::TilesetDocument;
use crate::resolver::{resolve, SheetMembership, SpriteRef, TileResolution};
use crate::sheet_index::{build_ranges, SheetRange};

/// A fully resolved tileset.
#[derive(Debug, Clone, PartialEq)]
pub struct Tileset {
    /// Directory sheet file references are relative to
    pub base_dir: PathBuf,
    pub ranges: Vec<SheetRange>,
    pub tiles: TileResolution,
    pub membership: SheetMembership,
    /// Non-fatal problems, sheet indexing first, then tile resolution
    pub diagnostics: Vec<Diagnostic>,
}

impl Tileset {
    /// Build a tileset from an already parsed document.
    pub fn from_document<S: ImageSource + ?Sized>(
        doc: &TilesetDocument,
        base_dir: impl Into<PathBuf>,
        images: &S,
    ) -> Result<Self, LoadError> {
        let default_cell_size = doc
            .default_cell_size()
            .ok_or_else(|| LoadError::DocumentUnreadable("tile_info is empty".to_string()))?;

        let index = build_ranges(&doc.sheets, default_cell_size, images);
        let resolution = resolve(&doc.sheets, &index.ranges);

        let mut diagnostics = index.diagnostics;
        diagnostics.extend(resolution.diagnostics);

        debug!(
            sheets = index.ranges.len(),
            tiles = resolution.tiles.len(),
            diagnostics = diagnostics.len(),
            "tileset resolved"
        );

        Ok(Self {
            base_dir: base_dir.into(),
            ranges: index.ranges,
            tiles: resolution.tiles,
            membership: resolution.membership,
            diagnostics,
        })
    }

    /// Parse a document from JSON text.
    pub fn from_json<S: ImageSource + ?Sized>(
        json: &str,
        base_dir: impl Into<PathBuf>,
        images: &S,
    ) -> Result<Self, LoadError> {
        let doc: TilesetDocument = serde_json::from_str(json)?;
        Self::from_document(&doc, base_dir, images)
    }

    /// Sprites for a tile identifier, in layering order.
    pub fn sprites(&self, id: &str) -> Option<&[SpriteRef]> {
        self.tiles.get(id)
    }

    /// The range of a sheet by file reference.
    pub fn range(&self, sheet: &str) -> Option<&SheetRange> {
        self.ranges.iter().find(|r| r.file == sheet)
    }

    /// Membership restricted to identifiers containing `term`.
    ///
    /// An empty term returns the full membership.
    pub fn search(&self, term: &str, case_sensitive: bool) -> SheetMembership {
        if term.is_empty() {
            return self.membership.clone();
        }
        if case_sensitive {
            self.membership.filter(|id| id.contains(term))
        } else {
            let needle = term.to_lowercase();
            self.membership.filter(|id| id.to_lowercase().contains(&needle))
        }
    }

    /// Image source reading sheets from this tileset's directory.
    pub fn image_source(&self) -> DirImageSource {
        DirImageSource::new(&self.base_dir)
    }
}

/// Load a tileset document from disk, resolving sheets relative to its directory.
pub fn load_tileset(path: &Path) -> Result<Tileset, LoadError> {
    let contents = fs::read_to_string(path)
        .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let images = DirImageSource::new(&base_dir);
    debug!(path = %path.display(), "loading tileset document");
    Tileset::from_json(&contents, base_dir, &images)
}

/// The currently loaded tileset, if any.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<Tileset>,
    source: Option<PathBuf>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Tileset> {
        self.current.as_ref()
    }

    /// Path of the document behind the current snapshot.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Load `path` and make it current.
    ///
    /// On error the previous snapshot stays in place.
    pub fn load(&mut self, path: &Path) -> Result<&Tileset, LoadError> {
        let tileset = load_tileset(path)?;
        self.source = Some(path.to_path_buf());
        Ok(self.current.insert(tileset))
    }

    /// Make an already built tileset current.
    pub fn replace(&mut self, tileset: Tileset) -> &Tileset {
        self.source = None;
        self.current.insert(tileset)
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.source = None;
    }
}
