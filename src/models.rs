//! Data models for tileset documents (sheet declarations, tile entries, sprite references)
//!
//! These types mirror the on-disk `tile_config.json` layout. Fields that can take
//! more than one shape (`id`, `fg`) deserialize into untagged enums with a catch-all
//! variant so that one odd entry never makes the whole document unreadable.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A complete tileset document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TilesetDocument {
    /// Global tile metadata; the first element supplies the default cell size.
    pub tile_info: Vec<TileInfo>,
    /// Sprite sheets in declaration order.
    #[serde(rename = "tiles-new")]
    pub sheets: Vec<SheetDeclaration>,
}

impl TilesetDocument {
    /// Default cell size `(width, height)` from `tile_info[0]`.
    pub fn default_cell_size(&self) -> Option<(u32, u32)> {
        self.tile_info.first().map(|info| (info.width, info.height))
    }
}

/// Document-level tile metadata. Only the cell size is read.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TileInfo {
    pub width: u32,
    pub height: u32,
}

/// One sprite sheet image and the tiles drawn from it.
///
/// `file` and the cell size overrides accept any JSON shape; a wrong shape is
/// reported against this sheet alone when the sheet is indexed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SheetDeclaration {
    /// Image path relative to the document's directory
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file: Option<FileRef>,
    /// Per-sheet cell width (overrides `tile_info[0].width`)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sprite_width: Option<CellDimension>,
    /// Per-sheet cell height (overrides `tile_info[0].height`)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sprite_height: Option<CellDimension>,
    #[serde(default)]
    pub tiles: Vec<TileEntry>,
}

/// The `file` field of a sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FileRef {
    Path(String),
    Invalid(Value),
}

impl From<&str> for FileRef {
    fn from(path: &str) -> Self {
        FileRef::Path(path.to_string())
    }
}

/// A `sprite_width`/`sprite_height` override.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CellDimension {
    Pixels(u32),
    Invalid(Value),
}

impl From<u32> for CellDimension {
    fn from(pixels: u32) -> Self {
        CellDimension::Pixels(pixels)
    }
}

impl CellDimension {
    fn pixels(&self, field: &str) -> Result<u32, String> {
        match self {
            CellDimension::Pixels(px) => Ok(*px),
            CellDimension::Invalid(value) => Err(format!(
                "{}: expected a pixel count, got {} ({})",
                field,
                json_kind(value),
                value
            )),
        }
    }
}

impl SheetDeclaration {
    /// The file reference, if present, a string, and non-empty.
    pub fn file_ref(&self) -> Option<&str> {
        match &self.file {
            Some(FileRef::Path(path)) if !path.is_empty() => Some(path),
            _ => None,
        }
    }

    /// Why the `file` field is unusable, when it has a non-string shape.
    pub fn file_error(&self) -> Option<String> {
        match &self.file {
            Some(FileRef::Invalid(Value::Null)) | None | Some(FileRef::Path(_)) => None,
            Some(FileRef::Invalid(value)) => {
                Some(format!("file: expected a path, got {} ({})", json_kind(value), value))
            }
        }
    }

    /// Effective cell size, falling back to `default` per axis.
    ///
    /// Fails when an override is present but not a non-negative integer.
    pub fn cell_size(&self, default: (u32, u32)) -> Result<(u32, u32), String> {
        let width = match &self.sprite_width {
            Some(dim) => dim.pixels("sprite_width")?,
            None => default.0,
        };
        let height = match &self.sprite_height {
            Some(dim) => dim.pixels("sprite_height")?,
            None => default.1,
        };
        Ok((width, height))
    }
}

/// A tile definition: one or more identifiers sharing the same foreground sprites.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TileEntry {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<TileIds>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fg: Option<Foreground>,
}

/// The `id` field: a single identifier or a list of aliases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TileIds {
    One(String),
    Many(Vec<String>),
    /// Any other JSON shape
    Invalid(Value),
}

impl TileIds {
    /// Normalize to a list of identifiers.
    ///
    /// Empty strings are dropped. Returns `None` when no identifier is left or the
    /// shape is unrecognized.
    pub fn to_list(&self) -> Option<Vec<String>> {
        let ids: Vec<String> = match self {
            TileIds::One(id) => vec![id.clone()],
            TileIds::Many(ids) => ids.iter().filter(|id| !id.is_empty()).cloned().collect(),
            TileIds::Invalid(_) => return None,
        };
        (!ids.iter().all(String::is_empty)).then_some(ids)
    }
}

/// The `fg` field: a bare global index or a list of references.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Foreground {
    Single(i64),
    List(Vec<ForegroundItem>),
    Invalid(Value),
}

/// One element of an `fg` list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ForegroundItem {
    Index(i64),
    Structured(SpriteReference),
    Invalid(Value),
}

/// A structured foreground reference: a global sprite index plus opaque extra fields
/// (weights, rotation hints) that are carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpriteReference {
    pub sprite: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SpriteReference {
    pub fn bare(sprite: i64) -> Self {
        Self { sprite, extra: Map::new() }
    }
}

/// Result of normalizing an `fg` field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedForeground {
    pub refs: Vec<SpriteReference>,
    /// One message per element that could not be interpreted
    pub rejected: Vec<String>,
}

impl Foreground {
    /// Coerce every usable element into a [`SpriteReference`], in declaration order.
    pub fn normalize(&self) -> NormalizedForeground {
        let mut out = NormalizedForeground::default();
        match self {
            Foreground::Single(index) => out.refs.push(SpriteReference::bare(*index)),
            Foreground::List(items) => {
                for (position, item) in items.iter().enumerate() {
                    match item {
                        ForegroundItem::Index(index) => out.refs.push(SpriteReference::bare(*index)),
                        ForegroundItem::Structured(reference) => out.refs.push(reference.clone()),
                        ForegroundItem::Invalid(value) => out.rejected.push(format!(
                            "fg[{}]: unexpected {} ({})",
                            position,
                            json_kind(value),
                            value
                        )),
                    }
                }
            }
            Foreground::Invalid(value) => {
                out.rejected.push(format!("fg: unexpected {} ({})", json_kind(value), value))
            }
        }
        out
    }
}

/// Short human-readable name for a JSON value's type.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
