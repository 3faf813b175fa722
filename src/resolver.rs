//! Tile resolver - maps tile identifiers to the sheet cells that draw them
//!
//! Each foreground reference is a global sprite index. The resolver finds the sheet
//! range owning that index, converts it to a local row/column, and appends the
//! resulting [`SpriteRef`] to every identifier of the entry. Sprites accumulate across
//! entries: an identifier seen twice keeps the sprites of both, in entry order.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

use crate::error::Diagnostic;
use crate::models::{SheetDeclaration, SpriteReference, TileEntry};
use crate::sheet_index::{find_range, SheetRange};

/// A resolved sprite: one cell of one sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpriteRef {
    /// File reference of the owning sheet
    pub sheet: String,
    pub row: u32,
    pub column: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub global_index: i64,
    /// Fields of a structured reference other than `sprite`, passed through untouched
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl SpriteRef {
    /// Pixel rectangle `(x, y, width, height)` of this cell within its sheet.
    pub fn pixel_rect(&self) -> (u32, u32, u32, u32) {
        (
            self.column * self.cell_width,
            self.row * self.cell_height,
            self.cell_width,
            self.cell_height,
        )
    }
}

/// Identifier → sprites in layering order. An identifier present always has at least one sprite.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TileResolution {
    tiles: BTreeMap<String, Vec<SpriteRef>>,
}

impl TileResolution {
    pub fn get(&self, id: &str) -> Option<&[SpriteRef]> {
        self.tiles.get(id).map(Vec::as_slice)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tiles.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Identifiers in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tiles.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SpriteRef])> {
        self.tiles.iter().map(|(id, sprites)| (id.as_str(), sprites.as_slice()))
    }

    fn push(&mut self, id: &str, sprite: SpriteRef) {
        self.tiles.entry(id.to_string()).or_default().push(sprite);
    }
}

/// Sheet file → identifiers with at least one sprite on that sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SheetMembership {
    sheets: BTreeMap<String, BTreeSet<String>>,
}

impl SheetMembership {
    pub fn get(&self, sheet: &str) -> Option<&BTreeSet<String>> {
        self.sheets.get(sheet)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.sheets.iter().map(|(sheet, ids)| (sheet.as_str(), ids))
    }

    /// Keep only identifiers matching `keep`; sheets left without identifiers are dropped.
    pub fn filter<F>(&self, mut keep: F) -> SheetMembership
    where
        F: FnMut(&str) -> bool,
    {
        let sheets = self
            .sheets
            .iter()
            .filter_map(|(sheet, ids)| {
                let ids: BTreeSet<String> = ids.iter().filter(|id| keep(id.as_str())).cloned().collect();
                (!ids.is_empty()).then(|| (sheet.clone(), ids))
            })
            .collect();
        SheetMembership { sheets }
    }

    fn insert(&mut self, sheet: &str, id: &str) {
        self.sheets.entry(sheet.to_string()).or_default().insert(id.to_string());
    }
}

/// Everything produced by a resolve pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub tiles: TileResolution,
    pub membership: SheetMembership,
    pub diagnostics: Vec<Diagnostic>,
}

/// Incremental resolver over a fixed set of sheet ranges.
#[derive(Debug)]
pub struct Resolver<'a> {
    ranges: &'a [SheetRange],
    out: Resolution,
}

impl<'a> Resolver<'a> {
    pub fn new(ranges: &'a [SheetRange]) -> Self {
        Self { ranges, out: Resolution::default() }
    }

    /// Resolve one tile entry declared as entry number `position` of sheet `sheet`.
    pub fn add_entry(&mut self, sheet: &str, position: usize, entry: &TileEntry) {
        let Some(ids) = entry.id.as_ref().and_then(|ids| ids.to_list()) else {
            let reason = match &entry.id {
                None => "missing id".to_string(),
                Some(ids) => format!("unusable id {}", serde_json::to_string(ids).unwrap_or_default()),
            };
            self.diagnose(Diagnostic::MalformedTileEntry {
                sheet: sheet.to_string(),
                entry: position,
                reason,
            });
            return;
        };

        let Some(fg) = &entry.fg else {
            return;
        };
        let normalized = fg.normalize();
        for reason in normalized.rejected {
            self.diagnose(Diagnostic::MalformedTileEntry {
                sheet: sheet.to_string(),
                entry: position,
                reason,
            });
        }

        for reference in &normalized.refs {
            match self.locate(reference) {
                Some(sprite) => {
                    for id in &ids {
                        self.out.tiles.push(id, sprite.clone());
                        self.out.membership.insert(&sprite.sheet, id);
                    }
                }
                None => self.diagnose(Diagnostic::IndexOutOfRange {
                    index: reference.sprite,
                    ids: ids.clone(),
                }),
            }
        }
    }

    /// Map a global index to its sheet cell.
    fn locate(&self, reference: &SpriteReference) -> Option<SpriteRef> {
        let range = find_range(self.ranges, reference.sprite)?;
        let per_row = i64::from(range.cells_per_row()?);
        let local = reference.sprite - range.start;
        Some(SpriteRef {
            sheet: range.file.clone(),
            row: (local / per_row) as u32,
            column: (local % per_row) as u32,
            cell_width: range.cell_width,
            cell_height: range.cell_height,
            global_index: reference.sprite,
            extra: reference.extra.clone(),
        })
    }

    fn diagnose(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.out.diagnostics.push(diagnostic);
    }

    pub fn finish(self) -> Resolution {
        self.out
    }
}

/// Resolve the tile entries of every sheet declaration that has a file reference.
pub fn resolve(sheets: &[SheetDeclaration], ranges: &[SheetRange]) -> Resolution {
    let mut resolver = Resolver::new(ranges);
    for sheet in sheets {
        let Some(file) = sheet.file_ref() else {
            continue;
        };
        for (position, entry) in sheet.tiles.iter().enumerate() {
            resolver.add_entry(file, position, entry);
        }
    }
    resolver.finish()
}
