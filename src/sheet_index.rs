//! Sheet index builder - assigns each sprite sheet its slice of the global sprite index space
//!
//! Tile entries reference sprites by a single flat index that runs across all sheets in
//! declaration order. Each sheet with a file reference receives a contiguous range; a
//! sheet that cannot be probed receives an empty range and contributes zero cells, so
//! later sheets keep their numbering.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Diagnostic;
use crate::image_source::ImageSource;
use crate::models::SheetDeclaration;

/// The global index range owned by one sheet.
///
/// `end` is inclusive. An empty range is recorded as `end == start - 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetRange {
    pub file: String,
    pub start: i64,
    pub end: i64,
    pub cell_width: u32,
    pub cell_height: u32,
    /// Real pixel size of the sheet, when it could be probed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_size: Option<(u32, u32)>,
}

impl SheetRange {
    /// True when the range holds no cells (failed sheet or sheet smaller than one cell).
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Number of cells in the range.
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start + 1) as u64
        }
    }

    pub fn contains(&self, index: i64) -> bool {
        self.start <= index && index <= self.end
    }

    /// Cells per row, derived from the sheet's pixel width.
    pub fn cells_per_row(&self) -> Option<u32> {
        let (width, _) = self.sheet_size?;
        match width.checked_div(self.cell_width) {
            Some(0) | None => None,
            Some(n) => Some(n),
        }
    }

    /// Cells per column, derived from the sheet's pixel height.
    pub fn cells_per_column(&self) -> Option<u32> {
        let (_, height) = self.sheet_size?;
        match height.checked_div(self.cell_height) {
            Some(0) | None => None,
            Some(n) => Some(n),
        }
    }
}

/// Output of [`build_ranges`]: one range per sheet with a file, plus diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetIndex {
    pub ranges: Vec<SheetRange>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SheetIndex {
    /// Total number of cells across all sheets.
    pub fn total_cells(&self) -> u64 {
        self.ranges.iter().map(SheetRange::len).sum()
    }

    /// First range containing `index`. Empty ranges never match.
    pub fn find(&self, index: i64) -> Option<&SheetRange> {
        find_range(&self.ranges, index)
    }
}

/// Ordered linear scan for the range owning `index`.
pub fn find_range(ranges: &[SheetRange], index: i64) -> Option<&SheetRange> {
    ranges.iter().find(|r| r.contains(index))
}

/// Build the global index ranges for `sheets`, probing each sheet's size through `images`.
///
/// Sheets are probed strictly in declaration order. Declarations without a file
/// reference are skipped entirely.
pub fn build_ranges<S: ImageSource + ?Sized>(
    sheets: &[SheetDeclaration],
    default_cell_size: (u32, u32),
    images: &S,
) -> SheetIndex {
    let mut index = SheetIndex::default();
    let mut cursor: i64 = 0;

    for (position, sheet) in sheets.iter().enumerate() {
        let Some(file) = sheet.file_ref() else {
            if let Some(reason) = sheet.file_error() {
                let diagnostic = Diagnostic::MalformedSheet { sheet: format!("#{}", position), reason };
                warn!("{}", diagnostic);
                index.diagnostics.push(diagnostic);
            }
            continue;
        };

        let mut empty = SheetRange {
            file: file.to_string(),
            start: cursor,
            end: cursor - 1,
            cell_width: 0,
            cell_height: 0,
            sheet_size: None,
        };

        let (cell_width, cell_height) = match sheet.cell_size(default_cell_size) {
            Ok(size) => size,
            Err(reason) => {
                let diagnostic = Diagnostic::MalformedSheet { sheet: format!("'{}'", file), reason };
                warn!("{}", diagnostic);
                index.diagnostics.push(diagnostic);
                index.ranges.push(empty);
                continue;
            }
        };
        empty.cell_width = cell_width;
        empty.cell_height = cell_height;

        if cell_width == 0 || cell_height == 0 {
            let diagnostic = Diagnostic::InvalidCellSize {
                file: file.to_string(),
                width: cell_width,
                height: cell_height,
            };
            warn!("{}", diagnostic);
            index.diagnostics.push(diagnostic);
            index.ranges.push(empty);
            continue;
        }

        match images.dimensions(file) {
            Ok((width, height)) => {
                let cells = i64::from(width / cell_width) * i64::from(height / cell_height);
                debug!(file, width, height, cells, start = cursor, "indexed sheet");
                index.ranges.push(SheetRange {
                    end: cursor + cells - 1,
                    sheet_size: Some((width, height)),
                    ..empty
                });
                cursor += cells;
            }
            Err(e) => {
                let diagnostic =
                    Diagnostic::MissingSheetFile { file: file.to_string(), reason: e.to_string() };
                warn!("{}", diagnostic);
                index.diagnostics.push(diagnostic);
                index.ranges.push(empty);
            }
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use std::collections::HashMap;

    fn sheet(file: &str) -> SheetDeclaration {
        SheetDeclaration { file: Some(file.into()), ..Default::default() }
    }

    fn images(sizes: &[(&str, u32, u32)]) -> HashMap<String, RgbaImage> {
        sizes.iter().map(|(f, w, h)| (f.to_string(), RgbaImage::new(*w, *h))).collect()
    }

    #[test]
    fn test_two_sheets_cumulative() {
        let imgs = images(&[("a.png", 64, 32), ("b.png", 32, 16)]);
        let index = build_ranges(&[sheet("a.png"), sheet("b.png")], (16, 16), &imgs);

        assert!(index.diagnostics.is_empty());
        assert_eq!(index.ranges.len(), 2);
        assert_eq!((index.ranges[0].start, index.ranges[0].end), (0, 7));
        assert_eq!((index.ranges[1].start, index.ranges[1].end), (8, 9));
        assert_eq!(index.ranges[0].cells_per_row(), Some(4));
        assert_eq!(index.ranges[1].cells_per_row(), Some(2));
        assert_eq!(index.total_cells(), 10);
    }

    #[test]
    fn test_missing_sheet_contributes_zero_cells() {
        let imgs = images(&[("b.png", 32, 16)]);
        let index = build_ranges(&[sheet("a.png"), sheet("b.png")], (16, 16), &imgs);

        assert_eq!(index.ranges.len(), 2);
        let a = &index.ranges[0];
        assert_eq!((a.start, a.end), (0, -1));
        assert!(a.is_empty());
        assert_eq!(a.sheet_size, None);
        assert_eq!((index.ranges[1].start, index.ranges[1].end), (0, 1));

        assert_eq!(index.diagnostics.len(), 1);
        assert!(matches!(
            &index.diagnostics[0],
            Diagnostic::MissingSheetFile { file, .. } if file == "a.png"
        ));
    }

    #[test]
    fn test_missing_sheet_in_middle_keeps_neighbours() {
        let imgs = images(&[("a.png", 32, 32), ("c.png", 16, 16)]);
        let index =
            build_ranges(&[sheet("a.png"), sheet("b.png"), sheet("c.png")], (16, 16), &imgs);

        let spans: Vec<(i64, i64)> = index.ranges.iter().map(|r| (r.start, r.end)).collect();
        assert_eq!(spans, vec![(0, 3), (4, 3), (4, 4)]);
        assert!(index.find(4).map(|r| r.file.as_str()) == Some("c.png"));
    }

    #[test]
    fn test_declaration_without_file_skipped() {
        let imgs = images(&[("a.png", 16, 16), ("b.png", 16, 16)]);
        let decls = vec![
            sheet("a.png"),
            SheetDeclaration::default(),
            SheetDeclaration { file: Some("".into()), ..Default::default() },
            sheet("b.png"),
        ];
        let index = build_ranges(&decls, (16, 16), &imgs);

        assert_eq!(index.ranges.len(), 2);
        assert_eq!(index.ranges[1].file, "b.png");
        assert_eq!(index.ranges[1].start, 1);
        assert!(index.diagnostics.is_empty());
    }

    #[test]
    fn test_sheet_smaller_than_cell_is_empty() {
        let imgs = images(&[("tiny.png", 8, 8), ("b.png", 16, 16)]);
        let index = build_ranges(&[sheet("tiny.png"), sheet("b.png")], (16, 16), &imgs);

        assert!(index.ranges[0].is_empty());
        assert_eq!(index.ranges[0].len(), 0);
        assert_eq!(index.ranges[0].sheet_size, Some((8, 8)));
        assert_eq!((index.ranges[1].start, index.ranges[1].end), (0, 0));
        assert!(index.diagnostics.is_empty());
    }

    #[test]
    fn test_per_sheet_override_and_remainder_pixels() {
        let imgs = images(&[("big.png", 100, 70)]);
        let decl = SheetDeclaration {
            file: Some("big.png".into()),
            sprite_width: Some(32.into()),
            sprite_height: Some(32.into()),
            ..Default::default()
        };
        let index = build_ranges(&[decl], (16, 16), &imgs);

        // 100/32 = 3 columns, 70/32 = 2 rows; leftover pixels ignored
        assert_eq!(index.ranges[0].len(), 6);
        assert_eq!(index.ranges[0].cell_width, 32);
        assert_eq!(index.ranges[0].cells_per_row(), Some(3));
        assert_eq!(index.ranges[0].cells_per_column(), Some(2));
    }

    #[test]
    fn test_zero_cell_size_is_failed_sheet() {
        let imgs = images(&[("a.png", 32, 32), ("b.png", 16, 16)]);
        let decl = SheetDeclaration {
            file: Some("a.png".into()),
            sprite_width: Some(0.into()),
            ..Default::default()
        };
        let index = build_ranges(&[decl, sheet("b.png")], (16, 16), &imgs);

        assert!(index.ranges[0].is_empty());
        assert_eq!(index.ranges[1].start, 0);
        assert!(matches!(index.diagnostics[0], Diagnostic::InvalidCellSize { width: 0, .. }));
    }

    #[test]
    fn test_malformed_sheet_between_good_sheets() {
        let imgs = images(&[("a.png", 32, 16), ("bad.png", 64, 64), ("c.png", 16, 16)]);
        let decls: Vec<SheetDeclaration> = serde_json::from_value(serde_json::json!([
            {"file": "a.png"},
            {"file": "bad.png", "sprite_width": "16"},
            {"file": 5},
            {"file": "c.png"}
        ]))
        .unwrap();
        let index = build_ranges(&decls, (16, 16), &imgs);

        let bounds: Vec<_> = index.ranges.iter().map(|r| (r.file.as_str(), r.start, r.end)).collect();
        assert_eq!(bounds, vec![("a.png", 0, 1), ("bad.png", 2, 1), ("c.png", 2, 2)]);
        let kinds: Vec<&str> = index.diagnostics.iter().map(Diagnostic::kind).collect();
        assert_eq!(kinds, vec!["malformed-sheet", "malformed-sheet"]);
        assert!(matches!(
            &index.diagnostics[1],
            Diagnostic::MalformedSheet { sheet, .. } if sheet == "#2"
        ));
    }

    #[test]
    fn test_ranges_contiguous_and_disjoint() {
        let imgs = images(&[("a.png", 48, 16), ("c.png", 16, 32), ("d.png", 64, 64)]);
        let decls: Vec<_> = ["a.png", "b.png", "c.png", "d.png"].iter().map(|f| sheet(f)).collect();
        let index = build_ranges(&decls, (16, 16), &imgs);

        let mut expected_start = 0;
        for range in &index.ranges {
            assert_eq!(range.start, expected_start);
            expected_start = range.end + 1;
        }
        for (i, a) in index.ranges.iter().enumerate() {
            for b in index.ranges.iter().skip(i + 1) {
                if !a.is_empty() && !b.is_empty() {
                    assert!(a.end < b.start);
                }
            }
        }
    }

    #[test]
    fn test_find_range_skips_empty() {
        let ranges = vec![
            SheetRange {
                file: "a.png".into(),
                start: 0,
                end: -1,
                cell_width: 16,
                cell_height: 16,
                sheet_size: None,
            },
            SheetRange {
                file: "b.png".into(),
                start: 0,
                end: 1,
                cell_width: 16,
                cell_height: 16,
                sheet_size: Some((32, 16)),
            },
        ];
        assert_eq!(find_range(&ranges, 0).map(|r| r.file.as_str()), Some("b.png"));
        assert_eq!(find_range(&ranges, -1), None);
        assert_eq!(find_range(&ranges, 2), None);
    }
}
