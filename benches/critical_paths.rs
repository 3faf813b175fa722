//! Criterion benchmarks for Tileview critical paths
//!
//! Benchmarks the two load passes over synthetic documents:
//! - Sheet indexing: global range assignment across many sheets
//! - Tile resolution: mapping tile entries to sheet cells
//! - Full load: document parsing plus both passes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::RgbaImage;
use std::collections::HashMap;
use tileview::models::TilesetDocument;
use tileview::resolver::resolve;
use tileview::sheet_index::build_ranges;
use tileview::tileset::Tileset;

// =============================================================================
// Test Data Generators
// =============================================================================

/// Generate a document with `sheets` sheets of 16x16 cells, each 256x256 px,
/// with one tile entry per cell.
fn make_document_json(sheets: usize) -> String {
    let cells_per_sheet = 256;
    let decls: Vec<String> = (0..sheets)
        .map(|s| {
            let tiles: Vec<String> = (0..cells_per_sheet)
                .map(|c| {
                    let global = s * cells_per_sheet + c;
                    format!(r#"{{"id": ["t_{}", "t_{}_alt"], "fg": [{}, {{"sprite": {}}}]}}"#, global, global, global, global)
                })
                .collect();
            format!(r#"{{"file": "sheet{}.png", "tiles": [{}]}}"#, s, tiles.join(", "))
        })
        .collect();
    format!(
        r#"{{"tile_info": [{{"width": 16, "height": 16}}], "tiles-new": [{}]}}"#,
        decls.join(", ")
    )
}

/// In-memory sheet images matching `make_document_json`
fn make_images(sheets: usize) -> HashMap<String, RgbaImage> {
    (0..sheets)
        .map(|s| (format!("sheet{}.png", s), RgbaImage::new(256, 256)))
        .collect()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_build_ranges(c: &mut Criterion) {
    let mut group = c.benchmark_group("sheet_index");
    for sheets in [1, 8, 32] {
        let doc: TilesetDocument = serde_json::from_str(&make_document_json(sheets)).unwrap();
        let images = make_images(sheets);
        group.throughput(Throughput::Elements(sheets as u64));
        group.bench_with_input(BenchmarkId::new("build_ranges", sheets), &sheets, |b, _| {
            b.iter(|| build_ranges(black_box(&doc.sheets), (16, 16), &images))
        });
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolver");
    for sheets in [1, 8, 32] {
        let doc: TilesetDocument = serde_json::from_str(&make_document_json(sheets)).unwrap();
        let images = make_images(sheets);
        let index = build_ranges(&doc.sheets, (16, 16), &images);
        group.throughput(Throughput::Elements((sheets * 256) as u64));
        group.bench_with_input(BenchmarkId::new("resolve", sheets), &sheets, |b, _| {
            b.iter(|| resolve(black_box(&doc.sheets), black_box(&index.ranges)))
        });
    }
    group.finish();
}

fn bench_full_load(c: &mut Criterion) {
    let json = make_document_json(8);
    let images = make_images(8);
    c.bench_function("tileset_from_json_8_sheets", |b| {
        b.iter(|| Tileset::from_json(black_box(&json), ".", &images).unwrap())
    });
}

criterion_group!(benches, bench_build_ranges, bench_resolve, bench_full_load);
criterion_main!(benches);
