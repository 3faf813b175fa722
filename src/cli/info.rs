//! Info command: per-sheet global index ranges

use std::process::ExitCode;

use super::{Context, TilesetArgs, EXIT_ERROR};
use crate::sheet_index::SheetRange;

fn describe(range: &SheetRange) -> String {
    if range.is_empty() {
        return match range.sheet_size {
            Some((w, h)) => format!("empty ({}x{} px, smaller than one cell)", w, h),
            None => "empty (not loaded)".to_string(),
        };
    }
    let grid = match (range.cells_per_row(), range.cells_per_column()) {
        (Some(cols), Some(rows)) => format!(", {}x{} grid", cols, rows),
        _ => String::new(),
    };
    format!("{}..={} ({} cells{})", range.start, range.end, range.len(), grid)
}

/// Execute the info command
pub fn run_info(ctx: &Context, source: &TilesetArgs, json: bool) -> Result<(), ExitCode> {
    let tileset = ctx.load(source)?;

    if json {
        match serde_json::to_string_pretty(&tileset.ranges) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return Err(ExitCode::from(EXIT_ERROR));
            }
        }
        return Ok(());
    }

    println!("Base directory: {}", tileset.base_dir.display());
    println!();
    for range in &tileset.ranges {
        println!(
            "  {:<40} {:>3}x{:<3} {}",
            range.file,
            range.cell_width,
            range.cell_height,
            describe(range)
        );
    }
    println!();
    let total: u64 = tileset.ranges.iter().map(SheetRange::len).sum();
    println!(
        "{} sheet(s), {} sprite(s), {} tile id(s), {} diagnostic(s)",
        tileset.ranges.len(),
        total,
        tileset.tiles.len(),
        tileset.diagnostics.len()
    );
    Ok(())
}
